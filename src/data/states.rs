//! Canonical state identifiers.
//!
//! Sighting rows carry lowercase two-letter codes while boundary files name
//! states in full.  Everything that leaves the data layer uses the uppercase
//! two-letter code, so aggregates and map shapes join on the same key.

/// `(code, full name)` for the fifty states plus DC and Puerto Rico.
pub const US_STATES: [(&str, &str); 52] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("PR", "Puerto Rico"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Normalize a raw state value to its canonical code.
///
/// * Full US state names (any case, surrounding whitespace ignored) map to
///   their two-letter code.
/// * Anything else is trimmed and uppercased, which turns `"ny"` into `"NY"`
///   and leaves non-US regions such as `"bc"` as `"BC"`.
/// * Blank input stays blank.
pub fn canonical_state(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    US_STATES
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(trimmed))
        .map(|(code, _)| (*code).to_string())
        .unwrap_or_else(|| trimmed.to_ascii_uppercase())
}

/// Full name for a canonical code, if it is a US state.
pub fn state_name(code: &str) -> Option<&'static str> {
    US_STATES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_codes_converge() {
        assert_eq!(canonical_state("ny"), "NY");
        assert_eq!(canonical_state("NY"), "NY");
        assert_eq!(canonical_state("New York"), "NY");
        assert_eq!(canonical_state("  new york "), "NY");
        assert_eq!(canonical_state("District of Columbia"), "DC");
    }

    #[test]
    fn unknown_regions_are_uppercased() {
        assert_eq!(canonical_state("bc"), "BC");
        assert_eq!(canonical_state(""), "");
        assert_eq!(canonical_state("   "), "");
    }

    #[test]
    fn name_lookup() {
        assert_eq!(state_name("tx"), Some("Texas"));
        assert_eq!(state_name("ZZ"), None);
    }
}
