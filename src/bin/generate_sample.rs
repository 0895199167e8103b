use anyhow::{Context, Result};
use serde::Serialize;

/// Rough population centers: (code, city, latitude, longitude, weight).
const PLACES: &[(&str, &str, f64, f64, u32)] = &[
    ("ca", "los angeles", 34.05, -118.24, 12),
    ("wa", "seattle", 47.61, -122.33, 6),
    ("tx", "houston", 29.76, -95.37, 7),
    ("fl", "miami", 25.76, -80.19, 6),
    ("ny", "new york city", 40.71, -74.01, 6),
    ("az", "phoenix", 33.45, -112.07, 4),
    ("il", "chicago", 41.88, -87.63, 4),
    ("or", "portland", 45.52, -122.68, 3),
    ("co", "denver", 39.74, -104.99, 3),
    ("nm", "roswell", 33.39, -104.52, 2),
    ("pa", "philadelphia", 39.95, -75.17, 3),
    ("oh", "columbus", 39.96, -83.00, 2),
    ("mi", "detroit", 42.33, -83.05, 2),
    ("nv", "las vegas", 36.17, -115.14, 2),
    ("me", "portland", 43.66, -70.26, 1),
    ("ak", "anchorage", 61.22, -149.90, 1),
];

const SHAPES: &[&str] = &[
    "light", "circle", "triangle", "fireball", "unknown", "sphere", "disk", "oval", "formation",
    "changing", "cigar", "flash", "rectangle", "cylinder", "diamond", "chevron", "teardrop",
    "egg", "cone",
];

const COMMENTS: &[&str] = &[
    "Bright light hovering then moved off quickly",
    "Three lights in a triangle formation&#44 no sound",
    "Orange glow over the ridge",
    "Silent disc above the highway",
    "Pulsing object changed colors",
    "Fast moving light zig-zagged across the sky",
];

/// One output row, in the column order of the public sightings dump.
#[derive(Serialize)]
struct Row {
    datetime: String,
    year: String,
    city: String,
    state: String,
    country: String,
    shape: String,
    durationsec: String,
    durationhours: String,
    comments: String,
    dateposted: String,
    latitude: String,
    longitude: String,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn weighted_place(rng: &mut SimpleRng) -> &'static (&'static str, &'static str, f64, f64, u32) {
    let total: u32 = PLACES.iter().map(|p| p.4).sum();
    let mut roll = rng.below(total as usize) as u32;
    for place in PLACES {
        if roll < place.4 {
            return place;
        }
        roll -= place.4;
    }
    &PLACES[0]
}

/// Reports grow over the decades, like the real dump.
fn reports_in(year: i32) -> usize {
    let since = (year - 1970).max(0) as usize;
    20 + since * since / 4
}

fn describe(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{} seconds", seconds.round())
    } else if seconds < 3600.0 {
        format!("{} minutes", (seconds / 60.0).round())
    } else {
        format!("{:.1} hours", seconds / 3600.0)
    }
}

fn sighting(rng: &mut SimpleRng, year: i32) -> Row {
    let &(state, city, lat, lon, _) = weighted_place(rng);
    let seconds = rng.gauss(5.0, 1.6).exp().clamp(1.0, 36_000.0).round();
    let month = 1 + rng.below(12);
    let day = 1 + rng.below(28);
    let hour = 18 + rng.below(6);

    let mut row = Row {
        datetime: format!("{month}/{day}/{year} {hour}:{:02}", rng.below(60)),
        year: year.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        country: "us".to_string(),
        shape: rng.pick(SHAPES).to_string(),
        durationsec: seconds.to_string(),
        durationhours: describe(seconds),
        comments: rng.pick(COMMENTS).to_string(),
        dateposted: format!("{}/{}/{}", 1 + rng.below(12), 1 + rng.below(28), year + 1),
        latitude: format!("{:.4}", lat + rng.gauss(0.0, 0.6)),
        longitude: format!("{:.4}", lon + rng.gauss(0.0, 0.6)),
    };

    // Sprinkle in the irregular rows the real data carries.
    match rng.below(40) {
        0 => row.durationsec.clear(),
        1 => row.state.clear(),
        2 => {
            row.country = "ca".to_string();
            row.state = "on".to_string();
        }
        3 => row.shape.clear(),
        _ => {}
    }
    row
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_sightings.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("Failed to create {output_path}"))?;

    let mut rows = 0usize;
    for year in 1970..=2014 {
        for _ in 0..reports_in(year) {
            writer
                .serialize(sighting(&mut rng, year))
                .context("Failed to write row")?;
            rows += 1;
        }
    }
    writer.flush().context("Failed to flush output")?;

    println!("Wrote {rows} sightings to {output_path}");
    Ok(())
}
