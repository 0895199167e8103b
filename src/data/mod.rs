/// Data layer: records, aggregation, and brush filtering.
///
/// Architecture:
/// ```text
///   scrubbed.csv            us-states.json
///        │                        │
///        ▼                        ▼
///   ┌──────────┐            ┌──────────┐
///   │  loader   │            │ geometry │  boundary rings keyed by state code
///   └──────────┘            └──────────┘
///        │  (states::canonical_state on both sides)
///        ▼
///   ┌─────────────┐
///   │ RecordStore │  Vec<SightingRecord>, read-only
///   └─────────────┘
///        │  year
///        ▼
///   ┌───────────┐
///   │ aggregate │  per-state count + mean duration
///   └───────────┘
///        │  predicate
///        ▼
///   ┌──────────┐
///   │  filter   │  FilteredAggregate { filtered }
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod geometry;
pub mod loader;
pub mod model;
pub mod rollups;
pub mod states;
