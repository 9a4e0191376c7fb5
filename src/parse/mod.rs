//! Raw input parsing: type coercion only, no derived values.

pub mod geo;
pub mod records;
pub mod table;

pub use geo::{GeoFeature, Geography};
pub use records::{CaseTable, PopulationRecord, RawCaseRecord};
pub use table::{detect_delimiter, parse_case_table, parse_population_table};
