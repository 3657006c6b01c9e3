pub mod extract;
pub mod normalize;

pub use extract::{extract_array, extract_records};
pub use normalize::{fallback_dish, normalize_record, normalize_records, FieldDefaults};
