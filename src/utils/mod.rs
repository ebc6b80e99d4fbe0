pub mod datetime;
pub mod json;

pub use datetime::parse_datetime;
pub use json::{as_blob, is_truthy, merge_objects, present};
