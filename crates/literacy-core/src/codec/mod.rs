mod report;
mod value;

pub use report::AssessmentReport;
pub use value::{decode, decode_strict, encode, SessionResult, ABSENT, FIXED_FIELDS, SEPARATOR};
