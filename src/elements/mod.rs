mod parsing;
mod types;

pub use parsing::{format_records, parse_records};
pub use types::ElementSetRecord;
