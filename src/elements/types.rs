use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One named element set, as it appeared in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ElementSetRecord {
    pub name: String,
    pub line1: String,
    pub line2: String,
    /// Position of the triple in the parsed text, starting at 0.
    pub index: usize,
}

impl ElementSetRecord {
    /// NORAD catalog number from columns 3-7 of line 1.
    pub fn catalog_number(&self) -> Option<u32> {
        self.line1.get(2..7)?.trim().parse().ok()
    }

    pub fn to_tle_text(&self) -> String {
        format!("{}\n{}\n{}", self.name, self.line1, self.line2)
    }
}
