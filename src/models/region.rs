//! Region selection model

use serde::{Deserialize, Serialize};

/// A district picked from the region dataset
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RegionSelection {
    /// Code used to parameterize the forecast pages
    pub code: String,
    /// District display name
    pub name: String,
    /// Names from province down to district
    pub path: Vec<String>,
}

impl RegionSelection {
    /// Create a selection for a bare code with no known name
    #[must_use]
    pub fn from_code(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            name: code.clone(),
            code,
            path: Vec::new(),
        }
    }

    /// Format the path as `省 > 市 > 区`
    #[must_use]
    pub fn breadcrumb(&self) -> String {
        if self.path.is_empty() {
            self.name.clone()
        } else {
            self.path.join(" > ")
        }
    }
}
