//! Small shared value types

use std::fmt;

/// Sample value object logged by the periodic tick.
///
/// Rendered as `(id, name)`, without quoting the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRecord {
    id: u32,
    name: String,
}

impl SampleRecord {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SampleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.id, self.name)
    }
}
