use std::fmt;

use serde::Serialize;

/// Point-in-time view of a codec for the admin reporting layer.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    pub label: String,
    pub pending_lines: u64,
    /// Bytes buffered past the last checkpoint.
    pub pending_bytes: i64,
}

impl Snapshot {
    /// Labelled entries in display order.
    pub fn entries(&self) -> [(&'static str, i64); 2] {
        [
            (
                "Pending lines",
                i64::try_from(self.pending_lines).unwrap_or(i64::MAX),
            ),
            ("Pending bytes", self.pending_bytes),
        ]
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for (name, value) in self.entries() {
            writeln!(f, "  {name} = {value}")?;
        }
        Ok(())
    }
}
