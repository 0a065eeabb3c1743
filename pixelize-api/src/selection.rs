//! Selection identity and the snapshot sent on every selection change.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Fills;

/// Opaque, stable identifier of a shape in the host document.
///
/// The host assigns these; the panel never mints its own. The id doubles as
/// the selection identity: every asynchronous completion compares the id it
/// captured at request time against the current one and discards its result
/// on mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub String);

impl ShapeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// What the host reports about the newly selected object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub id: ShapeId,
    /// Display label, informational only.
    pub name: String,
    pub fills: Fills,
}
