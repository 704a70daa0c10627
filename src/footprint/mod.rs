//! Circular footprints around matched towers and their serialization

pub mod circle;
pub mod kml;

use std::path::Path;

use crate::error::Result;

pub use circle::{build_circle, Footprint, DEFAULT_POINT_COUNT};
pub use kml::{KmlStyle, KmlWriter};

/// Ordered key/value pairs embedded in a footprint's description
///
/// Entries keep insertion order so repeated runs render identical files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    /// Creates empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing an existing entry in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Looks up the value stored for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Destination for rendered footprints
///
/// The batch orchestrator only talks to this trait, so the output format can
/// be swapped and failures can be simulated per site.
pub trait FootprintSink: Send + Sync {
    /// Persists `footprint` at `path`, replacing any existing file
    fn write_footprint(
        &self,
        path: &Path,
        footprint: &Footprint,
        label: &str,
        metadata: &Metadata,
    ) -> Result<()>;

    /// File extension used for output names, without the dot
    fn extension(&self) -> &str {
        "kml"
    }
}
