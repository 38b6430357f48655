//! Analysis configuration and settings

use bytescope_utils::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Controls which views are derived from a decoded stream and how they are rendered.
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```
/// use bytescope_core::config::{AnalysisConfig, SelectorScan};
///
/// let cfg = AnalysisConfig::from_json(r#"{ "selector_scan": "segment" }"#).unwrap();
/// assert_eq!(cfg.selector_scan, SelectorScan::Segment);
/// assert!(cfg.views.events);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Views to compute
    pub views: ViewSelection,
    /// How far selector recovery looks past a segment's entry
    pub selector_scan: SelectorScan,
    /// Disassembly text options
    pub disassembly: DisassemblyOptions,
    /// Whether views run as parallel tasks
    pub concurrent: bool,
}

/// Which derived views a report includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSelection {
    /// Instruction tree
    pub tree: bool,
    /// Function segments
    pub functions: bool,
    /// Reconstructed events
    pub events: bool,
    /// Selector dispatcher detection
    pub dispatcher: bool,
}

/// Range searched for a segment's 4-byte selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorScan {
    /// Only the segment's own instructions.
    Segment,
    /// Everything from the entry to the end of the stream.
    #[default]
    Stream,
}

/// Disassembly text options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisassemblyOptions {
    /// Append `// description` comments
    pub descriptions: bool,
    /// Minimum number of hex digits for offsets
    pub offset_width: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl Default for ViewSelection {
    fn default() -> Self {
        Self {
            tree: true,
            functions: true,
            events: true,
            dispatcher: true,
        }
    }
}

impl Default for DisassemblyOptions {
    fn default() -> Self {
        Self {
            descriptions: true,
            offset_width: 4,
        }
    }
}

impl AnalysisConfig {
    /// Every view, computed concurrently.
    pub fn standard() -> Self {
        Self {
            views: ViewSelection::default(),
            selector_scan: SelectorScan::Stream,
            disassembly: DisassemblyOptions::default(),
            concurrent: true,
        }
    }

    /// Tree and function segments only, computed inline.
    pub fn structure_only() -> Self {
        Self {
            views: ViewSelection {
                tree: true,
                functions: true,
                events: false,
                dispatcher: false,
            },
            concurrent: false,
            ..Self::standard()
        }
    }

    /// Parses a JSON document; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("loaded config from {}", path.display());
        Self::from_json(&text)
    }
}
