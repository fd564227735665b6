//! Palette surface modes.

use serde::{Deserialize, Serialize};

/// Which palette surface is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteMode {
    /// Web search with suggestions.
    Web,
    /// Finder over the registered tools.
    Tool,
}

impl PaletteMode {
    /// Setting key under which this surface's floating position is saved.
    pub fn position_key(&self) -> &'static str {
        match self {
            PaletteMode::Web => "webPalettePosition",
            PaletteMode::Tool => "toolPalettePosition",
        }
    }

    /// Input placeholder shown when the surface opens.
    pub fn placeholder(&self) -> &'static str {
        match self {
            PaletteMode::Web => "Search the web...",
            PaletteMode::Tool => "Search tools...",
        }
    }
}
