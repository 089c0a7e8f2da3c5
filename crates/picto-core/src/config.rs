//! Board configuration.
//!
//! Every field has a default matching the stock editor, so hosts only
//! override what they need (e.g. a JSON object with just `"gridSize"`).

use serde::{Deserialize, Serialize};

/// Page geometry used by the print composer, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSpec {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl PageSpec {
    /// A4 landscape at 96 DPI with a 40px safety margin.
    pub const A4_LANDSCAPE: PageSpec = PageSpec {
        width: 1122.0,
        height: 793.0,
        margin: 40.0,
    };

    /// Width of the printable area inside the margins.
    pub fn safe_width(&self) -> f64 {
        self.width - self.margin * 2.0
    }

    /// Height of the printable area inside the margins.
    pub fn safe_height(&self) -> f64 {
        self.height - self.margin * 2.0
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::A4_LANDSCAPE
    }
}

/// Tunables for the board engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Grid size for position snapping. Default: **20**.
    pub grid_size: f64,

    /// Width and height given to new nodes. Default: **100**.
    pub default_node_size: f64,

    /// Lower bound for width and height while resizing. Default: **50**.
    pub min_node_size: f64,

    /// Offset from a node's top-left to its connection anchor, on both axes.
    /// Anchors assume a default-sized node even after a resize. Default: **50**.
    pub anchor_offset: f64,

    /// Upper bound for the bezier control-point offset. Default: **150**.
    pub max_control_offset: f64,

    /// Squared pointer displacement at or below which a gesture is a click.
    /// Default: **25**.
    pub click_threshold_sq: f64,

    /// Hit radius of the node delete glyph (top-right corner).
    pub delete_glyph_radius: f64,

    /// Hit radius of the text-node pin glyph (top-left corner).
    pub pin_glyph_radius: f64,

    /// Side length of the square resize handle (bottom-right corner).
    pub resize_handle_size: f64,

    /// Hit radius of the connection delete glyph at the curve midpoint.
    pub connection_glyph_radius: f64,

    /// Print page geometry.
    pub page: PageSpec,

    /// Pause before invoking host print so the preview can paint. Default: **1000 ms**.
    pub print_delay_ms: u32,

    /// Key prefix for saved scenes in the host store.
    pub storage_namespace: String,

    /// Path prefix for catalog pictogram filenames.
    pub asset_base: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            default_node_size: 100.0,
            min_node_size: 50.0,
            anchor_offset: 50.0,
            max_control_offset: 150.0,
            click_threshold_sq: 25.0,
            delete_glyph_radius: 12.0,
            pin_glyph_radius: 12.0,
            resize_handle_size: 16.0,
            connection_glyph_radius: 10.0,
            page: PageSpec::default(),
            print_delay_ms: 1000,
            storage_namespace: "picto_chain_".to_string(),
            asset_base: "picto_nl/".to_string(),
        }
    }
}

impl BoardConfig {
    /// Parse a (possibly partial) JSON config; absent fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
