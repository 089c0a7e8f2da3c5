pub mod hit;
pub mod svg;
pub mod visual;

pub use hit::{HitTarget, hit_test};
pub use svg::render_svg;
pub use visual::{
    ConnectionVisual, Damage, HitMetrics, Layer, NodeBody, NodeVisual, PinGlyph, RenderScope,
    VisualTree,
};
