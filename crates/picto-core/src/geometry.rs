//! Geometry and transform math: grid snapping, connection curves, and the
//! print-fit transform. Stateless; everything here is a pure function of
//! its inputs.

use crate::config::{BoardConfig, PageSpec};
use crate::model::{CanvasOffset, Node};
use kurbo::{Affine, CubicBez, Point, Rect, Vec2};
use serde::Serialize;

// ─── Grid ────────────────────────────────────────────────────────────────

/// Quantize `v` to the nearest multiple of `grid`.
///
/// Halves round toward positive infinity, so `-10` snaps to `0` on a
/// 20px grid, the same way it does in the browser editor.
pub fn snap_to_grid(v: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return v;
    }
    (v / grid + 0.5).floor() * grid
}

// ─── Connection curves ───────────────────────────────────────────────────

/// Blend weights of a cubic bezier at t = 0.5.
const MID_WEIGHTS: [f64; 4] = [0.125, 0.375, 0.375, 0.125];

/// The cubic bezier drawn between two connected nodes.
///
/// Both anchors sit at `top-left + anchor_offset`, independent of the
/// node's actual size. Control points extend horizontally from each anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionCurve {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

impl ConnectionCurve {
    /// Build the curve between two node origins (top-left corners).
    pub fn between(from: Point, to: Point, anchor_offset: f64, max_control: f64) -> Self {
        let start = from + Vec2::new(anchor_offset, anchor_offset);
        let end = to + Vec2::new(anchor_offset, anchor_offset);
        let k = (start.distance(end) * 0.5).min(max_control);
        Self {
            start,
            c1: Point::new(start.x + k, start.y),
            c2: Point::new(end.x - k, end.y),
            end,
        }
    }

    /// Curve between two scene nodes using the board config.
    pub fn for_nodes(from: &Node, to: &Node, config: &BoardConfig) -> Self {
        Self::between(
            from.origin(),
            to.origin(),
            config.anchor_offset,
            config.max_control_offset,
        )
    }

    /// Position of the delete glyph: the curve point at t = 0.5.
    ///
    /// The y blend reuses the endpoint y values in place of the control
    /// points. That only equals the real midpoint because `c1.y == start.y`
    /// and `c2.y == end.y`; revisit if the control points ever leave the
    /// horizontal.
    pub fn midpoint(&self) -> Point {
        let [a, b, c, d] = MID_WEIGHTS;
        let x = a * self.start.x + b * self.c1.x + c * self.c2.x + d * self.end.x;
        let y = a * self.start.y + b * self.start.y + c * self.end.y + d * self.end.y;
        Point::new(x, y)
    }

    /// SVG path data: `M x1 y1 C c1x c1y, c2x c2y, x2 y2`.
    pub fn path_data(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.c1.x,
            self.c1.y,
            self.c2.x,
            self.c2.y,
            self.end.x,
            self.end.y
        )
    }

    pub fn to_cubic(&self) -> CubicBez {
        CubicBez::new(self.start, self.c1, self.c2, self.end)
    }
}

// ─── Print fit ───────────────────────────────────────────────────────────

/// Transform that fits the scene content into the printable page area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrintLayout {
    /// Top-left of the content bounding box (translated to the origin first).
    pub min: Point,
    /// Uniform scale; may exceed 1 so small boards fill the page.
    pub scale: f64,
    /// Final translation that centers the scaled content inside the margins.
    pub offset: Vec2,
}

impl PrintLayout {
    /// Fit `content` into `page`. Returns `None` for degenerate content
    /// (zero or negative extent on either axis, or non-finite bounds).
    pub fn fit(content: Rect, page: &PageSpec) -> Option<Self> {
        let content_w = content.width();
        let content_h = content.height();
        if !(content_w.is_finite() && content_h.is_finite()) || content_w <= 0.0 || content_h <= 0.0
        {
            return None;
        }

        let safe_w = page.safe_width();
        let safe_h = page.safe_height();
        let scale = (safe_w / content_w).min(safe_h / content_h);

        let offset = Vec2::new(
            page.margin + (safe_w - content_w * scale) / 2.0,
            page.margin + (safe_h - content_h * scale) / 2.0,
        );

        Some(Self {
            min: Point::new(content.x0, content.y0),
            scale,
            offset,
        })
    }

    /// translate(offset) · scale · translate(-min): the origin shift applies first.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale) * Affine::translate(-self.min.to_vec2())
    }

    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({}) translate({}px, {}px)",
            self.offset.x, self.offset.y, self.scale, -self.min.x, -self.min.y
        )
    }
}

// ─── Layer transform ─────────────────────────────────────────────────────

/// The single transform applied to a whole visual layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayerTransform {
    /// Canvas pan (the normal on-screen state).
    Pan { offset: CanvasOffset },
    /// Content-fit transform installed while printing.
    Print { layout: PrintLayout },
}

impl LayerTransform {
    pub fn pan(offset: CanvasOffset) -> Self {
        Self::Pan { offset }
    }

    pub fn to_affine(&self) -> Affine {
        match self {
            Self::Pan { offset } => Affine::translate(offset.to_vec2()),
            Self::Print { layout } => layout.to_affine(),
        }
    }

    pub fn css_transform(&self) -> String {
        match self {
            Self::Pan { offset } => format!("translate({}px, {}px)", offset.x, offset.y),
            Self::Print { layout } => layout.css_transform(),
        }
    }
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self::pan(CanvasOffset::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::ParamCurve;

    #[test]
    fn snap_rounds_to_nearest_gridline() {
        assert_eq!(snap_to_grid(105.0, 20.0), 100.0);
        assert_eq!(snap_to_grid(112.0, 20.0), 120.0);
        assert_eq!(snap_to_grid(110.0, 20.0), 120.0);
        assert_eq!(snap_to_grid(-10.0, 20.0), 0.0);
        assert_eq!(snap_to_grid(-11.0, 20.0), -20.0);
    }

    #[test]
    fn snap_output_is_always_a_multiple() {
        for i in -200..200 {
            let v = f64::from(i) * 1.37;
            let snapped = snap_to_grid(v, 20.0);
            assert_eq!(snapped % 20.0, 0.0, "{v} snapped to {snapped}");
        }
    }

    #[test]
    fn control_offset_is_capped() {
        let near = ConnectionCurve::between(Point::ZERO, Point::new(100.0, 0.0), 50.0, 150.0);
        assert_eq!(near.c1, Point::new(100.0, 50.0));
        assert_eq!(near.c2, Point::new(100.0, 50.0));

        let far = ConnectionCurve::between(Point::ZERO, Point::new(1000.0, 0.0), 50.0, 150.0);
        assert_eq!(far.c1.x - far.start.x, 150.0);
        assert_eq!(far.end.x - far.c2.x, 150.0);
    }

    #[test]
    fn midpoint_matches_bezier_eval() {
        let curve = ConnectionCurve::between(
            Point::new(20.0, 40.0),
            Point::new(380.0, 260.0),
            50.0,
            150.0,
        );
        let expected = curve.to_cubic().eval(0.5);
        let mid = curve.midpoint();
        assert!((mid.x - expected.x).abs() < 1e-9);
        assert!((mid.y - expected.y).abs() < 1e-9);
    }

    #[test]
    fn path_data_uses_plain_numbers() {
        let curve = ConnectionCurve::between(Point::ZERO, Point::new(200.0, 0.0), 50.0, 150.0);
        assert_eq!(curve.path_data(), "M 50 50 C 150 50, 150 50, 250 50");
    }

    #[test]
    fn print_fit_single_node() {
        let page = PageSpec::A4_LANDSCAPE;
        let layout = PrintLayout::fit(Rect::new(0.0, 0.0, 100.0, 100.0), &page).unwrap();
        let expected_scale = (page.safe_width() / 100.0).min(page.safe_height() / 100.0);
        assert_eq!(layout.scale, expected_scale);

        let affine = layout.to_affine();
        let top_left = affine * Point::new(0.0, 0.0);
        let bottom_right = affine * Point::new(100.0, 100.0);
        assert!(top_left.x >= page.margin && top_left.y >= page.margin - 1e-9);
        assert!(bottom_right.x <= page.width - page.margin + 1e-9);
        assert!(bottom_right.y <= page.height - page.margin + 1e-9);

        let center = top_left.midpoint(bottom_right);
        assert!((center.x - page.width / 2.0).abs() < 1e-9);
        assert!((center.y - page.height / 2.0).abs() < 1e-9);
    }

    #[test]
    fn print_fit_translates_content_origin_first() {
        let layout =
            PrintLayout::fit(Rect::new(300.0, 200.0, 500.0, 300.0), &PageSpec::A4_LANDSCAPE).unwrap();
        let mapped = layout.to_affine() * Point::new(300.0, 200.0);
        assert!((mapped.x - layout.offset.x).abs() < 1e-9);
        assert!((mapped.y - layout.offset.y).abs() < 1e-9);
        assert_eq!(
            layout.css_transform(),
            format!(
                "translate({}px, {}px) scale({}) translate(-300px, -200px)",
                layout.offset.x, layout.offset.y, layout.scale
            )
        );
    }

    #[test]
    fn print_fit_rejects_degenerate_content() {
        let page = PageSpec::A4_LANDSCAPE;
        assert!(PrintLayout::fit(Rect::new(10.0, 10.0, 10.0, 80.0), &page).is_none());
        assert!(PrintLayout::fit(Rect::new(0.0, 0.0, f64::INFINITY, 10.0), &page).is_none());
    }

    #[test]
    fn pan_transform_css() {
        let t = LayerTransform::pan(CanvasOffset::new(-40.0, 12.5));
        assert_eq!(t.css_transform(), "translate(-40px, 12.5px)");
        assert_eq!(t.to_affine() * Point::ZERO, Point::new(-40.0, 12.5));
    }
}
