//! SVG export of a visual tree.
//!
//! Produces a standalone document for hosts without a DOM (previews, print
//! to file). Layer transforms are emitted as SVG `matrix(...)` so pan and
//! print transforms both survive.

use crate::visual::{Layer, NodeBody, NodeVisual, VisualTree};

const STROKE: &str = "#4A5568";
const SELECTED_STROKE: &str = "#3182CE";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn layer_matrix(layer: &Layer) -> String {
    let [a, b, c, d, e, f] = layer.transform.to_affine().as_coeffs();
    format!("matrix({a} {b} {c} {d} {e} {f})")
}

pub fn render_svg(tree: &VisualTree, width: f64, height: f64) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    ));
    svg.push_str("<style>\n");
    svg.push_str("  text { font-family: Inter, system-ui, sans-serif; font-size: 16px; }\n");
    svg.push_str("</style>\n");

    // Connections paint beneath nodes.
    svg.push_str(&format!(
        "<g class=\"connections\" transform=\"{}\">\n",
        layer_matrix(&tree.connection_layer)
    ));
    for conn in &tree.connections {
        svg.push_str(&format!(
            "  <path id=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{STROKE}\" stroke-width=\"3\" />\n",
            escape(conn.id.as_str()),
            conn.path
        ));
    }
    svg.push_str("</g>\n");

    svg.push_str(&format!(
        "<g class=\"nodes\" transform=\"{}\">\n",
        layer_matrix(&tree.node_layer)
    ));
    for node in &tree.nodes {
        render_node_svg(&mut svg, node);
    }
    svg.push_str("</g>\n</svg>");

    log::trace!(
        "svg export: {} nodes, {} connections",
        tree.nodes.len(),
        tree.connections.len()
    );
    svg
}

fn render_node_svg(out: &mut String, node: &NodeVisual) {
    let (x, y, w, h) = (node.x, node.y, node.width, node.height);
    match &node.body {
        NodeBody::Image { src } => {
            out.push_str(&format!(
                "  <image id=\"{}\" x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" href=\"{}\" />\n",
                escape(node.id.as_str()),
                escape(src)
            ));
        }
        NodeBody::Text { content, .. } => {
            out.push_str(&format!(
                "  <rect id=\"{}\" x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" fill=\"#FFFFFF\" stroke=\"{STROKE}\" />\n",
                escape(node.id.as_str())
            ));
            let line_height = 19.2;
            let mut line_y = y + 20.0;
            for line in content.lines() {
                out.push_str(&format!(
                    "  <text x=\"{}\" y=\"{line_y}\">{}</text>\n",
                    x + 6.0,
                    escape(line)
                ));
                line_y += line_height;
            }
        }
    }
    if node.selected {
        out.push_str(&format!(
            "  <rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" fill=\"none\" stroke=\"{SELECTED_STROKE}\" stroke-width=\"2\" stroke-dasharray=\"4 2\" />\n"
        ));
    }
}
