//! Retained-mode SVG backend.
//!
//! Renders the same board snapshot as the GPU path, but as a scene document:
//! one group carrying the pan/zoom transform, one cubic `<path>` per edge
//! straight from the raw control points (native path rendering handles curve
//! quality — no sampling), and one rounded `<rect>` + label per node in world
//! units.

use std::fmt::Write as _;

use crate::graph::{SceneSnapshot, edge_curve, node_index};

/// Options for the emitted document.
#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Document size in board pixels (the host extent).
    pub width: f64,
    pub height: f64,
    /// When false, node labels are omitted.
    pub include_labels: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            include_labels: true,
        }
    }
}

/// Emits the scene as a complete SVG document.
pub fn render_scene_svg(scene: &SceneSnapshot<'_>, options: &SvgRenderOptions) -> String {
    let index = node_index(scene.nodes);
    let viewport = scene.viewport;

    let mut out = String::new();
    let _ = writeln!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">"#,
        fmt(options.width.max(1.0)),
        fmt(options.height.max(1.0))
    );
    out.push_str(
        r#"<style>
.edge-path { fill: none; stroke: #54e3d6; stroke-width: 2.4; }
.node-box { fill: #24354f; stroke: #96b2e0; stroke-width: 1; }
.node-label { fill: #dbe6f5; font-family: ui-sans-serif, system-ui, sans-serif; font-size: 13px; text-anchor: middle; dominant-baseline: middle; }
</style>
"#,
    );

    let _ = writeln!(
        &mut out,
        r#"<g transform="translate({} {}) scale({})">"#,
        fmt(viewport.pan_x),
        fmt(viewport.pan_y),
        fmt(viewport.zoom)
    );

    out.push_str(r#"<g class="edges">"#);
    for edge in scene.edges {
        let (Some(source), Some(target)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) else {
            continue;
        };

        let c = edge_curve(source, target);
        let _ = write!(
            &mut out,
            r#"<path class="edge-path" d="M {} {} C {} {}, {} {}, {} {}" />"#,
            fmt(c.sx),
            fmt(c.sy),
            fmt(c.x1),
            fmt(c.y1),
            fmt(c.x2),
            fmt(c.y2),
            fmt(c.tx),
            fmt(c.ty)
        );
    }
    out.push_str("</g>\n");

    out.push_str(r#"<g class="nodes">"#);
    for node in scene.nodes {
        let _ = write!(
            &mut out,
            r#"<rect class="node-box" x="{}" y="{}" width="{}" height="{}" rx="12" />"#,
            fmt(node.position.x),
            fmt(node.position.y),
            fmt(node.width),
            fmt(node.height)
        );

        if options.include_labels {
            let center = node.center();
            let _ = write!(
                &mut out,
                r#"<text class="node-label" x="{}" y="{}">node-{}</text>"#,
                fmt(center.x),
                fmt(center.y),
                escape_xml(&node.id)
            );
        }
    }
    out.push_str("</g>\n");

    out.push_str("</g>\n</svg>\n");
    out
}

/// Formats a coordinate without trailing zeros.
fn fmt(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
