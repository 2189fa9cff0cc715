use crate::graph::{SceneSnapshot, bezier_point, edge_curve, node_index};

use super::mesh::{EdgeVertex, NodeVertex, append_edge_segment, append_node_quad};

/// Number of straight segments each edge curve is sampled into.
pub const EDGE_SEGMENTS: u32 = 28;

/// Edge core thickness in world pixels at zoom 1.
const EDGE_WIDTH: f64 = 2.4;

/// Edge glow falloff span in world pixels at zoom 1.
const EDGE_GLOW: f64 = 6.5;

/// Node corner radius in world pixels at zoom 1.
const NODE_RADIUS: f64 = 12.0;

const NODE_BORDER_WIDTH: f64 = 1.0;
const NODE_SHADOW_PAD: f64 = 18.0;

/// Flat vertex meshes for one frame, ready for GPU upload.
#[derive(Debug, Default)]
pub struct SceneVertices {
    pub edge_vertices: Vec<EdgeVertex>,
    pub node_vertices: Vec<NodeVertex>,
}

/// Tessellates a board snapshot into vertex meshes in physical pixels.
///
/// Pure: reads the snapshot and the device-pixel ratio, touches no GPU
/// state. Output order is deterministic — edges then nodes, each in input
/// order. Edges with an unresolvable endpoint contribute nothing.
pub fn tessellate_scene(scene: &SceneSnapshot<'_>, dpr: f64) -> SceneVertices {
    let index = node_index(scene.nodes);
    let viewport = scene.viewport;
    let scale = viewport.zoom * dpr;

    let mut out = SceneVertices::default();

    // Widths scale with zoom but are floored in device pixels so edges stay
    // visible when zoomed out.
    let core_half = (EDGE_WIDTH * scale) / 2.0;
    let glow = (1.1 * dpr).max(EDGE_GLOW * scale);

    for edge in scene.edges {
        let (Some(source), Some(target)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) else {
            continue;
        };

        let curve = edge_curve(source, target);
        let mut previous = bezier_point(0.0, &curve);

        for i in 1..=EDGE_SEGMENTS {
            let t = f64::from(i) / f64::from(EDGE_SEGMENTS);
            let next = bezier_point(t, &curve);

            let p0 = viewport.world_to_board(previous);
            let p1 = viewport.world_to_board(next);

            append_edge_segment(
                &mut out.edge_vertices,
                (p0.x * dpr, p0.y * dpr),
                (p1.x * dpr, p1.y * dpr),
                core_half,
                glow,
            );

            previous = next;
        }
    }

    let radius_base = (2.0 * dpr).max(NODE_RADIUS * scale);
    let border = (0.9 * dpr).max(NODE_BORDER_WIDTH * scale);
    let shadow_pad = (7.0 * dpr).max(NODE_SHADOW_PAD * scale);

    for node in scene.nodes {
        let top_left = viewport.world_to_board(node.position);
        let x = top_left.x * dpr;
        let y = top_left.y * dpr;
        let width = node.width * scale;
        let height = node.height * scale;

        // Corner radius never exceeds half the shorter side.
        let radius = radius_base.min((width.min(height) * 0.5 - 1.0).max(1.0));

        append_node_quad(
            &mut out.node_vertices,
            x,
            y,
            width,
            height,
            shadow_pad,
            radius,
            border,
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Viewport, WorldPoint};
    use crate::graph::{Edge, Node};

    fn session() -> (Vec<Node>, Vec<Edge>) {
        let nodes = vec![
            Node::new("1", WorldPoint::new(0.0, 0.0), 100.0, 50.0),
            Node::new("2", WorldPoint::new(120.0, 0.0), 100.0, 50.0),
        ];
        let edges = vec![Edge::new("1-2", "1", "2")];
        (nodes, edges)
    }

    fn scene<'a>(nodes: &'a [Node], edges: &'a [Edge]) -> SceneSnapshot<'a> {
        SceneSnapshot {
            nodes,
            edges,
            viewport: Viewport::default(),
        }
    }

    #[test]
    fn edge_yields_six_vertices_per_segment() {
        let (nodes, edges) = session();
        let verts = tessellate_scene(&scene(&nodes, &edges), 1.0);

        assert_eq!(verts.edge_vertices.len(), (EDGE_SEGMENTS * 6) as usize);
    }

    #[test]
    fn node_yields_one_quad_each() {
        let (nodes, edges) = session();
        let verts = tessellate_scene(&scene(&nodes, &edges), 1.0);

        assert_eq!(verts.node_vertices.len(), nodes.len() * 6);
    }

    #[test]
    fn dangling_edge_contributes_nothing() {
        let (nodes, _) = session();
        let edges = vec![Edge::new("1-x", "1", "missing")];
        let verts = tessellate_scene(&scene(&nodes, &edges), 1.0);

        assert!(verts.edge_vertices.is_empty());
        assert_eq!(verts.node_vertices.len(), nodes.len() * 6);
    }

    #[test]
    fn vertex_order_is_edges_then_nodes_in_input_order() {
        let (nodes, edges) = session();
        let verts = tessellate_scene(&scene(&nodes, &edges), 1.0);

        // First edge vertex sits at the source anchor (50, 25) offset along
        // the normal; node quads start at node 1's padded top-left.
        let first_edge = verts.edge_vertices[0].position;
        assert_eq!(first_edge[0], 50.0);

        let first_node = verts.node_vertices[0].position;
        let second_node = verts.node_vertices[6].position;
        assert!(first_node[0] < second_node[0]);
    }

    #[test]
    fn dpr_scales_positions_and_widths() {
        let (nodes, edges) = session();
        let at_1x = tessellate_scene(&scene(&nodes, &edges), 1.0);
        let at_2x = tessellate_scene(&scene(&nodes, &edges), 2.0);

        assert_eq!(
            at_2x.edge_vertices[0].core_half_width,
            at_1x.edge_vertices[0].core_half_width * 2.0
        );
        assert_eq!(
            at_2x.node_vertices[0].half_size[0],
            at_1x.node_vertices[0].half_size[0] * 2.0
        );
    }

    #[test]
    fn glow_is_floored_in_device_pixels_when_zoomed_out() {
        let (nodes, edges) = session();
        let snapshot = SceneSnapshot {
            nodes: &nodes,
            edges: &edges,
            viewport: Viewport::new(0.0, 0.0, 0.5),
        };

        // 6.5 * 0.5 * 0.2 = 0.65 would be sub-pixel; the 1.1 * dpr floor
        // keeps the line visible. (dpr below 1 is synthetic but legal.)
        let verts = tessellate_scene(&snapshot, 0.2);
        assert_eq!(verts.edge_vertices[0].glow_size, (1.1f64 * 0.2) as f32);
    }

    #[test]
    fn node_radius_clamps_to_half_shorter_side() {
        let nodes = vec![Node::new("tiny", WorldPoint::new(0.0, 0.0), 10.0, 8.0)];
        let verts = tessellate_scene(
            &SceneSnapshot {
                nodes: &nodes,
                edges: &[],
                viewport: Viewport::default(),
            },
            1.0,
        );

        // min(w, h) * 0.5 - 1 = 3, well below the 12px base radius.
        assert_eq!(verts.node_vertices[0].radius, 3.0);
    }
}
