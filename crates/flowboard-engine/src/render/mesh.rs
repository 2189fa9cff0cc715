use bytemuck::{Pod, Zeroable};

/// Segments shorter than this (physical px) contribute no quad.
const MIN_SEGMENT_LENGTH: f64 = 1e-3;

/// Vertex of an edge quad strip.
///
/// `signed_distance` is the distance from the segment centerline, carried to
/// the fragment stage for antialiased core + glow falloff.
///
/// Layout (20 bytes):
///
///  offset  0  position         [f32; 2]  loc 0
///  offset  8  signed_distance  f32       loc 1
///  offset 12  core_half_width  f32       loc 2
///  offset 16  glow_size        f32       loc 3
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct EdgeVertex {
    pub position: [f32; 2],
    pub signed_distance: f32,
    pub core_half_width: f32,
    pub glow_size: f32,
}

impl EdgeVertex {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32,   // signed_distance
        2 => Float32,   // core_half_width
        3 => Float32    // glow_size
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<EdgeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Vertex of a node quad.
///
/// `local_point` is in node-local coordinates (origin at the node center) so
/// the fragment stage can evaluate a rounded-rectangle signed distance for
/// fill, border, and drop shadow.
///
/// Layout (32 bytes):
///
///  offset  0  position      [f32; 2]  loc 0
///  offset  8  local_point   [f32; 2]  loc 1
///  offset 16  half_size     [f32; 2]  loc 2
///  offset 24  radius        f32       loc 3
///  offset 28  border_width  f32       loc 4
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct NodeVertex {
    pub position: [f32; 2],
    pub local_point: [f32; 2],
    pub half_size: [f32; 2],
    pub radius: f32,
    pub border_width: f32,
}

impl NodeVertex {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // local_point
        2 => Float32x2, // half_size
        3 => Float32,   // radius
        4 => Float32    // border_width
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<NodeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

fn edge_vertex(x: f64, y: f64, signed_distance: f64, core_half_width: f64, glow_size: f64) -> EdgeVertex {
    EdgeVertex {
        position: [x as f32, y as f32],
        signed_distance: signed_distance as f32,
        core_half_width: core_half_width as f32,
        glow_size: glow_size as f32,
    }
}

/// Expands one curve segment into a quad (two triangles, six vertices) whose
/// long edges sit at `±(core_half_width + glow_size)` along the segment
/// normal. Degenerate segments are skipped.
pub(crate) fn append_edge_segment(
    out: &mut Vec<EdgeVertex>,
    start: (f64, f64),
    end: (f64, f64),
    core_half_width: f64,
    glow_size: f64,
) {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let length = dx.hypot(dy);
    if length < MIN_SEGMENT_LENGTH {
        return;
    }

    let nx = -dy / length;
    let ny = dx / length;
    let outer_half = core_half_width + glow_size;

    let ox = nx * outer_half;
    let oy = ny * outer_half;

    let left0 = (start.0 - ox, start.1 - oy);
    let right0 = (start.0 + ox, start.1 + oy);
    let left1 = (end.0 - ox, end.1 - oy);
    let right1 = (end.0 + ox, end.1 + oy);

    out.push(edge_vertex(left0.0, left0.1, -outer_half, core_half_width, glow_size));
    out.push(edge_vertex(right0.0, right0.1, outer_half, core_half_width, glow_size));
    out.push(edge_vertex(left1.0, left1.1, -outer_half, core_half_width, glow_size));

    out.push(edge_vertex(right0.0, right0.1, outer_half, core_half_width, glow_size));
    out.push(edge_vertex(right1.0, right1.1, outer_half, core_half_width, glow_size));
    out.push(edge_vertex(left1.0, left1.1, -outer_half, core_half_width, glow_size));
}

fn node_vertex(
    x: f64,
    y: f64,
    local_x: f64,
    local_y: f64,
    half_size: (f64, f64),
    radius: f64,
    border_width: f64,
) -> NodeVertex {
    NodeVertex {
        position: [x as f32, y as f32],
        local_point: [local_x as f32, local_y as f32],
        half_size: [half_size.0 as f32, half_size.1 as f32],
        radius: radius as f32,
        border_width: border_width as f32,
    }
}

/// Emits one shadow-padded quad (six vertices) for a node rectangle given in
/// physical pixels. The padding extends past the rectangle on every side so
/// the fragment stage has room to draw the drop shadow.
pub(crate) fn append_node_quad(
    out: &mut Vec<NodeVertex>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    shadow_pad: f64,
    radius: f64,
    border_width: f64,
) {
    let left = x - shadow_pad;
    let top = y - shadow_pad;
    let right = x + width + shadow_pad;
    let bottom = y + height + shadow_pad;

    let half = (width / 2.0, height / 2.0);
    let local_left = -half.0 - shadow_pad;
    let local_top = -half.1 - shadow_pad;
    let local_right = half.0 + shadow_pad;
    let local_bottom = half.1 + shadow_pad;

    out.push(node_vertex(left, top, local_left, local_top, half, radius, border_width));
    out.push(node_vertex(right, top, local_right, local_top, half, radius, border_width));
    out.push(node_vertex(left, bottom, local_left, local_bottom, half, radius, border_width));

    out.push(node_vertex(right, top, local_right, local_top, half, radius, border_width));
    out.push(node_vertex(right, bottom, local_right, local_bottom, half, radius, border_width));
    out.push(node_vertex(left, bottom, local_left, local_bottom, half, radius, border_width));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_segment_emits_one_quad() {
        let mut out = Vec::new();
        append_edge_segment(&mut out, (0.0, 0.0), (10.0, 0.0), 1.0, 2.0);
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn edge_quad_offsets_along_the_normal() {
        let mut out = Vec::new();
        append_edge_segment(&mut out, (0.0, 0.0), (10.0, 0.0), 1.5, 2.5);

        // Horizontal segment: normal is vertical, outer half 4.0.
        assert_eq!(out[0].position, [0.0, -4.0]);
        assert_eq!(out[1].position, [0.0, 4.0]);
        assert_eq!(out[0].signed_distance, -4.0);
        assert_eq!(out[1].signed_distance, 4.0);
        assert_eq!(out[0].core_half_width, 1.5);
        assert_eq!(out[0].glow_size, 2.5);
    }

    #[test]
    fn degenerate_segment_is_skipped() {
        let mut out = Vec::new();
        append_edge_segment(&mut out, (5.0, 5.0), (5.0, 5.0 + 1e-4), 1.0, 1.0);
        assert!(out.is_empty());
    }

    #[test]
    fn node_quad_pads_for_the_shadow() {
        let mut out = Vec::new();
        append_node_quad(&mut out, 100.0, 200.0, 80.0, 40.0, 10.0, 6.0, 1.0);

        assert_eq!(out.len(), 6);
        // Corners extend shadow_pad past the rectangle.
        assert_eq!(out[0].position, [90.0, 190.0]);
        assert_eq!(out[4].position, [190.0, 250.0]);
        // Local coordinates mirror the padded extent about the center.
        assert_eq!(out[0].local_point, [-50.0, -30.0]);
        assert_eq!(out[4].local_point, [50.0, 30.0]);
        assert_eq!(out[0].half_size, [40.0, 20.0]);
        assert_eq!(out[0].radius, 6.0);
        assert_eq!(out[0].border_width, 1.0);
    }
}
