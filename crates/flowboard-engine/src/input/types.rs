/// Identifier of one active pointer (mouse, touch contact, pen).
///
/// Pan and drag are tracked per pointer id, so two simultaneous pointers can
/// drive a pan and a node drag independently.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PointerId(pub u64);

/// What a pointer press landed on, as reported by the host layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PressTarget {
    /// Declared chrome region; the press starts neither pan nor drag.
    Toolbar,

    /// A node element in the retained backend, which hit-tests natively.
    ///
    /// `grab_x`/`grab_y` are the press offset from the element's top-left
    /// corner in board-scale pixels (the controller divides out the zoom).
    Node {
        id: String,
        grab_x: f64,
        grab_y: f64,
    },

    /// Empty board surface. In the GPU backend the controller hit-tests the
    /// node list itself before deciding between drag and pan.
    Board,
}

/// The two mutually exclusive render backends.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum RenderBackend {
    /// Retained-mode SVG scene document.
    #[default]
    Svg,
    /// wgpu tessellation + signed-distance shading.
    Gpu,
}
