use super::BoardPoint;

/// Bounding rectangle of the canvas host, in client coordinates (logical
/// pixels).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct HostRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl HostRect {
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Drawable size in physical pixels for the given device-pixel ratio.
    ///
    /// Dimensions are floored and clamped to at least 1x1; a zero-area host
    /// is expected during layout transitions and must not produce a zero
    /// surface size.
    #[inline]
    pub fn physical_size(self, dpr: f64) -> (u32, u32) {
        let width = (self.width * dpr).floor().max(1.0) as u32;
        let height = (self.height * dpr).floor().max(1.0) as u32;
        (width, height)
    }
}

/// Converts client coordinates into board space by subtracting the host's
/// top-left corner.
#[inline]
pub fn board_point_from_client(client_x: f64, client_y: f64, host: HostRect) -> BoardPoint {
    BoardPoint::new(client_x - host.left, client_y - host.top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_conversion_subtracts_host_origin() {
        let host = HostRect::new(10.0, 20.0, 800.0, 600.0);
        let p = board_point_from_client(50.0, 25.0, host);
        assert_eq!(p, BoardPoint::new(40.0, 5.0));
    }

    #[test]
    fn physical_size_floors_and_scales() {
        let host = HostRect::new(0.0, 0.0, 800.5, 600.25);
        assert_eq!(host.physical_size(2.0), (1601, 1200));
    }

    #[test]
    fn physical_size_clamps_to_one() {
        // Zero-area hosts occur mid-layout; the surface must stay valid.
        let host = HostRect::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(host.physical_size(2.0), (1, 1));
    }
}
