use crate::geometry::PivotBox;
use crate::types::{ImageSize, OrientedBox, Point};

/// Decimals kept for the 5-field pivot/size layout.
pub const PIVOT_PRECISION: i32 = 3;

/// Coordinate convention of written corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordMode {
    /// Absolute pixels.
    Pixel,
    /// Divided by image width/height into [0, 1].
    Unit,
}

impl CoordMode {
    pub fn precision(self) -> i32 {
        match self {
            CoordMode::Pixel => 3,
            CoordMode::Unit => 5,
        }
    }
}

/// Round to a fixed number of decimals. Negative zero comes back as zero so
/// identical boxes always print identically.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor + 0.0
}

pub fn normalize_point(p: Point, mode: CoordMode, size: ImageSize) -> Point {
    let decimals = mode.precision();
    match mode {
        CoordMode::Pixel => Point::new(round_to(p.x, decimals), round_to(p.y, decimals)),
        CoordMode::Unit => Point::new(
            round_to(p.x / size.width as f64, decimals),
            round_to(p.y / size.height as f64, decimals),
        ),
    }
}

/// Rescale all corners of `obb` into `mode`.
pub fn normalize_box(obb: &OrientedBox, mode: CoordMode, size: ImageSize) -> OrientedBox {
    OrientedBox {
        corners: obb.corners.map(|p| normalize_point(p, mode, size)),
        label: obb.label.clone(),
        difficulty: obb.difficulty,
    }
}

/// Unit-normalize pivot and extent; the angle stays in degrees.
pub fn normalize_pivot(pb: &PivotBox, size: ImageSize) -> PivotBox {
    let (w, h) = (size.width as f64, size.height as f64);
    PivotBox {
        pivot: Point::new(
            round_to(pb.pivot.x / w, PIVOT_PRECISION),
            round_to(pb.pivot.y / h, PIVOT_PRECISION),
        ),
        width: round_to(pb.width / w, PIVOT_PRECISION),
        height: round_to(pb.height / h, PIVOT_PRECISION),
        angle: pb.angle,
    }
}
