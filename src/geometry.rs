//! Corner reconstruction for rotated rectangles.
//!
//! Angles are degrees, clockwise-positive in a y-down image frame. The two
//! schemas rotate about different pivots: percent boxes about their own
//! top-left corner, pixel boxes about their center. Each keeps its own
//! convention.

use crate::types::{BoxRecord, ImageSize, OrientedBox, PercentBox, PixelBox, Point};

/// A rotated rectangle described by its rotation pivot, extent and angle,
/// all in absolute pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotBox {
    pub pivot: Point,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
}

/// Rotate `p` about the origin by `degrees`.
pub fn rotate(p: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
}

/// Scale factors from percent to pixels along x and y.
fn percent_scale(size: ImageSize) -> (f64, f64) {
    (size.width as f64 / 100.0, size.height as f64 / 100.0)
}

/// Corners of a percent box in pixels, rotated about its top-left corner.
///
/// pt2 walks `width` along the rotated x axis from pt1, pt3 walks `height`
/// along the rotated y axis from pt2, and pt4 walks `height` from pt1.
pub fn percent_corners(b: &PercentBox, size: ImageSize) -> [Point; 4] {
    let pivot = percent_pivot(b, size);
    let (sin, cos) = b.rotation.to_radians().sin_cos();

    let pt1 = pivot.pivot;
    let pt2 = Point::new(pt1.x + pivot.width * cos, pt1.y + pivot.width * sin);
    let pt3 = Point::new(pt2.x - pivot.height * sin, pt2.y + pivot.height * cos);
    let pt4 = Point::new(pt1.x - pivot.height * sin, pt1.y + pivot.height * cos);

    [pt1, pt2, pt3, pt4]
}

fn percent_pivot(b: &PercentBox, size: ImageSize) -> PivotBox {
    let (x_scale, y_scale) = percent_scale(size);
    PivotBox {
        pivot: Point::new(b.x * x_scale, b.y * y_scale),
        width: b.width * x_scale,
        height: b.height * y_scale,
        angle: b.rotation,
    }
}

/// Corners of a pixel box, each axis-aligned corner rotated about the center.
pub fn pixel_corners(b: &PixelBox) -> [Point; 4] {
    let center = pixel_center(b);
    [
        Point::new(b.xmin, b.ymin),
        Point::new(b.xmax, b.ymin),
        Point::new(b.xmax, b.ymax),
        Point::new(b.xmin, b.ymax),
    ]
    .map(|corner| {
        let offset = Point::new(corner.x - center.x, corner.y - center.y);
        let rotated = rotate(offset, b.rotation);
        Point::new(rotated.x + center.x, rotated.y + center.y)
    })
}

fn pixel_center(b: &PixelBox) -> Point {
    Point::new((b.xmin + b.xmax) / 2.0, (b.ymin + b.ymax) / 2.0)
}

fn pixel_pivot(b: &PixelBox) -> PivotBox {
    PivotBox {
        pivot: pixel_center(b),
        width: b.xmax - b.xmin,
        height: b.ymax - b.ymin,
        angle: b.rotation,
    }
}

impl BoxRecord {
    /// Corners in absolute pixels, using the pivot of the originating schema.
    pub fn corners(&self, size: ImageSize) -> [Point; 4] {
        match self {
            BoxRecord::Percent(b) => percent_corners(b, size),
            BoxRecord::Pixel(b) => pixel_corners(b),
        }
    }

    /// Pivot, extent and angle in absolute pixels.
    pub fn pivot_box(&self, size: ImageSize) -> PivotBox {
        match self {
            BoxRecord::Percent(b) => percent_pivot(b, size),
            BoxRecord::Pixel(b) => pixel_pivot(b),
        }
    }

    pub fn to_oriented_box(&self, size: ImageSize) -> OrientedBox {
        OrientedBox {
            corners: self.corners(size),
            label: self.label().to_string(),
            difficulty: self.difficulty(),
        }
    }
}
