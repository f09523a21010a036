//! Rotated-box annotation to OBB label converter
//!
//! This library converts oriented rectangles exported by Label Studio (JSON,
//! percent coordinates) and by Pascal VOC tools with a rotation attribute
//! (XML, pixel coordinates) into one text label file per image, one line per
//! box, for oriented bounding box detector training.

pub mod config;
pub mod conversion;
pub mod converter;
pub mod error;
pub mod geometry;
pub mod io;
pub mod normalize;
pub mod percent_schema;
pub mod pixel_schema;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{Args, Format, Schema};
pub use converter::Converter;
pub use error::ConvertError;
pub use types::{
    AnnotationRecord, BoxRecord, ConversionOutcome, ImageSize, OrientedBox, PercentBox, PixelBox,
    Point,
};
