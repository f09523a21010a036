use clap::{Parser, ValueEnum};
use std::str::FromStr;

use crate::conversion::Layout;
use crate::normalize::CoordMode;
use crate::types::ImageSize;

/// Command-line arguments for converting rotated-box annotations to OBB text labels.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Export file to convert, or a folder of export files with --batch
    #[arg(short = 's', long = "source")]
    pub source: String,

    /// Existing directory that receives one .txt file per image
    #[arg(short = 'd', long = "dest_dir")]
    pub dest_dir: String,

    /// Annotation schema of the source: 'percent' (Label Studio JSON) or 'pixel' (Pascal VOC XML)
    #[arg(long = "schema", value_enum)]
    pub schema: Schema,

    /// Output format; defaults to 'points' for percent and 'normalized_points' for pixel
    #[arg(long = "output_format", visible_alias = "format", value_enum)]
    pub output_format: Option<Format>,

    /// Image width in pixels
    #[arg(long = "width", default_value_t = 256, value_parser = validate_dimension)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long = "height", default_value_t = 256, value_parser = validate_dimension)]
    pub height: u32,

    /// Treat the source as a folder and convert every matching file in it
    #[arg(long = "batch")]
    pub batch: bool,
}

impl Args {
    pub fn image_size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    pub fn format(&self) -> Format {
        self.output_format
            .unwrap_or_else(|| self.schema.default_format())
    }
}

/// Source annotation schema
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Schema {
    /// Label Studio JSON, percent coordinates, rotation about the top-left corner
    Percent,
    /// Pascal VOC XML, pixel corners, rotation about the box center
    Pixel,
}

impl Schema {
    /// Extension of export files, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Schema::Percent => "json",
            Schema::Pixel => "xml",
        }
    }

    pub fn default_format(self) -> Format {
        match self {
            Schema::Percent => Format::Points,
            Schema::Pixel => Format::NormalizedPoints,
        }
    }
}

// Output line format
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[value(rename_all = "snake_case")]
pub enum Format {
    /// x1,y1,...,x4,y4,label,difficulty in pixels
    Points,
    /// x1,y1,...,x4,y4,label,difficulty normalized to [0, 1]
    NormalizedPoints,
    /// label,x0,y0,width,height,angle normalized to [0, 1]
    Xywha,
}

impl Format {
    pub fn mode(self) -> CoordMode {
        match self {
            Format::Points => CoordMode::Pixel,
            Format::NormalizedPoints | Format::Xywha => CoordMode::Unit,
        }
    }

    pub fn layout(self) -> Layout {
        match self {
            Format::Points | Format::NormalizedPoints => Layout::EightPoint,
            Format::Xywha => Layout::FiveField,
        }
    }
}

// Image dimensions must be positive
pub fn validate_dimension(s: &str) -> Result<u32, String> {
    match u32::from_str(s) {
        Ok(val) if val > 0 => Ok(val),
        _ => Err("dimension must be a positive integer".to_string()),
    }
}
