use std::path::Path;

/// Label written when the source provides no usable class.
pub const DEFAULT_LABEL: &str = "0";

/// Difficulty written when the source provides none.
pub const DEFAULT_DIFFICULTY: u32 = 0;

/// Dimensions of the annotated image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::new(256, 256)
    }
}

/// A point in image coordinates, y axis pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// A box from the percent schema: top-left reference, values in percent of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise degrees about the top-left corner.
    pub rotation: f64,
    pub label: String,
    pub difficulty: u32,
}

// A box from the pixel schema: axis-aligned corners before rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    /// Clockwise degrees about the box center.
    pub rotation: f64,
    pub label: String,
    pub difficulty: u32,
}

/// One annotated box in its native parameterization.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxRecord {
    Percent(PercentBox),
    Pixel(PixelBox),
}

impl BoxRecord {
    pub fn label(&self) -> &str {
        match self {
            BoxRecord::Percent(b) => &b.label,
            BoxRecord::Pixel(b) => &b.label,
        }
    }

    pub fn difficulty(&self) -> u32 {
        match self {
            BoxRecord::Percent(b) => b.difficulty,
            BoxRecord::Pixel(b) => b.difficulty,
        }
    }
}

/// All boxes annotated on one image.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    pub id: String,
    pub file_name: String,
    pub boxes: Vec<BoxRecord>,
}

impl AnnotationRecord {
    /// File name of the source image without directory and last extension.
    pub fn stem(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.id.clone())
    }
}

/// A rotated rectangle as four clockwise corners.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedBox {
    pub corners: [Point; 4],
    pub label: String,
    pub difficulty: u32,
}

/// Result of reading one export: usable records plus the identifiers of
/// entries that had to be skipped.
#[derive(Debug, Default)]
pub struct ParsedExport {
    pub records: Vec<AnnotationRecord>,
    pub skipped: Vec<String>,
}

impl ParsedExport {
    pub fn box_count(&self) -> usize {
        self.records.iter().map(|record| record.boxes.len()).sum()
    }
}

/// What a call to the converter reports back.
///
/// `success` means the call ran to completion; `failures` names the files
/// or entries that could not be converted along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub success: bool,
    pub failures: Vec<String>,
}

impl ConversionOutcome {
    pub fn failed() -> Self {
        Self {
            success: false,
            failures: Vec::new(),
        }
    }

    pub fn completed(mut failures: Vec<String>) -> Self {
        failures.sort();
        Self {
            success: true,
            failures,
        }
    }
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    pub files_processed: usize,
    pub images_written: usize,
    pub boxes_written: usize,
    pub skipped_entries: usize,
    pub failed_files: usize,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: &ConversionStats) {
        self.files_processed += other.files_processed;
        self.images_written += other.images_written;
        self.boxes_written += other.boxes_written;
        self.skipped_entries += other.skipped_entries;
        self.failed_files += other.failed_files;
    }

    pub fn print_summary(&self) {
        log::info!("=== Conversion Summary ===");
        log::info!("Files processed: {}", self.files_processed);
        log::info!("Label files written: {}", self.images_written);
        log::info!("Boxes written: {}", self.boxes_written);
        if self.skipped_entries > 0 {
            log::warn!("Skipped malformed entries: {}", self.skipped_entries);
        }
        if self.failed_files > 0 {
            log::warn!("Failed files: {}", self.failed_files);
        }
    }
}
