use std::fs;
use std::path::Path;

use crate::config::Format;
use crate::error::{ConvertError, Result};
use crate::geometry::PivotBox;
use crate::normalize::{normalize_box, normalize_pivot};
use crate::types::{AnnotationRecord, BoxRecord, ImageSize, OrientedBox, Point};

/// Field layout of one output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `x1,y1,x2,y2,x3,y3,x4,y4,label,difficulty`
    EightPoint,
    /// `label,x0,y0,width,height,angle`
    FiveField,
}

const EIGHT_POINT_FIELDS: usize = 10;

/// Shortest round-trip representation, always with a fractional part.
pub fn format_number(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        text + ".0"
    }
}

// Labels are free text; keep them from splitting the line.
fn clean_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| if c == ',' || c.is_control() { '_' } else { c })
        .collect()
}

pub fn format_obb_line(obb: &OrientedBox) -> String {
    let mut fields: Vec<String> = obb
        .corners
        .iter()
        .flat_map(|p| [format_number(p.x), format_number(p.y)])
        .collect();
    fields.push(clean_label(&obb.label));
    fields.push(obb.difficulty.to_string());
    fields.join(",")
}

pub fn format_xywha_line(label: &str, pb: &PivotBox) -> String {
    format!(
        "{},{},{},{},{},{}",
        clean_label(label),
        format_number(pb.pivot.x),
        format_number(pb.pivot.y),
        format_number(pb.width),
        format_number(pb.height),
        format_number(pb.angle),
    )
}

/// Convert one box into one line in the given format.
pub fn box_to_line(b: &BoxRecord, format: Format, size: ImageSize) -> String {
    match format.layout() {
        Layout::EightPoint => {
            let obb = normalize_box(&b.to_oriented_box(size), format.mode(), size);
            format_obb_line(&obb)
        }
        Layout::FiveField => {
            format_xywha_line(b.label(), &normalize_pivot(&b.pivot_box(size), size))
        }
    }
}

/// Convert all boxes of an image, in annotation order.
pub fn record_to_lines(record: &AnnotationRecord, format: Format, size: ImageSize) -> Vec<String> {
    record
        .boxes
        .iter()
        .map(|b| box_to_line(b, format, size))
        .collect()
}

/// Parse an 8-point line back into a box.
pub fn parse_obb_line(line: &str) -> std::result::Result<OrientedBox, String> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != EIGHT_POINT_FIELDS {
        return Err(format!(
            "expected {} fields, found {}",
            EIGHT_POINT_FIELDS,
            fields.len()
        ));
    }

    let coords = fields[..8]
        .iter()
        .map(|field| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid coordinate {:?}: {}", field, e))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let difficulty = fields[9]
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid difficulty {:?}: {}", fields[9], e))?;

    Ok(OrientedBox {
        corners: [
            Point::new(coords[0], coords[1]),
            Point::new(coords[2], coords[3]),
            Point::new(coords[4], coords[5]),
            Point::new(coords[6], coords[7]),
        ],
        label: fields[8].to_string(),
        difficulty,
    })
}

/// Read a written 8-point label file.
pub fn read_obb_file(path: &Path) -> Result<Vec<OrientedBox>> {
    let content = fs::read_to_string(path).map_err(|e| ConvertError::path(path, e.to_string()))?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            parse_obb_line(line).map_err(|reason| {
                ConvertError::format(path, format!("line {}: {}", index + 1, reason))
            })
        })
        .collect()
}
