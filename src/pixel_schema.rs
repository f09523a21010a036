//! Reader for Pascal VOC XML documents carrying a rotation attribute, one
//! document per image.
//!
//! ```text
//! <annotation>
//!   <filename>img.jpg</filename>
//!   <object>
//!     <name>waste</name>
//!     <bndbox><xmin>10</xmin><ymin>10</ymin><xmax>30</xmax><ymax>30</ymax></bndbox>
//!     <attributes>
//!       <attribute><name>rotation</name><value>90.0</value></attribute>
//!     </attributes>
//!   </object>
//! </annotation>
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::types::{AnnotationRecord, BoxRecord, PixelBox, DEFAULT_DIFFICULTY, DEFAULT_LABEL};

const ROTATION_ATTRIBUTE: &str = "rotation";

#[derive(Debug, Deserialize)]
struct RawDocument {
    filename: Option<String>,
    #[serde(rename = "object", default)]
    objects: Vec<RawObject>,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    name: Option<String>,
    difficult: Option<String>,
    bndbox: Option<RawBndBox>,
    attributes: Option<RawAttributes>,
}

#[derive(Debug, Deserialize)]
struct RawBndBox {
    xmin: Option<String>,
    ymin: Option<String>,
    xmax: Option<String>,
    ymax: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAttributes {
    #[serde(rename = "attribute", default)]
    entries: Vec<RawAttribute>,
}

#[derive(Debug, Deserialize)]
struct RawAttribute {
    name: Option<String>,
    value: Option<String>,
}

fn parse_number(
    text: Option<&str>,
    field: &'static str,
    context: &str,
    path: &Path,
) -> Result<f64> {
    let text = text.ok_or_else(|| ConvertError::schema(field, context))?;
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConvertError::format(
            path,
            format!("{} of {} is not a number: {:?}", field, context, text),
        )),
    }
}

impl RawAttributes {
    /// The attribute named `rotation`, else the first attribute.
    fn rotation(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|attr| attr.name.as_deref().map(str::trim) == Some(ROTATION_ATTRIBUTE))
            .or_else(|| self.entries.first())
            .and_then(|attr| attr.value.as_deref())
    }
}

impl RawObject {
    fn into_box(self, context: &str, path: &Path) -> Result<PixelBox> {
        let bndbox = self
            .bndbox
            .ok_or_else(|| ConvertError::schema("bndbox", context))?;
        let rotation = self.attributes.as_ref().and_then(RawAttributes::rotation);

        Ok(PixelBox {
            xmin: parse_number(bndbox.xmin.as_deref(), "xmin", context, path)?,
            ymin: parse_number(bndbox.ymin.as_deref(), "ymin", context, path)?,
            xmax: parse_number(bndbox.xmax.as_deref(), "xmax", context, path)?,
            ymax: parse_number(bndbox.ymax.as_deref(), "ymax", context, path)?,
            rotation: parse_number(rotation, "attributes/attribute/value", context, path)?,
            label: self
                .name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            difficulty: self
                .difficult
                .and_then(|d| d.trim().parse().ok())
                .unwrap_or(DEFAULT_DIFFICULTY),
        })
    }
}

/// Parse one document. `path` names the document in errors and provides the
/// record id.
pub fn parse_document(content: &str, path: &Path) -> Result<AnnotationRecord> {
    let document: RawDocument =
        serde_xml_rs::from_str(content).map_err(|e| ConvertError::format(path, e))?;

    let file_name = document
        .filename
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ConvertError::schema("filename", path.display().to_string()))?;

    let boxes = document
        .objects
        .into_iter()
        .enumerate()
        .map(|(index, object)| {
            let context = format!("object {} of {}", index, path.display());
            object.into_box(&context, path).map(BoxRecord::Pixel)
        })
        .collect::<Result<Vec<_>>>()?;

    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.clone());

    Ok(AnnotationRecord {
        id,
        file_name,
        boxes,
    })
}

pub fn read_document(path: &Path) -> Result<AnnotationRecord> {
    let content = fs::read_to_string(path).map_err(|e| ConvertError::path(path, e.to_string()))?;
    parse_document(&content, path)
}
