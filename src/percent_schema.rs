//! Reader for Label Studio JSON exports.
//!
//! An export is a list of tasks. Each task names its image in `file_upload`
//! (or `data.image`) and holds annotation groups whose `result` entries carry
//! the rectangle in percent of the image size:
//!
//! ```text
//! [{"id": 1, "file_upload": "img.jpg",
//!   "annotations": [{"result": [{"type": "rectanglelabels",
//!       "value": {"x": 10, "y": 20, "width": 5, "height": 5,
//!                 "rotation": 30, "rectanglelabels": ["waste"]}}]}]}]
//! ```

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::types::{
    AnnotationRecord, BoxRecord, ParsedExport, PercentBox, DEFAULT_DIFFICULTY, DEFAULT_LABEL,
};

const RECTANGLE_TYPES: &[&str] = &["rectanglelabels", "rectangle"];

#[derive(Debug, Deserialize)]
struct RawTask {
    file_upload: Option<String>,
    data: Option<RawTaskData>,
    #[serde(default)]
    annotations: Vec<RawAnnotation>,
}

#[derive(Debug, Deserialize)]
struct RawTaskData {
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAnnotation {
    #[serde(default)]
    result: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(rename = "type")]
    kind: Option<String>,
    value: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    rotation: Option<f64>,
    rectanglelabels: Option<Vec<String>>,
}

impl RawResult {
    /// Results of other tools (choices, relations, ...) carry no rectangle.
    fn is_rectangle(&self) -> bool {
        let kind_matches = self
            .kind
            .as_deref()
            .map_or(true, |kind| RECTANGLE_TYPES.contains(&kind));
        kind_matches && self.value.is_some()
    }
}

impl RawValue {
    fn into_box(self, context: &str) -> Result<PercentBox> {
        let require = |value: Option<f64>, field: &'static str| {
            value.ok_or_else(|| ConvertError::schema(field, context))
        };
        Ok(PercentBox {
            x: require(self.x, "x")?,
            y: require(self.y, "y")?,
            width: require(self.width, "width")?,
            height: require(self.height, "height")?,
            rotation: self.rotation.unwrap_or(0.0),
            label: self
                .rectanglelabels
                .into_iter()
                .flatten()
                .find(|label| !label.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            difficulty: DEFAULT_DIFFICULTY,
        })
    }
}

impl RawTask {
    fn file_name(&self) -> Option<String> {
        if let Some(name) = self.file_upload.as_ref().filter(|name| !name.is_empty()) {
            return Some(name.clone());
        }
        // Tasks backed by cloud storage only carry the image URL.
        self.data
            .as_ref()
            .and_then(|data| data.image.as_deref())
            .and_then(|url| url.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    fn into_record(self, id: String) -> Result<AnnotationRecord> {
        let context = format!("task {}", id);
        let file_name = self
            .file_name()
            .ok_or_else(|| ConvertError::schema("file_upload", context.as_str()))?;

        let boxes = self
            .annotations
            .into_iter()
            .flat_map(|annotation| annotation.result)
            .filter(RawResult::is_rectangle)
            .filter_map(|result| result.value)
            .map(|value| value.into_box(&context).map(BoxRecord::Percent))
            .collect::<Result<Vec<_>>>()?;

        Ok(AnnotationRecord {
            id,
            file_name,
            boxes,
        })
    }
}

fn task_id(task: &Value, index: usize) -> String {
    match task.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => format!("#{}", index),
    }
}

fn task_list(value: serde_json::Result<Value>, path: &Path) -> Result<Vec<Value>> {
    match value {
        Ok(Value::Array(tasks)) => Ok(tasks),
        Ok(_) => Err(ConvertError::format(path, "expected a list of tasks")),
        Err(e) => Err(ConvertError::format(path, e)),
    }
}

/// Parse an already loaded export.
///
/// Tasks without boxes are dropped silently. Tasks that fail validation are
/// logged and reported in `skipped`; they never abort the rest of the parse.
pub fn parse_export(content: &str, path: &Path) -> Result<ParsedExport> {
    let tasks = task_list(serde_json::from_str(content), path)?;
    Ok(parse_tasks(tasks))
}

/// Read and parse an export file, streaming it from disk.
pub fn read_export(path: &Path) -> Result<ParsedExport> {
    let file = File::open(path).map_err(|e| ConvertError::path(path, e.to_string()))?;
    let tasks = task_list(serde_json::from_reader(BufReader::new(file)), path)?;
    Ok(parse_tasks(tasks))
}

fn parse_tasks(tasks: Vec<Value>) -> ParsedExport {
    let mut parsed = ParsedExport::default();

    for (index, task) in tasks.into_iter().enumerate() {
        let id = task_id(&task, index);
        let record = serde_json::from_value::<RawTask>(task)
            .map_err(|e| ConvertError::format(format!("task {}", id), e))
            .and_then(|raw| raw.into_record(id.clone()));

        match record {
            Ok(record) if record.boxes.is_empty() => {
                debug!("Task {} has no boxes, dropping it", id);
            }
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                warn!("Skipping task {}: {}", id, e);
                parsed.skipped.push(id);
            }
        }
    }

    parsed
}
