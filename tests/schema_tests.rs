use anno2obb::error::ConvertError;
use anno2obb::percent_schema::parse_export;
use anno2obb::pixel_schema::parse_document;
use anno2obb::types::{BoxRecord, PercentBox, PixelBox};
use std::path::Path;

const PERCENT_EXPORT: &str = r#"[
  {
    "id": 1,
    "file_upload": "tile_1.jpg",
    "annotations": [
      {"result": [{"type": "rectanglelabels", "value": {"x": 10, "y": 20, "width": 30, "height": 40, "rotation": 15, "rectanglelabels": ["plastic"]}}]},
      {"result": [{"type": "rectanglelabels", "value": {"x": 1.5, "y": 2.5, "width": 3, "height": 4}}]}
    ]
  },
  {"id": 2, "file_upload": "tile_2.jpg", "annotations": []},
  {
    "id": 3,
    "file_upload": "tile_3.jpg",
    "annotations": [{"result": [{"type": "rectanglelabels", "value": {"x": 10, "y": 20, "height": 40, "rotation": 0}}]}]
  },
  {
    "id": 4,
    "file_upload": "tile_4.jpg",
    "annotations": [{"result": [
      {"type": "choices", "value": {"choices": ["blurry"]}},
      {"type": "rectanglelabels", "value": {"x": 5, "y": 5, "width": 5, "height": 5, "rotation": 0, "rectanglelabels": []}}
    ]}]
  },
  {
    "id": 5,
    "data": {"image": "/data/upload/1/tile_5.png"},
    "annotations": [{"result": [{"value": {"x": 0, "y": 0, "width": 1, "height": 1, "rotation": 0, "rectanglelabels": ["glass"]}}]}]
  },
  {
    "id": 6,
    "annotations": [{"result": [{"value": {"x": 0, "y": 0, "width": 1, "height": 1}}]}]
  }
]"#;

fn percent(b: &BoxRecord) -> &PercentBox {
    match b {
        BoxRecord::Percent(b) => b,
        other => panic!("expected a percent box, found {:?}", other),
    }
}

fn pixel(b: &BoxRecord) -> &PixelBox {
    match b {
        BoxRecord::Pixel(b) => b,
        other => panic!("expected a pixel box, found {:?}", other),
    }
}

#[test]
fn test_percent_export_records() {
    let parsed = parse_export(PERCENT_EXPORT, Path::new("export.json")).unwrap();

    let ids: Vec<_> = parsed.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "4", "5"]);
    assert_eq!(parsed.skipped, vec!["3".to_string(), "6".to_string()]);
    assert_eq!(parsed.box_count(), 4);

    let first = &parsed.records[0];
    assert_eq!(first.file_name, "tile_1.jpg");
    assert_eq!(first.stem(), "tile_1");
    assert_eq!(first.boxes.len(), 2);
    assert_eq!(
        percent(&first.boxes[0]),
        &PercentBox {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
            rotation: 15.0,
            label: "plastic".to_string(),
            difficulty: 0,
        }
    );
    let second = percent(&first.boxes[1]);
    assert_eq!(second.rotation, 0.0);
    assert_eq!(second.label, "0");
}

#[test]
fn test_percent_export_ignores_other_result_types() {
    let parsed = parse_export(PERCENT_EXPORT, Path::new("export.json")).unwrap();
    let record = &parsed.records[1];
    assert_eq!(record.boxes.len(), 1);
    assert_eq!(percent(&record.boxes[0]).label, "0");
}

#[test]
fn test_percent_export_file_name_from_image_url() {
    let parsed = parse_export(PERCENT_EXPORT, Path::new("export.json")).unwrap();
    let record = &parsed.records[2];
    assert_eq!(record.file_name, "tile_5.png");
    assert_eq!(percent(&record.boxes[0]).label, "glass");
}

#[test]
fn test_percent_export_must_be_a_list() {
    let err = parse_export(r#"{"id": 1}"#, Path::new("export.json")).unwrap_err();
    assert!(matches!(err, ConvertError::Format { .. }));

    let err = parse_export("[{", Path::new("export.json")).unwrap_err();
    assert!(matches!(err, ConvertError::Format { .. }));
}

#[test]
fn test_percent_export_skips_structurally_broken_task() {
    let content = r#"[
      {"id": 1, "file_upload": "a.jpg", "annotations": [{"result": [{"value": {"x": "ten", "y": 0, "width": 1, "height": 1}}]}]},
      {"id": 2, "file_upload": "b.jpg", "annotations": [{"result": [{"value": {"x": 1, "y": 0, "width": 1, "height": 1}}]}]}
    ]"#;
    let parsed = parse_export(content, Path::new("export.json")).unwrap();
    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.records[0].id, "2");
    assert_eq!(parsed.skipped, vec!["1".to_string()]);
}

#[test]
fn test_percent_export_null_label_and_rotation_use_defaults() {
    let content = r#"[{"id": 1, "file_upload": "a.jpg", "annotations": [{"result": [
      {"type": "rectanglelabels", "value": {"x": 1, "y": 2, "width": 3, "height": 4, "rotation": null, "rectanglelabels": null}}
    ]}]}]"#;
    let parsed = parse_export(content, Path::new("export.json")).unwrap();
    assert!(parsed.skipped.is_empty());
    assert_eq!(parsed.records.len(), 1);

    let b = percent(&parsed.records[0].boxes[0]);
    assert_eq!(b.label, "0");
    assert_eq!(b.rotation, 0.0);
    assert_eq!((b.x, b.y, b.width, b.height), (1.0, 2.0, 3.0, 4.0));
}

const PIXEL_DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<annotation>
  <folder></folder>
  <filename>tile_7.jpg</filename>
  <size>
    <width>256</width>
    <height>256</height>
    <depth>3</depth>
  </size>
  <object>
    <name>plastic</name>
    <pose>Unspecified</pose>
    <truncated>0</truncated>
    <difficult>1</difficult>
    <bndbox>
      <xmin>10.0</xmin>
      <ymin>10.0</ymin>
      <xmax>30.0</xmax>
      <ymax>30.0</ymax>
    </bndbox>
    <attributes>
      <attribute>
        <name>occluded</name>
        <value>false</value>
      </attribute>
      <attribute>
        <name>rotation</name>
        <value>90.0</value>
      </attribute>
    </attributes>
  </object>
  <object>
    <name>glass</name>
    <bndbox>
      <xmin>0</xmin>
      <ymin>5</ymin>
      <xmax>8</xmax>
      <ymax>9</ymax>
    </bndbox>
    <attributes>
      <attribute>
        <name>angle</name>
        <value>45</value>
      </attribute>
    </attributes>
  </object>
</annotation>
"#;

#[test]
fn test_pixel_document_record() {
    let record = parse_document(PIXEL_DOCUMENT, Path::new("labels/tile_7.xml")).unwrap();
    assert_eq!(record.id, "tile_7");
    assert_eq!(record.file_name, "tile_7.jpg");
    assert_eq!(record.boxes.len(), 2);

    assert_eq!(
        pixel(&record.boxes[0]),
        &PixelBox {
            xmin: 10.0,
            ymin: 10.0,
            xmax: 30.0,
            ymax: 30.0,
            rotation: 90.0,
            label: "plastic".to_string(),
            difficulty: 1,
        }
    );

    let second = pixel(&record.boxes[1]);
    assert_eq!(second.rotation, 45.0);
    assert_eq!(second.difficulty, 0);
    assert_eq!(second.label, "glass");
}

#[test]
fn test_pixel_document_without_objects() {
    let content = "<annotation><filename>empty.jpg</filename></annotation>";
    let record = parse_document(content, Path::new("empty.xml")).unwrap();
    assert!(record.boxes.is_empty());
}

#[test]
fn test_pixel_document_malformed_xml() {
    let err = parse_document("<annotation><filename>a.jpg</annotation>", Path::new("a.xml"))
        .unwrap_err();
    assert!(matches!(err, ConvertError::Format { .. }));
}

#[test]
fn test_pixel_document_missing_elements() {
    let no_bndbox = r#"<annotation>
      <filename>a.jpg</filename>
      <object><name>x</name>
        <attributes><attribute><name>rotation</name><value>0</value></attribute></attributes>
      </object>
    </annotation>"#;
    let err = parse_document(no_bndbox, Path::new("a.xml")).unwrap_err();
    assert!(matches!(err, ConvertError::Schema { field: "bndbox", .. }));

    let no_rotation = r#"<annotation>
      <filename>a.jpg</filename>
      <object><name>x</name>
        <bndbox><xmin>1</xmin><ymin>1</ymin><xmax>2</xmax><ymax>2</ymax></bndbox>
      </object>
    </annotation>"#;
    let err = parse_document(no_rotation, Path::new("a.xml")).unwrap_err();
    assert!(matches!(err, ConvertError::Schema { .. }));

    let no_filename = "<annotation><size><width>1</width></size></annotation>";
    let err = parse_document(no_filename, Path::new("a.xml")).unwrap_err();
    assert!(matches!(err, ConvertError::Schema { field: "filename", .. }));
}

#[test]
fn test_pixel_document_non_numeric_corner() {
    let content = r#"<annotation>
      <filename>a.jpg</filename>
      <object><name>x</name>
        <bndbox><xmin>left</xmin><ymin>1</ymin><xmax>2</xmax><ymax>2</ymax></bndbox>
        <attributes><attribute><name>rotation</name><value>0</value></attribute></attributes>
      </object>
    </annotation>"#;
    let err = parse_document(content, Path::new("a.xml")).unwrap_err();
    assert!(matches!(err, ConvertError::Format { .. }));
}
