//! Validation and batch control around the conversion pipeline.

use log::{error, info, warn};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::{Args, Format, Schema};
use crate::conversion::record_to_lines;
use crate::error::{ConvertError, Result};
use crate::io::{
    check_destination_dir, check_extension, check_readable, list_files_with_extension,
    save_to_txt_file,
};
use crate::types::{AnnotationRecord, ConversionOutcome, ConversionStats, ImageSize, ParsedExport};
use crate::utils::{create_progress_bar, file_display_name, label_path};
use crate::{percent_schema, pixel_schema};

/// What converting one export file produced.
#[derive(Debug, Default)]
pub struct FileReport {
    pub stats: ConversionStats,
    /// Ids of entries that were skipped or could not be written.
    pub failures: Vec<String>,
}

/// Converts exports of one schema into label files of one format.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    schema: Schema,
    format: Format,
    size: ImageSize,
}

impl Converter {
    pub fn new(schema: Schema, format: Format, size: ImageSize) -> Self {
        Self {
            schema,
            format,
            size,
        }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(args.schema, args.format(), args.image_size())
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Read an export into per-image records.
    pub fn read(&self, source: &Path) -> Result<ParsedExport> {
        match self.schema {
            Schema::Percent => percent_schema::read_export(source),
            Schema::Pixel => pixel_schema::read_document(source).map(|record| ParsedExport {
                records: vec![record],
                skipped: Vec::new(),
            }),
        }
    }

    /// Convert one export file into label files in `dest_dir`.
    ///
    /// Validation failures are logged and reported as `success == false`
    /// with no failures listed.
    pub fn convert(&self, source: &Path, dest_dir: &Path) -> ConversionOutcome {
        match self.convert_file(source, dest_dir) {
            Ok(report) => {
                report.stats.print_summary();
                ConversionOutcome::completed(report.failures)
            }
            Err(e) => {
                error!("{}", e);
                ConversionOutcome::failed()
            }
        }
    }

    /// Convert one export file, checking in order: source readable,
    /// destination directory, source extension, at least one box.
    pub fn convert_file(&self, source: &Path, dest_dir: &Path) -> Result<FileReport> {
        let parsed = self.load(source, dest_dir)?;

        let mut report = self.write_records(&parsed.records, dest_dir);
        report.stats.files_processed = 1;
        report.stats.skipped_entries = parsed.skipped.len();
        report.failures.extend(parsed.skipped);
        report.failures.sort();
        Ok(report)
    }

    fn check_size(&self) -> Result<()> {
        if self.size.is_empty() {
            return Err(ConvertError::InvalidSize {
                width: self.size.width,
                height: self.size.height,
            });
        }
        Ok(())
    }

    /// Validate and read one export, rejecting exports without boxes.
    fn load(&self, source: &Path, dest_dir: &Path) -> Result<ParsedExport> {
        self.check_size()?;
        check_readable(source)?;
        check_destination_dir(dest_dir)?;
        check_extension(source, self.schema.extension())?;

        let parsed = self.read(source)?;
        if parsed.box_count() == 0 {
            return Err(ConvertError::EmptyResult {
                path: source.to_path_buf(),
            });
        }
        Ok(parsed)
    }

    /// Convert every export file directly inside `source_dir`.
    ///
    /// A file that fails is logged and listed by name; the batch always runs
    /// to completion and then reports `success == true`. Only an invalid
    /// source folder or destination gives `success == false`.
    ///
    /// All files are read before anything is written, so an output file
    /// named by several files goes to the last of them in sorted order.
    pub fn convert_batch(&self, source_dir: &Path, dest_dir: &Path) -> ConversionOutcome {
        let files = match self.list_batch(source_dir, dest_dir) {
            Ok(files) => files,
            Err(e) => {
                error!("{}", e);
                return ConversionOutcome::failed();
            }
        };
        info!(
            "Converting {} .{} files from {}",
            files.len(),
            self.schema.extension(),
            source_dir.display()
        );

        let pb = create_progress_bar(files.len() as u64, "Files");
        let loaded: Vec<(PathBuf, Result<ParsedExport>)> = files
            .into_par_iter()
            .map(|file| {
                let result = self.load(&file, dest_dir);
                pb.inc(1);
                (file, result)
            })
            .collect();
        pb.finish_with_message("Batch read complete");

        let mut stats = ConversionStats::new();
        let mut failures = Vec::new();
        let mut records = Vec::new();
        for (file, result) in loaded {
            match result {
                Ok(parsed) => {
                    if !parsed.skipped.is_empty() {
                        warn!(
                            "{} converted with skipped entries: {}",
                            file.display(),
                            parsed.skipped.join(", ")
                        );
                    }
                    stats.files_processed += 1;
                    stats.skipped_entries += parsed.skipped.len();
                    records.extend(parsed.records);
                }
                Err(e) => {
                    warn!("Failed to convert {}: {}", file.display(), e);
                    stats.failed_files += 1;
                    failures.push(file_display_name(&file));
                }
            }
        }

        let report = self.write_records(&records, dest_dir);
        if !report.failures.is_empty() {
            warn!("Entries not written: {}", report.failures.join(", "));
        }
        stats.merge(&report.stats);
        stats.print_summary();

        ConversionOutcome::completed(failures)
    }

    fn list_batch(&self, source_dir: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
        self.check_size()?;
        check_readable(source_dir)?;
        if !source_dir.is_dir() {
            return Err(ConvertError::path(source_dir, "not a directory"));
        }
        check_destination_dir(dest_dir)?;
        list_files_with_extension(source_dir, self.schema.extension())
    }

    /// Write one label file per record. Records sharing an output file are
    /// resolved in favour of the last one.
    fn write_records(&self, records: &[AnnotationRecord], dest_dir: &Path) -> FileReport {
        let mut last_by_path: HashMap<PathBuf, usize> = HashMap::new();
        for (index, record) in records.iter().enumerate() {
            let path = label_path(dest_dir, &record.stem());
            if let Some(previous) = last_by_path.insert(path.clone(), index) {
                warn!(
                    "Entries {} and {} both write {}, keeping {}",
                    records[previous].id,
                    record.id,
                    path.display(),
                    record.id
                );
            }
        }
        let mut jobs: Vec<(PathBuf, &AnnotationRecord)> = last_by_path
            .into_iter()
            .map(|(path, index)| (path, &records[index]))
            .collect();
        jobs.sort_by(|a, b| a.0.cmp(&b.0));

        let results: Vec<(&AnnotationRecord, Result<usize>)> = jobs
            .into_par_iter()
            .map(|(path, record)| {
                let lines = record_to_lines(record, self.format, self.size);
                let written = save_to_txt_file(&lines, &path).map(|_| lines.len());
                (record, written)
            })
            .collect();

        let mut report = FileReport::default();
        for (record, written) in results {
            match written {
                Ok(boxes) => {
                    report.stats.images_written += 1;
                    report.stats.boxes_written += boxes;
                }
                Err(e) => {
                    error!("{}", e);
                    report.failures.push(record.id.clone());
                }
            }
        }
        report
    }
}
