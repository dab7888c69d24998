use anyhow::{Context, Result};
use csv::{ReaderBuilder, Writer};
use flate2::read::GzDecoder;
use log::{debug, warn};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::fields::output_header;
use crate::pipeline::{OutputRecord, RawRow};

/// Reads an entire CSV file (plain or `.gz`) into memory as header-keyed rows.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = File::open(path).with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let mut content = String::new();
    let read = if is_gzip(path) {
        GzDecoder::new(file).read_to_string(&mut content)
    } else {
        let mut file = file;
        file.read_to_string(&mut content)
    };
    read.with_context(|| format!("Failed to read input file as UTF-8 text: {}", path.display()))?;

    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    parse_rows(content.as_bytes()).with_context(|| format!("Failed to parse CSV from {}", path.display()))
}

pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut rows = Vec::new();
    for (line_num, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV record at data row {}", line_num + 1))?;
        if record.len() != headers.len() {
            debug!("Data row {} has {} cells, header has {}", line_num + 1, record.len(), headers.len());
        }
        let row: RawRow = headers.iter().cloned().zip(record.iter().map(str::to_string)).collect();
        rows.push(row);
    }
    Ok(rows)
}

fn is_gzip(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("gz"))
}

/// Writes the full result sequence under the fixed header.
///
/// Rows go to a sibling temp file that is renamed over `path` only once everything is
/// flushed, so a failed run never leaves a truncated output behind.
pub fn write_records(path: &Path, records: &[OutputRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    let tmp_path = temp_path_for(path);
    if let Err(e) = write_csv(&tmp_path, records) {
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            warn!("Could not remove temporary output {}: {}", tmp_path.display(), cleanup);
        }
        return Err(e);
    }
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move {} into place at {}", tmp_path.display(), path.display()))
}

fn write_csv(path: &Path, records: &[OutputRecord]) -> Result<()> {
    let mut writer = Writer::from_path(path).with_context(|| format!("Failed to create output file: {}", path.display()))?;
    writer.write_record(output_header())?;
    for record in records {
        writer.write_record(record.values())?;
    }
    writer.flush().with_context(|| format!("Failed to flush output file: {}", path.display()))?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| "output.csv".to_string());
    path.with_file_name(format!(".{}.partial", name))
}
