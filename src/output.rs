use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::records::{
    AnnotatedRecord, CleanedRow, ExportRecord, SearchHit, CLEANED_HEADERS, EXPORT_HEADERS,
    RAW_HEADERS,
};

const BOM: &[u8] = b"\xEF\xBB\xBF";
const DEFAULT_PREFIX: &str = "duck";

/// The three tables written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub raw: PathBuf,
    pub cleaned: PathBuf,
    pub examples: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: &Path, prefix: &str) -> Self {
        let prefix = file_prefix(prefix);
        OutputPaths {
            raw: dir.join(format!("{}_duck_results_raw.csv", prefix)),
            cleaned: dir.join(format!("{}_jobs_cleaned.csv", prefix)),
            examples: dir.join(format!("{}_role_examples.csv", prefix)),
        }
    }
}

/// Slugified prefix, or `duck` when nothing usable is left.
pub fn file_prefix(raw: &str) -> String {
    let s = slug::slugify(raw);
    if s.is_empty() {
        DEFAULT_PREFIX.to_string()
    } else {
        s
    }
}

pub fn write_raw(path: &Path, hits: &[SearchHit]) -> Result<usize> {
    write_table(path, RAW_HEADERS, hits)
}

pub fn write_cleaned(path: &Path, records: &[AnnotatedRecord]) -> Result<usize> {
    let rows: Vec<CleanedRow> = records.iter().map(CleanedRow::from).collect();
    write_table(path, CLEANED_HEADERS, &rows)
}

pub fn write_examples(path: &Path, rows: &[ExportRecord]) -> Result<usize> {
    write_table(path, EXPORT_HEADERS, rows)
}

/// Writes a BOM-prefixed UTF-8 CSV with an explicit header row, so an empty
/// table still carries its columns. The file appears only once complete.
fn write_table<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<usize> {
    let tmp = tmp_path(path);
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(&tmp).map_err(io_err)?;
    file.write_all(BOM).map_err(io_err)?;

    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    wtr.write_record(headers).map_err(csv_err)?;
    for row in rows {
        wtr.serialize(row).map_err(csv_err)?;
    }
    wtr.flush().map_err(io_err)?;
    drop(wtr);

    fs::rename(&tmp, path).map_err(io_err)?;
    debug!(path = %path.display(), rows = rows.len(), "table written");
    Ok(rows.len())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Reads a raw hits table written by [`write_raw`] (or by hand).
pub fn read_raw(path: &Path) -> Result<Vec<SearchHit>> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    rdr.deserialize()
        .collect::<std::result::Result<Vec<SearchHit>, _>>()
        .map_err(|source| Error::Csv {
            path: path.to_path_buf(),
            source,
        })
}
