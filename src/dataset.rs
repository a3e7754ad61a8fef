//! Source table loading, eligibility filtering, and output table persistence.
//!
//! The filtered table is an owned value: the driver consumes it and hands back
//! an annotated copy, so nothing outside this module touches the source rows.
use crate::enrich::{ColumnNames, ImageStatus};
use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Fatal failures while loading the source table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source table {} does not exist", .0.display())]
    Missing(PathBuf),

    #[error("read source table {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed source table {}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("source table {} has no column {column:?}", .path.display())]
    MissingColumn { path: PathBuf, column: String },
}

/// How many filtered records a run processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLimit {
    All,
    First(usize),
}

impl RecordLimit {
    /// Number of records to process out of `total`.
    pub fn bound(&self, total: usize) -> usize {
        match self {
            RecordLimit::All => total,
            RecordLimit::First(count) => (*count).min(total),
        }
    }
}

impl FromStr for RecordLimit {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| format!("expected an integer, got {raw:?}"))?;
        match value {
            -1 => Ok(RecordLimit::All),
            n if n < -1 => Err(format!("limit must be -1 (all) or non-negative, got {n}")),
            n => usize::try_from(n)
                .map(RecordLimit::First)
                .map_err(|_| format!("limit {n} is out of range")),
        }
    }
}

/// One eligible row of the source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRecord {
    /// 1-based position within the filtered sequence.
    pub position: usize,
    pub name: String,
    pub address: String,
    /// Every source cell, aligned with `PlaceTable::headers`.
    pub fields: Vec<String>,
    pub status: ImageStatus,
}

/// The filtered source table plus the status column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceTable {
    pub headers: Vec<String>,
    pub status_column: String,
    pub records: Vec<PlaceRecord>,
}

impl PlaceTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header row as written to the output table.
    pub fn output_headers(&self) -> Vec<String> {
        let mut headers = self.headers.clone();
        if !headers.contains(&self.status_column) {
            headers.push(self.status_column.clone());
        }
        headers
    }

    fn output_row(&self, record: &PlaceRecord) -> Vec<String> {
        let mut row = record.fields.clone();
        match self.headers.iter().position(|h| *h == self.status_column) {
            Some(idx) => row[idx] = record.status.as_str().to_string(),
            None => row.push(record.status.as_str().to_string()),
        }
        row
    }
}

/// Load the source table and keep the rows whose eligibility cell equals the
/// configured value exactly. Every kept record starts as not-found.
pub fn load_filtered(path: &Path, columns: &ColumnNames) -> Result<PlaceTable, LoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => LoadError::Missing(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let malformed = |source: csv::Error| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));
    let headers = normalize_headers(reader.headers().map_err(malformed)?);

    let column_index = |column: &str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })
    };
    let name_idx = column_index(&columns.name)?;
    let address_idx = column_index(&columns.address)?;
    let eligibility_idx = column_index(&columns.eligibility)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(malformed)?;
        if row.get(eligibility_idx) != Some(columns.eligible_value.as_str()) {
            continue;
        }
        let fields: Vec<String> = row.iter().map(str::to_string).collect();
        records.push(PlaceRecord {
            position: records.len() + 1,
            name: fields[name_idx].clone(),
            address: fields[address_idx].clone(),
            fields,
            status: ImageStatus::NotFound,
        });
    }

    tracing::info!(
        path = %path.display(),
        eligible = records.len(),
        column = %columns.eligibility,
        value = %columns.eligible_value,
        "loaded source table"
    );

    Ok(PlaceTable {
        headers,
        status_column: columns.status.clone(),
        records,
    })
}

/// Write the output table as UTF-8 with a byte-order marker.
pub fn write_output(path: &Path, table: &PlaceTable) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    out.write_all(UTF8_BOM)
        .with_context(|| format!("write {}", path.display()))?;

    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(table.output_headers())
        .with_context(|| format!("write header to {}", path.display()))?;
    for record in &table.records {
        writer
            .write_record(table.output_row(record))
            .with_context(|| format!("write row {} to {}", record.position, path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// One row read back from an output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub position: usize,
    pub name: String,
    pub status: ImageStatus,
}

/// Read an output table written by [`write_output`].
pub fn read_output(path: &Path, columns: &ColumnNames) -> Result<Vec<OutputRow>> {
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut bytes))
        .with_context(|| format!("read {}", path.display()))?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes.as_slice());

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body);
    let headers = normalize_headers(
        reader
            .headers()
            .with_context(|| format!("parse header of {}", path.display()))?,
    );
    let find = |column: &str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| anyhow!("{} has no column {column:?}", path.display()))
    };
    let name_idx = find(&columns.name)?;
    let status_idx = find(&columns.status)?;

    let mut rows = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("parse row {} of {}", idx + 1, path.display()))?;
        rows.push(OutputRow {
            position: idx + 1,
            name: row.get(name_idx).unwrap_or_default().to_string(),
            status: ImageStatus::from_cell(row.get(status_idx).unwrap_or_default()),
        });
    }
    Ok(rows)
}

fn normalize_headers(record: &csv::StringRecord) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            if idx == 0 {
                header.trim_start_matches('\u{feff}').to_string()
            } else {
                header.to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\
FCLTY_NM,CTGRY_NM,RDNMADR_NM,PET_POSBL_AT
해운대 국밥,한식,부산 해운대구 구남로 1,Y
Blue Cafe,카페,\"서울 종로구 1, 2층\",N
Dog Bistro,양식,서울 마포구 2,y
Park Grill,양식,서울 용산구 3,Y
Corner Deli,기타,서울 중구 4,Y
";

    fn write_source(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("source.csv");
        fs::write(&path, contents).expect("write source");
        path
    }

    #[test]
    fn keeps_only_exact_sentinel_matches_in_order() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write_source(dir.path(), SOURCE);

        let table = load_filtered(&path, &ColumnNames::default()).expect("load");
        let names: Vec<&str> = table.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["해운대 국밥", "Park Grill", "Corner Deli"]);
        assert_eq!(table.records[0].position, 1);
        assert_eq!(table.records[1].position, 2);
        assert_eq!(table.records[1].address, "서울 용산구 3");
        assert_eq!(table.records[2].position, 3);
        assert!(table
            .records
            .iter()
            .all(|r| r.status == ImageStatus::NotFound));
    }

    #[test]
    fn strips_leading_byte_order_mark() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write_source(dir.path(), &format!("\u{feff}{SOURCE}"));

        let table = load_filtered(&path, &ColumnNames::default()).expect("load");
        assert_eq!(table.headers[0], "FCLTY_NM");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn missing_column_is_a_load_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write_source(dir.path(), "FCLTY_NM,RDNMADR_NM\nA,B\n");

        let err = load_filtered(&path, &ColumnNames::default()).expect_err("missing column");
        match err {
            LoadError::MissingColumn { column, .. } => assert_eq!(column, "PET_POSBL_AT"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_source_is_a_load_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = load_filtered(&dir.path().join("nope.csv"), &ColumnNames::default())
            .expect_err("missing source");
        assert!(matches!(err, LoadError::Missing(_)), "{err}");
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write_source(
            dir.path(),
            "FCLTY_NM,RDNMADR_NM,PET_POSBL_AT\nA,B,Y\nC,D\n",
        );
        let err = load_filtered(&path, &ColumnNames::default()).expect_err("ragged row");
        assert!(matches!(err, LoadError::Malformed { .. }), "{err}");
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("source.csv");
        fs::write(&path, b"FCLTY_NM,RDNMADR_NM,PET_POSBL_AT\n\xff\xfe,B,Y\n")
            .expect("write source");
        let err = load_filtered(&path, &ColumnNames::default()).expect_err("invalid utf-8");
        assert!(matches!(err, LoadError::Malformed { .. }), "{err}");
    }

    #[test]
    fn output_starts_with_bom_and_appends_status() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write_source(dir.path(), SOURCE);
        let mut table = load_filtered(&path, &ColumnNames::default()).expect("load");
        table.records[0].status = ImageStatus::Found;

        let out = dir.path().join("out").join("table.csv");
        write_output(&out, &table).expect("write output");

        let bytes = fs::read(&out).expect("read output");
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "FCLTY_NM,CTGRY_NM,RDNMADR_NM,PET_POSBL_AT,IMG_EXIST");
        assert_eq!(lines[1], "해운대 국밥,한식,부산 해운대구 구남로 1,Y,Y");
        assert_eq!(lines[2], "Park Grill,양식,서울 용산구 3,Y,N");
        assert_eq!(lines[3], "Corner Deli,기타,서울 중구 4,Y,N");
        assert_eq!(lines.len(), 4);

        let rows = read_output(&out, &ColumnNames::default()).expect("read back");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].status, ImageStatus::Found);
        assert_eq!(rows[1].name, "Park Grill");
    }

    #[test]
    fn existing_status_column_is_overwritten_not_duplicated() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write_source(
            dir.path(),
            "FCLTY_NM,RDNMADR_NM,PET_POSBL_AT,IMG_EXIST\nA,B,Y,Y\n",
        );
        let table = load_filtered(&path, &ColumnNames::default()).expect("load");
        assert_eq!(table.output_headers().len(), 4);

        let out = dir.path().join("table.csv");
        write_output(&out, &table).expect("write output");
        let rows = read_output(&out, &ColumnNames::default()).expect("read back");
        assert_eq!(rows[0].status, ImageStatus::NotFound);
    }

    #[test]
    fn empty_table_writes_header_only() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write_source(dir.path(), "FCLTY_NM,RDNMADR_NM,PET_POSBL_AT\nA,B,N\n");
        let table = load_filtered(&path, &ColumnNames::default()).expect("load");
        assert!(table.is_empty());

        let out = dir.path().join("table.csv");
        write_output(&out, &table).expect("write output");
        let text = fs::read_to_string(&out).expect("read output");
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn record_limit_parsing_and_bounds() {
        assert_eq!("-1".parse::<RecordLimit>(), Ok(RecordLimit::All));
        assert_eq!("0".parse::<RecordLimit>(), Ok(RecordLimit::First(0)));
        assert!("-2".parse::<RecordLimit>().is_err());
        assert!("many".parse::<RecordLimit>().is_err());

        assert_eq!(RecordLimit::All.bound(7), 7);
        assert_eq!(RecordLimit::First(3).bound(7), 3);
        assert_eq!(RecordLimit::First(30).bound(7), 7);
    }
}
