//! Reading and writing datasets as flat tables.
//!
//! Files carry exactly the columns `categorie, page, nom, prix, adresse,
//! image`. Delimited text is chosen for `.csv`, a workbook for `.xlsx`.

use crate::models::{Dataset, ListingRecord, Source};
use calamine::{Data, Reader, Xlsx};
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const COLUMNS: [&str; 6] = ["categorie", "page", "nom", "prix", "adresse", "image"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file type '{0}' (expected .csv or .xlsx)")]
    UnsupportedFormat(String),

    #[error("could not parse {file}: {reason}")]
    ParseFailure { file: String, reason: String },
}

impl LoadError {
    fn parse(file: &str, reason: impl ToString) -> Self {
        LoadError::ParseFailure {
            file: file.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Xlsx,
}

fn format_of(file_name: &str) -> Result<Format, LoadError> {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => Ok(Format::Csv),
        "xlsx" | "xlsm" => Ok(Format::Xlsx),
        _ => Err(LoadError::UnsupportedFormat(file_name.to_string())),
    }
}

/// Load a dataset from disk.
pub fn load_from_file(path: &Path, source: Source) -> Result<Dataset, LoadError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(LoadError::parse(&path.display().to_string(), e)),
    };

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    load_from_upload(&file_name, bytes, source)
}

/// Load a dataset from in-memory upload bytes; the parser is picked from
/// the file name.
pub fn load_from_upload(
    file_name: &str,
    bytes: Vec<u8>,
    source: Source,
) -> Result<Dataset, LoadError> {
    let rows = match format_of(file_name)? {
        Format::Csv => read_csv_rows(file_name, &bytes)?,
        Format::Xlsx => read_xlsx_rows(file_name, bytes)?,
    };

    let records = rows_to_records(file_name, rows)?;
    info!("Loaded {} records from {} ({})", records.len(), file_name, source);

    Ok(Dataset::new(records, source))
}

fn read_csv_rows(file_name: &str, bytes: &[u8]) -> Result<Vec<Vec<String>>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| LoadError::parse(file_name, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn read_xlsx_rows(file_name: &str, bytes: Vec<u8>) -> Result<Vec<Vec<String>>, LoadError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| LoadError::parse(file_name, e))?;

    let worksheets = workbook.worksheets();
    let Some((_name, range)) = worksheets.first() else {
        return Err(LoadError::parse(file_name, "workbook has no worksheet"));
    };

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Pages start at 1. Spreadsheets may hand them back as "3.0".
fn parse_page(text: &str) -> Option<u32> {
    if let Ok(page) = text.parse::<u32>() {
        return Some(page).filter(|p| *p >= 1);
    }
    let value = text.parse::<f64>().ok()?;
    (value.fract() == 0.0 && value >= 1.0 && value <= u32::MAX as f64).then_some(value as u32)
}

/// Map header + data rows to records.
///
/// A missing column or a bad page number fails the whole file. Rows with an
/// empty required text field are dropped.
fn rows_to_records(
    file_name: &str,
    rows: Vec<Vec<String>>,
) -> Result<Vec<ListingRecord>, LoadError> {
    let mut rows = rows.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| LoadError::parse(file_name, "file is empty"))?;

    let mut indices = [0usize; 6];
    for (slot, column) in indices.iter_mut().zip(COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == column)
            .ok_or_else(|| LoadError::parse(file_name, format!("missing column '{}'", column)))?;
    }

    let mut records = Vec::new();
    let mut skipped = 0;
    for (line, row) in rows.enumerate() {
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let cell = |i: usize| row.get(indices[i]).cloned().unwrap_or_default();

        let page_text = cell(1);
        let page = parse_page(&page_text).ok_or_else(|| {
            LoadError::parse(file_name, format!("row {}: invalid page '{}'", line + 2, page_text))
        })?;

        let record = ListingRecord {
            category: cell(0),
            page,
            name: cell(2),
            price: cell(3),
            address: cell(4),
            image_url: cell(5),
        };

        if record.is_complete() {
            records.push(record);
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        warn!("Skipped {} incomplete rows in {}", skipped, file_name);
    }

    Ok(records)
}

/// Write records as CSV with the standard header.
pub fn write_csv<W: Write>(records: &[ListingRecord], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        writer.write_record(COLUMNS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Save a dataset to a CSV file, creating parent directories.
pub fn save_csv(dataset: &Dataset, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_csv(&dataset.records, file)?;
    info!("💾 Saved {} records to {}", dataset.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "categorie,page,nom,prix,adresse,image\n\
        chiens,1,Berger allemand,15000,Dakar,https://img/1.jpg\n\
        moutons,2,Bélier Ladoum,350000,\"Thiès, Sénégal\",https://img/2.jpg\n";

    fn upload(file_name: &str, text: &str) -> Result<Dataset, LoadError> {
        load_from_upload(file_name, text.as_bytes().to_vec(), Source::UploadedFile)
    }

    #[test]
    fn test_load_csv_upload() {
        let dataset = upload("annonces.csv", CSV).unwrap();
        assert_eq!(dataset.source, Source::UploadedFile);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[1].address, "Thiès, Sénégal");
        assert_eq!(dataset.records[1].page, 2);
    }

    #[test]
    fn test_column_order_and_extra_columns_do_not_matter() {
        let csv = ",image,prix,nom,page,adresse,categorie,web-scraper-order\n\
            0,a.jpg,100,Coq,3,Kaolack,poules_lapins_pigeons,17\n";
        let dataset =
            load_from_upload("x.CSV", csv.as_bytes().to_vec(), Source::DefaultFile).unwrap();
        assert_eq!(
            dataset.records,
            vec![ListingRecord {
                category: "poules_lapins_pigeons".to_string(),
                page: 3,
                name: "Coq".to_string(),
                price: "100".to_string(),
                address: "Kaolack".to_string(),
                image_url: "a.jpg".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_column_is_parse_failure() {
        let csv = "categorie,page,nom,adresse,image\nchiens,1,A,Dakar,a.jpg\n";
        let err = upload("x.csv", csv).unwrap_err();
        assert!(
            matches!(err, LoadError::ParseFailure { ref reason, .. } if reason.contains("prix"))
        );
    }

    #[test]
    fn test_bad_page_is_parse_failure() {
        let csv = "categorie,page,nom,prix,adresse,image\nchiens,un,A,1,Dakar,a.jpg\n";
        let err = upload("x.csv", csv).unwrap_err();
        assert!(matches!(err, LoadError::ParseFailure { .. }));
    }

    #[test]
    fn test_page_zero_is_parse_failure() {
        let csv = "categorie,page,nom,prix,adresse,image\n\
            chiens,1,A,100,Dakar,a.jpg\n\
            chiens,0,B,100,Dakar,b.jpg\n";
        let err = upload("x.csv", csv).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ParseFailure { ref reason, .. } if reason.contains("row 3: invalid page '0'")
        ));
    }

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let csv = "categorie,page,nom,prix,adresse,image\n\
            chiens,1,,1000,Dakar,a.jpg\n\
            chiens,1,B,,Dakar,b.jpg\n\
            ,,,,,\n";
        let dataset = upload("x.csv", csv).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].name, "B");
        assert_eq!(dataset.records[0].price, "");
    }

    #[test]
    fn test_unsupported_and_corrupt_files() {
        assert!(matches!(
            load_from_upload("notes.txt", b"hello".to_vec(), Source::UploadedFile),
            Err(LoadError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            load_from_upload("sheet.xlsx", b"not a zip".to_vec(), Source::UploadedFile),
            Err(LoadError::ParseFailure { .. })
        ));
        assert!(matches!(
            load_from_upload("empty.csv", Vec::new(), Source::UploadedFile),
            Err(LoadError::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page("3"), Some(3));
        assert_eq!(parse_page("3.0"), Some(3));
        assert_eq!(parse_page("1"), Some(1));
        assert_eq!(parse_page("1.0"), Some(1));
        assert_eq!(parse_page("0"), None);
        assert_eq!(parse_page("0.0"), None);
        assert_eq!(parse_page("3.5"), None);
        assert_eq!(parse_page("-1"), None);
        assert_eq!(parse_page(""), None);
    }

    #[test]
    fn test_write_csv_header() {
        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "categorie,page,nom,prix,adresse,image\n"
        );

        let dataset = upload("x.csv", CSV).unwrap();
        let mut out = Vec::new();
        write_csv(&dataset.records, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), CSV);
    }
}
