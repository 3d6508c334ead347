use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;

use super::ImportError;

/// Rows × cells of one worksheet, every cell already a string.
/// Empty cells are normalized to `""`.
pub type RowGrid = Vec<Vec<String>>;

/// Parses an uploaded price list into a row grid.
///
/// The format is chosen by file-name extension: `.csv` goes through the CSV
/// reader, workbook formats (`.xlsx`, `.xls`, `.xlsb`, `.ods`) through
/// calamine, reading the first worksheet only. No rows are filtered here;
/// the header row is still present in the result.
pub fn read_grid(file_name: &str, bytes: &[u8]) -> Result<RowGrid, ImportError> {
    match extension(file_name).as_str() {
        "csv" => read_csv(bytes),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_workbook(bytes),
        other => Err(ImportError::UnsupportedFormat(other.to_string())),
    }
}

fn extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

fn read_csv(bytes: &[u8]) -> Result<RowGrid, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::UnreadableFile(e.to_string()))?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

fn read_workbook(bytes: &[u8]) -> Result<RowGrid, ImportError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| ImportError::UnreadableFile(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::UnreadableFile("workbook has no worksheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::UnreadableFile(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
