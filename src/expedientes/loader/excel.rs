use super::LoadError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Read the named sheet, returning the trimmed header row and the body as
/// raw cells (`None` for empty/error cells). Date cells are rendered as
/// `%Y-%m-%d %H:%M:%S` strings so the normalizer sees one representation
/// regardless of source.
pub(crate) fn read_sheet(
    path: &Path,
    sheet: &str,
) -> Result<(Vec<String>, Vec<Vec<Option<String>>>), LoadError> {
    let mut workbook = open_workbook_auto(path)?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(LoadError::SheetNotFound(sheet.to_string()));
    }

    let range = workbook.worksheet_range(sheet)?;
    let mut rows = range.rows();

    let headers = match rows.next() {
        Some(row) => row
            .iter()
            .map(|cell| cell_to_string(cell).unwrap_or_default().trim().to_string())
            .collect(),
        None => Vec::new(),
    };

    let body = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok((headers, body))
}

fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(value) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Data::Int(value) => Some(value.to_string()),
        // Case numbers come through as floats; keep whole values integral.
        Data::Float(value) => {
            if value.fract() == 0.0 {
                Some(format!("{}", *value as i64))
            } else {
                Some(value.to_string())
            }
        }
        Data::Bool(value) => Some(value.to_string()),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        Data::DateTimeIso(value) => Some(value.clone()),
        Data::DurationIso(value) => Some(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_coerce_to_trimmed_strings() {
        assert_eq!(cell_to_string(&Data::Empty), None);
        assert_eq!(cell_to_string(&Data::String("  ".to_string())), None);
        assert_eq!(
            cell_to_string(&Data::String(" 2024-001 ".to_string())),
            Some("2024-001".to_string())
        );
        assert_eq!(cell_to_string(&Data::Int(42)), Some("42".to_string()));
        assert_eq!(
            cell_to_string(&Data::Float(20240015.0)),
            Some("20240015".to_string())
        );
        assert_eq!(cell_to_string(&Data::Float(1.5)), Some("1.5".to_string()));
    }
}
