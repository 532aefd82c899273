mod excel;
mod headers;

use super::domain::{Expediente, NO_DISPONIBLE};
use headers::ColumnSchema;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Failure to bring the spreadsheet into memory. Callers are expected to
/// surface the message and continue with an empty record set; a broken
/// spreadsheet must not take the service down.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read spreadsheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not open workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("workbook has no sheet named '{0}'")]
    SheetNotFound(String),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("header row has no recognized expediente columns")]
    MissingHeaders,
}

/// Loads expediente records from an Excel workbook or a CSV export and
/// shapes them into the canonical form the classifier consumes: trimmed
/// headers resolved to one schema, every missing cell replaced by the
/// sentinel, duplicate case identifiers collapsed to the first occurrence.
pub struct ExpedienteImporter;

impl ExpedienteImporter {
    pub fn from_workbook<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Vec<Expediente>, LoadError> {
        let (headers, rows) = excel::read_sheet(path.as_ref(), sheet)?;
        shape_records(&headers, rows)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Vec<Expediente>, LoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<Expediente>, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|header| header.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(
                (0..headers.len())
                    .map(|index| {
                        record
                            .get(index)
                            .map(str::trim)
                            .filter(|value| !value.is_empty())
                            .map(str::to_string)
                    })
                    .collect(),
            );
        }

        shape_records(&headers, rows)
    }
}

fn shape_records(
    headers: &[String],
    rows: Vec<Vec<Option<String>>>,
) -> Result<Vec<Expediente>, LoadError> {
    let schema = ColumnSchema::resolve(headers)?;
    let total = rows.len();

    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for row in rows {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i).cloned().flatten())
                .unwrap_or_else(|| NO_DISPONIBLE.to_string())
        };

        let record = Expediente {
            expediente: cell(schema.expediente),
            asesor: cell(schema.asesor),
            tema: cell(schema.tema),
            fecha_caducidad: cell(schema.fecha_caducidad),
            fecha_reparto: cell(schema.fecha_reparto),
            seguimiento: cell(schema.seguimiento),
        };

        if !seen.insert(record.expediente.clone()) {
            continue;
        }
        records.push(record);
    }

    info!(rows = total, unique = records.len(), "expedientes loaded");
    Ok(records)
}
