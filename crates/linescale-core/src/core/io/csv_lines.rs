use super::table::{LineColumns, LineTable, SCALED_COLUMNS};
use super::traits::LineListFile;
use crate::core::models::ids::{IsotopologueId, MoleculeId};
use crate::core::models::line::{LineRecord, ScaledLine};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvLineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Required column '{0}' is missing from the header")]
    MissingColumn(String),
    #[error("Parse error on data row {row}: {kind}")]
    Parse { row: usize, kind: FieldErrorKind },
    #[error("Scaled lines ({scaled}) are not aligned with the table rows ({rows})")]
    Misaligned { rows: usize, scaled: usize },
}

#[derive(Debug, Error)]
pub enum FieldErrorKind {
    #[error("Required field '{column}' is empty")]
    MissingField { column: String },
    #[error("Invalid value '{value}' in column '{column}'")]
    InvalidValue { column: String, value: String },
}

struct ColumnIndices {
    molecule: usize,
    isotopologue: usize,
    intensity: usize,
    lower_state_energy: usize,
    wavenumber: usize,
}

impl ColumnIndices {
    fn locate(headers: &[String], columns: &LineColumns) -> Result<Self, CsvLineError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| CsvLineError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            molecule: find(&columns.molecule)?,
            isotopologue: find(&columns.isotopologue)?,
            intensity: find(&columns.intensity)?,
            lower_state_energy: find(&columns.lower_state_energy)?,
            wavenumber: find(&columns.wavenumber)?,
        })
    }
}

fn parse_field<T: FromStr>(
    row: &[String],
    index: usize,
    column: &str,
    row_number: usize,
) -> Result<T, CsvLineError> {
    let value = row.get(index).map_or("", |v| v.trim());
    if value.is_empty() {
        return Err(CsvLineError::Parse {
            row: row_number,
            kind: FieldErrorKind::MissingField {
                column: column.to_string(),
            },
        });
    }
    value.parse().map_err(|_| CsvLineError::Parse {
        row: row_number,
        kind: FieldErrorKind::InvalidValue {
            column: column.to_string(),
            value: value.to_string(),
        },
    })
}

/// Comma-separated line lists with a header row.
pub struct CsvLineFile;

impl LineListFile for CsvLineFile {
    type Error = CsvLineError;

    fn read_from(
        reader: &mut impl BufRead,
        columns: &LineColumns,
    ) -> Result<LineTable, Self::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let idx = ColumnIndices::locate(&headers, columns)?;

        let mut rows = Vec::new();
        let mut lines = Vec::new();
        for (i, record) in csv_reader.records().enumerate() {
            let row: Vec<String> = record?.iter().map(str::to_string).collect();
            let row_number = i + 1;

            let molecule_id: u16 = parse_field(&row, idx.molecule, &columns.molecule, row_number)?;
            let isotopologue_id: u16 =
                parse_field(&row, idx.isotopologue, &columns.isotopologue, row_number)?;
            let line = LineRecord {
                molecule_id: MoleculeId(molecule_id),
                isotopologue_id: IsotopologueId(isotopologue_id),
                reference_intensity: parse_field(
                    &row,
                    idx.intensity,
                    &columns.intensity,
                    row_number,
                )?,
                lower_state_energy: parse_field(
                    &row,
                    idx.lower_state_energy,
                    &columns.lower_state_energy,
                    row_number,
                )?,
                wavenumber: parse_field(&row, idx.wavenumber, &columns.wavenumber, row_number)?,
            };
            lines.push(line);
            rows.push(row);
        }

        Ok(LineTable {
            headers,
            rows,
            lines,
        })
    }

    fn write_to(
        table: &LineTable,
        scaled: &[ScaledLine],
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        if table.rows.len() != scaled.len() {
            return Err(CsvLineError::Misaligned {
                rows: table.rows.len(),
                scaled: scaled.len(),
            });
        }

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(
            table
                .headers
                .iter()
                .map(String::as_str)
                .chain(SCALED_COLUMNS),
        )?;

        for (row, line) in table.rows.iter().zip(scaled) {
            let derived = [
                format!("{:e}", line.q_ref),
                format!("{:e}", line.q_gas),
                format!("{:e}", line.linestrength),
            ];
            csv_writer.write_record(
                row.iter()
                    .map(String::as_str)
                    .chain(derived.iter().map(String::as_str)),
            )?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
