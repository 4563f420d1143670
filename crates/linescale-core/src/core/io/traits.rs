use super::table::{LineColumns, LineTable};
use crate::core::models::line::ScaledLine;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading line lists and writing their scaled counterparts.
pub trait LineListFile {
    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error>;

    /// Reads a line list, mapping the required fields through `columns`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is absent or any row holds a
    /// missing or unparsable required field. No partial table is returned.
    fn read_from(
        reader: &mut impl BufRead,
        columns: &LineColumns,
    ) -> Result<LineTable, Self::Error>;

    /// Writes every row of `table` extended with the values of the matching `scaled` line.
    ///
    /// # Errors
    ///
    /// Returns an error if `scaled` is not aligned with the table or writing fails.
    fn write_to(
        table: &LineTable,
        scaled: &[ScaledLine],
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(
        path: P,
        columns: &LineColumns,
    ) -> Result<LineTable, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, columns)
    }

    fn write_to_path<P: AsRef<Path>>(
        table: &LineTable,
        scaled: &[ScaledLine],
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(table, scaled, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
