use crate::core::models::line::LineRecord;

/// Names of the columns holding the five required line fields.
///
/// Defaults follow the radis/HITRAN dataframe convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineColumns {
    pub molecule: String,
    pub isotopologue: String,
    pub intensity: String,
    pub lower_state_energy: String,
    pub wavenumber: String,
}

impl Default for LineColumns {
    fn default() -> Self {
        Self {
            molecule: "id".to_string(),
            isotopologue: "iso".to_string(),
            intensity: "int".to_string(),
            lower_state_energy: "El".to_string(),
            wavenumber: "wav".to_string(),
        }
    }
}

impl LineColumns {
    pub fn required(&self) -> [&str; 5] {
        [
            &self.molecule,
            &self.isotopologue,
            &self.intensity,
            &self.lower_state_energy,
            &self.wavenumber,
        ]
    }
}

/// Columns appended to every row of a scaled line list.
pub const SCALED_COLUMNS: [&str; 3] = ["Qref", "Qgas", "S"];

/// A loaded line list: typed records plus the raw rows they came from.
///
/// Raw rows are kept verbatim so that columns the scaler does not understand
/// (broadening coefficients, quantum numbers, ...) survive a read/scale/write cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
    pub(crate) lines: Vec<LineRecord>,
}

impl LineTable {
    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Headers of the columns that are carried through untouched.
    pub fn passthrough_columns(&self, columns: &LineColumns) -> Vec<&str> {
        let required = columns.required();
        self.headers
            .iter()
            .map(String::as_str)
            .filter(|h| !required.contains(h))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
