//! Tabular well logs with raw, uncoerced cells

use crate::error::{Result, WellTraceError};
use std::io::Read;
use std::path::Path;

/// One cell of a well log as read from its source
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    Number(f64),
    Text(String),
    Missing,
}

impl From<f64> for LogValue {
    fn from(value: f64) -> Self {
        LogValue::Number(value)
    }
}

impl From<Option<f64>> for LogValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(LogValue::Missing, LogValue::Number)
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            LogValue::Missing
        } else {
            LogValue::Text(value.to_string())
        }
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            LogValue::Missing
        } else {
            LogValue::Text(value)
        }
    }
}

/// Best-effort numeric cast of a cell
///
/// Never fails: text that does not parse as a number and missing cells
/// become NaN.
pub fn coerce_numeric(value: &LogValue) -> f64 {
    match value {
        LogValue::Number(v) => *v,
        LogValue::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        LogValue::Missing => f64::NAN,
    }
}

/// Well log held column by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WellLogTable {
    names: Vec<String>,
    columns: Vec<Vec<LogValue>>,
}

impl WellLogTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from named columns of equal length
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<LogValue>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Append a column; its length must match the existing rows
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<LogValue>) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(WellTraceError::InvalidArgument(format!("duplicate column '{}'", name)));
        }
        if !self.columns.is_empty() && values.len() != self.len() {
            return Err(WellTraceError::InvalidArgument(format!(
                "column '{}' has {} rows, table has {}",
                name,
                values.len(),
                self.len()
            )));
        }
        self.names.push(name);
        self.columns.push(values);
        Ok(())
    }

    /// Append a row; short rows are padded with missing cells
    pub fn push_row(&mut self, row: Vec<LogValue>) -> Result<()> {
        if row.len() > self.names.len() {
            return Err(WellTraceError::InvalidArgument(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.names.len()
            )));
        }
        let mut cells = row.into_iter();
        for column in &mut self.columns {
            column.push(cells.next().unwrap_or(LogValue::Missing));
        }
        Ok(())
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&[LogValue]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Column coerced to numbers, see [`coerce_numeric`]
    pub fn numeric_column(&self, name: &str) -> Option<Vec<f64>> {
        self.column(name).map(|values| values.iter().map(coerce_numeric).collect())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read a delimited file with a header row
    pub fn read_delimited(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file, delimiter)
    }

    /// Read a comma-delimited file with a header row
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_delimited(path, b',')
    }

    /// Parse delimited text, keeping every cell as text
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let mut table = Self::new();
        for header in csv_reader.headers()?.iter() {
            table.push_column(header, Vec::new())?;
        }

        for record in csv_reader.records() {
            let record = record?;
            let row = record.iter().map(LogValue::from).collect();
            table.push_row(row)?;
        }

        Ok(table)
    }
}
