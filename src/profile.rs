//! Trace profiles and the ordered set of extraction results

use crate::error::{Result, WellTraceError};
use num_traits::Float;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Name of the value column before any rename
pub const DEFAULT_VALUE_COLUMN: &str = "data";

const GEOMETRY_COLUMNS: [&str; 4] = ["iline", "xline", "cdp_x", "cdp_y"];

/// One sample of a trace profile
///
/// NaN marks a grid position without a trace; two NaN cells compare equal.
#[derive(Debug, Clone, Copy)]
pub struct ProfileRow {
    /// Sample axis coordinate (TWT in ms for time volumes)
    pub sample: f64,
    pub iline: i32,
    pub xline: i32,
    pub cdp_x: f64,
    pub cdp_y: f64,
    pub value: f32,
}

impl PartialEq for ProfileRow {
    fn eq(&self, other: &Self) -> bool {
        same_value(self.sample, other.sample)
            && self.iline == other.iline
            && self.xline == other.xline
            && same_value(self.cdp_x, other.cdp_x)
            && same_value(self.cdp_y, other.cdp_y)
            && same_value(self.value, other.value)
    }
}

fn same_value<T: Float>(a: T, b: T) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Flat table of one trace sliced out of a volume
///
/// Columns are `<sample>, iline, xline, cdp_x, cdp_y, <value>`, one row per
/// sample of the trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceProfile {
    name: String,
    sample_column: String,
    value_column: String,
    rows: Vec<ProfileRow>,
}

impl TraceProfile {
    pub fn new(
        name: impl Into<String>,
        sample_column: impl Into<String>,
        rows: Vec<ProfileRow>,
    ) -> Self {
        Self {
            name: name.into(),
            sample_column: sample_column.into(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
            rows,
        }
    }

    /// Derived name, `<identifier>_<tag>`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_column(&self) -> &str {
        &self.sample_column
    }

    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn rows(&self) -> &[ProfileRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in output order
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = Vec::with_capacity(GEOMETRY_COLUMNS.len() + 2);
        columns.push(self.sample_column.as_str());
        columns.extend_from_slice(&GEOMETRY_COLUMNS);
        columns.push(self.value_column.as_str());
        columns
    }

    pub fn samples(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.sample).collect()
    }

    pub fn values(&self) -> Vec<f32> {
        self.rows.iter().map(|r| r.value).collect()
    }

    /// Rename the value column when it currently carries the default name
    ///
    /// Returns whether the rename happened.
    pub fn rename_value_column(&mut self, new_name: impl Into<String>) -> bool {
        if self.value_column != DEFAULT_VALUE_COLUMN {
            return false;
        }
        self.value_column = new_name.into();
        true
    }

    /// Write as comma-delimited CSV with a header row and no index column
    ///
    /// NaN cells are written empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.columns())?;
        for row in &self.rows {
            csv_writer.write_record([
                float_cell(row.sample),
                row.iline.to_string(),
                row.xline.to_string(),
                float_cell(row.cdp_x),
                float_cell(row.cdp_y),
                float_cell(row.value),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write to `path`, replacing any existing file
    pub fn write_csv_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }

    /// Read a profile previously written by [`TraceProfile::write_csv`]
    pub fn read_csv<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        if headers.len() != GEOMETRY_COLUMNS.len() + 2
            || headers.iter().skip(1).take(GEOMETRY_COLUMNS.len()).ne(GEOMETRY_COLUMNS)
        {
            return Err(WellTraceError::Csv(format!(
                "unexpected trace profile header: {:?}",
                headers
            )));
        }

        let mut rows = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            rows.push(ProfileRow {
                sample: parse_float(&record, line, 0)?,
                iline: parse_field(&record, line, 1)?,
                xline: parse_field(&record, line, 2)?,
                cdp_x: parse_float(&record, line, 3)?,
                cdp_y: parse_float(&record, line, 4)?,
                value: parse_float(&record, line, 5)?,
            });
        }

        Ok(Self {
            name: name.into(),
            sample_column: headers[0].to_string(),
            value_column: headers[GEOMETRY_COLUMNS.len() + 1].to_string(),
            rows,
        })
    }

    /// Read a profile from disk, naming it after the file stem
    pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let file = std::fs::File::open(path)?;
        Self::read_csv(name, file)
    }
}

fn float_cell<T: Float + ToString>(value: T) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn raw_field(record: &csv::StringRecord, line: usize, column: usize) -> Result<&str> {
    record
        .get(column)
        .map(str::trim)
        .ok_or_else(|| WellTraceError::Csv(format!("row {} is missing column {}", line, column)))
}

fn parse_field<T: FromStr>(record: &csv::StringRecord, line: usize, column: usize) -> Result<T> {
    let raw = raw_field(record, line, column)?;
    raw.parse().map_err(|_| {
        WellTraceError::Csv(format!("row {}: invalid value '{}' in column {}", line, raw, column))
    })
}

/// Like [`parse_field`], an empty cell reads as NaN
fn parse_float<T: Float + FromStr>(
    record: &csv::StringRecord,
    line: usize,
    column: usize,
) -> Result<T> {
    if raw_field(record, line, column)?.is_empty() {
        return Ok(T::nan());
    }
    parse_field(record, line, column)
}

/// Extraction results keyed by derived name, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    entries: Vec<TraceProfile>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a profile under its name
    ///
    /// Replacing an existing entry keeps its original position and returns
    /// the previous profile.
    pub fn insert(&mut self, profile: TraceProfile) -> Option<TraceProfile> {
        match self.entries.iter().position(|p| p.name == profile.name) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index], profile)),
            None => {
                self.entries.push(profile);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&TraceProfile> {
        self.entries.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraceProfile> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, offset: f32) -> TraceProfile {
        let rows = (0..4)
            .map(|k| ProfileRow {
                sample: k as f64 * 4.0,
                iline: 100,
                xline: 200,
                cdp_x: 2500.5,
                cdp_y: 5000.25,
                value: offset + k as f32 * 0.5,
            })
            .collect();
        TraceProfile::new(name, "twt", rows)
    }

    #[test]
    fn test_columns_and_rename() {
        let mut p = profile("ai_F02", 0.0);
        assert_eq!(p.columns(), vec!["twt", "iline", "xline", "cdp_x", "cdp_y", "data"]);

        assert!(p.rename_value_column("AI"));
        assert_eq!(p.value_column(), "AI");
        // only the default column is renamed
        assert!(!p.rename_value_column("Impedance"));
        assert_eq!(p.value_column(), "AI");
    }

    #[test]
    fn test_csv_round_trip() {
        let mut p = profile("ai_F02", 1.25);
        p.rename_value_column("AI");

        let mut buf = Vec::new();
        p.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("twt,iline,xline,cdp_x,cdp_y,AI\n"));
        assert!(text.contains("4,100,200,2500.5,5000.25,1.75\n"));

        let back = TraceProfile::read_csv("ai_F02", buf.as_slice()).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_hole_trace_round_trip() {
        let rows = (0..3)
            .map(|k| ProfileRow {
                sample: k as f64 * 4.0,
                iline: 101,
                xline: 203,
                cdp_x: f64::NAN,
                cdp_y: f64::NAN,
                value: f32::NAN,
            })
            .collect();
        let hole = TraceProfile::new("ai_F02", "twt", rows);
        assert_eq!(hole, hole.clone());

        let mut buf = Vec::new();
        hole.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.contains("\n4,101,203,,,\n"));
        assert!(!text.contains("NaN"));

        let back = TraceProfile::read_csv("ai_F02", buf.as_slice()).unwrap();
        assert!(back.values().iter().all(|v| v.is_nan()));
        assert_eq!(back, hole);
    }

    #[test]
    fn test_read_csv_rejects_foreign_header() {
        let text = "TWT,MD,Gamma\n1,2,3\n";
        assert!(TraceProfile::read_csv("log", text.as_bytes()).is_err());
    }

    #[test]
    fn test_result_set_overwrite_keeps_position() {
        let mut results = ResultSet::new();
        assert!(results.insert(profile("a_F02", 0.0)).is_none());
        assert!(results.insert(profile("b_F02", 0.0)).is_none());

        let replaced = results.insert(profile("a_F02", 9.0));
        assert_eq!(replaced.unwrap().values()[0], 0.0);
        assert_eq!(results.names(), vec!["a_F02", "b_F02"]);
        assert_eq!(results.get("a_F02").unwrap().values()[0], 9.0);
        assert_eq!(results.len(), 2);
        assert!(results.get("c_F02").is_none());
    }
}
