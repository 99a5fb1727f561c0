//! Fixed-width TWT binning of well logs
//!
//! Rows are grouped into half-open bins `[start, start + width)` laid out
//! from the floored minimum TWT up to, but excluding, the floored maximum.
//! Each non-empty bin yields one row of means; empty bins are dropped.

use crate::error::{Result, WellTraceError};
use crate::utils::nan_mean;
use crate::welllog::WellLogTable;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Input column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleOptions {
    pub time_column: String,
    pub depth_column: String,
    pub curve_column: String,
    pub discrete_column: String,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self {
            time_column: "TWT".to_string(),
            depth_column: "MD".to_string(),
            curve_column: "Gamma".to_string(),
            discrete_column: "General discrete".to_string(),
        }
    }
}

/// One averaged bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampledRow {
    /// Bin start
    #[serde(rename = "TWT")]
    pub twt: f64,
    #[serde(rename = "MD")]
    pub md: f64,
    #[serde(rename = "Gamma")]
    pub gamma: f64,
    /// Ceiling of the mean discrete code, absent when the bin has no codes
    #[serde(rename = "General_Discrete")]
    pub general_discrete: Option<i64>,
}

/// Resampled log, rows ascending by TWT
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResampledTable {
    rows: Vec<ResampledRow>,
}

impl ResampledTable {
    pub fn rows(&self) -> &[ResampledRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn twt(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.twt).collect()
    }

    /// Write as CSV with columns `TWT, MD, Gamma, General_Discrete`
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        csv_writer.write_record(["TWT", "MD", "Gamma", "General_Discrete"])?;
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_csv_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}

/// Averages well-log columns into fixed-width TWT bins
#[derive(Debug, Clone, Default)]
pub struct LogResampler {
    options: ResampleOptions,
}

impl LogResampler {
    pub fn new(options: ResampleOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResampleOptions {
        &self.options
    }

    /// Resample `table` into bins of `bin_width` TWT units
    ///
    /// Cells that do not parse as numbers count as missing, rows with a
    /// missing TWT are dropped and means skip missing values. A bin whose
    /// values are all missing reports NaN means and no discrete code.
    pub fn resample(&self, table: &WellLogTable, bin_width: f64) -> Result<ResampledTable> {
        if !bin_width.is_finite() || bin_width <= 0.0 {
            return Err(WellTraceError::InvalidArgument(format!(
                "bin width must be a positive number, got {}",
                bin_width
            )));
        }

        let opts = &self.options;
        let missing: Vec<&str> = [
            &opts.time_column,
            &opts.depth_column,
            &opts.curve_column,
            &opts.discrete_column,
        ]
        .into_iter()
        .filter(|name| !table.has_column(name))
        .map(String::as_str)
        .collect();
        if !missing.is_empty() {
            return Err(WellTraceError::InvalidArgument(format!(
                "well log is missing required columns: {}",
                missing.join(", ")
            )));
        }

        let column = |name: &str| table.numeric_column(name).unwrap_or_default();
        let twt = column(&opts.time_column);
        let md = column(&opts.depth_column);
        let gamma = column(&opts.curve_column);
        let discrete = column(&opts.discrete_column);

        // row indices with a TWT, sorted by TWT
        let mut order: Vec<usize> = (0..twt.len()).filter(|&i| !twt[i].is_nan()).collect();
        if order.is_empty() {
            return Ok(ResampledTable::default());
        }
        order.sort_by(|&a, &b| twt[a].total_cmp(&twt[b]));

        let (t_min, t_max) = (twt[order[0]], twt[order[order.len() - 1]]);
        if !t_min.is_finite() || !t_max.is_finite() {
            return Err(WellTraceError::InvalidArgument(format!(
                "TWT range [{}, {}] is not finite",
                t_min, t_max
            )));
        }

        let first_bin = (t_min / bin_width).floor() * bin_width;
        let last_bin = (t_max / bin_width).floor() * bin_width;
        let bin_count = ((last_bin - first_bin) / bin_width).ceil().max(0.0) as usize;

        let bin_start = |k: usize| first_bin + k as f64 * bin_width;
        // bin k holds bin_start(k) <= t < bin_start(k) + bin_width
        let bin_of = |t: f64| {
            let mut k = ((t - first_bin) / bin_width).floor().max(0.0) as usize;
            while k > 0 && t < bin_start(k) {
                k -= 1;
            }
            while t >= bin_start(k) + bin_width {
                k += 1;
            }
            k
        };

        // rows are sorted, so each bin is one contiguous run
        let mut rows = Vec::new();
        let mut lo = 0;
        while lo < order.len() {
            let k = bin_of(twt[order[lo]]);
            if k >= bin_count {
                break;
            }
            let mut hi = lo + 1;
            while hi < order.len() && bin_of(twt[order[hi]]) == k {
                hi += 1;
            }

            let selected = &order[lo..hi];
            let mean_of = |values: &[f64]| nan_mean(selected.iter().map(|&i| values[i]));
            let discrete_mean = mean_of(discrete.as_slice());

            rows.push(ResampledRow {
                twt: bin_start(k),
                md: mean_of(md.as_slice()),
                gamma: mean_of(gamma.as_slice()),
                general_discrete: (!discrete_mean.is_nan()).then(|| discrete_mean.ceil() as i64),
            });
            lo = hi;
        }

        Ok(ResampledTable { rows })
    }
}

/// Resample with the default column names
pub fn resample(table: &WellLogTable, bin_width: f64) -> Result<ResampledTable> {
    LogResampler::default().resample(table, bin_width)
}
