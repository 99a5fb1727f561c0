//! In-memory seismic volume labelled by inline, crossline and sample axes

use crate::error::{Result, WellTraceError};
use crate::metadata::VolumeMetadata;
use crate::profile::{ProfileRow, TraceProfile};
use crate::segy::{ByteLocations, SegyReader};
use crate::types::{AxisDescriptor, ValueRange};
use crate::utils::format_bytes;
use ndarray::{Array2, Array3, ArrayView1, ArrayView3};
use std::collections::BTreeSet;
use std::path::Path;

/// Name of the sample axis of time volumes
pub const SAMPLE_AXIS: &str = "twt";

/// 3D seismic cube indexed by (inline, crossline, sample)
///
/// Grid positions without a trace in the file hold NaN samples and NaN CDP
/// coordinates.
#[derive(Debug, Clone)]
pub struct SeismicVolume {
    metadata: VolumeMetadata,
    inline_axis: AxisDescriptor,
    crossline_axis: AxisDescriptor,
    sample_axis: AxisDescriptor,
    data: Array3<f32>,
    cdp_x: Array2<f64>,
    cdp_y: Array2<f64>,
}

impl SeismicVolume {
    /// Load a SEG-Y file from disk
    pub fn load(
        identifier: impl Into<String>,
        path: impl AsRef<Path>,
        byte_locations: ByteLocations,
    ) -> Result<Self> {
        let path = path.as_ref();
        let reader = SegyReader::open(path, byte_locations)?;
        Self::from_reader(identifier, path, &reader).map_err(|e| match e {
            e @ WellTraceError::Parse { .. } => e,
            other => WellTraceError::parse(path, other),
        })
    }

    /// Assemble the cube from every trace of an opened file
    pub fn from_reader(
        identifier: impl Into<String>,
        source_path: impl AsRef<Path>,
        reader: &SegyReader,
    ) -> Result<Self> {
        let traces = reader.traces().collect::<Result<Vec<_>>>()?;
        let first = traces
            .first()
            .ok_or_else(|| WellTraceError::InvalidFormat("file contains no traces".to_string()))?;

        let segy = reader.metadata().clone();
        if segy.sample_interval_us == 0 {
            return Err(WellTraceError::InvalidFormat(
                "binary header declares a zero sample interval".to_string(),
            ));
        }

        let ilines: BTreeSet<i32> = traces.iter().map(|t| t.header.iline).collect();
        let xlines: BTreeSet<i32> = traces.iter().map(|t| t.header.xline).collect();

        let inline_axis = AxisDescriptor::new(
            "iline",
            "trace",
            ilines.iter().map(|&il| il as f64).collect(),
        );
        let crossline_axis = AxisDescriptor::new(
            "xline",
            "trace",
            xlines.iter().map(|&xl| xl as f64).collect(),
        );
        let sample_axis = AxisDescriptor::regular(
            SAMPLE_AXIS,
            "ms",
            first.header.delay_ms as f64,
            segy.sample_interval_ms(),
            segy.samples_per_trace,
        );

        let shape = (
            inline_axis.num_samples(),
            crossline_axis.num_samples(),
            sample_axis.num_samples(),
        );
        let mut data = Array3::from_elem(shape, f32::NAN);
        let mut cdp_x = Array2::from_elem((shape.0, shape.1), f64::NAN);
        let mut cdp_y = Array2::from_elem((shape.0, shape.1), f64::NAN);

        for trace in &traces {
            let (i, j) = match (
                inline_axis.exact_index(trace.header.iline as f64),
                crossline_axis.exact_index(trace.header.xline as f64),
            ) {
                (Some(i), Some(j)) => (i, j),
                _ => {
                    return Err(WellTraceError::InvalidFormat(format!(
                        "trace at iline {} xline {} missing from the survey grid",
                        trace.header.iline, trace.header.xline
                    )))
                }
            };

            data.slice_mut(ndarray::s![i, j, ..])
                .assign(&ArrayView1::from(trace.samples.as_slice()));
            cdp_x[[i, j]] = trace.header.cdp_x;
            cdp_y[[i, j]] = trace.header.cdp_y;
        }

        let value_range = data
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |range: Option<(f32, f32)>, &v| match range {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })
            .map(|(lo, hi)| ValueRange::new(lo as f64, hi as f64))
            .unwrap_or(ValueRange::new(f64::NAN, f64::NAN));

        let metadata = VolumeMetadata::new(identifier, source_path.as_ref(), segy)
            .with_file_size(reader.len_bytes())
            .with_trace_count(traces.len())
            .with_value_range(value_range);

        Ok(Self {
            metadata,
            inline_axis,
            crossline_axis,
            sample_axis,
            data,
            cdp_x,
            cdp_y,
        })
    }

    pub fn metadata(&self) -> &VolumeMetadata {
        &self.metadata
    }

    pub fn identifier(&self) -> &str {
        &self.metadata.identifier
    }

    pub fn inline_axis(&self) -> &AxisDescriptor {
        &self.inline_axis
    }

    pub fn crossline_axis(&self) -> &AxisDescriptor {
        &self.crossline_axis
    }

    pub fn sample_axis(&self) -> &AxisDescriptor {
        &self.sample_axis
    }

    pub fn data(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    /// Shape as (inlines, crosslines, samples)
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Grid indices of the trace nearest to (iline, xline)
    pub fn nearest_indices(&self, iline: f64, xline: f64) -> Result<(usize, usize)> {
        let i = self.inline_axis.nearest_index(iline);
        let j = self.crossline_axis.nearest_index(xline);
        match (i, j) {
            (Some(i), Some(j)) => Ok((i, j)),
            _ => Err(WellTraceError::InvalidArgument(format!(
                "no trace near iline {} xline {}",
                iline, xline
            ))),
        }
    }

    /// Slice the trace nearest to (iline, xline) into a flat profile
    ///
    /// Off-grid requests snap to the closest inline and crossline without
    /// raising an error.
    pub fn nearest_trace(
        &self,
        iline: f64,
        xline: f64,
        name: impl Into<String>,
    ) -> Result<TraceProfile> {
        let (i, j) = self.nearest_indices(iline, xline)?;
        let snapped_iline = self.inline_axis.coords[i] as i32;
        let snapped_xline = self.crossline_axis.coords[j] as i32;

        let rows = self
            .sample_axis
            .coords
            .iter()
            .zip(self.data.slice(ndarray::s![i, j, ..]).iter())
            .map(|(&sample, &value)| ProfileRow {
                sample,
                iline: snapped_iline,
                xline: snapped_xline,
                cdp_x: self.cdp_x[[i, j]],
                cdp_y: self.cdp_y[[i, j]],
                value,
            })
            .collect();

        Ok(TraceProfile::new(name, self.sample_axis.name.clone(), rows))
    }

    /// Uncompressed size of the sample cube in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }

    /// Get a summary string of the volume
    pub fn summary(&self) -> String {
        let (ni, nx, ns) = self.shape();
        format!(
            "{}: {} x {} x {} ({} iline {}-{}, xline {}-{}, {} {}-{} {}), {}",
            self.identifier(),
            ni,
            nx,
            ns,
            self.metadata.segy.sample_format,
            self.inline_axis.coord_min(),
            self.inline_axis.coord_max(),
            self.crossline_axis.coord_min(),
            self.crossline_axis.coord_max(),
            self.sample_axis.name,
            self.sample_axis.coord_min(),
            self.sample_axis.coord_max(),
            self.sample_axis.unit,
            format_bytes(self.size_bytes()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segy::fixtures::SegyBuilder;
    use bytes::Bytes;

    fn test_volume() -> SeismicVolume {
        // every other line, so off-grid requests exist
        let data = SegyBuilder::new(5)
            .grid((100..=110).step_by(2), (200..=220).step_by(4), |il, xl, k| {
                il as f32 * 100.0 + xl as f32 + k as f32 * 0.25
            })
            .build();
        let reader = SegyReader::from_bytes(Bytes::from(data), ByteLocations::petrel_3d()).unwrap();
        SeismicVolume::from_reader("ai", "ai.sgy", &reader).unwrap()
    }

    #[test]
    fn test_volume_geometry() {
        let volume = test_volume();
        assert_eq!(volume.shape(), (6, 6, 5));
        assert_eq!(volume.inline_axis().coord_min(), 100.0);
        assert_eq!(volume.crossline_axis().coord_max(), 220.0);
        assert_eq!(volume.sample_axis().coords, vec![0.0, 4.0, 8.0, 12.0, 16.0]);
        assert_eq!(volume.metadata().trace_count, 36);
        assert_eq!(volume.metadata().value_range.min, 10200.0);
        assert!(volume.summary().starts_with("ai: 6 x 6 x 5"));
    }

    #[test]
    fn test_nearest_trace_on_grid() {
        let volume = test_volume();
        let profile = volume.nearest_trace(104.0, 208.0, "ai_F02").unwrap();
        assert_eq!(profile.name(), "ai_F02");
        assert_eq!(profile.len(), 5);
        assert_eq!(profile.rows()[0].iline, 104);
        assert_eq!(profile.rows()[0].xline, 208);
        assert_eq!(profile.rows()[0].cdp_x, 2600.0);
        assert_eq!(profile.values()[1], 10608.25);
    }

    #[test]
    fn test_nearest_trace_off_grid_matches_on_grid() {
        let volume = test_volume();
        let exact = volume.nearest_trace(104.0, 208.0, "p").unwrap();
        let near = volume.nearest_trace(104.9, 206.5, "p").unwrap();
        assert_eq!(exact, near);

        // far outside the survey clamps to the corner trace
        let corner = volume.nearest_trace(0.0, 1000.0, "p").unwrap();
        assert_eq!(corner.rows()[0].iline, 100);
        assert_eq!(corner.rows()[0].xline, 220);
    }

    #[test]
    fn test_sparse_grid_fills_nan() {
        let mut builder = SegyBuilder::new(2);
        builder.traces.push((1, 10, 0, 0, vec![1.0, 2.0]));
        builder.traces.push((2, 11, 0, 0, vec![3.0, 4.0]));
        builder.delay_ms = 100;
        let reader =
            SegyReader::from_bytes(Bytes::from(builder.build()), ByteLocations::petrel_3d()).unwrap();
        let volume = SeismicVolume::from_reader("s", "s.sgy", &reader).unwrap();

        assert_eq!(volume.shape(), (2, 2, 2));
        assert!(volume.data()[[0, 1, 0]].is_nan());
        assert_eq!(volume.sample_axis().coords, vec![100.0, 104.0]);

        let hole = volume.nearest_trace(1.0, 11.0, "s").unwrap();
        assert!(hole.values().iter().all(|v| v.is_nan()));
        assert!(hole.rows()[0].cdp_x.is_nan());
    }
}
