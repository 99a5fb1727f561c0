//! Utility functions

use crate::error::{Result, WellTraceError};
use crate::types::SampleFormat;
use num_traits::Float;

/// Read a big-endian `i16` at a 0-based byte offset
pub fn read_i16_be(bytes: &[u8], offset: usize) -> Result<i16> {
    let raw = bytes
        .get(offset..offset + 2)
        .ok_or_else(|| out_of_range(offset, 2, bytes.len()))?;
    Ok(i16::from_be_bytes([raw[0], raw[1]]))
}

/// Read a big-endian `i32` at a 0-based byte offset
pub fn read_i32_be(bytes: &[u8], offset: usize) -> Result<i32> {
    let raw = bytes
        .get(offset..offset + 4)
        .ok_or_else(|| out_of_range(offset, 4, bytes.len()))?;
    Ok(i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn out_of_range(offset: usize, width: usize, len: usize) -> WellTraceError {
    WellTraceError::InvalidFormat(format!(
        "{} byte field at offset {} exceeds header of {} bytes",
        width, offset, len
    ))
}

/// Convert an IBM System/360 single precision float to IEEE
pub fn ibm_to_f32(bits: u32) -> f32 {
    let fraction = bits & 0x00ff_ffff;
    if fraction == 0 {
        return 0.0;
    }

    let sign = if bits >> 31 == 1 { -1.0 } else { 1.0 };
    let exponent = ((bits >> 24) & 0x7f) as i32 - 64;
    let mantissa = fraction as f64 / 16_777_216.0;
    (sign * mantissa * 16f64.powi(exponent)) as f32
}

/// Decode big-endian trace samples to `f32`
pub fn decode_samples(bytes: &[u8], format: SampleFormat) -> Result<Vec<f32>> {
    let width = format.size_in_bytes();
    if bytes.len() % width != 0 {
        return Err(WellTraceError::InvalidFormat(
            "Byte length not aligned with sample format size".to_string(),
        ));
    }

    let samples = bytes
        .chunks_exact(width)
        .map(|c| match format {
            SampleFormat::IbmF32 => ibm_to_f32(u32::from_be_bytes([c[0], c[1], c[2], c[3]])),
            SampleFormat::IeeeF32 => f32::from_be_bytes([c[0], c[1], c[2], c[3]]),
            SampleFormat::I32 => i32::from_be_bytes([c[0], c[1], c[2], c[3]]) as f32,
            SampleFormat::I16 => i16::from_be_bytes([c[0], c[1]]) as f32,
            SampleFormat::I8 => c[0] as i8 as f32,
        })
        .collect();

    Ok(samples)
}

/// Map one EBCDIC byte to its printable ASCII equivalent
fn ebcdic_to_ascii(byte: u8) -> char {
    match byte {
        0x40 => ' ',
        0x4b => '.',
        0x4c => '<',
        0x4d => '(',
        0x4e => '+',
        0x50 => '&',
        0x5b => '$',
        0x5c => '*',
        0x5d => ')',
        0x5e => ';',
        0x60 => '-',
        0x61 => '/',
        0x6b => ',',
        0x6c => '%',
        0x6d => '_',
        0x6e => '>',
        0x6f => '?',
        0x7a => ':',
        0x7b => '#',
        0x7c => '@',
        0x7d => '\'',
        0x7e => '=',
        0x7f => '"',
        0x81..=0x89 => (b'a' + (byte - 0x81)) as char,
        0x91..=0x99 => (b'j' + (byte - 0x91)) as char,
        0xa2..=0xa9 => (b's' + (byte - 0xa2)) as char,
        0xc1..=0xc9 => (b'A' + (byte - 0xc1)) as char,
        0xd1..=0xd9 => (b'J' + (byte - 0xd1)) as char,
        0xe2..=0xe9 => (b'S' + (byte - 0xe2)) as char,
        0xf0..=0xf9 => (b'0' + (byte - 0xf0)) as char,
        _ => ' ',
    }
}

/// Decode a textual file header into 80-column card lines
///
/// Headers starting with EBCDIC `C` (0xC3) are transcoded, anything else is
/// read as ASCII.
pub fn decode_text_header(bytes: &[u8]) -> Vec<String> {
    let ebcdic = bytes.first() == Some(&0xc3);
    bytes
        .chunks(80)
        .map(|card| {
            let line: String = if ebcdic {
                card.iter().map(|&b| ebcdic_to_ascii(b)).collect()
            } else {
                card.iter()
                    .map(|&b| if b.is_ascii_graphic() { b as char } else { ' ' })
                    .collect()
            };
            line.trim_end().to_string()
        })
        .collect()
}

/// Mean of the non-NaN values, NaN when there are none
pub fn nan_mean<T, I>(values: I) -> T
where
    T: Float,
    I: IntoIterator<Item = T>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((T::zero(), T::zero()), |(sum, count), v| (sum + v, count + T::one()));

    if count == T::zero() {
        T::nan()
    } else {
        sum / count
    }
}

/// Format byte size in human-readable form
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}
