//! Synthetic SEG-Y files for integration tests

use std::path::Path;
use welltrace::ByteLocations;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Encode an IEEE float as IBM System/360 single precision
pub fn f32_to_ibm(value: f32) -> u32 {
    if value == 0.0 {
        return 0;
    }
    let sign = if value < 0.0 { 0x8000_0000 } else { 0 };
    let mut mantissa = value.abs() as f64;
    let mut exponent = 64i32;
    while mantissa >= 1.0 {
        mantissa /= 16.0;
        exponent += 1;
    }
    while mantissa < 0.0625 {
        mantissa *= 16.0;
        exponent -= 1;
    }
    sign | ((exponent as u32) << 24) | ((mantissa * 16_777_216.0) as u32 & 0x00ff_ffff)
}

pub struct Cube {
    pub byte_locations: ByteLocations,
    pub format_code: i16,
    pub sample_interval_us: u16,
    pub samples: usize,
    pub extended_headers: i16,
    pub ebcdic: bool,
    pub ilines: Vec<i32>,
    pub xlines: Vec<i32>,
    /// Offset added to every sample so cubes can be told apart
    pub offset: f32,
}

impl Cube {
    pub fn new(ilines: Vec<i32>, xlines: Vec<i32>, samples: usize) -> Self {
        Self {
            byte_locations: ByteLocations::petrel_3d(),
            format_code: 5,
            sample_interval_us: 2000,
            samples,
            extended_headers: 0,
            ebcdic: false,
            ilines,
            xlines,
            offset: 0.0,
        }
    }

    pub fn value(&self, il: i32, xl: i32, k: usize) -> f32 {
        self.offset + il as f32 + xl as f32 / 1000.0 + k as f32
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut out = if self.ebcdic {
            // "C 1" in EBCDIC, padded with EBCDIC spaces
            let mut text = vec![0x40u8; 3200];
            text[..3].copy_from_slice(&[0xc3, 0x40, 0xf1]);
            text
        } else {
            let mut text = vec![b' '; 3200];
            text[..3].copy_from_slice(b"C 1");
            text
        };

        let mut binary = vec![0u8; 400];
        binary[16..18].copy_from_slice(&self.sample_interval_us.to_be_bytes());
        binary[20..22].copy_from_slice(&(self.samples as u16).to_be_bytes());
        binary[24..26].copy_from_slice(&self.format_code.to_be_bytes());
        binary[304..306].copy_from_slice(&self.extended_headers.to_be_bytes());
        out.extend_from_slice(&binary);
        for _ in 0..self.extended_headers.max(0) {
            out.extend_from_slice(&[b' '; 3200]);
        }

        let locs = self.byte_locations;
        for &il in &self.ilines {
            for &xl in &self.xlines {
                let mut header = vec![0u8; 240];
                header[locs.iline - 1..locs.iline + 3].copy_from_slice(&il.to_be_bytes());
                header[locs.xline - 1..locs.xline + 3].copy_from_slice(&xl.to_be_bytes());
                header[locs.cdp_x - 1..locs.cdp_x + 3].copy_from_slice(&(il * 1250).to_be_bytes());
                header[locs.cdp_y - 1..locs.cdp_y + 3].copy_from_slice(&(xl * 1250).to_be_bytes());
                // coordinates stored in centimetres
                header[70..72].copy_from_slice(&(-100i16).to_be_bytes());
                out.extend_from_slice(&header);

                for k in 0..self.samples {
                    let v = self.value(il, xl, k);
                    match self.format_code {
                        1 => out.extend_from_slice(&f32_to_ibm(v).to_be_bytes()),
                        5 => out.extend_from_slice(&v.to_be_bytes()),
                        other => panic!("test cube cannot encode format {}", other),
                    }
                }
            }
        }
        out
    }

    pub fn write(&self, path: &Path) {
        std::fs::write(path, self.bytes()).unwrap();
    }
}
