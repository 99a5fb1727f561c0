//! Example: Slice SEG-Y volumes at a well and resample the well log
//!
//! Run with: cargo run --example extract_well_trace [SEGY_DIR ILINE XLINE]
//!
//! Without arguments a small synthetic survey is written to a temp directory.

use std::path::{Path, PathBuf};
use welltrace::{ExtractorConfig, LogValue, ParseErrorPolicy, VolumeSliceExtractor, WellLogTable};

/// Write a tiny IEEE-float SEG-Y cube with Petrel-style trace headers
fn write_synthetic_cube(path: &Path, offset: f32) -> std::io::Result<()> {
    let (ilines, xlines, samples) = (1000i32..1010, 2000i32..2010, 50usize);

    let mut out = vec![b' '; 3200];
    out[..24].copy_from_slice(b"C 1 SYNTHETIC WELLTRACE ");
    let mut binary = vec![0u8; 400];
    binary[16..18].copy_from_slice(&4000u16.to_be_bytes());
    binary[20..22].copy_from_slice(&(samples as u16).to_be_bytes());
    binary[24..26].copy_from_slice(&5i16.to_be_bytes());
    out.extend_from_slice(&binary);

    for il in ilines {
        for xl in xlines.clone() {
            let mut header = vec![0u8; 240];
            header[4..8].copy_from_slice(&il.to_be_bytes());
            header[20..24].copy_from_slice(&xl.to_be_bytes());
            header[72..76].copy_from_slice(&(il * 25).to_be_bytes());
            header[76..80].copy_from_slice(&(xl * 25).to_be_bytes());
            out.extend_from_slice(&header);
            for k in 0..samples {
                let v = offset + (k as f32 * 0.3).sin() * 1000.0 + (il - 1000) as f32;
                out.extend_from_slice(&v.to_be_bytes());
            }
        }
    }

    std::fs::write(path, out)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("welltrace Example: Extract Well Trace");
    println!("=====================================\n");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let temp_dir = tempfile::tempdir()?;

    let (source_dir, iline, xline): (PathBuf, f64, f64) = match args.as_slice() {
        [dir, il, xl] => (PathBuf::from(dir), il.parse()?, xl.parse()?),
        _ => {
            let dir = temp_dir.path().join("seismic");
            std::fs::create_dir_all(&dir)?;
            write_synthetic_cube(&dir.join("ai.sgy"), 6000.0)?;
            write_synthetic_cube(&dir.join("vp.sgy"), 3000.0)?;
            println!("Synthetic survey written to {}", dir.display());
            (dir, 1004.6, 2007.2)
        }
    };

    let config = ExtractorConfig::new(&source_dir, iline, xline)
        .with_column_rename("ai_F02", "AI")
        .with_parse_error_policy(ParseErrorPolicy::Skip);
    let mut extractor = VolumeSliceExtractor::new(config)?;

    let loaded = extractor.discover_and_load()?;
    println!("Loaded volumes: {:?}", loaded.loaded);
    for failure in &loaded.failures {
        println!("  skipped {}: {}", failure.path.display(), failure.error);
    }
    for id in &loaded.loaded {
        if let Some(volume) = extractor.volume(id) {
            println!("  {}", volume.summary());
        }
    }
    println!();

    let processed = extractor.process()?;
    println!("Profiles at iline {} xline {}:", iline, xline);
    for name in extractor.list_processed() {
        if let Some(profile) = extractor.results().get(name) {
            let first = profile.rows()[0];
            println!(
                "  {} -> {} samples, snapped to ({}, {}), columns {:?}",
                name,
                profile.len(),
                first.iline,
                first.xline,
                profile.columns()
            );
        }
    }
    if !processed.missing.is_empty() {
        println!("  missing: {:?}", processed.missing);
    }

    let out_dir = temp_dir.path().join("profiles");
    let report = extractor.export_all(&out_dir)?;
    println!("\n{} CSV files written to {}", report.written.len(), out_dir.display());

    // Resample a synthetic well log onto 2 ms TWT bins
    let twt: Vec<LogValue> = (0..200).map(|i| LogValue::from(1000.0 + i as f64 * 0.37)).collect();
    let md: Vec<LogValue> = (0..200).map(|i| LogValue::from(1500.0 + i as f64 * 0.5)).collect();
    let gamma: Vec<LogValue> = (0..200)
        .map(|i| if i % 25 == 0 { LogValue::from("n/a") } else { LogValue::from(40.0 + (i % 30) as f64) })
        .collect();
    let facies: Vec<LogValue> = (0..200).map(|i| LogValue::from((i / 50) as f64)).collect();
    let log = WellLogTable::from_columns([
        ("TWT", twt),
        ("MD", md),
        ("Gamma", gamma),
        ("General discrete", facies),
    ])?;

    let resampled = welltrace::resample(&log, 2.0)?;
    let log_path = temp_dir.path().join("well_F02_resampled.csv");
    resampled.write_csv_path(&log_path)?;
    println!("\nWell log: {} rows -> {} bins of 2 ms", log.len(), resampled.len());
    for row in resampled.rows().iter().take(3) {
        println!(
            "  TWT {:.1}  MD {:.2}  Gamma {:.2}  facies {:?}",
            row.twt, row.md, row.gamma, row.general_discrete
        );
    }

    println!("\n✓ Example completed successfully");
    Ok(())
}
