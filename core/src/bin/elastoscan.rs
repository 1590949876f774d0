use clap::{Parser, ValueEnum};
use elastokit_core::{run_case, scan_datasets, DatasetScan, InversionOutcome, ScanMode};
use log::info;
use std::fmt;
use std::path::PathBuf;
use std::process;

/// CLI tool for finding 3D MRE datasets and supervising their inversion
#[derive(Parser, Debug)]
#[command(name = "elastoscan")]
#[command(about = "Find 3D MRE series in a case directory and run the external inversion")]
#[command(version)]
struct Cli {
    /// Case directory to scan
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Read every file in each series folder instead of sampling one
    #[arg(long)]
    careful: bool,

    /// Inversion executable to run on each discovered series
    #[arg(long, value_name = "EXE")]
    exe: Option<PathBuf>,

    /// Directory receiving per-series inversion outputs (defaults to <DIRECTORY>/3dmmdi)
    #[arg(long, value_name = "DIR")]
    inversion_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    if !cli.directory.is_dir() {
        eprintln!("Error: {} is not a directory", cli.directory.display());
        process::exit(1);
    }

    let mode = if cli.careful {
        ScanMode::Careful
    } else {
        ScanMode::Rapid
    };

    info!("Scanning {} for 3D MRE datasets", cli.directory.display());

    let scan = match scan_datasets(&cli.directory, mode) {
        Ok(scan) => scan,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let outcome = cli.exe.as_deref().map(|exe| {
        let inversion_dir = cli
            .inversion_dir
            .clone()
            .unwrap_or_else(|| cli.directory.join("3dmmdi"));
        run_case(exe, &scan, &inversion_dir)
    });

    output_scan(&scan, outcome.as_ref(), cli.format);
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn output_scan(scan: &DatasetScan, outcome: Option<&InversionOutcome>, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            let report = ScanReport::new(scan, outcome);
            println!("{}", report);
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match output_json(scan, outcome) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}

#[cfg(feature = "json")]
fn output_json(
    scan: &DatasetScan,
    outcome: Option<&InversionOutcome>,
) -> Result<String, serde_json::Error> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct ScanJson<'a> {
        scan: &'a DatasetScan,
        #[serde(skip_serializing_if = "Option::is_none")]
        inversion: Option<&'a InversionOutcome>,
    }

    serde_json::to_string_pretty(&ScanJson {
        scan,
        inversion: outcome,
    })
}

/// Text report for a dataset scan and optional inversion outcome
struct ScanReport<'a> {
    scan: &'a DatasetScan,
    outcome: Option<&'a InversionOutcome>,
}

impl<'a> ScanReport<'a> {
    fn new(scan: &'a DatasetScan, outcome: Option<&'a InversionOutcome>) -> Self {
        Self { scan, outcome }
    }
}

impl<'a> fmt::Display for ScanReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "3D MRE Datasets")?;
        writeln!(f, "===============")?;
        writeln!(f)?;
        writeln!(f, "Directory:      {}", self.scan.top_dir.display())?;
        writeln!(f, "Manufacturer:   {}", self.scan.manufacturer.simple_name())?;
        writeln!(f, "Datasets:       {}", self.scan.entries.len())?;

        for entry in &self.scan.entries {
            write!(f, "  mag {}", entry.mag.as_deref().unwrap_or("none"))?;
            if let Some(series) = entry.mag_series {
                write!(f, " (series {})", series)?;
            }
            if let Some(phase) = entry.phase.as_deref() {
                write!(f, ", phase {}", phase)?;
                if let Some(series) = entry.phase_series {
                    write!(f, " (series {})", series)?;
                }
            }
            writeln!(f)?;
        }

        if let Some(outcome) = self.outcome {
            writeln!(f)?;
            writeln!(f, "Inversion")?;
            writeln!(f, "---------")?;
            writeln!(f, "Completed: {}", outcome.completed.len())?;
            for dir in &outcome.completed {
                writeln!(f, "  {}", dir.display())?;
            }
            writeln!(f, "Failed: {}", outcome.failed.len())?;
            for label in &outcome.failed {
                writeln!(f, "  {}", label)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elastokit_core::{DatasetEntry, Manufacturer};

    #[test]
    fn test_scan_report_format() {
        let mut scan = DatasetScan::new("/data/case");
        scan.manufacturer = Manufacturer::Siemens;
        let mut entry = DatasetEntry::with_mag("4", 12);
        entry.phase = Some("5".to_string());
        entry.phase_series = Some(13);
        scan.entries.push(entry);

        let output = format!("{}", ScanReport::new(&scan, None));

        assert!(output.contains("3D MRE Datasets"));
        assert!(output.contains("Directory:      /data/case"));
        assert!(output.contains("Manufacturer:   Siemens"));
        assert!(output.contains("Datasets:       1"));
        assert!(output.contains("  mag 4 (series 12), phase 5 (series 13)"));
        assert!(!output.contains("Inversion"));
    }

    #[test]
    fn test_scan_report_mag_only_entry() {
        let mut scan = DatasetScan::new("/data/case");
        scan.manufacturer = Manufacturer::Ge;
        scan.entries.push(DatasetEntry::with_mag("800", 3));

        let output = format!("{}", ScanReport::new(&scan, None));

        assert!(output.contains("Manufacturer:   GE"));
        assert!(output.contains("  mag 800 (series 3)\n"));
        assert!(!output.contains("phase"));
    }

    #[test]
    fn test_scan_report_with_outcome() {
        let scan = DatasetScan::new("/data/case");
        let outcome = InversionOutcome {
            completed: vec![PathBuf::from("/data/case/3dmmdi/12")],
            failed: vec!["8".to_string()],
        };

        let output = format!("{}", ScanReport::new(&scan, Some(&outcome)));

        assert!(output.contains("Inversion"));
        assert!(output.contains("Completed: 1"));
        assert!(output.contains("  /data/case/3dmmdi/12"));
        assert!(output.contains("Failed: 1"));
        assert!(output.contains("  8"));
    }
}
