use clap::Parser;
use elastokit_core::cli::{Cli, OutputFormat};
use elastokit_core::{
    measure_fat_fraction, CaseMeasurer, CaseReport, ContrastMeasurement, MeasureOptions,
    TextReport,
};
use log::error;
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let options = MeasureOptions {
        temp_dir: cli.temp_dir.clone(),
        inversion_dir: cli.inversion_dir.clone(),
        exclude_negative_pixels: cli.exclude_negative_pixels,
    };

    let report = match CaseMeasurer::measure_with_options(&cli.digest, &options) {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to measure case: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let fat_fraction = if cli.fat_fraction {
        match measure_fat_fraction(&cli.digest) {
            Ok(measurement) => Some(measurement),
            Err(e) => {
                error!("Failed to measure fat fraction: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    } else {
        None
    };

    output_report(&report, fat_fraction, cli.format);
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

fn output_report(
    report: &CaseReport,
    fat_fraction: Option<Option<ContrastMeasurement>>,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Text => {
            let mut text = TextReport::new(report);
            if let Some(measurement) = fat_fraction {
                text = text.with_fat_fraction(measurement);
            }
            println!("{}", text);
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match output_json(report, fat_fraction) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
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
    report: &CaseReport,
    fat_fraction: Option<Option<ContrastMeasurement>>,
) -> Result<String, serde_json::Error> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct CaseJson<'a> {
        report: &'a CaseReport,
        #[serde(skip_serializing_if = "Option::is_none")]
        fat_fraction: Option<Option<ContrastMeasurement>>,
    }

    serde_json::to_string_pretty(&CaseJson {
        report,
        fat_fraction,
    })
}
