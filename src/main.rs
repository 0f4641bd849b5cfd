use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use satscope::config::{parse_minutes, Config};
use satscope::propagate::Window;
use satscope::report::{analyze_text, SatelliteReport};
use satscope::web::run_server;

#[derive(Parser)]
#[command(name = "satscope")]
#[command(about = "Element-set propagation and orbit analytics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Propagate every element set in a file and print summary metrics
    Analyze {
        tle_file: PathBuf,
        /// Window length, e.g. "90m" or "2h"
        #[arg(long, default_value = "2h")]
        window: String,
        /// Sampling step, whole minutes
        #[arg(long, default_value = "1m")]
        step: String,
        /// Window start (RFC3339), defaults to now
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// Print full reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the analytics API
    Serve {
        #[arg(long, default_value = "satscope.yaml")]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            tle_file,
            window,
            step,
            start,
            json,
        } => analyze(&tle_file, &window, &step, start, json),
        Commands::Serve { config } => serve(&config),
    }
}

fn analyze(
    path: &Path,
    window: &str,
    step: &str,
    start: Option<DateTime<Utc>>,
    json: bool,
) -> ExitCode {
    let text = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let window = match build_window(window, step, start.unwrap_or_else(Utc::now)) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Invalid window: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let reports = analyze_text(&text, &window);

    if json {
        return match serde_json::to_string_pretty(&reports) {
            Ok(out) => {
                println!("{}", out);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Serialization error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    println!(
        "{} element sets, {} minutes from {} every {} min",
        reports.len(),
        window.minutes,
        window.start,
        window.step_minutes
    );
    for report in &reports {
        print_report(report, window.sample_count());
    }
    ExitCode::SUCCESS
}

fn build_window(
    window: &str,
    step: &str,
    start: DateTime<Utc>,
) -> Result<Window, Box<dyn std::error::Error>> {
    let minutes = parse_minutes(window)?;
    let step = parse_minutes(step)?;
    Ok(Window::new(start, minutes).with_step(step)?.bounded()?)
}

fn print_report(report: &SatelliteReport, requested: usize) {
    println!(
        "  {}: {} [{}/{} samples] {}",
        report.record.index,
        report.record.name,
        report.series.len(),
        requested,
        report.summary
    );
    if !report.summary.is_defined() {
        println!("      no samples propagated");
        return;
    }
    if let Some(matrix) = &report.correlation {
        for line in matrix.to_string().lines() {
            println!("      {}", line);
        }
    }
}

fn serve(path: &Path) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
