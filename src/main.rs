use clap::Parser;

use log::{error, info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

use anno2obb::{Args, Converter};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let source = PathBuf::from(&args.source);
    let dest_dir = PathBuf::from(&args.dest_dir);
    let converter = Converter::from_args(&args);

    info!(
        "Converting {:?} annotations to {:?} at {}x{}...",
        converter.schema(),
        converter.format(),
        args.width,
        args.height
    );

    let outcome = if args.batch {
        converter.convert_batch(&source, &dest_dir)
    } else {
        converter.convert(&source, &dest_dir)
    };

    if !outcome.success {
        error!("Conversion failed.");
        return ExitCode::FAILURE;
    }

    if outcome.failures.is_empty() {
        info!("Conversion process completed successfully.");
    } else {
        warn!("Conversion completed with {} failures:", outcome.failures.len());
        for failure in &outcome.failures {
            warn!("  {}", failure);
        }
    }
    ExitCode::SUCCESS
}
