//! MinDiff Command Line Interface
//!
//! A command-line interface for evaluating MinDiff losses and kernels on
//! batches of exported prediction scores.

use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use mindiff::api::{batch_kernel_matrix, evaluate_batch, LossReport};
use mindiff::core::{MinDiffError, Result};
use mindiff::{Batch, KernelKind, LossConfig, TransformConfig};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "mindiff")]
#[command(about = "MinDiff kernels and MMD loss for fairness regularization")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "MinDiff Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the MMD loss between the two subgroups of a batch
    Mmd(MmdArgs),
    /// Print the pairwise kernel matrix of a batch's predictions
    Kernel(KernelArgs),
    /// Write a default loss configuration file
    Config(ConfigArgs),
}

#[derive(Args)]
struct MmdArgs {
    /// Batch file (CSV: membership,prediction[,weight])
    #[arg(long)]
    data: PathBuf,

    /// Loss configuration file (JSON); flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Kernel: gauss or laplace
    #[arg(short, long)]
    kernel: Option<String>,

    /// Kernel length (width)
    #[arg(short = 'l', long)]
    kernel_length: Option<f64>,

    /// Clip predictions to MIN,MAX before the kernel
    #[arg(long, value_parser = parse_clip, conflicts_with = "sigmoid")]
    clip: Option<(f64, f64)>,

    /// Apply a sigmoid to predictions before the kernel
    #[arg(long)]
    sigmoid: bool,

    /// Also print the gradient with respect to each prediction
    #[arg(long)]
    gradient: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct KernelArgs {
    /// Batch file (CSV: membership,prediction[,weight])
    #[arg(long)]
    data: PathBuf,

    /// Kernel: gauss or laplace
    #[arg(short, long, default_value = "gauss")]
    kernel: String,

    /// Kernel length (width)
    #[arg(short = 'l', long, default_value = "0.1")]
    kernel_length: f64,
}

#[derive(Args)]
struct ConfigArgs {
    /// Output configuration file
    #[arg(short, long)]
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Mmd(args) => mmd_command(args),
        Commands::Kernel(args) => kernel_command(args),
        Commands::Config(args) => config_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn mmd_command(args: MmdArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {path:?}");
            LossConfig::load_from_file(path)?
        }
        None => LossConfig::default(),
    };

    if let Some(kernel) = &args.kernel {
        config.kernel = kernel.clone();
    }
    if let Some(kernel_length) = args.kernel_length {
        config.kernel_length = kernel_length;
    }
    if let Some((min, max)) = args.clip {
        config.transform = TransformConfig::Clip { min, max };
    } else if args.sigmoid {
        config.transform = TransformConfig::Sigmoid;
    }

    info!(
        "Parameters: kernel={}, kernel_length={}, transform={:?}",
        config.kernel, config.kernel_length, config.transform
    );

    let batch = Batch::from_file(&args.data)?;
    let report = evaluate_batch(&batch, &config, args.gradient)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| MinDiffError::SerializationError(e.to_string()))?;
        println!("{json}");
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &LossReport) {
    println!("=== MMD Loss ===");
    println!("Name: {}", report.name);
    println!("Kernel: {} (length {})", report.kernel, report.kernel_length);
    println!(
        "Examples: {} ({} positive, {} negative)",
        report.n_examples, report.n_positive, report.n_negative
    );
    println!("Mean K(pos, pos): {:.6}", report.pos_pos_mean);
    println!("Mean K(neg, neg): {:.6}", report.neg_neg_mean);
    println!("Mean K(pos, neg): {:.6}", report.pos_neg_mean);
    println!("Loss: {:.6}", report.value);

    if let Some(gradient) = &report.gradient {
        println!("\nGradient:");
        for (i, g) in gradient.iter().enumerate() {
            println!("  {i} {g:.6}");
        }
    }
}

fn kernel_command(args: KernelArgs) -> Result<()> {
    let kernel = KernelKind::from_name_with_params(&args.kernel, args.kernel_length, true)?;
    info!("Using kernel: {kernel}");

    let batch = Batch::from_file(&args.data)?;
    let matrix = batch_kernel_matrix(&batch, &kernel)?;

    println!("# Kernel matrix for {} examples", batch.len());
    for row in matrix.rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.6}")).collect();
        println!("{}", line.join(" "));
    }

    Ok(())
}

fn config_command(args: ConfigArgs) -> Result<()> {
    let config = LossConfig::default();
    config.save_to_file(&args.output)?;
    info!("Configuration saved to: {:?}", args.output);
    config.print_summary();
    Ok(())
}

fn parse_clip(value: &str) -> std::result::Result<(f64, f64), String> {
    let (min, max) = value
        .split_once(',')
        .ok_or_else(|| format!("expected MIN,MAX, got: {value}"))?;
    let min = min
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid clip minimum: {e}"))?;
    let max = max
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid clip maximum: {e}"))?;
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clip() {
        assert_eq!(parse_clip("0,1").unwrap(), (0.0, 1.0));
        assert_eq!(parse_clip(" -0.5 , 2.5 ").unwrap(), (-0.5, 2.5));
        assert!(parse_clip("0").is_err());
        assert!(parse_clip("a,1").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
