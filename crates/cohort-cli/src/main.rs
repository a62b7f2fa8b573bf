//! Command-line interface for the cohort balancer.
//!
//! Groups lab mice so that the average tumor sizes across the groups are as
//! close as possible: load the roster, plan the group sizes, solve the
//! assignment, and write the results workbook.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cohort_cli::{console, input, report, CliError};
use cohort_config::CohortConfig;
use cohort_core::{GroupPlan, Roster};
use cohort_solver::GroupingOptimizer;

#[derive(Debug, Parser)]
#[command(
    name = "cohort",
    version,
    about = "Group lab mice so that average tumor sizes match across groups"
)]
struct Cli {
    /// Input file (.xlsx or .csv) with one row per mouse.
    #[arg(short = 'i', long)]
    input_file: PathBuf,

    /// Directory where all output files are written.
    #[arg(short = 'o', long)]
    output_dir: PathBuf,

    /// Optional TOML configuration file; command-line flags override it.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Minimum number of mice per group.
    #[arg(short = 'g', long)]
    min_group_size: Option<usize>,

    /// Number of seconds the optimization may maximally run for.
    #[arg(short = 's', long)]
    max_seconds: Option<f64>,

    /// Save the optimization model as an .lp file.
    #[arg(short = 'm', long)]
    save_model: bool,

    /// Verbose logging.
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    console::print_banner();

    let mut config = match &cli.config {
        Some(path) => CohortConfig::load(path)?,
        None => CohortConfig::load("cohort.toml").unwrap_or_default(),
    };
    if let Some(min_group_size) = cli.min_group_size {
        config.min_group_size = min_group_size;
    }
    if let Some(max_seconds) = cli.max_seconds {
        config.time_limit_seconds = max_seconds;
    }
    if cli.save_model {
        config.save_model = true;
    }
    config.validate()?;

    if !cli.output_dir.is_dir() {
        return Err(CliError::OutputDirMissing(cli.output_dir));
    }

    console::print_configuration(&cli.input_file, &cli.output_dir, &config);

    let records = input::load_records(&cli.input_file, &config.input)?;
    let roster = Roster::new(records)?;
    tracing::info!(subjects = roster.len(), "roster loaded");

    let plan = GroupPlan::new(roster.len(), config.min_group_size)?;
    console::print_group_plan(&plan);

    let mut optimizer = GroupingOptimizer::new();
    if config.save_model {
        optimizer =
            optimizer.with_model_dump(cli.output_dir.join(&config.output.model_file_name));
    }

    println!(
        "Running optimization for up to {:.1} seconds, please wait...\n",
        config.time_limit_seconds
    );
    let outcome = optimizer.optimize(&roster, &plan, config.time_limit())?;
    console::print_outcome(&outcome);

    let workbook_path = cli.output_dir.join(&config.output.workbook_file_name);
    report::write_workbook(&workbook_path, &roster, &outcome)?;
    println!("Results saved to \"{}\".", workbook_path.display());

    println!("\n{}", "Done!".green().bold());
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("cohort_core=debug,cohort_solver=debug,cohort_cli=debug,cohort=debug")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("cohort_core=info,cohort_solver=info,cohort_cli=info,cohort=info")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
