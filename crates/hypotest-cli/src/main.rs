//! hypotest - run statistical hypothesis tests on CSV data
//!
//! Usage:
//!   hypotest tests                                        # List supported tests
//!   hypotest preview data.csv --rows 10                   # First rows and column summary
//!   hypotest run data.csv --test two-sample --columns A,B # Welch t-test of A vs B
//!   hypotest run data.csv --test anova --columns y --group g
//!   hypotest run data.csv --test two-way-anova --columns y --group a --group b --format json

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod loader;
mod output;

use commands::{list, preview, run, OutputFormat};

/// hypotest - Statistical hypothesis testing for tabular data
#[derive(Parser)]
#[command(name = "hypotest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (info-level logs on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Debug output (debug-level logs on stderr)
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported tests and their column requirements
    Tests {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show the first rows and a per-column summary of a CSV file
    Preview {
        /// CSV file with a header row
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value_t = 5)]
        rows: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Run a hypothesis test
    Run {
        /// CSV file with a header row
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Test to run (name or slug, see `hypotest tests`)
        #[arg(short, long)]
        test: String,

        /// Operand columns, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        columns: Vec<String>,

        /// Grouping column (repeat for two-way ANOVA)
        #[arg(short, long)]
        group: Vec<String>,

        /// Hypothesized mean for the one-sample test (default 0)
        #[arg(long, allow_hyphen_values = true)]
        mean: Option<f64>,

        /// Significance level
        #[arg(short, long, default_value_t = 0.05)]
        alpha: f64,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Engine configuration file (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Use Student's pooled-variance two-sample test instead of Welch's
        #[arg(long)]
        equal_var: bool,

        /// Disable the Yates continuity correction for 2x2 tables
        #[arg(long)]
        no_yates: bool,
    },
}

fn init_tracing(verbose: bool, debug: bool) {
    let filter_layer = if debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else if verbose {
        tracing_subscriber::EnvFilter::new("info")
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.debug);

    let result = match cli.command {
        Commands::Tests { format } => list::run(format),
        Commands::Preview { file, rows, format } => preview::run(&file, rows, format),
        Commands::Run {
            file,
            test,
            columns,
            group,
            mean,
            alpha,
            format,
            config,
            equal_var,
            no_yates,
        } => run::run(&run::RunArgs {
            file,
            test,
            columns,
            groups: group,
            mean,
            alpha,
            format,
            config,
            equal_var,
            no_yates,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
