use clap::{Parser, Subcommand};
use colcalc::cli;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "colcalc")]
#[command(about = "Add one derived column to a table: sums, differences, ratios, percents.")]
#[command(long_about = "colcalc - Derived-column calculator

Applies one arithmetic operation to the columns of a table and appends the
result as a new column. Saved parameters of any schema age are migrated
before evaluation.

COMMANDS:
  calculate   - Evaluate an operation and add the result column
  migrate     - Upgrade saved parameters to the current schema
  operations  - List supported operations

EXAMPLES:
  colcalc calculate table.yaml --params params.json
  colcalc calculate table.yaml -p params.json -o result.yaml
  colcalc migrate old_params.json")]
#[command(version)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Evaluate one operation over a table.

TABLE FORMAT (YAML):
  columns:
    - name: revenue
      type: number          # number | text | datetime
      format: \"{:,.2f}\"     # optional display format
      values: [1000, 1200, null]

PARAMETERS (JSON or YAML, any schema age):
  {\"operation\": \"add\", \"colnames\": [\"a\", \"b\"], \"outcolname\": \"\"}

If required parameters are missing, the table is returned unchanged.
Without --output the resulting table is printed to stdout.")]
    /// Evaluate an operation and add the result column
    Calculate {
        /// Path to the table YAML file
        table: PathBuf,

        /// Path to saved parameters (JSON or YAML)
        #[arg(short, long)]
        params: PathBuf,

        /// Write the resulting table here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Host settings YAML (column-name limit, message locale)
        #[arg(short, long, env = "COLCALC_SETTINGS")]
        settings: Option<PathBuf>,
    },

    /// Upgrade saved parameters to the current schema and print them as JSON
    Migrate {
        /// Path to saved parameters (JSON or YAML)
        params: PathBuf,
    },

    /// List supported operations
    Operations,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "colcalc=debug" } else { "colcalc=warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (result, settings) = match cli.command {
        Commands::Calculate {
            table,
            params,
            output,
            settings,
        } => (cli::calculate(table, params, output, settings.clone()), settings),

        Commands::Migrate { params } => (cli::migrate(params), None),

        Commands::Operations => (cli::operations(), None),
    };

    // Errors are reported once, through the message catalog
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            cli::report_error(&e, settings.as_deref());
            ExitCode::FAILURE
        }
    }
}
