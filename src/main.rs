use clap::{Parser, Subcommand};
use recidx::analyze::{Action, DumpAction, ExplodeAction, ImplodeAction, PatchAction};
use recidx::render::DisplayOptions;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recidx", about = "Inspect and transform indexed record container files")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print record counts, sizes, hex, or text for a range of records
    Dump {
        /// The container file to analyze
        input: PathBuf,
        /// Show Record=<n> before each record, or the bare selected-record
        /// count when no other display option is given
        #[arg(short, long)]
        counts: bool,
        /// Show Size=<n> before each record
        #[arg(short, long)]
        sizes: bool,
        /// Output record contents in hex, 16 bytes per row
        #[arg(short, long)]
        binary: bool,
        /// Decode records as UTF-8; with -b, adds a printable-ASCII column
        #[arg(short, long)]
        text: bool,
        /// Also process the file's metadata, if present
        #[arg(short, long)]
        metadata: bool,
        /// Zero-based lowest record number to process (must be >= 0)
        #[arg(short, long, allow_negative_numbers = true)]
        lower: Option<i64>,
        /// Zero-based highest record number to process (must be >= -1;
        /// -1 means no upper bound)
        #[arg(short, long, allow_negative_numbers = true)]
        upper: Option<i64>,
    },
    /// Write each record to a separate file in a directory
    Explode {
        input: PathBuf,
        directory: PathBuf,
        /// Name the output files <n>.txt instead of <n>
        #[arg(short, long)]
        text: bool,
        /// Also write the metadata, if present
        #[arg(short, long)]
        metadata: bool,
        #[arg(short, long, allow_negative_numbers = true)]
        lower: Option<i64>,
        #[arg(short, long, allow_negative_numbers = true)]
        upper: Option<i64>,
    },
    /// Build a container from a directory of numbered record files
    Implode {
        directory: PathBuf,
        /// Header string for the new container
        #[arg(long)]
        header: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Strip one layer of UTF-8 double-encoding from every record
    Patch {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long, allow_negative_numbers = true)]
        lower: Option<i64>,
        #[arg(short, long, allow_negative_numbers = true)]
        upper: Option<i64>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help/version requests land here too; only real parse failures
            // are configuration errors.
            let is_error = err.use_stderr();
            let _ = err.print();
            process::exit(if is_error { 1 } else { 0 });
        }
    };

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let action = match build_action(cli.command) {
        Ok(action) => action,
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    if let Err(err) = recidx::analyze::run(&action, &mut stdout.lock()) {
        eprintln!("{err}");
        process::exit(2);
    }
}

/// Validate the numeric bounds and fold the parsed arguments into an
/// [`Action`].  Everything rejected here is a configuration error (exit 1),
/// before any container is opened.
fn build_action(command: Commands) -> Result<Action, String> {
    match command {
        Commands::Dump { input, counts, sizes, binary, text, metadata, lower, upper } => {
            let options = DisplayOptions { counts, sizes, binary, text };
            if options.count_only() && metadata {
                return Err(
                    "--metadata cannot be combined with --counts unless -s, -b, or -t \
                     is also given"
                        .to_string(),
                );
            }
            let (lower, upper) = bounds(lower, upper)?;
            Ok(Action::Dump(DumpAction { input, options, metadata, lower, upper }))
        }
        Commands::Explode { input, directory, text, metadata, lower, upper } => {
            let (lower, upper) = bounds(lower, upper)?;
            Ok(Action::Explode(ExplodeAction {
                input,
                directory,
                text,
                metadata,
                lower,
                upper,
            }))
        }
        Commands::Implode { directory, header, output } => {
            Ok(Action::Implode(ImplodeAction { directory, header, output }))
        }
        Commands::Patch { input, output, lower, upper } => {
            let (lower, upper) = bounds(lower, upper)?;
            Ok(Action::Patch(PatchAction { input, output, lower, upper }))
        }
    }
}

/// `lower` must be >= 0; `upper` must be >= -1, where -1 means "no upper
/// bound".  The core only sees validated `Option<u64>` bounds and clamps
/// them against the actual record count.
fn bounds(lower: Option<i64>, upper: Option<i64>) -> Result<(Option<u64>, Option<u64>), String> {
    let lower = match lower {
        Some(lower) if lower < 0 => {
            return Err(format!("Lower bound must be >= 0, but {lower} was given"))
        }
        Some(lower) => Some(lower as u64),
        None => None,
    };
    let upper = match upper {
        Some(upper) if upper < -1 => {
            return Err(format!("Upper bound must be >= -1, but {upper} was given"))
        }
        Some(-1) => None,
        Some(upper) => Some(upper as u64),
        None => None,
    };
    Ok((lower, upper))
}
