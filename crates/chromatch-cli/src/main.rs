use chromatch_cli::{
    cmd_apply, cmd_solve, configure_threads, logging, CommandError, RunSettings, SolveArgs,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chromatch")]
#[command(
    version,
    about = "Match the colors of one image to another with a least-squares 3x3 matrix",
    long_about = None
)]
#[command(subcommand_negates_reqs = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    solve: SolveCli,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a saved matrix to an image
    Apply {
        /// Image to correct
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Matrix file written by --save-matrix (.json, .yml, .yaml)
        #[arg(value_name = "MATRIX")]
        matrix: PathBuf,

        /// Where to write the corrected image (.png, .tif, .jpg, .bmp, .tga)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct SolveCli {
    /// Image whose colors are mapped
    #[arg(value_name = "START", required = true)]
    start: Option<PathBuf>,

    /// Image whose colors are matched
    #[arg(value_name = "TARGET", required = true)]
    target: Option<PathBuf>,

    /// Write the corrected start image here; omit to only solve
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Save the fitted matrix (.json, .yml, .yaml)
    #[arg(long, value_name = "FILE")]
    save_matrix: Option<PathBuf>,
}

impl SolveCli {
    fn into_args(self) -> Result<SolveArgs, CommandError> {
        Ok(SolveArgs {
            start: self.start.ok_or(CommandError::MissingArgument("START"))?,
            target: self.target.ok_or(CommandError::MissingArgument("TARGET"))?,
            output: self.output,
            save_matrix: self.save_matrix,
        })
    }
}

#[derive(Args)]
struct GlobalArgs {
    /// Spread accumulation and application over multiple threads
    #[arg(long, global = true)]
    parallel: bool,

    /// Number of parallel threads
    #[arg(short = 'j', long, value_name = "N", global = true)]
    threads: Option<usize>,

    /// Config file (overrides CHROMATCH_CONFIG and the default locations)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress console output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    silent: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = logging::level_for(cli.global.verbose, cli.global.silent);
    if let Err(e) = logging::init(level) {
        eprintln!("Warning: failed to initialise logging: {}", e);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CommandError> {
    let handle = chromatch_core::config::init_config(cli.global.config.as_deref());
    chromatch_core::config::log_config_usage();

    if let Some(num_threads) = cli.global.threads {
        configure_threads(num_threads)?;
    }

    let settings = RunSettings::new(
        &handle.config.defaults,
        cli.global.parallel,
        cli.global.silent,
    );

    match cli.command {
        Some(Commands::Apply {
            input,
            matrix,
            output,
        }) => cmd_apply(&input, &matrix, &output, &settings).map(|_| ()),
        None => cmd_solve(&cli.solve.into_args()?, &settings).map(|_| ()),
    }
}
