use clap::{Parser, Subcommand};
use langsheet::Config;
use langsheet_cli::{complete, generate, summary};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "langsheet.toml")]
    config: String,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate per-locale files straight from the sheet.
    #[command(alias = "g")]
    Generate,

    /// Fan the base locale out to the configured target languages.
    #[command(alias = "c")]
    Complete,

    /// Merge every platform's locale files into one grouped sheet.
    #[command(alias = "s")]
    Summary {
        /// Directory holding the per-platform trees
        #[arg(long)]
        base_dir: Option<String>,

        /// Output sheet path
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(error) = setup_logger(args.verbose) {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }

    if let Err(error) = run(args).await {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), String> {
    let config = Config::load(&args.config).map_err(|e| e.to_string())?;

    match args.command {
        Commands::Generate => generate::run(&config),
        Commands::Complete => complete::run(&config).await,
        Commands::Summary { base_dir, output } => summary::run(&config, base_dir, output).await,
    }
}

fn setup_logger(verbose: u8) -> Result<(), String> {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .map_err(|e| e.to_string())
}
