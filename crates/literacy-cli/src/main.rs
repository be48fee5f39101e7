use clap::{Parser, Subcommand};

mod commands;
mod logging;

use logging::LogFormat;

#[derive(Parser)]
#[command(name = "literacy-cli", version, about = "Literacy assessment CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Human, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a stored value and print its report
    Decode(commands::decode::DecodeArgs),
    /// Format seconds the way the timer displays them
    FormatTime {
        seconds: u64,
    },
    /// Drive a session through a sequence of steps
    Replay(commands::replay::ReplayArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format, cli.verbose);

    let result = match cli.command {
        Commands::Decode(args) => commands::decode::run(args),
        Commands::FormatTime { seconds } => {
            println!("{}", literacy_core::format_time(seconds));
            Ok(())
        }
        Commands::Replay(args) => commands::replay::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
