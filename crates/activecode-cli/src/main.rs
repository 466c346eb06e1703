mod commands;

use std::path::PathBuf;

use activecode::platform::cli::DEFAULT_INTERPRETER;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "activecode")]
#[command(about = "Build and run ActiveCode render documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Widget configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the self-contained HTML document for a program
    Build {
        /// Python program
        program: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a program in an interpreter process and show its result panel
    Run {
        /// Python program
        program: PathBuf,

        /// Interpreter executable
        #[arg(long, default_value = DEFAULT_INTERPRETER)]
        python: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Build { program, output } => {
            commands::build::run(&config, &program, output.as_deref())?;
        }

        Commands::Run { program, python } => {
            commands::run::run(&config, &program, &python)?;
        }
    }

    Ok(())
}
