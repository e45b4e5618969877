use anyhow::Result;
use clap::{Parser, Subcommand};
use nastape_cli::{commands, parse_address};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "nastape")]
#[command(about = "Nastape - Verify and splice NASCOM cassette tape captures", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a capture and write a cleaned copy when it is complete
    Verify {
        /// Capture to check ("-" for stdin)
        input: String,

        /// Output file; when given, partial captures are written too
        output: Option<String>,
    },

    /// Scan a capture and report recovered blocks
    Scan {
        /// Input file to scan
        #[arg(short, long)]
        input: String,

        /// Output JSON file for recovered blocks
        #[arg(short, long)]
        output: Option<String>,

        /// Show statistics only
        #[arg(long)]
        stats_only: bool,
    },

    /// Pack a binary program into a tape capture
    Pack {
        /// Binary program image
        #[arg(short, long)]
        input: String,

        /// Output tape capture
        #[arg(short, long)]
        output: String,

        /// Load address in hex
        #[arg(short, long, value_parser = parse_address, default_value = "1000")]
        load_address: u16,
    },

    /// Merge partial captures of one tape, in order, into a single file
    Splice {
        /// Captures, the one holding the pilot tone first
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output tape capture
        #[arg(short, long)]
        output: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Verify { input, output } => {
            commands::verify::execute(&input, output.as_deref()).map(|_| ())
        }

        Commands::Scan {
            input,
            output,
            stats_only,
        } => commands::scan::execute(&input, output.as_deref(), stats_only),

        Commands::Pack {
            input,
            output,
            load_address,
        } => commands::pack::execute(&input, &output, load_address),

        Commands::Splice { inputs, output } => {
            commands::splice::execute(&inputs, &output).map(|_| ())
        }
    }
}
