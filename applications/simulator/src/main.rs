/// Airwaves Simulator - command-stream playback simulator
use std::fs;
use std::path::PathBuf;

use airwaves_simulator::{CommandInput, LibraryInput, Simulator};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "airwaves-sim")]
#[command(about = "Replay a timestamped command stream against a music library", long_about = None)]
struct Cli {
    /// Library file (users, songs, podcasts, albums)
    #[arg(short, long)]
    library: PathBuf,

    /// Command stream file
    #[arg(short, long)]
    commands: PathBuf,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airwaves=info,airwaves_simulator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let library: LibraryInput = serde_json::from_str(
        &fs::read_to_string(&cli.library)
            .with_context(|| format!("reading library file {}", cli.library.display()))?,
    )
    .context("parsing library file")?;

    let commands: Vec<CommandInput> = serde_json::from_str(
        &fs::read_to_string(&cli.commands)
            .with_context(|| format!("reading command file {}", cli.commands.display()))?,
    )
    .context("parsing command file")?;

    tracing::info!(commands = commands.len(), "replaying command stream");

    let mut simulator = Simulator::from_library(library)?;
    let outputs = simulator.run(commands);

    let rendered = serde_json::to_string_pretty(&outputs)?;
    match cli.output {
        Some(path) => fs::write(&path, rendered)
            .with_context(|| format!("writing output file {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}
