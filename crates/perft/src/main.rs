//! Perft harness - validates the move generator against known leaf counts.

mod report;
mod suite;

use anyhow::Context;
use chess_core::FenParser;
use chess_engine::{perft, perft_divide, Position};
use clap::{Parser, Subcommand};
use report::SuiteReport;
use std::path::PathBuf;
use std::time::Instant;
use suite::Suite;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "perft")]
#[command(about = "Move generator validation by leaf counting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every position of a suite and compare against expected counts
    Suite {
        /// Suite file (TOML); the built-in positions are used if it is missing
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Skip positions deeper than this
        #[arg(long)]
        max_depth: Option<u32>,
        /// Print the report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Count leaf nodes of one position
    Count {
        #[arg(long, default_value = FenParser::STARTPOS)]
        fen: String,
        #[arg(short, long)]
        depth: u32,
    },
    /// Per-root-move leaf counts of one position
    Divide {
        #[arg(long, default_value = FenParser::STARTPOS)]
        fen: String,
        #[arg(short, long)]
        depth: u32,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Suite {
            file,
            max_depth,
            json,
        } => run_suite(file, max_depth, json),
        Commands::Count { fen, depth } => {
            let position = Position::from_fen(&fen).context("invalid FEN")?;
            let started = Instant::now();
            let nodes = perft(&position, depth);
            tracing::info!("depth {} took {:?}", depth, started.elapsed());
            println!("{}", nodes);
            Ok(())
        }
        Commands::Divide { fen, depth } => {
            let position = Position::from_fen(&fen).context("invalid FEN")?;
            let results = perft_divide(&position, depth);
            let mut total = 0u64;
            for (mv, nodes) in &results {
                println!("{}: {}", mv, nodes);
                total += nodes;
            }
            println!();
            println!("Moves: {}", results.len());
            println!("Nodes: {}", total);
            Ok(())
        }
    }
}

fn run_suite(file: Option<PathBuf>, max_depth: Option<u32>, json: bool) -> anyhow::Result<()> {
    let path = file.unwrap_or_else(Suite::default_path);
    let suite = Suite::load(&path)?.with_max_depth(max_depth);
    let (cases, skipped) = suite.partition();

    let mut report = SuiteReport {
        skipped: skipped.iter().map(|c| c.name.clone()).collect(),
        ..SuiteReport::default()
    };
    for case in &skipped {
        tracing::info!("Skipping {} (depth {})", case.name, case.depth);
    }

    for case in cases {
        tracing::info!("Running {} at depth {}", case.name, case.depth);
        let result = case.run()?;
        if result.passed {
            tracing::info!(
                "{}: {} nodes in {}ms ({} nps)",
                result.name,
                result.nodes,
                result.elapsed_ms,
                result.nps
            );
        } else {
            tracing::error!(
                "{}: expected {} nodes, got {}",
                result.name,
                result.expected,
                result.nodes
            );
        }
        report.cases.push(result);
    }

    if json {
        println!("{}", report.to_json()?);
    }

    if !report.all_passed() {
        anyhow::bail!(
            "{} of {} positions failed",
            report.failures(),
            report.cases.len()
        );
    }
    tracing::info!("All {} positions passed", report.cases.len());
    Ok(())
}
