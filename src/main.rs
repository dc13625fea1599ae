use anyhow::{Context, Result};
use clap::Parser;
use clockskew::args::Args;
use clockskew::core::SignalFrame;
use clockskew::engine::Pipeline;
use clockskew::nodes::ChannelStats;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut pipeline = match &args.pipeline {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read pipeline file {}", path.display()))?;
            let document = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse pipeline file {}", path.display()))?;
            Pipeline::from_json(document)?
        }
        None => Pipeline::mismatch_chain(&args.mismatch_config()?, &args.spectrum_options())?,
    };

    let frame = pipeline.execute_once()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    } else {
        print_summary(&pipeline, &frame);
    }

    Ok(())
}

fn print_summary(pipeline: &Pipeline, frame: &SignalFrame) {
    println!("clockskew: {}", pipeline.stage_ids().join(" -> "));
    println!();

    let mut metadata: Vec<_> = frame.metadata.iter().collect();
    metadata.sort();
    for (key, value) in metadata {
        println!("  {:<20} {}", key, value);
    }

    println!();
    for stats in ChannelStats::for_frame(frame) {
        println!(
            "  {:<16} len={:<6} mean={:<12.4e} rms={:.4e}",
            stats.channel, stats.len, stats.mean, stats.rms
        );
    }
}
