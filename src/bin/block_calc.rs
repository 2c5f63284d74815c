//! Block height calculator
//!
//! Estimates the block height at a past date time from one known block,
//! assuming a fixed block interval.

use anyhow::Result;
use clap::Parser;
use lucky_mint::estimator::estimate_height_at_datetime;
use tracing::{info, Level};

#[derive(Debug, Parser)]
#[command(about = "Estimate the block height at a given date time")]
struct Args {
    /// Height of the reference block
    #[arg(long, default_value_t = 18_918_830)]
    known_height: u64,

    /// Time of the reference block, "%Y-%m-%d %H:%M:%S"
    #[arg(long, default_value = "2024-01-02 17:35:42")]
    known_time: String,

    /// Time to estimate the height at, same format and zone as --known-time
    #[arg(long, default_value = "2023-12-19 13:38:00")]
    target_time: String,

    /// Assumed seconds per block
    #[arg(long, default_value_t = 12.0)]
    seconds_per_block: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args = Args::parse();
    info!(
        "Known block {} at {}, {}s per block",
        args.known_height, args.known_time, args.seconds_per_block
    );

    let target_height = estimate_height_at_datetime(
        args.known_height,
        &args.known_time,
        &args.target_time,
        args.seconds_per_block,
    )?;

    println!("Target block height: {}", target_height);
    Ok(())
}
