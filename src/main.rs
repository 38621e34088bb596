use std::time::{Duration, Instant};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use doomsday_fuel::{solve, SAMPLE_CHAINS};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut total = Duration::default();
    for (i, &chain) in SAMPLE_CHAINS.iter().enumerate() {
        total += execute_chain(i + 1, chain)?;
    }
    println!("Total processing time: {}", format_duration(total));
    Ok(())
}

fn format_duration(dur: Duration) -> String {
    if dur.as_millis() != 0 {
        format!("{} ms", dur.as_millis())
    } else {
        format!("{} us", dur.as_micros())
    }
}

fn execute_chain(n: usize, chain: &[&[u32]]) -> Result<Duration> {
    println!("Chain {} ({} states):", n, chain.len());

    let start = Instant::now();
    let answer = solve(chain)?;
    let elapsed = start.elapsed();

    println!("  Answer: {:?}", answer);
    println!("  Finished in {}", format_duration(elapsed));
    println!("---------------------");
    Ok(elapsed)
}
