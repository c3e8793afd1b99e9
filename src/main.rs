mod cli;
mod emit;
mod error;
mod file_processing;
mod join;
mod pipeline;
mod records;
mod resample;
mod utils;
mod window;

use anyhow::Context;

/// Main entry point of the application.
///
/// 1. Parses the five positional arguments.
/// 2. Loads and joins the transfer and timestamp lists.
/// 3. Partitions the transfers into fixed-width time chunks.
/// 4. Writes the chunk files and the chunk map.
/// 5. Prints the number of chunks on stdout.
///
/// Logs go to stderr (`RUST_LOG` overrides the default `info` level).
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let total_start = std::time::Instant::now();
    let args = cli::Args::parse();
    let config = args.into_config();
    log::info!(
        "Chunking {} with width {}",
        config.transfers.display(),
        config.width
    );

    let chunk_count = pipeline::run(&config).with_context(|| {
        format!(
            "failed to chunk {} using {}",
            config.transfers.display(),
            config.timestamps.display()
        )
    })?;

    log::info!(
        "Wrote {} chunks in {:.3} seconds",
        chunk_count,
        total_start.elapsed().as_secs_f64()
    );
    println!("{}", chunk_count);
    Ok(())
}
