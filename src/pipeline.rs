use crate::emit;
use crate::error::Result;
use crate::file_processing;
use crate::join;
use crate::records;
use crate::resample;
use crate::window::WindowWidth;

/// Inputs and outputs of one chunking run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub transfers: std::path::PathBuf,
    pub timestamps: std::path::PathBuf,
    pub chunk_base: std::path::PathBuf,
    pub index: std::path::PathBuf,
    pub width: WindowWidth,
}

/// Runs load → join → partition → emit and returns the number of chunks.
///
/// Both inputs are fully parsed and validated, and the chunk map rendered,
/// before anything is written, so bad input never leaves partial output
/// behind. Write failures abort immediately
/// without removing chunk files already written.
pub fn run(config: &RunConfig) -> Result<usize> {
    file_processing::check_path(&config.transfers)?;
    file_processing::check_path(&config.timestamps)?;

    let transfers = records::load_transfers(&config.transfers)?;
    let timestamps = records::load_timestamps(&config.timestamps)?;
    log::info!(
        "Loaded {} transfers and {} block timestamps",
        transfers.len(),
        timestamps.len()
    );

    let lookup = join::build_timestamp_lookup(&timestamps);
    log::debug!("Timestamp lookup covers {} blocks", lookup.len());
    if lookup.duplicates() > 0 {
        log::warn!(
            "{} duplicate block ids in {}; keeping the first timestamp of each",
            lookup.duplicates(),
            config.timestamps.display()
        );
    }

    let joined = join::join(transfers, &lookup);
    let plan = resample::partition(joined, &config.width)?;
    if plan.unmatched > 0 {
        log::warn!(
            "{} transfers have no block timestamp and were left out",
            plan.unmatched
        );
    }
    log::info!("Partitioned into {} chunks of width {}", plan.chunks.len(), config.width);

    let index = emit::render_index(&plan.index())?;
    let written = emit::write_chunks(&config.chunk_base, &plan.chunks)?;
    emit::write_index(&config.index, &index)?;

    Ok(written)
}
