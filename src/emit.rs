use crate::error::{ChunkError, Result};
use crate::file_processing;
use crate::resample::{Chunk, ChunkIndexEntry};
use crate::utils;

/// Row of the chunk index file, serialized with the `chunk_id\ttimestamp` header.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct IndexRow {
    pub chunk_id: usize,
    pub timestamp: String,
}

/// Renders index entries with the window start as `YYYY-MM-DD HH:MM:SS` (UTC).
///
/// Runs before any file is written so an unrenderable window start leaves
/// no output behind.
pub fn render_index(entries: &[ChunkIndexEntry]) -> Result<Vec<IndexRow>> {
    entries
        .iter()
        .map(|entry| {
            Ok(IndexRow {
                chunk_id: entry.chunk_id,
                timestamp: utils::format_timestamp(entry.window_start)?,
            })
        })
        .collect()
}

/// Builds the progress bar shown while chunk files are written.
///
/// indicatif draws to stderr and stays hidden when stderr is not a terminal,
/// so stdout only ever carries the chunk count.
fn chunk_progress(len: usize) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new(len as u64);
    let style = indicatif::ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks",
    )
    .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
    .progress_chars("#>-");
    pb.set_style(style);
    pb
}

fn create_file(path: &std::path::Path) -> Result<std::fs::File> {
    std::fs::File::create(path).map_err(|e| ChunkError::io(path, e))
}

/// Writes one chunk as a headerless CSV: `block_id, contract_id, from_id, to_id, amount`.
///
/// The timestamp is not written. An empty chunk yields an empty file.
fn write_chunk(path: &std::path::Path, chunk: &Chunk) -> Result<()> {
    let file = create_file(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(std::io::BufWriter::new(file));

    for record in &chunk.records {
        writer
            .serialize(&record.transfer)
            .map_err(|e| ChunkError::csv(path, e))?;
    }
    writer.flush().map_err(|e| ChunkError::io(path, e))?;
    Ok(())
}

/// Writes every chunk to `{base}_{id}.csv`, in ascending id order.
///
/// Existing files are overwritten. Files already written stay on disk if a
/// later chunk fails.
///
/// # Returns
/// * `Result<usize>` - Number of chunk files written.
pub fn write_chunks<P: AsRef<std::path::Path>>(base: P, chunks: &[Chunk]) -> Result<usize> {
    file_processing::ensure_parent_dir_exist(base.as_ref())?;

    let pb = chunk_progress(chunks.len());
    for chunk in chunks {
        let path = utils::chunk_path(base.as_ref(), chunk.id);
        write_chunk(&path, chunk)?;
        log::debug!(
            "Chunk {} [{}, {}) -> {} ({} transfers)",
            chunk.id,
            chunk.window_start,
            chunk.window_end,
            path.display(),
            chunk.records.len()
        );
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(chunks.len())
}

/// Writes the tab-separated chunk index: header `chunk_id\ttimestamp`, then
/// one row per chunk.
pub fn write_index<P: AsRef<std::path::Path>>(path: P, rows: &[IndexRow]) -> Result<()> {
    let path = path.as_ref();
    file_processing::ensure_parent_dir_exist(path)?;

    let file = create_file(path)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_writer(std::io::BufWriter::new(file));

    for row in rows {
        writer.serialize(row).map_err(|e| ChunkError::csv(path, e))?;
    }
    if rows.is_empty() {
        // serde only emits the header together with the first row
        writer
            .write_record(["chunk_id", "timestamp"])
            .map_err(|e| ChunkError::csv(path, e))?;
    }
    writer.flush().map_err(|e| ChunkError::io(path, e))?;
    Ok(())
}
