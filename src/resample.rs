use crate::error::{ChunkError, Result};
use crate::records::JoinedRecord;
use crate::window::WindowWidth;

/// One fixed-width time window and the transfers whose timestamp falls in it.
///
/// - `id`: position of the window on the time axis, starting at 0.
/// - `window_start`: inclusive start, epoch seconds.
/// - `window_end`: exclusive end, always `window_start + width`.
/// - `records`: transfers in the window, ordered by timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub id: usize,
    pub window_start: i64,
    pub window_end: i64,
    pub records: Vec<JoinedRecord>,
}

/// Row of the chunk index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkIndexEntry {
    pub chunk_id: usize,
    pub window_start: i64,
}

/// Result of partitioning the joined transfers.
#[derive(Debug, Clone, Default)]
pub struct ChunkPlan {
    pub chunks: Vec<Chunk>,
    /// Transfers left out because their block had no timestamp.
    pub unmatched: usize,
}

impl ChunkPlan {
    pub fn index(&self) -> Vec<ChunkIndexEntry> {
        self.chunks
            .iter()
            .map(|chunk| ChunkIndexEntry {
                chunk_id: chunk.id,
                window_start: chunk.window_start,
            })
            .collect()
    }
}

/// Floors `timestamp` to the start of its window, counting windows from epoch 0.
///
/// Returns `None` when the window start is not representable as `i64`.
pub fn window_floor(timestamp: i64, width: &WindowWidth) -> Option<i64> {
    timestamp
        .div_euclid(width.seconds())
        .checked_mul(width.seconds())
}

fn out_of_range(what: &str, width: &WindowWidth) -> ChunkError {
    ChunkError::OutOfRange(format!("{} with window width {}", what, width))
}

/// Partitions joined transfers into contiguous, epoch-aligned windows of `width`.
///
/// Windows run from the window holding the earliest timestamp up to the one
/// holding the latest, and every window in between is emitted even when empty,
/// so chunk ids are always `0..N`. Transfers without a timestamp are dropped
/// and counted in `ChunkPlan::unmatched`.
///
/// Inside a chunk, transfers are sorted by timestamp; equal timestamps keep
/// their input order.
///
/// # Arguments
/// * `records` - Joined transfers, in any order.
/// * `width` - Window width.
///
/// # Returns
/// * `Result<ChunkPlan>` - Chunks in ascending time order; empty when no transfer has a timestamp.
///
/// # Errors
/// * `OutOfRange` if a window boundary overflows `i64` or the chunk list
///   cannot be allocated.
pub fn partition(records: Vec<JoinedRecord>, width: &WindowWidth) -> Result<ChunkPlan> {
    let total = records.len();
    let mut timed: Vec<(i64, JoinedRecord)> = records
        .into_iter()
        .filter_map(|record| Some((record.timestamp?, record)))
        .collect();
    let unmatched = total - timed.len();

    let (Some(min_ts), Some(max_ts)) = (
        timed.iter().map(|(ts, _)| *ts).min(),
        timed.iter().map(|(ts, _)| *ts).max(),
    ) else {
        return Ok(ChunkPlan {
            chunks: Vec::new(),
            unmatched,
        });
    };

    let step = width.seconds();
    let t_min = window_floor(min_ts, width)
        .ok_or_else(|| out_of_range(&format!("window start of timestamp {}", min_ts), width))?;
    let last = max_ts
        .checked_sub(t_min)
        .map(|span| span / step)
        .ok_or_else(|| out_of_range(&format!("span {}..={}", min_ts, max_ts), width))?;
    // end of the last window must fit too
    last
        .checked_add(1)
        .and_then(|n| n.checked_mul(step))
        .and_then(|len| t_min.checked_add(len))
        .ok_or_else(|| out_of_range(&format!("window end after timestamp {}", max_ts), width))?;
    let count = usize::try_from(last)
        .ok()
        .and_then(|last| last.checked_add(1))
        .ok_or_else(|| out_of_range(&format!("{} windows", last), width))?;

    let mut chunks: Vec<Chunk> = Vec::new();
    chunks
        .try_reserve_exact(count)
        .map_err(|e| out_of_range(&format!("{} windows ({})", count, e), width))?;
    for id in 0..count {
        let window_start = t_min + id as i64 * step;
        chunks.push(Chunk {
            id,
            window_start,
            window_end: window_start + step,
            records: Vec::new(),
        });
    }

    // stable: ties stay in join order
    timed.sort_by_key(|(ts, _)| *ts);
    for (ts, record) in timed {
        let slot = ((ts - t_min) / step) as usize;
        chunks[slot].records.push(record);
    }

    Ok(ChunkPlan { chunks, unmatched })
}
