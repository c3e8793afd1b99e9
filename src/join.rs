use crate::records::{JoinedRecord, TimestampRecord, TransferRecord};

/// Block id → timestamp lookup built once from the timestamp list.
#[derive(Debug, Default)]
pub struct TimestampLookup {
    by_block: std::collections::HashMap<u64, i64>,
    duplicates: usize,
}

impl TimestampLookup {
    pub fn get(&self, block_id: u64) -> Option<i64> {
        self.by_block.get(&block_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_block.len()
    }

    /// Number of timestamp rows ignored because their block id was already seen.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Builds the block timestamp lookup.
///
/// When a block id appears more than once, the first row wins and the later
/// rows are only counted in `duplicates()`.
pub fn build_timestamp_lookup(timestamps: &[TimestampRecord]) -> TimestampLookup {
    let mut lookup = TimestampLookup {
        by_block: std::collections::HashMap::with_capacity(timestamps.len()),
        duplicates: 0,
    };
    for record in timestamps {
        match lookup.by_block.entry(record.block_id) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(record.timestamp);
            }
            std::collections::hash_map::Entry::Occupied(_) => lookup.duplicates += 1,
        }
    }
    lookup
}

/// Left-joins transfers with block timestamps.
///
/// Output has the same length and order as `transfers`; transfers whose block
/// has no timestamp get `None`.
pub fn join(transfers: Vec<TransferRecord>, lookup: &TimestampLookup) -> Vec<JoinedRecord> {
    transfers
        .into_iter()
        .map(|transfer| {
            let timestamp = lookup.get(transfer.block_id);
            JoinedRecord { transfer, timestamp }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(block_id: u64, amount: &str) -> TransferRecord {
        TransferRecord {
            block_id,
            contract_id: "c".to_string(),
            from_id: "a".to_string(),
            to_id: "b".to_string(),
            amount: amount.to_string(),
        }
    }

    #[test]
    fn keeps_order_and_cardinality() {
        let lookup = build_timestamp_lookup(&[
            TimestampRecord { block_id: 2, timestamp: 20 },
            TimestampRecord { block_id: 1, timestamp: 10 },
        ]);
        let joined = join(
            vec![transfer(2, "a"), transfer(1, "b"), transfer(2, "c"), transfer(9, "d")],
            &lookup,
        );

        let amounts: Vec<_> = joined.iter().map(|r| r.transfer.amount.as_str()).collect();
        assert_eq!(amounts, ["a", "b", "c", "d"]);
        let timestamps: Vec<_> = joined.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, [Some(20), Some(10), Some(20), None]);
    }

    #[test]
    fn first_duplicate_timestamp_wins() {
        let lookup = build_timestamp_lookup(&[
            TimestampRecord { block_id: 1, timestamp: 10 },
            TimestampRecord { block_id: 1, timestamp: 99 },
            TimestampRecord { block_id: 1, timestamp: 10 },
        ]);
        assert_eq!(lookup.get(1), Some(10));
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.duplicates(), 2);
    }

    #[test]
    fn empty_inputs() {
        let lookup = build_timestamp_lookup(&[]);
        assert!(join(Vec::new(), &lookup).is_empty());
        assert_eq!(join(vec![transfer(1, "x")], &lookup)[0].timestamp, None);
    }
}
