use crate::error::{ChunkError, Result};

const TRANSFER_COLUMNS: usize = 5;
const TIMESTAMP_COLUMNS: usize = 2;

/// Earliest and latest accepted block timestamps, in epoch seconds.
///
/// Whole seconds representable as nanoseconds in an `i64`
/// (1677-09-21 00:12:44 to 2262-04-11 23:47:16 UTC), the usual range of
/// nanosecond datetime columns.
pub const MIN_TIMESTAMP: i64 = i64::MIN / 1_000_000_000;
pub const MAX_TIMESTAMP: i64 = i64::MAX / 1_000_000_000;

/// A single token transfer, as read from the transfer list.
///
/// `amount` is kept as the original decimal string: token amounts routinely
/// exceed 64-bit integers and are written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransferRecord {
    pub block_id: u64,
    pub contract_id: String,
    pub from_id: String,
    pub to_id: String,
    pub amount: String,
}

/// Block timestamp in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct TimestampRecord {
    pub block_id: u64,
    pub timestamp: i64,
}

/// Transfer enriched with the timestamp of its block, if one is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRecord {
    pub transfer: TransferRecord,
    pub timestamp: Option<i64>,
}

/// Opens a headerless CSV file for reading.
///
/// Rows are read as flexible so that column count mismatches surface as
/// `InputFormat` errors with the offending line rather than csv's generic
/// "unequal lengths" message. Fields are not trimmed here: only numeric
/// columns are, in `read_rows`, so text columns are written back unchanged.
fn open_reader<P: AsRef<std::path::Path>>(path: P) -> Result<csv::Reader<std::fs::File>> {
    let file = std::fs::File::open(path.as_ref()).map_err(|e| {
        ChunkError::Configuration(format!(
            "cannot open input {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file))
}

/// Reads every row of `reader`, checking the column count and deserializing
/// each row into `T`.
///
/// # Arguments
/// * `numeric` - Column positions whose surrounding whitespace is trimmed before parsing.
/// * `check` - Row validation run after parsing; its message becomes an `InputFormat` error.
fn read_rows<T, R, F>(
    reader: &mut csv::Reader<R>,
    path: &std::path::Path,
    columns: usize,
    numeric: &[usize],
    check: F,
) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
    R: std::io::Read,
    F: Fn(&T) -> std::result::Result<(), String>,
{
    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();

    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                return Err(ChunkError::input_format(path, line, e.to_string()));
            }
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != columns {
            return Err(ChunkError::input_format(
                path,
                line,
                format!("expected {} columns, found {}", columns, record.len()),
            ));
        }

        let trimmed: csv::StringRecord = record
            .iter()
            .enumerate()
            .map(|(i, field)| if numeric.contains(&i) { field.trim() } else { field })
            .collect();
        let row: T = trimmed
            .deserialize(None)
            .map_err(|e| ChunkError::input_format(path, line, deserialize_reason(&e)))?;
        check(&row).map_err(|reason| ChunkError::input_format(path, line, reason))?;
        rows.push(row);
    }

    Ok(rows)
}

fn deserialize_reason(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("column {}: {}", field + 1, err.kind()),
            None => err.kind().to_string(),
        },
        _ => err.to_string(),
    }
}

/// Loads the transfer list: `block_id, contract_id, from_id, to_id, amount`.
///
/// # Errors
/// * `Configuration` if the file cannot be opened.
/// * `InputFormat` on a row with the wrong column count or a non-numeric block id.
pub fn load_transfers<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<TransferRecord>> {
    let mut reader = open_reader(path.as_ref())?;
    read_rows(&mut reader, path.as_ref(), TRANSFER_COLUMNS, &[0], |_: &TransferRecord| Ok(()))
}

/// Loads the block timestamp list: `block_id, timestamp`.
///
/// # Errors
/// * `Configuration` if the file cannot be opened.
/// * `InputFormat` on a row with the wrong column count, non-numeric fields,
///   or a timestamp outside `MIN_TIMESTAMP..=MAX_TIMESTAMP`.
pub fn load_timestamps<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<TimestampRecord>> {
    let mut reader = open_reader(path.as_ref())?;
    read_rows(
        &mut reader,
        path.as_ref(),
        TIMESTAMP_COLUMNS,
        &[0, 1],
        |row: &TimestampRecord| check_timestamp(row.timestamp),
    )
}

fn check_timestamp(ts: i64) -> std::result::Result<(), String> {
    if (MIN_TIMESTAMP..=MAX_TIMESTAMP).contains(&ts) {
        Ok(())
    } else {
        Err(format!(
            "column 2: timestamp {} is outside {}..={}",
            ts, MIN_TIMESTAMP, MAX_TIMESTAMP
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_transfers_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "transfers.csv",
            "1,10,100,200,5\n 2 , 10 ,101,201,123456789012345678901234567890\n",
        );

        let transfers = load_transfers(&path).unwrap();
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].block_id, 1);
        assert_eq!(transfers[0].amount, "5");
        assert_eq!(transfers[1].block_id, 2);
        assert_eq!(transfers[1].contract_id, " 10 ");
        assert_eq!(transfers[1].amount, "123456789012345678901234567890");
    }

    #[test]
    fn loads_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "ts.csv", "1,0\n2, 86400 \n\n3,-60\n");

        let timestamps = load_timestamps(&path).unwrap();
        assert_eq!(
            timestamps,
            vec![
                TimestampRecord { block_id: 1, timestamp: 0 },
                TimestampRecord { block_id: 2, timestamp: 86_400 },
                TimestampRecord { block_id: 3, timestamp: -60 },
            ]
        );
    }

    #[test]
    fn reports_wrong_column_count_with_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "transfers.csv", "1,10,100,200,5\n2,10,101,201\n");

        match load_transfers(&path).unwrap_err() {
            ChunkError::InputFormat { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("expected 5 columns"), "{}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn reports_non_numeric_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "ts.csv", "1,0\n2,yesterday\n");

        match load_timestamps(&path).unwrap_err() {
            ChunkError::InputFormat { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("column 2"), "{}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_timestamps_outside_datetime_range() {
        let dir = tempfile::tempdir().unwrap();
        for (ts, ok) in [
            (MIN_TIMESTAMP, true),
            (MAX_TIMESTAMP, true),
            (MIN_TIMESTAMP - 1, false),
            (MAX_TIMESTAMP + 1, false),
            (i64::MIN, false),
            (9_000_000_000_000_000, false),
        ] {
            let path = write_file(&dir, "ts.csv", &format!("1,0\n2,{}\n", ts));
            match load_timestamps(&path) {
                Ok(rows) => {
                    assert!(ok, "timestamp {} was accepted", ts);
                    assert_eq!(rows[1].timestamp, ts);
                }
                Err(ChunkError::InputFormat { line, reason, .. }) => {
                    assert!(!ok, "timestamp {} was rejected: {}", ts, reason);
                    assert_eq!(line, 2);
                    assert!(reason.contains("outside"), "{}", reason);
                }
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn text_columns_keep_their_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "transfers.csv", "7,c ,  a,b , 1.50 \n");

        let transfers = load_transfers(&path).unwrap();
        assert_eq!(transfers[0].contract_id, "c ");
        assert_eq!(transfers[0].from_id, "  a");
        assert_eq!(transfers[0].to_id, "b ");
        assert_eq!(transfers[0].amount, " 1.50 ");
    }

    #[test]
    fn reports_non_numeric_block_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "transfers.csv", "abc,10,100,200,5\n");

        assert!(matches!(
            load_transfers(&path).unwrap_err(),
            ChunkError::InputFormat { line: 1, .. }
        ));
    }

    #[test]
    fn missing_input_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_transfers(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ChunkError::Configuration(_)));
    }
}
