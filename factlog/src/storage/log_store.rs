//! Durable append-only log store.
//!
//! Every write batch is appended to a single file as one self-checking
//! record. On open the file is replayed into an in-memory ordered map, which
//! then serves all scans and lookups.
//!
//! # Record Format
//!
//! ```text
//! +----------+--------------------------------------------------+
//! | 0-3      | record_length (4 bytes, includes header+payload) |
//! | 4-7      | entry_count (4 bytes)                            |
//! | 8-N      | entries                                          |
//! | N-N+3    | CRC32 checksum (4 bytes)                         |
//! +----------+--------------------------------------------------+
//!
//! entry:
//! +----------+--------------------------------------------------+
//! | 0-3      | key_length (4 bytes)                             |
//! | 4-7      | value_length (4 bytes)                           |
//! | 8-N      | key bytes followed by value bytes                |
//! +----------+--------------------------------------------------+
//! ```
//!
//! # Recovery
//!
//! Replay stops at the first record that is short, fails its checksum or is
//! not UTF-8. Everything from that offset on is treated as a torn write and
//! truncated away before the store accepts new appends. A batch is one
//! record, so a torn batch is dropped as a whole.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::storage::memory::MemoryStore;
use crate::storage::store::{KeyRange, KeyStream, KeyValueStore, StoreError};

/// `record_length` (4) + `entry_count` (4) = 8 bytes
const RECORD_HEADER_SIZE: usize = 8;

/// `key_length` (4) + `value_length` (4) = 8 bytes
const ENTRY_HEADER_SIZE: usize = 8;

/// CRC32 checksum size at end of record.
const CHECKSUM_SIZE: usize = 4;

/// A store persisted as an append-only log file.
pub struct LogStore {
    path: PathBuf,
    file: Mutex<File>,
    entries: MemoryStore,
    sync_writes: bool,
}

impl LogStore {
    /// Open the log at `path`, creating it if it does not exist.
    ///
    /// When `sync_writes` is set every batch is fsynced before it becomes
    /// visible to readers.
    pub fn open(path: &Path, sync_writes: bool) -> Result<Self, StoreError> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let replay = replay(&bytes);
        if let Some(error) = &replay.error {
            warn!(
                path = %path.display(),
                offset = replay.valid_len,
                discarded = bytes.len() - replay.valid_len,
                %error,
                "truncating torn log tail"
            );
            file.set_len(replay.valid_len as u64)?;
            file.sync_all()?;
        }

        debug!(
            path = %path.display(),
            records = replay.records,
            keys = replay.entries.len(),
            "replayed log"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            entries: MemoryStore::from_entries(replay.entries),
            sync_writes,
        })
    }

    /// Get the path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for LogStore {
    fn scan(&self, range: &KeyRange) -> KeyStream<'_> {
        self.entries.scan(range)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.entries.get(key).await
    }

    async fn write_batch(&self, entries: Vec<(String, String)>) -> Result<(), StoreError> {
        let buf = encode_record(&entries)?;

        {
            let mut file = self.file.lock().map_err(|_| StoreError::LockPoisoned)?;
            file.write_all(&buf)?;
            if self.sync_writes {
                file.sync_data()?;
            }
        }

        self.entries.insert_all(entries)
    }
}

/// Outcome of replaying a log file.
struct Replay {
    entries: BTreeMap<String, String>,
    /// Length of the prefix made of intact records.
    valid_len: usize,
    records: usize,
    /// Why replay stopped early, if it did.
    error: Option<RecordError>,
}

fn replay(bytes: &[u8]) -> Replay {
    let mut entries = BTreeMap::new();
    let mut offset = 0;
    let mut records = 0;

    while offset < bytes.len() {
        match decode_record(&bytes[offset..]) {
            Ok((batch, consumed)) => {
                entries.extend(batch);
                offset += consumed;
                records += 1;
            }
            Err(error) => {
                return Replay {
                    entries,
                    valid_len: offset,
                    records,
                    error: Some(error),
                };
            }
        }
    }

    Replay {
        entries,
        valid_len: offset,
        records,
        error: None,
    }
}

/// Serialize one batch as a log record.
fn encode_record(entries: &[(String, String)]) -> Result<Vec<u8>, StoreError> {
    let payload_len: usize = entries
        .iter()
        .map(|(key, value)| ENTRY_HEADER_SIZE + key.len() + value.len())
        .sum();
    let total_len = RECORD_HEADER_SIZE + payload_len + CHECKSUM_SIZE;
    let too_large = || StoreError::RecordTooLarge { size: total_len };
    let record_len = u32::try_from(total_len).map_err(|_| too_large())?;
    let entry_count = u32::try_from(entries.len()).map_err(|_| too_large())?;

    let mut bytes = Vec::with_capacity(total_len);
    bytes.extend_from_slice(&record_len.to_le_bytes());
    bytes.extend_from_slice(&entry_count.to_le_bytes());
    for (key, value) in entries {
        let key_len = u32::try_from(key.len()).map_err(|_| too_large())?;
        let value_len = u32::try_from(value.len()).map_err(|_| too_large())?;
        bytes.extend_from_slice(&key_len.to_le_bytes());
        bytes.extend_from_slice(&value_len.to_le_bytes());
        bytes.extend_from_slice(key.as_bytes());
        bytes.extend_from_slice(value.as_bytes());
    }

    // computed over everything before it
    let checksum = crc32fast::hash(&bytes);
    bytes.extend_from_slice(&checksum.to_le_bytes());

    Ok(bytes)
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let field = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([field[0], field[1], field[2], field[3]]))
}

fn read_len(bytes: &[u8], offset: usize) -> Option<usize> {
    read_u32(bytes, offset).map(|n| n as usize)
}

/// Deserialize one record from the front of `bytes`.
///
/// Returns the batch and the number of bytes consumed.
fn decode_record(bytes: &[u8]) -> Result<(Vec<(String, String)>, usize), RecordError> {
    if bytes.len() < RECORD_HEADER_SIZE + CHECKSUM_SIZE {
        return Err(RecordError::Truncated {
            available: bytes.len(),
        });
    }

    let record_len = read_len(bytes, 0).unwrap_or_default();
    if record_len < RECORD_HEADER_SIZE + CHECKSUM_SIZE {
        return Err(RecordError::InvalidLength(record_len));
    }
    if record_len > bytes.len() {
        return Err(RecordError::Truncated {
            available: bytes.len(),
        });
    }

    let body_end = record_len - CHECKSUM_SIZE;
    let stored_checksum = read_u32(bytes, body_end).unwrap_or_default();
    let computed_checksum = crc32fast::hash(&bytes[..body_end]);
    if stored_checksum != computed_checksum {
        return Err(RecordError::ChecksumMismatch {
            expected: stored_checksum,
            actual: computed_checksum,
        });
    }

    let entry_count = read_len(bytes, 4).unwrap_or_default();
    let payload = &bytes[RECORD_HEADER_SIZE..body_end];
    let mut entries = Vec::new();
    let mut offset = 0;
    for _ in 0..entry_count {
        let (Some(key_len), Some(value_len)) =
            (read_len(payload, offset), read_len(payload, offset + 4))
        else {
            return Err(RecordError::InvalidLength(payload.len()));
        };
        let start = offset + ENTRY_HEADER_SIZE;
        let split = start + key_len;
        let end = split + value_len;
        if end > payload.len() {
            return Err(RecordError::InvalidLength(end));
        }

        let key = String::from_utf8(payload[start..split].to_vec())
            .map_err(|_| RecordError::InvalidUtf8)?;
        let value = String::from_utf8(payload[split..end].to_vec())
            .map_err(|_| RecordError::InvalidUtf8)?;
        entries.push((key, value));
        offset = end;
    }
    if offset != payload.len() {
        return Err(RecordError::InvalidLength(payload.len()));
    }

    Ok((entries, record_len))
}

/// Reasons a record cannot be replayed.
#[derive(Debug, PartialEq, Eq)]
enum RecordError {
    /// Fewer bytes remain than the record needs.
    Truncated { available: usize },
    /// A length field is impossible.
    InvalidLength(usize),
    /// Checksum mismatch.
    ChecksumMismatch { expected: u32, actual: u32 },
    /// Key or value is not UTF-8.
    InvalidUtf8,
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncated { available } => {
                write!(f, "truncated record: only {available} bytes remain")
            }
            Self::InvalidLength(len) => write!(f, "invalid record length: {len}"),
            Self::ChecksumMismatch { expected, actual } => write!(
                f,
                "record checksum mismatch: expected 0x{expected:08x}, got 0x{actual:08x}"
            ),
            Self::InvalidUtf8 => write!(f, "record is not valid UTF-8"),
        }
    }
}
