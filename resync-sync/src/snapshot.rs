//! Immutable scan snapshot and positional selection.
//!
//! Operators address records by their position in the report. A
//! [`ChangeSet`] freezes that order, validates every requested position up
//! front, and carries a fingerprint so a later run can prove it is looking
//! at the same list.

use sha2::{Digest, Sha256};

use resync_core::ChangeRecord;

use crate::SyncError;

/// Length of the fingerprint prefix shown to operators.
pub const SHORT_ID_LEN: usize = 12;

/// Which records of a [`ChangeSet`] to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every record, in scan order.
    All,
    /// Exactly these positions, in the order given.
    Indices(Vec<usize>),
}

impl Selection {
    /// An empty index list means "everything".
    pub fn from_indices(indices: Vec<usize>) -> Self {
        if indices.is_empty() {
            Selection::All
        } else {
            Selection::Indices(indices)
        }
    }
}

/// Ordered, non-identical change records produced by one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    records: Vec<ChangeRecord>,
    fingerprint: String,
    upstream_missing: bool,
}

impl ChangeSet {
    /// Freeze `records` in the given order. Each record's `index` is reset
    /// to its position.
    pub fn from_records(mut records: Vec<ChangeRecord>) -> Self {
        for (position, record) in records.iter_mut().enumerate() {
            record.index = position;
        }
        let fingerprint = fingerprint(&records);
        Self {
            records,
            fingerprint,
            upstream_missing: false,
        }
    }

    /// Empty snapshot for a scan whose upstream root did not exist.
    pub fn upstream_missing() -> Self {
        Self {
            upstream_missing: true,
            ..Self::from_records(Vec::new())
        }
    }

    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `true` when the scan found no upstream subtree at all.
    pub fn is_upstream_missing(&self) -> bool {
        self.upstream_missing
    }

    /// SHA-256 (hex) over the status and relative path of every record.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Fingerprint prefix shown in reports.
    pub fn short_id(&self) -> &str {
        &self.fingerprint[..SHORT_ID_LEN]
    }

    /// Whether `id` (a full fingerprint or any non-empty prefix) names this snapshot.
    pub fn matches_snapshot(&self, id: &str) -> bool {
        let id = id.trim().to_ascii_lowercase();
        !id.is_empty() && self.fingerprint.starts_with(&id)
    }

    /// Resolve `selection` to records, failing before anything is returned
    /// if any position is out of range.
    pub fn select(&self, selection: &Selection) -> Result<Vec<&ChangeRecord>, SyncError> {
        match selection {
            Selection::All => Ok(self.records.iter().collect()),
            Selection::Indices(indices) => {
                if let Some(&index) = indices.iter().find(|&&i| i >= self.records.len()) {
                    return Err(SyncError::IndexOutOfRange {
                        index,
                        len: self.records.len(),
                    });
                }
                Ok(indices.iter().map(|&i| &self.records[i]).collect())
            }
        }
    }
}

fn fingerprint(records: &[ChangeRecord]) -> String {
    let mut hasher = Sha256::new();
    for record in records {
        hasher.update(record.status.key().as_bytes());
        hasher.update([0u8]);
        // Normalise separators so the id is the same on every platform.
        let path = record.relative_path.to_string_lossy().replace('\\', "/");
        hasher.update(path.as_bytes());
        hasher.update([b'\n']);
    }
    hex::encode(hasher.finalize())
}
