//! Output destination resolution.
//!
//! Decides where rendered invoice bytes land and guarantees the storage
//! area exists. Destinations are always-regenerate: every resolution for
//! an invoice id yields a fresh, timestamp-qualified path, never a reuse
//! of a prior output (the documented choice for the generate-or-retrieve
//! question; see DESIGN.md).

use crate::error::{Error, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

/// Default storage area, relative to the process working directory.
pub const DEFAULT_STORAGE_DIR: &str = "uploads/invoices";

/// Resolves destinations for rendered invoice documents.
#[derive(Debug)]
pub struct OutputResolver {
    root: PathBuf,
    /// Last issued millisecond stamp. Filenames embed `max(now, last + 1)`
    /// so two resolutions for the same id are distinct even within one
    /// wall-clock millisecond.
    last_stamp: AtomicI64,
}

impl OutputResolver {
    /// Create a resolver rooted at an explicit storage directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            last_stamp: AtomicI64::new(0),
        }
    }

    /// The storage root this resolver writes under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the destination for an invoice document.
    ///
    /// An explicit path wins unchanged. Otherwise the destination is
    /// `<root>/invoice-<invoiceId>-<unixMillis>.pdf`, and the storage root
    /// is created first (create-if-missing; concurrent first use is safe
    /// because directory creation is idempotent).
    pub async fn resolve(&self, invoice_id: &str, explicit: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path);
        }

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            Error::StorageWrite(format!(
                "could not create storage area {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let stamp = self.next_stamp();
        Ok(self.root.join(format!("invoice-{}-{}.pdf", invoice_id, stamp)))
    }

    /// Issue a strictly increasing millisecond stamp.
    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(prev + 1)
    }
}

impl Default for OutputResolver {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_DIR)
    }
}
