use std::io;

use crate::address::AssetFileAddress;

/// What happened to a source that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarantineOutcome {
    Deleted,
    /// Someone else removed the file first; counts as success
    AlreadyGone,
    /// Package regions cannot be removed, the source is only skipped this pass
    NotDeletable,
    Failed(io::ErrorKind),
}

/// Permanently retires corrupt dictionary files.
///
/// Deleting the file is the quarantine record: the next resolution pass no
/// longer finds it. Failures are logged and reported, never returned as errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuarantineManager;

impl QuarantineManager {
    pub fn new() -> Self {
        Self
    }

    pub fn quarantine(&self, address: &AssetFileAddress) -> QuarantineOutcome {
        if !address.points_to_physical_file() {
            tracing::debug!(
                "not quarantining package region {}@{}",
                address.path().display(),
                address.offset()
            );
            return QuarantineOutcome::NotDeletable;
        }

        match address.delete_underlying_file() {
            Ok(()) => {
                tracing::warn!("quarantined corrupt dictionary {}", address.path().display());
                QuarantineOutcome::Deleted
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("corrupt dictionary {} already gone", address.path().display());
                QuarantineOutcome::AlreadyGone
            }
            Err(e) => {
                tracing::error!("failed to quarantine {}: {e}", address.path().display());
                QuarantineOutcome::Failed(e.kind())
            }
        }
    }
}
