//! Module: db::response
//! Responsibility: the three-channel delivery contract of every scan.
//! Does not own: what is scanned or how pages are fetched.
//! Boundary: the producer half (`ScanSender`) lives in the scan task and is
//! the only writer; dropping its last clone closes all three channels.
//! Consumers never close channels; they read until closure.

use crate::{error::ScanError, value::CompositeValue};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

///
/// IndexEntry
///
/// One matched index row: the composite key it matched and the document it
/// belongs to.
///

#[derive(Clone, Debug, PartialEq)]
pub struct IndexEntry {
    pub entry_key: CompositeValue,
    pub primary_key: String,
}

impl IndexEntry {
    #[must_use]
    pub fn new(entry_key: CompositeValue, primary_key: impl Into<String>) -> Self {
        Self {
            entry_key,
            primary_key: primary_key.into(),
        }
    }
}

/// Response of a row-producing scan.
pub type IndexResponse = ScanResponse<IndexEntry>;

/// Response of a count; exactly one value arrives on `entries` unless the
/// scan fails.
pub type CountResponse = ScanResponse<u64>;

/// Create a connected sender/response pair with per-channel `capacity`.
#[must_use]
pub fn scan_channel<T>(capacity: usize) -> (ScanSender<T>, ScanResponse<T>) {
    let capacity = capacity.max(1);
    let (entry_tx, entry_rx) = mpsc::channel(capacity);
    let (warn_tx, warn_rx) = mpsc::channel(capacity);
    let (err_tx, err_rx) = mpsc::channel(1);
    let cancel = CancellationToken::new();

    let sender = ScanSender {
        entries: entry_tx,
        warnings: warn_tx,
        errors: err_tx,
        cancel: cancel.clone(),
    };
    let response = ScanResponse {
        entries: entry_rx,
        warnings: warn_rx,
        errors: err_rx,
        cancel,
    };

    (sender, response)
}

///
/// Delivery
///
/// Outcome of one producer-side send.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Delivery {
    Sent,
    Cancelled,
    ConsumerGone,
}

///
/// ScanSender
///
/// Producer half of a scan response.
///

#[derive(Debug)]
pub struct ScanSender<T> {
    entries: mpsc::Sender<T>,
    warnings: mpsc::Sender<ScanError>,
    errors: mpsc::Sender<ScanError>,
    cancel: CancellationToken,
}

// Manual impl: cloning the channel handles never requires `T: Clone`.
impl<T> Clone for ScanSender<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            warnings: self.warnings.clone(),
            errors: self.errors.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<T> ScanSender<T> {
    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Deliver one entry, waiting for channel capacity unless cancelled.
    pub async fn send_entry(&self, entry: T) -> Delivery {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Delivery::Cancelled,
            sent = self.entries.send(entry) => match sent {
                Ok(()) => Delivery::Sent,
                Err(_) => Delivery::ConsumerGone,
            },
        }
    }

    /// Deliver one non-fatal warning; the scan continues regardless.
    pub async fn send_warning(&self, warning: ScanError) -> Delivery {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Delivery::Cancelled,
            sent = self.warnings.send(warning) => match sent {
                Ok(()) => Delivery::Sent,
                Err(_) => Delivery::ConsumerGone,
            },
        }
    }

    /// Deliver the single fatal error of this scan.
    ///
    /// Never waits: the error channel holds one slot and only the first
    /// fatal error is kept.
    pub fn send_error(&self, error: ScanError) -> Delivery {
        match self.errors.try_send(error) {
            Ok(()) => Delivery::Sent,
            Err(TrySendError::Full(dropped)) => {
                tracing::debug!(error = %dropped, "fatal error already delivered; dropping");
                Delivery::Sent
            }
            Err(TrySendError::Closed(_)) => Delivery::ConsumerGone,
        }
    }
}

///
/// ScanResponse
///
/// Consumer half of a scan: entries, non-fatal warnings, and at most one
/// fatal error. All three close when the scan task finishes.
///

#[derive(Debug)]
pub struct ScanResponse<T> {
    pub entries: mpsc::Receiver<T>,
    pub warnings: mpsc::Receiver<ScanError>,
    pub errors: mpsc::Receiver<ScanError>,
    cancel: CancellationToken,
}

impl<T> ScanResponse<T> {
    /// Ask the scan task to stop before its next page fetch or send.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Drain all three channels concurrently until every one is closed.
    pub async fn collect(mut self) -> ScanOutcome<T> {
        let mut outcome = ScanOutcome {
            entries: Vec::new(),
            warnings: Vec::new(),
            error: None,
        };
        let (mut entries_open, mut warnings_open, mut errors_open) = (true, true, true);

        loop {
            tokio::select! {
                entry = self.entries.recv(), if entries_open => match entry {
                    Some(entry) => outcome.entries.push(entry),
                    None => entries_open = false,
                },
                warning = self.warnings.recv(), if warnings_open => match warning {
                    Some(warning) => outcome.warnings.push(warning),
                    None => warnings_open = false,
                },
                error = self.errors.recv(), if errors_open => match error {
                    Some(error) => {
                        outcome.error.get_or_insert(error);
                    }
                    None => errors_open = false,
                },
                else => break,
            }
        }

        outcome
    }
}

impl ScanResponse<u64> {
    /// Await the single count delivery.
    pub async fn count(self) -> Result<u64, ScanError> {
        let cancel = self.cancel.clone();
        let outcome = self.collect().await;
        if let Some(error) = outcome.error {
            return Err(error);
        }

        match outcome.entries.first() {
            Some(count) => Ok(*count),
            None if cancel.is_cancelled() => Err(ScanError::walker_cancelled()),
            None => Err(ScanError::index_internal(
                "count scan closed without a result",
            )),
        }
    }
}

///
/// ScanOutcome
///
/// Everything a fully drained scan delivered.
///

#[derive(Debug)]
pub struct ScanOutcome<T> {
    pub entries: Vec<T>,
    pub warnings: Vec<ScanError>,
    pub error: Option<ScanError>,
}

impl<T> ScanOutcome<T> {
    /// Entries if the scan finished without a fatal error.
    pub fn into_result(self) -> Result<Vec<T>, ScanError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.entries),
        }
    }
}

///
/// TESTS
///
