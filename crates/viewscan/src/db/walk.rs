//! Module: db::walk
//! Responsibility: bounded, cursor-paginated walks over one view.
//! Does not own: range lowering (see `db::range`) or index capability policy.
//! Boundary: index handles start walks through `spawn_guarded`; nothing a
//! walk does can fault past its response channels.
//!
//! Each fetch asks for `page_size + 1` rows. The first `page_size` rows are
//! delivered; the extra row is never delivered on this page and seeds the
//! next fetch's `startkey`/`startkey_docid`, so rows sharing one key page
//! correctly as long as the engine orders same-key rows by document id.

use crate::{
    db::{
        key::decode_composite_key,
        response::{Delivery, IndexEntry, ScanSender},
        view::{ViewOptions, ViewRow, ViewStore},
    },
    error::ScanError,
};
use futures_util::FutureExt;
use std::{future::Future, panic::AssertUnwindSafe, sync::Arc};
use tokio_util::sync::CancellationToken;

/// Tracing target for every view-engine request.
pub const NETWORK_TARGET: &str = "viewscan::network";

///
/// WalkStop
///
/// Why a walk ended without a fatal error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WalkStop {
    Exhausted,
    LimitReached,
    Cancelled,
    ConsumerGone,
}

///
/// WalkSummary
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WalkSummary {
    pub rows_delivered: u64,
    pub warnings: u64,
    pub pages: u64,
    pub stop: WalkStop,
}

///
/// ViewTarget
///
/// One view of one design document on one store.
///

#[derive(Clone)]
pub struct ViewTarget {
    pub store: Arc<dyn ViewStore>,
    pub design_doc: String,
    pub view: String,
}

impl ViewTarget {
    pub fn new(
        store: Arc<dyn ViewStore>,
        design_doc: impl Into<String>,
        view: impl Into<String>,
    ) -> Self {
        Self {
            store,
            design_doc: design_doc.into(),
            view: view.into(),
        }
    }

    async fn fetch(&self, options: &ViewOptions) -> Result<Vec<ViewRow>, ScanError> {
        tracing::debug!(
            target: NETWORK_TARGET,
            request = %self.store.describe_request(&self.design_doc, &self.view, options),
            "request view"
        );
        let result = self
            .store
            .query(&self.design_doc, &self.view, options)
            .await?;

        Ok(result.rows)
    }
}

impl std::fmt::Debug for ViewTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewTarget")
            .field("design_doc", &self.design_doc)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

///
/// ViewPager
///
/// Cursor state of one paginated walk. `limit == 0` means unbounded.
///

#[derive(Debug)]
pub struct ViewPager {
    target: ViewTarget,
    options: ViewOptions,
    batch_size: u64,
    limit: u64,
    delivered: u64,
    pages: u64,
    done: bool,
}

impl ViewPager {
    #[must_use]
    pub fn new(target: ViewTarget, options: ViewOptions, batch_size: u64, limit: u64) -> Self {
        let batch_size = batch_size.max(1);
        let batch_size = if limit != 0 && limit < batch_size {
            limit
        } else {
            batch_size
        };

        Self {
            target,
            options,
            batch_size,
            limit,
            delivered: 0,
            pages: 0,
            done: false,
        }
    }

    #[must_use]
    pub const fn pages(&self) -> u64 {
        self.pages
    }

    #[must_use]
    pub const fn limit_reached(&self) -> bool {
        self.limit != 0 && self.delivered >= self.limit
    }

    /// Fetch the next page of deliverable rows, or `None` once exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<ViewRow>>, ScanError> {
        if self.done {
            return Ok(None);
        }

        // Phase 1: size this page; the final page never over-fetches.
        let page_size = if self.limit == 0 {
            self.batch_size
        } else {
            self.batch_size.min(self.limit - self.delivered)
        };
        self.options.limit = Some(page_size + 1);

        // Phase 2: fetch and split off the look-ahead row.
        let mut rows = self.target.fetch(&self.options).await?;
        self.pages += 1;

        let page_len = usize::try_from(page_size).unwrap_or(usize::MAX);
        if rows.len() > page_len {
            let next = rows.swap_remove(page_len);
            rows.truncate(page_len);
            self.options.startkey = Some(next.key);
            self.options.startkey_docid = Some(next.id);
        } else {
            self.done = true;
        }

        // Phase 3: account for delivered rows against the limit.
        self.delivered += rows.len() as u64;
        if self.limit_reached() {
            self.done = true;
        }

        Ok(Some(rows))
    }
}

/// Walk a view in bounded pages, delivering every row as an `IndexEntry`.
///
/// A row whose key does not decode is reported as a warning and skipped;
/// paging continues from the raw row either way.
pub async fn walk_view_in_batches(
    target: ViewTarget,
    options: ViewOptions,
    batch_size: u64,
    limit: u64,
    sender: &ScanSender<IndexEntry>,
) -> Result<WalkSummary, ScanError> {
    let mut pager = ViewPager::new(target, options, batch_size, limit);
    let mut summary = WalkSummary {
        rows_delivered: 0,
        warnings: 0,
        pages: 0,
        stop: WalkStop::Exhausted,
    };

    let stop = 'walk: loop {
        if sender.is_cancelled() {
            break WalkStop::Cancelled;
        }
        let Some(rows) = pager.next_page().await? else {
            break if pager.limit_reached() {
                WalkStop::LimitReached
            } else {
                WalkStop::Exhausted
            };
        };

        for row in rows {
            let delivery = match decode_composite_key(&row.key) {
                Ok(entry_key) => {
                    let delivery = sender.send_entry(IndexEntry::new(entry_key, row.id)).await;
                    if delivery == Delivery::Sent {
                        summary.rows_delivered += 1;
                    }
                    delivery
                }
                Err(err) => {
                    tracing::warn!(doc_id = %row.id, error = %err, "skipping undecodable view row");
                    summary.warnings += 1;
                    sender
                        .send_warning(ScanError::walker_row_decode(format!(
                            "skipping view row '{}': {err}",
                            row.id
                        )))
                        .await
                }
            };

            match delivery {
                Delivery::Sent => {}
                Delivery::Cancelled => break 'walk WalkStop::Cancelled,
                Delivery::ConsumerGone => break 'walk WalkStop::ConsumerGone,
            }
        }
    };

    summary.pages = pager.pages();
    summary.stop = stop;

    Ok(summary)
}

/// Count the rows of a view range by paging through it.
pub async fn count_view_rows(
    target: ViewTarget,
    options: ViewOptions,
    batch_size: u64,
    cancel: &CancellationToken,
) -> Result<Option<u64>, ScanError> {
    let mut pager = ViewPager::new(target, options, batch_size, 0);
    let mut count = 0u64;

    loop {
        if cancel.is_cancelled() {
            return Ok(None);
        }
        let Some(rows) = pager.next_page().await? else {
            return Ok(Some(count));
        };
        count += rows.len() as u64;
    }
}

/// Total rows in a view, independent of any range (`limit = 0` request).
pub async fn view_total_rows(
    target: &ViewTarget,
    options: &ViewOptions,
) -> Result<u64, ScanError> {
    let mut options = options.clone();
    options.limit = Some(0);

    tracing::debug!(
        target: NETWORK_TARGET,
        request = %target.store.describe_request(&target.design_doc, &target.view, &options),
        "request view"
    );
    let result = target
        .store
        .query(&target.design_doc, &target.view, &options)
        .await?;

    Ok(result.total_rows)
}

/// Run one scan body on its own task behind a fault boundary.
///
/// A fatal error returned by the body, or a panic raised inside it, becomes
/// exactly one delivery on the error channel. The boundary holds its own
/// sender clone, so channels close only after that delivery.
pub fn spawn_guarded<T, F, Fut>(scan: &'static str, sender: ScanSender<T>, body: F)
where
    T: Send + 'static,
    F: FnOnce(ScanSender<T>) -> Fut,
    Fut: Future<Output = Result<WalkSummary, ScanError>> + Send + 'static,
{
    let guard = sender.clone();
    let task = body(sender);

    tokio::spawn(async move {
        match AssertUnwindSafe(task).catch_unwind().await {
            Ok(Ok(summary)) => {
                tracing::debug!(
                    scan,
                    rows = summary.rows_delivered,
                    warnings = summary.warnings,
                    pages = summary.pages,
                    stop = ?summary.stop,
                    "scan finished"
                );
            }
            Ok(Err(err)) => {
                tracing::debug!(scan, error = %err.display_with_class(), "scan failed");
                guard.send_error(err);
            }
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                tracing::error!(scan, panic = %detail, "view walking panic");
                guard.send_error(ScanError::walker_internal(format!(
                    "panic in view walking: {detail}"
                )));
            }
        }
    });
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

///
/// TESTS
///
