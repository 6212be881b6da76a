//! Module: db::index::scan
//! Responsibility: start guarded entry, count, and total-row scans for index
//! handles, plus the streaming walk behind range statistics.
//! Does not own: range lowering or walk pagination.

use crate::{
    config::ScanConfig,
    db::{
        index::{RangeStatistics, stats::StatsAccumulator},
        key::{KeyCodecError, decode_composite_key},
        response::{CountResponse, Delivery, IndexEntry, IndexResponse, ScanSender, scan_channel},
        view::ViewOptions,
        walk::{
            ViewPager, ViewTarget, WalkStop, WalkSummary, count_view_rows, spawn_guarded,
            view_total_rows, walk_view_in_batches,
        },
    },
    error::ScanError,
};
use tokio_util::sync::CancellationToken;

/// Lowered view options, or the codec failure that prevented lowering.
pub(super) type Lowered = Result<ViewOptions, KeyCodecError>;

/// Start an entry-producing walk; a lowering failure becomes the scan's
/// fatal error.
pub(super) fn spawn_entry_scan(
    scan: &'static str,
    target: &ViewTarget,
    config: &ScanConfig,
    options: Lowered,
    limit: u64,
) -> IndexResponse {
    let (sender, response) = scan_channel(config.channel_capacity);
    let target = target.clone();
    let batch_size = config.batch_size;

    spawn_guarded(scan, sender, move |sender| {
        run_entry_scan(target, options, batch_size, limit, sender)
    });

    response
}

/// Start a counting walk that delivers one count.
pub(super) fn spawn_count_scan(
    scan: &'static str,
    target: &ViewTarget,
    config: &ScanConfig,
    options: Lowered,
) -> CountResponse {
    let (sender, response) = scan_channel(config.channel_capacity);
    let target = target.clone();
    let batch_size = config.batch_size;

    spawn_guarded(scan, sender, move |sender| {
        run_count_scan(target, options, batch_size, sender)
    });

    response
}

/// Start a single `limit = 0` request that delivers the view's total rows.
pub(super) fn spawn_total_rows(
    scan: &'static str,
    target: &ViewTarget,
    config: &ScanConfig,
) -> CountResponse {
    let (sender, response) = scan_channel(config.channel_capacity);
    let target = target.clone();

    spawn_guarded(scan, sender, move |sender| run_total_rows(target, sender));

    response
}

async fn run_entry_scan(
    target: ViewTarget,
    options: Lowered,
    batch_size: u64,
    limit: u64,
    sender: ScanSender<IndexEntry>,
) -> Result<WalkSummary, ScanError> {
    let options = options?;

    walk_view_in_batches(target, options, batch_size, limit, &sender).await
}

async fn run_count_scan(
    target: ViewTarget,
    options: Lowered,
    batch_size: u64,
    sender: ScanSender<u64>,
) -> Result<WalkSummary, ScanError> {
    let options = options?;
    let count = count_view_rows(target, options, batch_size, sender.cancel_token()).await?;
    let Some(count) = count else {
        return Ok(single_delivery_summary(Delivery::Cancelled));
    };

    let delivery = sender.send_entry(count).await;

    Ok(single_delivery_summary(delivery))
}

async fn run_total_rows(
    target: ViewTarget,
    sender: ScanSender<u64>,
) -> Result<WalkSummary, ScanError> {
    let total = view_total_rows(&target, &ViewOptions::default()).await?;
    let delivery = sender.send_entry(total).await;

    Ok(single_delivery_summary(delivery))
}

const fn single_delivery_summary(delivery: Delivery) -> WalkSummary {
    let (rows_delivered, stop) = match delivery {
        Delivery::Sent => (1, WalkStop::Exhausted),
        Delivery::Cancelled => (0, WalkStop::Cancelled),
        Delivery::ConsumerGone => (0, WalkStop::ConsumerGone),
    };

    WalkSummary {
        rows_delivered,
        warnings: 0,
        pages: 0,
        stop,
    }
}

/// Walk a lowered range and summarize every decodable key as it streams.
///
/// With bins requested the range is counted first so each bin can close
/// after `ceil(total / stats_bins)` keys. Rows whose key does not decode are
/// skipped with a log warning; statistics have no warning channel.
pub(super) async fn collect_range_statistics(
    target: &ViewTarget,
    config: &ScanConfig,
    options: Lowered,
) -> Result<RangeStatistics, ScanError> {
    let options = options?;
    let total = if config.stats_bins > 0 {
        count_view_rows(
            target.clone(),
            options.clone(),
            config.batch_size,
            &CancellationToken::new(),
        )
        .await?
        .unwrap_or(0)
    } else {
        0
    };

    let mut accumulator = StatsAccumulator::new(total, config.stats_bins);
    let mut pager = ViewPager::new(target.clone(), options, config.batch_size, 0);
    while let Some(rows) = pager.next_page().await? {
        for row in rows {
            match decode_composite_key(&row.key) {
                Ok(key) => accumulator.push(&key),
                Err(err) => {
                    tracing::warn!(doc_id = %row.id, error = %err, "skipping stats row");
                }
            }
        }
    }

    let stats = accumulator.finish();
    tracing::debug!(
        design_doc = %target.design_doc,
        view = %target.view,
        keys = stats.count,
        bins = stats.bins.len(),
        pages = pager.pages(),
        "range statistics collected"
    );

    Ok(stats)
}
