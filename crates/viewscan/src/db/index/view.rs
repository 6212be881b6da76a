use crate::{
    config::ScanConfig,
    db::{
        index::{
            DualIndex, EqualIndex, Index, IndexType, RangeIndex, RangePart, RangeStatistics,
            scan::{collect_range_statistics, spawn_count_scan, spawn_entry_scan},
        },
        range::{Range, prefix_view_options},
        response::{CountResponse, IndexResponse},
        walk::ViewTarget,
    },
    error::ScanError,
    value::CompositeValue,
};
use async_trait::async_trait;

///
/// ViewIndex
///
/// Secondary index backed by one view whose keys are encoded
/// `equal_key ++ range_key` composites. Serves equality, range, and dual
/// (equality prefix plus range) lookups in key order.
///

#[derive(Clone, Debug)]
pub struct ViewIndex {
    id: String,
    name: String,
    equal_key: Vec<String>,
    range_key: Vec<RangePart>,
    target: ViewTarget,
    config: ScanConfig,
}

impl ViewIndex {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        target: ViewTarget,
        equal_key: Vec<String>,
        range_key: Vec<RangePart>,
        config: ScanConfig,
    ) -> Self {
        Self {
            id: format!("{}/{}", target.design_doc, target.view),
            name: name.into(),
            equal_key,
            range_key,
            target,
            config,
        }
    }

    #[must_use]
    pub const fn target(&self) -> &ViewTarget {
        &self.target
    }

    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }
}

#[async_trait]
impl Index for ViewIndex {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn index_type(&self) -> IndexType {
        IndexType::View
    }

    fn equal_key(&self) -> &[String] {
        &self.equal_key
    }

    fn range_key(&self) -> &[RangePart] {
        &self.range_key
    }

    async fn drop_index(&self) -> Result<(), ScanError> {
        tracing::info!(index = %self.name, id = %self.id, "dropping view index");
        self.target
            .store
            .drop_view(&self.target.design_doc, &self.target.view)
            .await?;

        Ok(())
    }

    fn as_equal(&self) -> Option<&dyn EqualIndex> {
        Some(self)
    }

    fn as_range(&self) -> Option<&dyn RangeIndex> {
        Some(self)
    }

    fn as_dual(&self) -> Option<&dyn DualIndex> {
        Some(self)
    }
}

impl EqualIndex for ViewIndex {
    fn equal_scan(&self, key: &CompositeValue, limit: u64) -> IndexResponse {
        spawn_entry_scan(
            "equal_scan",
            &self.target,
            &self.config,
            prefix_view_options(key),
            limit,
        )
    }

    fn equal_count(&self, key: &CompositeValue) -> CountResponse {
        spawn_count_scan(
            "equal_count",
            &self.target,
            &self.config,
            prefix_view_options(key),
        )
    }
}

#[async_trait]
impl RangeIndex for ViewIndex {
    async fn range_stats(&self, range: &Range) -> Result<RangeStatistics, ScanError> {
        collect_range_statistics(&self.target, &self.config, range.to_view_options()).await
    }

    fn range_scan(&self, range: &Range, limit: u64) -> IndexResponse {
        spawn_entry_scan(
            "range_scan",
            &self.target,
            &self.config,
            range.to_view_options(),
            limit,
        )
    }

    fn range_count(&self, range: &Range) -> CountResponse {
        spawn_count_scan(
            "range_count",
            &self.target,
            &self.config,
            range.to_view_options(),
        )
    }

    fn range_candidate_mins(&self, range: &Range) -> IndexResponse {
        spawn_entry_scan(
            "range_candidate_mins",
            &self.target,
            &self.config,
            range.to_view_options(),
            1,
        )
    }

    fn range_candidate_maxes(&self, range: &Range) -> IndexResponse {
        spawn_entry_scan(
            "range_candidate_maxes",
            &self.target,
            &self.config,
            range.to_view_options(),
            0,
        )
    }

    fn ordered(&self) -> bool {
        true
    }
}

#[async_trait]
impl DualIndex for ViewIndex {
    async fn dual_stats(
        &self,
        key: &CompositeValue,
        range: &Range,
    ) -> Result<RangeStatistics, ScanError> {
        collect_range_statistics(
            &self.target,
            &self.config,
            range.to_view_options_with_prefix(key),
        )
        .await
    }

    fn dual_scan(&self, key: &CompositeValue, range: &Range, limit: u64) -> IndexResponse {
        spawn_entry_scan(
            "dual_scan",
            &self.target,
            &self.config,
            range.to_view_options_with_prefix(key),
            limit,
        )
    }

    fn dual_count(&self, key: &CompositeValue, range: &Range) -> CountResponse {
        spawn_count_scan(
            "dual_count",
            &self.target,
            &self.config,
            range.to_view_options_with_prefix(key),
        )
    }

    fn dual_candidate_mins(&self, key: &CompositeValue, range: &Range) -> IndexResponse {
        spawn_entry_scan(
            "dual_candidate_mins",
            &self.target,
            &self.config,
            range.to_view_options_with_prefix(key),
            1,
        )
    }

    fn dual_candidate_maxes(&self, key: &CompositeValue, range: &Range) -> IndexResponse {
        spawn_entry_scan(
            "dual_candidate_maxes",
            &self.target,
            &self.config,
            range.to_view_options_with_prefix(key),
            0,
        )
    }

    fn ordered(&self) -> bool {
        true
    }
}
