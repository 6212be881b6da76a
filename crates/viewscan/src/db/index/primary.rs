use crate::{
    config::ScanConfig,
    db::{
        index::{
            EqualIndex, Index, IndexType, PrimaryIndex, RangePart,
            scan::{spawn_count_scan, spawn_entry_scan, spawn_total_rows},
        },
        range::prefix_view_options,
        response::{CountResponse, IndexResponse},
        view::ViewOptions,
        walk::ViewTarget,
    },
    error::ScanError,
    value::CompositeValue,
};
use async_trait::async_trait;

/// Name every primary index is published under.
pub const PRIMARY_INDEX_NAME: &str = "#primary";

/// Expression the primary index is keyed on.
const PRIMARY_KEY_EXPR: &str = "META().id";

///
/// PrimaryViewIndex
///
/// Every document of a collection, backed by a view whose key is the
/// encoded document id. Cannot be dropped.
///

#[derive(Clone, Debug)]
pub struct PrimaryViewIndex {
    id: String,
    equal_key: Vec<String>,
    target: ViewTarget,
    config: ScanConfig,
}

impl PrimaryViewIndex {
    #[must_use]
    pub fn new(target: ViewTarget, config: ScanConfig) -> Self {
        Self {
            id: format!("{}/{}", target.design_doc, target.view),
            equal_key: vec![PRIMARY_KEY_EXPR.to_string()],
            target,
            config,
        }
    }

    #[must_use]
    pub const fn target(&self) -> &ViewTarget {
        &self.target
    }
}

#[async_trait]
impl Index for PrimaryViewIndex {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        PRIMARY_INDEX_NAME
    }

    fn index_type(&self) -> IndexType {
        IndexType::View
    }

    fn equal_key(&self) -> &[String] {
        &self.equal_key
    }

    fn range_key(&self) -> &[RangePart] {
        &[]
    }

    async fn drop_index(&self) -> Result<(), ScanError> {
        Err(ScanError::index_unsupported("primary index cannot be dropped"))
    }

    fn as_primary(&self) -> Option<&dyn PrimaryIndex> {
        Some(self)
    }

    fn as_equal(&self) -> Option<&dyn EqualIndex> {
        Some(self)
    }
}

impl EqualIndex for PrimaryViewIndex {
    fn equal_scan(&self, key: &CompositeValue, limit: u64) -> IndexResponse {
        spawn_entry_scan(
            "primary_equal_scan",
            &self.target,
            &self.config,
            prefix_view_options(key),
            limit,
        )
    }

    fn equal_count(&self, key: &CompositeValue) -> CountResponse {
        spawn_count_scan(
            "primary_equal_count",
            &self.target,
            &self.config,
            prefix_view_options(key),
        )
    }
}

impl PrimaryIndex for PrimaryViewIndex {
    fn bucket_scan(&self, limit: u64) -> IndexResponse {
        spawn_entry_scan(
            "bucket_scan",
            &self.target,
            &self.config,
            Ok(ViewOptions::default()),
            limit,
        )
    }

    fn bucket_count(&self) -> CountResponse {
        spawn_total_rows("bucket_count", &self.target, &self.config)
    }
}
