//! Module: db::index
//! Responsibility: the index capability model and its view-backed handles.
//! Does not own: choosing an index for a query.
//!
//! Capabilities are separate traits so an index exposes only the operations
//! it can serve. A planner asks `Index::capabilities` or the `as_*`
//! accessors instead of matching on concrete handle types.
//!
//! Every scan returns its response immediately; the walk runs on its own
//! task and reports through the response channels only.

mod primary;
mod scan;
mod stats;
mod view;


use crate::{
    db::{
        range::Range,
        response::{CountResponse, IndexResponse},
    },
    error::ScanError,
    value::CompositeValue,
};
use async_trait::async_trait;

pub use primary::{PRIMARY_INDEX_NAME, PrimaryViewIndex};
pub use stats::RangeStatistics;
pub use view::ViewIndex;

///
/// IndexType
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum IndexType {
    #[default]
    Unspecified,
    View,
}

///
/// Direction
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

///
/// RangePart
///
/// One range-key component: the indexed expression and its sort direction.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RangePart {
    pub expr: String,
    pub dir: Direction,
}

impl RangePart {
    #[must_use]
    pub fn asc(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            dir: Direction::Asc,
        }
    }
}

///
/// IndexCapabilities
///
/// Which capability traits an index handle serves.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[expect(clippy::struct_excessive_bools)]
pub struct IndexCapabilities {
    pub primary: bool,
    pub equal: bool,
    pub range: bool,
    pub dual: bool,
    pub ordered: bool,
}

impl IndexCapabilities {
    /// Whether range candidate-bound queries (`*_candidate_mins/maxes`) are served.
    #[must_use]
    pub const fn supports_candidate_bounds(self) -> bool {
        self.range || self.dual
    }
}

///
/// Index
///
/// Identity and lifecycle shared by every index variant.
///

#[async_trait]
pub trait Index: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn index_type(&self) -> IndexType;

    /// Expressions matched exactly, in key order.
    fn equal_key(&self) -> &[String];

    /// Expressions scanned by range, in key order after the equal key.
    fn range_key(&self) -> &[RangePart];

    /// Drop the index. The primary index can never be dropped.
    async fn drop_index(&self) -> Result<(), ScanError>;

    fn as_primary(&self) -> Option<&dyn PrimaryIndex> {
        None
    }

    fn as_equal(&self) -> Option<&dyn EqualIndex> {
        None
    }

    fn as_range(&self) -> Option<&dyn RangeIndex> {
        None
    }

    fn as_dual(&self) -> Option<&dyn DualIndex> {
        None
    }

    fn capabilities(&self) -> IndexCapabilities {
        let range = self.as_range();
        let dual = self.as_dual();

        IndexCapabilities {
            primary: self.as_primary().is_some(),
            equal: self.as_equal().is_some(),
            range: range.is_some(),
            dual: dual.is_some(),
            ordered: range.is_some_and(|index| index.ordered())
                || dual.is_some_and(|index| index.ordered()),
        }
    }
}

///
/// EqualIndex
///
/// Exact-match lookups over the equal key.
///

pub trait EqualIndex: Index {
    /// Entries whose key starts with `key`; `limit == 0` is unbounded.
    fn equal_scan(&self, key: &CompositeValue, limit: u64) -> IndexResponse;

    /// Number of entries whose key starts with `key`.
    fn equal_count(&self, key: &CompositeValue) -> CountResponse;
}

///
/// PrimaryIndex
///
/// Every document of the collection, keyed by document id.
///

pub trait PrimaryIndex: EqualIndex {
    /// Unfiltered walk over every entry; `limit == 0` is unbounded.
    fn bucket_scan(&self, limit: u64) -> IndexResponse;

    /// Number of documents in the collection.
    fn bucket_count(&self) -> CountResponse;
}

///
/// RangeIndex
///
/// Unrestricted range queries over the full index key.
///

#[async_trait]
pub trait RangeIndex: Index {
    async fn range_stats(&self, range: &Range) -> Result<RangeStatistics, ScanError>;

    fn range_scan(&self, range: &Range, limit: u64) -> IndexResponse;

    fn range_count(&self, range: &Range) -> CountResponse;

    /// Anywhere from the single minimum entry to the full `range_scan`.
    /// Callers must post-filter; the output is a candidate superset.
    fn range_candidate_mins(&self, range: &Range) -> IndexResponse;

    /// Anywhere from the single maximum entry to the full `range_scan`.
    /// Callers must post-filter; the output is a candidate superset.
    fn range_candidate_maxes(&self, range: &Range) -> IndexResponse;

    /// Whether entries arrive in key order.
    fn ordered(&self) -> bool;
}

///
/// DualIndex
///
/// Range queries restricted by an exact-match prefix over the equal key.
///

#[async_trait]
pub trait DualIndex: Index {
    async fn dual_stats(
        &self,
        key: &CompositeValue,
        range: &Range,
    ) -> Result<RangeStatistics, ScanError>;

    fn dual_scan(&self, key: &CompositeValue, range: &Range, limit: u64) -> IndexResponse;

    fn dual_count(&self, key: &CompositeValue, range: &Range) -> CountResponse;

    /// Anywhere from the single minimum entry to the full `dual_scan`.
    fn dual_candidate_mins(&self, key: &CompositeValue, range: &Range) -> IndexResponse;

    /// Anywhere from the single maximum entry to the full `dual_scan`.
    fn dual_candidate_maxes(&self, key: &CompositeValue, range: &Range) -> IndexResponse;

    /// Whether entries arrive in key order.
    fn ordered(&self) -> bool;
}
