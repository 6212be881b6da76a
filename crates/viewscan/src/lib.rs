//! Core runtime for viewscan: document values, the order-preserving view-key
//! codec, paginated view walking, and the index capability model.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod error;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Default number of rows delivered per physical view fetch.
pub const DEFAULT_BATCH_SIZE: u64 = 1_000;

/// Default capacity of each scan response channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, walkers, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::{
            index::{DualIndex, EqualIndex, Index, PrimaryIndex, RangeIndex},
            range::{Range, RangeInclusion},
            response::{CountResponse, IndexEntry, IndexResponse},
        },
        value::{CompositeValue, Value},
    };
}
