//! Module: db::view
//! Responsibility: the view-engine request/response contract.
//! Does not own: transport, retries, or authentication (owned by `ViewStore`
//! implementations).
//! Boundary: walkers and index handles only talk to the view engine through
//! `ViewStore`.

mod options;

use crate::error::ScanError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::LazyLock;
use thiserror::Error as ThisError;

pub use options::ViewOptions;

///
/// CONSTANTS
///

/// Smallest document identifier; an excluded upper bound pins `endkey_docid` here.
pub const MIN_DOC_ID: &str = "";

// 63 × U+10FFFF is 252 bytes, past the 250-byte identifier limit.
const MAX_DOC_ID_CHARS: usize = 63;

static MAX_DOC_ID: LazyLock<String> =
    LazyLock::new(|| char::MAX.to_string().repeat(MAX_DOC_ID_CHARS));

/// Largest document identifier; an excluded lower bound pins
/// `startkey_docid` here so rows equal to the bound key sort before it.
#[must_use]
pub fn max_doc_id() -> &'static str {
    MAX_DOC_ID.as_str()
}

///
/// ViewError
///
/// Failure of one view-engine request.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ViewError {
    #[error("view transport failure: {0}")]
    Transport(String),

    #[error("view request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("view '{design_doc}/{view}' not found")]
    NotFound { design_doc: String, view: String },
}

impl From<ViewError> for ScanError {
    fn from(err: ViewError) -> Self {
        Self::view_transport(format!("unable to access view: {err}"))
    }
}

///
/// ViewRow
///
/// One row of a view response: the physical key and the emitting document.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ViewRow {
    pub id: String,
    pub key: JsonValue,
    #[serde(default)]
    pub value: JsonValue,
}

impl ViewRow {
    #[must_use]
    pub fn new(id: impl Into<String>, key: JsonValue) -> Self {
        Self {
            id: id.into(),
            key,
            value: JsonValue::Null,
        }
    }
}

///
/// ViewResult
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ViewResult {
    /// Rows in the whole view, independent of request bounds.
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub rows: Vec<ViewRow>,
}

///
/// ViewStore
///
/// Access to a view-indexing engine. Range requests are inclusive on
/// `(key, docid)` pairs; rows come back ordered by key, then document id.
///

#[async_trait]
pub trait ViewStore: Send + Sync {
    async fn query(
        &self,
        design_doc: &str,
        view: &str,
        options: &ViewOptions,
    ) -> Result<ViewResult, ViewError>;

    async fn drop_view(&self, design_doc: &str, view: &str) -> Result<(), ViewError>;

    /// Human-readable request line used for network logging.
    fn describe_request(&self, design_doc: &str, view: &str, options: &ViewOptions) -> String {
        format!(
            "_design/{design_doc}/_view/{view}?{}",
            options.to_query_string()
        )
    }
}
