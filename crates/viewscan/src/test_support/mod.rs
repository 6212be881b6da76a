//! Module: test_support
//! Responsibility: an in-memory view engine with fault injection for walker
//! and index tests.
//! Does not own: view map functions; rows are inserted pre-keyed.

use crate::{
    db::{
        key::encode_composite_key,
        view::{ViewError, ViewOptions, ViewResult, ViewRow, ViewStore},
        walk::ViewTarget,
    },
    value::Value,
};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Arc, Mutex},
};

pub(crate) const DESIGN_DOC: &str = "ddl_test";
pub(crate) const VIEW: &str = "by_key";

///
/// Fault
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Fault {
    Transport,
    Panic,
}

#[derive(Debug, Default)]
struct State {
    views: HashMap<(String, String), Vec<ViewRow>>,
    queries: Vec<ViewOptions>,
    faults: HashMap<usize, Fault>,
}

///
/// MemoryViewStore
///
/// Rows are kept ordered by JSON collation of the key, then document id.
/// Requests follow view-engine range semantics: inclusive `(key, docid)`
/// bounds, with a docid bound only applying to rows equal to its key.
///

#[derive(Debug, Default)]
pub(crate) struct MemoryViewStore {
    state: Mutex<State>,
}

impl MemoryViewStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert one row keyed by the encoding of `key` into the default view.
    pub(crate) fn insert(&self, id: &str, key: &[Value]) {
        let key = encode_composite_key(key).expect("test keys must encode");
        self.insert_raw(DESIGN_DOC, VIEW, ViewRow::new(id, key));
    }

    /// Insert one row with an arbitrary physical key.
    pub(crate) fn insert_raw(&self, design_doc: &str, view: &str, row: ViewRow) {
        let mut state = self.state.lock().expect("store lock");
        let rows = state
            .views
            .entry((design_doc.to_string(), view.to_string()))
            .or_default();
        let at = rows.partition_point(|existing| row_order(existing, &row) == Ordering::Less);
        rows.insert(at, row);
    }

    /// Make the `nth` query (1-based) fail with a transport error.
    pub(crate) fn fail_on_query(&self, nth: usize) {
        self.state
            .lock()
            .expect("store lock")
            .faults
            .insert(nth, Fault::Transport);
    }

    /// Make the `nth` query (1-based) panic.
    pub(crate) fn panic_on_query(&self, nth: usize) {
        self.state
            .lock()
            .expect("store lock")
            .faults
            .insert(nth, Fault::Panic);
    }

    /// Every request received so far, in order.
    pub(crate) fn queries(&self) -> Vec<ViewOptions> {
        self.state.lock().expect("store lock").queries.clone()
    }

    pub(crate) fn has_view(&self, design_doc: &str, view: &str) -> bool {
        self.state
            .lock()
            .expect("store lock")
            .views
            .contains_key(&(design_doc.to_string(), view.to_string()))
    }

    pub(crate) fn target(self: &Arc<Self>) -> ViewTarget {
        ViewTarget::new(self.clone(), DESIGN_DOC, VIEW)
    }
}

#[async_trait]
impl ViewStore for MemoryViewStore {
    async fn query(
        &self,
        design_doc: &str,
        view: &str,
        options: &ViewOptions,
    ) -> Result<ViewResult, ViewError> {
        let (fault, result) = {
            let mut state = self.state.lock().expect("store lock");
            state.queries.push(options.clone());
            let fault = state.faults.get(&state.queries.len()).copied();

            let result = state
                .views
                .get(&(design_doc.to_string(), view.to_string()))
                .map(|rows| select_rows(rows, options))
                .ok_or_else(|| ViewError::NotFound {
                    design_doc: design_doc.to_string(),
                    view: view.to_string(),
                });

            (fault, result)
        };

        match fault {
            Some(Fault::Transport) => Err(ViewError::Transport("connection reset".into())),
            Some(Fault::Panic) => panic!("view engine exploded"),
            None => result,
        }
    }

    async fn drop_view(&self, design_doc: &str, view: &str) -> Result<(), ViewError> {
        let mut state = self.state.lock().expect("store lock");
        state
            .views
            .remove(&(design_doc.to_string(), view.to_string()))
            .map(|_| ())
            .ok_or_else(|| ViewError::NotFound {
                design_doc: design_doc.to_string(),
                view: view.to_string(),
            })
    }
}

fn select_rows(rows: &[ViewRow], options: &ViewOptions) -> ViewResult {
    let limit = options
        .limit
        .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));

    let selected = rows
        .iter()
        .filter(|row| after_start(row, options) && before_end(row, options))
        .take(limit)
        .cloned()
        .collect();

    ViewResult {
        total_rows: rows.len() as u64,
        rows: selected,
    }
}

fn after_start(row: &ViewRow, options: &ViewOptions) -> bool {
    let Some(start) = &options.startkey else {
        return true;
    };

    match collate_json(&row.key, start) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => options
            .startkey_docid
            .as_deref()
            .is_none_or(|docid| row.id.as_str() >= docid),
    }
}

fn before_end(row: &ViewRow, options: &ViewOptions) -> bool {
    let Some(end) = &options.endkey else {
        return true;
    };

    match collate_json(&row.key, end) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => options
            .endkey_docid
            .as_deref()
            .is_none_or(|docid| row.id.as_str() <= docid),
    }
}

fn row_order(left: &ViewRow, right: &ViewRow) -> Ordering {
    collate_json(&left.key, &right.key).then_with(|| left.id.cmp(&right.id))
}

/// View-engine JSON collation: null, false, true, numbers, strings, arrays
/// (elementwise, then length), objects (pairwise, then length).
pub(crate) fn collate_json(left: &JsonValue, right: &JsonValue) -> Ordering {
    json_rank(left)
        .cmp(&json_rank(right))
        .then_with(|| match (left, right) {
            (JsonValue::Number(a), JsonValue::Number(b)) => {
                let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            (JsonValue::String(a), JsonValue::String(b)) => a.cmp(b),
            (JsonValue::Array(a), JsonValue::Array(b)) => a
                .iter()
                .zip(b)
                .map(|(x, y)| collate_json(x, y))
                .find(|ord| ord.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (JsonValue::Object(a), JsonValue::Object(b)) => a
                .iter()
                .zip(b)
                .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| collate_json(va, vb)))
                .find(|ord| ord.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ => Ordering::Equal,
        })
}

const fn json_rank(value: &JsonValue) -> u8 {
    match value {
        JsonValue::Null => 0,
        JsonValue::Bool(false) => 1,
        JsonValue::Bool(true) => 2,
        JsonValue::Number(_) => 3,
        JsonValue::String(_) => 4,
        JsonValue::Array(_) => 5,
        JsonValue::Object(_) => 6,
    }
}
