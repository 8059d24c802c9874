//! Offset/limit windows and cursor connections over resolved lists.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use graphgate_proto::Value;

use crate::config::LimitConfig;
use crate::error::PaginationError;

const CURSOR_PREFIX: &str = "cursor:";

/// Apply `offset` then `limit` to a list.
///
/// A missing or non-positive offset skips nothing. A missing limit resolves like a
/// negative one, to the configured default.
pub fn paginate<T>(
    items: Vec<T>,
    offset: Option<i64>,
    limit: Option<i64>,
    limits: &LimitConfig,
) -> Vec<T> {
    let skip = offset
        .filter(|o| *o > 0)
        .map(|o| usize::try_from(o).unwrap_or(usize::MAX))
        .unwrap_or(0);
    let take = limits.apply(limit.unwrap_or(-1));
    items.into_iter().skip(skip).take(take).collect()
}

/// Turns list positions into opaque cursors and back.
pub trait CursorCodec: Send + Sync {
    fn encode(&self, index: usize) -> String;

    fn decode(&self, cursor: &str) -> Result<usize, PaginationError>;
}

/// Cursor that carries the position itself: base64 of `cursor:{index}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetCursor;

impl CursorCodec for OffsetCursor {
    fn encode(&self, index: usize) -> String {
        STANDARD.encode(format!("{CURSOR_PREFIX}{index}"))
    }

    fn decode(&self, cursor: &str) -> Result<usize, PaginationError> {
        let bytes = STANDARD
            .decode(cursor)
            .map_err(|e| PaginationError::InvalidCursor(format!("invalid cursor encoding: {e}")))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| PaginationError::InvalidCursor("cursor is not valid UTF-8".into()))?;
        text.strip_prefix(CURSOR_PREFIX)
            .and_then(|index| index.parse().ok())
            .ok_or_else(|| PaginationError::InvalidCursor(format!("invalid cursor format: {text}")))
    }
}

/// Relay connection arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionArgs {
    pub first: Option<i64>,
    pub after: Option<String>,
    pub last: Option<i64>,
    pub before: Option<String>,
}

impl ConnectionArgs {
    /// Read `first`, `after`, `last` and `before` from resolved field arguments.
    ///
    /// Values of the wrong type are ignored.
    pub fn from_arguments(arguments: &BTreeMap<String, Value>) -> Self {
        let int = |name: &str| arguments.get(name).and_then(Value::as_i64);
        let string = |name: &str| arguments.get(name).and_then(Value::as_str).map(str::to_owned);
        Self {
            first: int("first"),
            after: string("after"),
            last: int("last"),
            before: string("before"),
        }
    }

    pub fn with_first(mut self, first: i64) -> Self {
        self.first = Some(first);
        self
    }

    pub fn with_after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn with_last(mut self, last: i64) -> Self {
        self.last = Some(last);
        self
    }

    pub fn with_before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionEdge<E> {
    pub cursor: String,
    pub node: E,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// One page of a list with per-item cursors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<E> {
    pub edges: Vec<ConnectionEdge<E>>,
    pub page_info: PageInfo,
}

impl<E> Connection<E> {
    pub fn nodes(&self) -> impl Iterator<Item = &E> {
        self.edges.iter().map(|edge| &edge.node)
    }
}

fn non_negative(n: i64) -> usize {
    usize::try_from(n.max(0)).unwrap_or(usize::MAX)
}

/// Cut a connection window out of `items`.
///
/// `after` and `before` bound the window first (exclusive on both sides, clamped
/// to the list), then `first` keeps the head of the window and `last` its tail.
pub fn connection<E>(
    items: Vec<E>,
    args: &ConnectionArgs,
    codec: &dyn CursorCodec,
) -> Result<Connection<E>, PaginationError> {
    let total = items.len();

    let mut start = match &args.after {
        Some(cursor) => codec.decode(cursor)?.saturating_add(1),
        None => 0,
    };
    let end = match &args.before {
        Some(cursor) => codec.decode(cursor)?,
        None => total,
    }
    .min(total);
    start = start.min(end);

    let mut len = end - start;
    if let Some(first) = args.first {
        len = len.min(non_negative(first));
    }
    if let Some(last) = args.last {
        let last = non_negative(last);
        if last < len {
            start += len - last;
            len = last;
        }
    }

    let edges: Vec<_> = items
        .into_iter()
        .skip(start)
        .take(len)
        .enumerate()
        .map(|(i, node)| ConnectionEdge {
            cursor: codec.encode(start + i),
            node,
        })
        .collect();

    let page_info = PageInfo {
        has_next_page: start + len < total,
        has_previous_page: start > 0,
        start_cursor: edges.first().map(|e| e.cursor.clone()),
        end_cursor: edges.last().map(|e| e.cursor.clone()),
    };

    Ok(Connection { edges, page_info })
}
