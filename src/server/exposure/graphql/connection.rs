//! Relay connection helpers
//!
//! Cursors are offsets into the filtered, sorted collection, encoded as
//! base64 of `arrayconnection:<offset>` so that clients written against other
//! Relay servers can reuse theirs.

use async_graphql::SimpleObject;
use async_graphql::connection::{Connection, CursorType, Edge};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const CURSOR_PREFIX: &str = "arrayconnection:";

/// Position of an edge in its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetCursor(pub usize);

#[derive(Debug, thiserror::Error)]
#[error("invalid cursor")]
pub struct InvalidCursor;

impl CursorType for OffsetCursor {
    type Error = InvalidCursor;

    fn decode_cursor(s: &str) -> Result<Self, Self::Error> {
        let bytes = STANDARD.decode(s).map_err(|_| InvalidCursor)?;
        let text = String::from_utf8(bytes).map_err(|_| InvalidCursor)?;
        text.strip_prefix(CURSOR_PREFIX)
            .and_then(|offset| offset.parse().ok())
            .map(OffsetCursor)
            .ok_or(InvalidCursor)
    }

    fn encode_cursor(&self) -> String {
        STANDARD.encode(format!("{}{}", CURSOR_PREFIX, self.0))
    }
}

/// Extra connection field: size of the whole filtered collection
#[derive(SimpleObject)]
pub struct TotalCount {
    pub total_count: usize,
}

/// A page of `T` mapped into GraphQL nodes
pub type Page<N> = Connection<OffsetCursor, N, TotalCount>;

/// Slice a fully materialized collection the way Relay array connections do
///
/// `after`/`before` narrow the window first, then `first` keeps its head and
/// `last` its tail.
pub fn paginate<T, N, F>(
    records: Vec<T>,
    after: Option<OffsetCursor>,
    before: Option<OffsetCursor>,
    first: Option<usize>,
    last: Option<usize>,
    to_node: F,
) -> Page<N>
where
    N: async_graphql::OutputType,
    F: Fn(T) -> N,
{
    let total = records.len();

    let mut start = after.map(|c| c.0.saturating_add(1)).unwrap_or(0).min(total);
    let mut end = before.map(|c| c.0).unwrap_or(total).min(total).max(start);

    if let Some(first) = first {
        end = end.min(start.saturating_add(first));
    }
    if let Some(last) = last {
        start = start.max(end.saturating_sub(last));
    }

    let mut connection =
        Connection::with_additional_fields(start > 0, end < total, TotalCount { total_count: total });
    connection.edges.extend(
        records
            .into_iter()
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(offset, record)| Edge::new(OffsetCursor(offset), to_node(record))),
    );
    connection
}
