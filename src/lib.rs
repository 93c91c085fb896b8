#![deny(missing_docs)]
//! Paginated, cancellable streaming query layer for relational data stores.
//!
//! Two tightly coupled pieces live here: keyset ("seek") pagination, where
//! boundary predicates are built from opaque page tokens, and a cursor adapter
//! that turns a blocking, pull-based result cursor into a lazily-produced,
//! cancellable [`Stream`](futures_core::Stream) with guaranteed cleanup.
//!
//! The surrounding service supplies the query execution (a [`LazyQuery`]
//! implementation over its driver) and a Tokio runtime; it consumes
//! [`PagedResult`] pages and attaches boundary [`Predicate`]s to the next
//! page's query.

/// Keyset pagination: page tokens, paged results, boundary condition
/// construction.
pub mod paging;

/// Logical predicate tree produced by the keyset boundary builder.
pub mod predicate;

/// Blocking-cursor-to-stream adapter with cooperative cancellation.
pub mod stream;

pub use paging::{
    page_condition, KeysetComponent, PageToken, PagedResult, PagingError, SortDirection,
};
pub use predicate::{ColumnRef, ComparisonOp, Operand, Predicate, PredicateNode, ScalarValue};
pub use stream::{CursorStream, DriverError, LazyQuery, RowCursor, StreamError};
