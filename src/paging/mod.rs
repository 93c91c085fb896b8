//! Keyset ("seek") pagination primitives.
//!
//! A page of results carries an opaque [`PageToken`] derived from the last
//! row's ordering-column values. Requesting the next page decodes the token
//! back into typed boundary values ([`KeysetComponent`]) and builds a
//! boundary [`Predicate`](crate::predicate::Predicate) selecting rows
//! strictly after (or before) that key in the query's total order.

mod error;
mod keyset;
mod result;
mod token;

pub use error::PagingError;
pub use keyset::{page_condition, KeysetComponent, SortDirection};
pub use result::PagedResult;
pub use token::{PageToken, TOKEN_DELIMITER};
