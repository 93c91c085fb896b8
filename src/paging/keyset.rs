use std::sync::Arc;

use crate::predicate::{ColumnRef, ComparisonOp, Predicate, ScalarValue};

use super::PagingError;

/// Direction a query's results are sorted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Ascending order; the boundary selects rows strictly after the key.
    Asc,
    /// Descending order; the boundary selects rows strictly before the key.
    Desc,
}

type DecodeFn =
    Arc<dyn Fn(&str) -> Result<ScalarValue, Box<dyn std::error::Error + Send + Sync>> + Send + Sync>;

/// One ordering column of the paging state: the column, the boundary value as
/// it appeared in the page token, and the decoder recovering the typed value.
///
/// The decoder is an explicit strategy function, not a trait hierarchy; it
/// must be deterministic and must be the exact inverse of the encoding that
/// produced the token component.
#[derive(Clone)]
pub struct KeysetComponent {
    column: ColumnRef,
    boundary: String,
    decode: DecodeFn,
}

impl KeysetComponent {
    /// Builds a component with a custom decoder.
    pub fn with_decoder<F>(column: ColumnRef, boundary: impl Into<String>, decode: F) -> Self
    where
        F: Fn(&str) -> Result<ScalarValue, Box<dyn std::error::Error + Send + Sync>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            column,
            boundary: boundary.into(),
            decode: Arc::new(decode),
        }
    }

    /// Builds a component whose boundary value is the string itself.
    pub fn utf8(column: ColumnRef, boundary: impl Into<String>) -> Self {
        Self::with_decoder(column, boundary, |raw| Ok(ScalarValue::from(raw)))
    }

    /// Builds a component decoding its boundary value as a signed 64-bit
    /// integer.
    pub fn int64(column: ColumnRef, boundary: impl Into<String>) -> Self {
        Self::with_decoder(column, boundary, |raw| {
            raw.parse::<i64>()
                .map(ScalarValue::Int64)
                .map_err(|err| err.into())
        })
    }

    /// Builds a component decoding its boundary value as a 64-bit float.
    pub fn float64(column: ColumnRef, boundary: impl Into<String>) -> Self {
        Self::with_decoder(column, boundary, |raw| {
            raw.parse::<f64>()
                .map(ScalarValue::Float64)
                .map_err(|err| err.into())
        })
    }

    /// The column this component orders on.
    #[must_use]
    pub fn column(&self) -> &ColumnRef {
        &self.column
    }

    /// The raw boundary value as carried in the page token.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Equality predicate on the decoded boundary value.
    pub fn eq(&self) -> Result<Predicate, PagingError> {
        self.compare(ComparisonOp::Equal)
    }

    /// Strict less-than predicate on the decoded boundary value.
    pub fn lt(&self) -> Result<Predicate, PagingError> {
        self.compare(ComparisonOp::LessThan)
    }

    /// Strict greater-than predicate on the decoded boundary value.
    pub fn gt(&self) -> Result<Predicate, PagingError> {
        self.compare(ComparisonOp::GreaterThan)
    }

    fn compare(&self, op: ComparisonOp) -> Result<Predicate, PagingError> {
        let value = (self.decode)(&self.boundary).map_err(|source| PagingError::Decode {
            column: self.column.name.to_string(),
            value: self.boundary.clone(),
            source,
        })?;
        Ok(Predicate::compare(self.column.clone(), op, value))
    }
}

impl std::fmt::Debug for KeysetComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeysetComponent")
            .field("column", &self.column)
            .field("boundary", &self.boundary)
            .finish_non_exhaustive()
    }
}

/// Builds the boundary predicate for resuming a keyset-paginated query.
///
/// For [`SortDirection::Desc`] the result is the disjunction, over each
/// component index `i`, of the equality predicates for all components before
/// `i` conjoined with a strict less-than on component `i`; equal prefixes
/// defer comparison to the next ordering column. [`SortDirection::Asc`]
/// substitutes strict greater-than.
///
/// Caller contract, not validated at runtime: the component order must match
/// the query's ORDER BY column order exactly, and the last component should
/// be backed by a unique key or results are ambiguous at value ties.
///
/// # Errors
///
/// [`PagingError::EmptyKeyset`] when `components` is empty;
/// [`PagingError::Decode`] when a boundary value fails its typed decode.
pub fn page_condition(
    direction: SortDirection,
    components: &[KeysetComponent],
) -> Result<Predicate, PagingError> {
    if components.is_empty() {
        return Err(PagingError::EmptyKeyset);
    }

    let mut disjuncts = Vec::with_capacity(components.len());
    for (index, component) in components.iter().enumerate() {
        let strict = match direction {
            SortDirection::Desc => component.lt()?,
            SortDirection::Asc => component.gt()?,
        };
        if index == 0 {
            disjuncts.push(strict);
        } else {
            let mut clauses = components[..index]
                .iter()
                .map(KeysetComponent::eq)
                .collect::<Result<Vec<_>, _>>()?;
            clauses.push(strict);
            disjuncts.push(Predicate::and(clauses));
        }
    }
    Ok(Predicate::or(disjuncts))
}
