//! Logical predicate structures shared between the keyset boundary builder
//! and the query layer that renders them into SQL.
//!
//! Construction happens against logical column names only; binding the
//! predicate to a concrete query (dialect, placeholders, schema) is the
//! caller's concern. The [`Display`](std::fmt::Display) rendering is
//! SQL-shaped text intended for logging and tests, not for execution.

use std::{fmt, sync::Arc};

/// Literal values accepted by predicate operands.
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    /// Represents SQL `NULL`.
    Null,
    /// Boolean literal.
    Boolean(bool),
    /// Signed 64-bit integer.
    Int64(i64),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl ScalarValue {
    /// Returns true when the literal is the `Null` variant.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int64(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float64(value)
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Utf8(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Utf8(value.to_owned())
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => f.write_str("NULL"),
            ScalarValue::Boolean(value) => {
                f.write_str(if *value { "TRUE" } else { "FALSE" })
            }
            ScalarValue::Int64(value) => write!(f, "{value}"),
            ScalarValue::Float64(value) => write!(f, "{value}"),
            ScalarValue::Utf8(value) => write!(f, "'{}'", value.replace('\'', "''")),
        }
    }
}

/// Reference identifying a column used inside predicates.
///
/// This is a logical reference using only the column name. Physical binding
/// happens when the surrounding query is built, not at predicate
/// construction time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Canonical column name.
    pub name: Arc<str>,
}

impl ColumnRef {
    /// Creates a new column reference from a name.
    #[must_use]
    pub fn new<N>(name: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self { name: name.into() }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Operand used by predicate comparisons.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// Reference to a column.
    Column(ColumnRef),
    /// Literal value.
    Literal(ScalarValue),
}

impl From<ColumnRef> for Operand {
    fn from(value: ColumnRef) -> Self {
        Self::Column(value)
    }
}

impl From<ScalarValue> for Operand {
    fn from(value: ScalarValue) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column(column) => column.fmt(f),
            Operand::Literal(value) => value.fmt(f),
        }
    }
}

/// Comparison operator used by binary predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equals (`=`).
    Equal,
    /// Not equals (`!=`).
    NotEqual,
    /// Less than (`<`).
    LessThan,
    /// Less than or equal to (`<=`).
    LessThanOrEqual,
    /// Greater than (`>`).
    GreaterThan,
    /// Greater than or equal to (`>=`).
    GreaterThanOrEqual,
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEqual => ">=",
        })
    }
}

/// Recursive predicate node; leaf and branch variants coexist.
#[derive(Clone, Debug, PartialEq)]
pub enum PredicateNode {
    /// Binary comparison.
    Compare {
        /// Left operand.
        left: Operand,
        /// Operator.
        op: ComparisonOp,
        /// Right operand.
        right: Operand,
    },
    /// Conjunction over multiple predicates.
    And(Vec<Predicate>),
    /// Disjunction over multiple predicates.
    Or(Vec<Predicate>),
}

impl PredicateNode {
    fn is_leaf(&self) -> bool {
        matches!(self, PredicateNode::Compare { .. })
    }
}

/// Logical predicate consumed by the query layer when constructing the next
/// page's query.
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    kind: PredicateNode,
}

impl Predicate {
    /// Returns a reference to the underlying node.
    #[must_use]
    pub fn kind(&self) -> &PredicateNode {
        &self.kind
    }

    /// Builds a comparison between a column and a literal value.
    #[must_use]
    pub fn compare<V>(column: ColumnRef, op: ComparisonOp, value: V) -> Self
    where
        V: Into<ScalarValue>,
    {
        Self::from_node(PredicateNode::Compare {
            left: Operand::Column(column),
            op,
            right: Operand::Literal(value.into()),
        })
    }

    /// Builds a conjunction from the supplied clauses, flattening nested
    /// conjunctions.
    ///
    /// # Panics
    ///
    /// Panics if no clauses are provided.
    #[must_use]
    pub fn and<I>(clauses: I) -> Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        let mut acc = Vec::new();
        for clause in clauses {
            match clause.kind {
                PredicateNode::And(mut nested) => acc.append(&mut nested),
                other => acc.push(Predicate::from_node(other)),
            }
        }

        assert!(
            !acc.is_empty(),
            "Predicate::and requires at least one clause"
        );

        if acc.len() == 1 {
            acc.pop().expect("length checked")
        } else {
            Self::from_node(PredicateNode::And(acc))
        }
    }

    /// Builds a disjunction from the supplied clauses, flattening nested
    /// disjunctions.
    ///
    /// # Panics
    ///
    /// Panics if no clauses are provided.
    #[must_use]
    pub fn or<I>(clauses: I) -> Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        let mut acc = Vec::new();
        for clause in clauses {
            match clause.kind {
                PredicateNode::Or(mut nested) => acc.append(&mut nested),
                other => acc.push(Predicate::from_node(other)),
            }
        }

        assert!(
            !acc.is_empty(),
            "Predicate::or requires at least one clause"
        );

        if acc.len() == 1 {
            acc.pop().expect("length checked")
        } else {
            Self::from_node(PredicateNode::Or(acc))
        }
    }

    /// Builds a predicate directly from a single node.
    #[must_use]
    pub fn from_node(node: PredicateNode) -> Self {
        Self { kind: node }
    }

    fn fmt_child(child: &Predicate, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if child.kind.is_leaf() {
            fmt::Display::fmt(child, f)
        } else {
            write!(f, "({child})")
        }
    }

    fn fmt_joined(children: &[Predicate], sep: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, child) in children.iter().enumerate() {
            if index > 0 {
                f.write_str(sep)?;
            }
            Self::fmt_child(child, f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PredicateNode::Compare { left, op, right } => {
                write!(f, "{left} {op} {right}")
            }
            PredicateNode::And(children) => Self::fmt_joined(children, " AND ", f),
            PredicateNode::Or(children) => Self::fmt_joined(children, " OR ", f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnRef, ComparisonOp, Predicate, PredicateNode, ScalarValue};

    fn cmp_predicate(op: ComparisonOp) -> Predicate {
        Predicate::compare(ColumnRef::new("a"), op, 1i64)
    }

    #[test]
    fn comparison_op_display_renders_sql_tokens() {
        assert_eq!(ComparisonOp::Equal.to_string(), "=");
        assert_eq!(ComparisonOp::NotEqual.to_string(), "!=");
        assert_eq!(ComparisonOp::LessThan.to_string(), "<");
        assert_eq!(ComparisonOp::LessThanOrEqual.to_string(), "<=");
        assert_eq!(ComparisonOp::GreaterThan.to_string(), ">");
        assert_eq!(ComparisonOp::GreaterThanOrEqual.to_string(), ">=");
    }

    #[test]
    fn predicate_and_or_flattens_nested() {
        let a = cmp_predicate(ComparisonOp::Equal);
        let b = cmp_predicate(ComparisonOp::NotEqual);
        let nested = Predicate::from_node(PredicateNode::And(vec![a.clone(), b.clone()]));
        let combined = Predicate::and([a.clone(), nested, b.clone()]);
        match combined.kind() {
            PredicateNode::And(clauses) => assert_eq!(clauses.len(), 4),
            other => panic!("expected And, got {other:?}"),
        }

        let nested_or = Predicate::from_node(PredicateNode::Or(vec![a.clone(), b.clone()]));
        let combined_or = Predicate::or([a, nested_or, b]);
        match combined_or.kind() {
            PredicateNode::Or(clauses) => assert_eq!(clauses.len(), 4),
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn single_clause_collapses() {
        let a = cmp_predicate(ComparisonOp::LessThan);
        assert_eq!(Predicate::and([a.clone()]), a);
        assert_eq!(Predicate::or([a.clone()]), a);
    }

    #[test]
    fn scalar_display_quotes_strings() {
        assert_eq!(ScalarValue::from("abc").to_string(), "'abc'");
        assert_eq!(ScalarValue::from("o'brien").to_string(), "'o''brien'");
        assert_eq!(ScalarValue::from(42i64).to_string(), "42");
        assert_eq!(ScalarValue::from(123.45f64).to_string(), "123.45");
        assert_eq!(ScalarValue::Null.to_string(), "NULL");
        assert!(ScalarValue::Null.is_null());
    }

    #[test]
    fn predicate_display_parenthesizes_branches() {
        let eq = Predicate::compare(ColumnRef::new("foo"), ComparisonOp::Equal, "abc");
        let gt = Predicate::compare(ColumnRef::new("bar"), ComparisonOp::GreaterThan, 123.45f64);
        let lt = Predicate::compare(ColumnRef::new("foo"), ComparisonOp::LessThan, "abc");
        let or = Predicate::or([lt, Predicate::and([eq, gt])]);
        assert_eq!(
            or.to_string(),
            "foo < 'abc' OR (foo = 'abc' AND bar > 123.45)"
        );
    }
}
