use crate::{Error, Result, SqlWriter, Value};
use std::fmt::{self, Display, Formatter};

/// Comparison operator used when a predicate appears in a WHERE clause.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    #[default]
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Like,
    NotLike,
    Is,
    IsNot,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Operator taking a value list instead of a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiOperator {
    In,
    Between,
}

impl MultiOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            MultiOperator::In => "IN",
            MultiOperator::Between => "BETWEEN",
        }
    }
}

impl Display for MultiOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Operator joining the members of a predicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOperator {
    And,
    Or,
}

impl BoolOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            BoolOperator::And => "AND",
            BoolOperator::Or => "OR",
        }
    }
}

impl Display for BoolOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A composable SQL condition, usable both as a filter in a WHERE clause and
/// as a stored value standing in for a raw SQL expression.
///
/// Immutable once constructed. The fragment produced by [`Predicate::write_fragment`]
/// contains one `?` placeholder per value returned by
/// [`Predicate::placeholder_values`], in left-to-right order; the raw variant
/// performs no escaping at all and is the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Literal SQL text, rendered verbatim without placeholders.
    Raw { sql: String, operator: Operator },
    /// A single bound value compared through `operator`.
    Compare { value: Value, operator: Operator },
    /// A single-argument SQL function call, `name(?)`.
    Call {
        function: String,
        arg: Value,
        operator: Operator,
    },
    /// IN / BETWEEN over a value list.
    Multi {
        values: Vec<Value>,
        operator: MultiOperator,
    },
    /// Nested conditions over the same field, joined by AND / OR.
    Group {
        items: Vec<FieldValue>,
        operator: BoolOperator,
    },
}

/// The state of one record field: either a plain scalar or a predicate
/// standing in for a raw SQL expression. Never a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Value),
    Predicate(Predicate),
}

impl FieldValue {
    pub fn scalar(value: impl Into<Value>) -> Self {
        FieldValue::Scalar(value.into())
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            FieldValue::Scalar(v) => Some(v),
            FieldValue::Predicate(..) => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<Predicate> for FieldValue {
    fn from(value: Predicate) -> Self {
        FieldValue::Predicate(value)
    }
}

impl Predicate {
    /// Raw SQL compared with `=`, e.g. `Predicate::raw("NOW()")`.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::raw_with(sql, Operator::Equal)
    }

    pub fn raw_with(sql: impl Into<String>, operator: Operator) -> Self {
        Predicate::Raw {
            sql: sql.into(),
            operator,
        }
    }

    /// A bound value compared with `=`.
    pub fn equals(value: impl Into<Value>) -> Self {
        Self::compare(value, Operator::Equal)
    }

    pub fn compare(value: impl Into<Value>, operator: Operator) -> Self {
        Predicate::Compare {
            value: value.into(),
            operator,
        }
    }

    /// A single-argument function call compared with `=`, e.g.
    /// `Predicate::call("sha1", password)`.
    pub fn call(function: impl Into<String>, arg: impl Into<Value>) -> Self {
        Self::call_with(function, arg, Operator::Equal)
    }

    pub fn call_with(
        function: impl Into<String>,
        arg: impl Into<Value>,
        operator: Operator,
    ) -> Self {
        Predicate::Call {
            function: function.into(),
            arg: arg.into(),
            operator,
        }
    }

    /// IN / BETWEEN over `values`. Fails on wrong arity: IN requires at
    /// least one value, BETWEEN exactly two.
    pub fn multi(values: Vec<Value>, operator: MultiOperator) -> Result<Self> {
        match operator {
            MultiOperator::In if values.is_empty() => Err(Error::msg(
                "Predicate: IN operator requires at least one value",
            )),
            MultiOperator::Between if values.len() != 2 => Err(Error::msg(
                "Predicate: BETWEEN operator requires exactly two values",
            )),
            _ => Ok(Predicate::Multi { values, operator }),
        }
    }

    /// Nested conditions joined by `operator`. An empty group means a broken
    /// filter object and fails loudly instead of rendering a vacuous truth.
    pub fn group(items: Vec<FieldValue>, operator: BoolOperator) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::msg(
                "Predicate: empty group, this should not happen, broken filter?",
            ));
        }
        Ok(Predicate::Group { items, operator })
    }

    /// The comparison operator placed between the column and the fragment.
    /// Not defined for groups, which carry their own joining operator.
    pub fn operator_sql(&self) -> Result<&'static str> {
        match self {
            Predicate::Raw { operator, .. }
            | Predicate::Compare { operator, .. }
            | Predicate::Call { operator, .. } => Ok(operator.as_sql()),
            Predicate::Multi { operator, .. } => Ok(operator.as_sql()),
            Predicate::Group { .. } => Err(Error::msg(
                "Predicate: a group has no single operator, it must be expanded per member",
            )),
        }
    }

    /// Append the placeholder form of this predicate, one `?` per value of
    /// [`Self::placeholder_values`]. Groups have no flat fragment and error.
    pub fn write_fragment(&self, out: &mut String) -> Result<()> {
        match self {
            Predicate::Raw { sql, .. } => out.push_str(sql),
            Predicate::Compare { .. } => out.push('?'),
            Predicate::Call { function, .. } => {
                out.push_str(function);
                out.push_str("(?)");
            }
            Predicate::Multi { values, operator } => match operator {
                MultiOperator::In => {
                    out.push('(');
                    for i in 0..values.len() {
                        if i > 0 {
                            out.push(',');
                        }
                        out.push('?');
                    }
                    out.push(')');
                }
                MultiOperator::Between => out.push_str("? AND ?"),
            },
            Predicate::Group { .. } => {
                return Err(Error::msg(
                    "Predicate: cannot render a group as a flat fragment",
                ));
            }
        }
        Ok(())
    }

    /// Values bound to the fragment's placeholders, left to right.
    pub fn placeholder_values(&self) -> &[Value] {
        match self {
            Predicate::Raw { .. } | Predicate::Group { .. } => &[],
            Predicate::Compare { value, .. } => std::slice::from_ref(value),
            Predicate::Call { arg, .. } => std::slice::from_ref(arg),
            Predicate::Multi { values, .. } => values,
        }
    }

    /// Append the fragment with every placeholder eagerly replaced by the
    /// quoted literal of the corresponding value. Used on the write path,
    /// where a statement may be merged into a multi-row INSERT and cannot
    /// stay parameterized.
    ///
    /// The number of `?` in the fragment must match the declared values
    /// exactly; a mismatch is reported instead of producing malformed SQL.
    pub fn write_substituted(&self, writer: &dyn SqlWriter, out: &mut String) -> Result<()> {
        let mut fragment = String::new();
        self.write_fragment(&mut fragment)?;
        let values = self.placeholder_values();
        let placeholders = fragment.bytes().filter(|b| *b == b'?').count();
        if placeholders != values.len() {
            return Err(Error::msg(format!(
                "Predicate: fragment {:?} has {} placeholders but {} values",
                fragment,
                placeholders,
                values.len()
            )));
        }
        let mut values = values.iter();
        for part in fragment.split('?') {
            out.push_str(part);
            if let Some(value) = values.next() {
                writer.write_value(out, value);
            }
        }
        Ok(())
    }
}
