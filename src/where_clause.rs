use crate::{FieldValue, Predicate, Result, SqlWriter, Value};

/// A compiled WHERE fragment: SQL text with `?` placeholders plus the bound
/// values in left-to-right order.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SqlWhere {
    pub text: String,
    pub values: Vec<Value>,
}

impl SqlWhere {
    /// Compile an ordered set of `(column, value)` pairs into one clause,
    /// joining the fields with AND.
    ///
    /// A plain scalar becomes `"column" = ?`; a predicate supplies its own
    /// operator and fragment; a group expands recursively, applying each
    /// member to the same column.
    pub fn build<'a>(
        writer: &dyn SqlWriter,
        fields: impl IntoIterator<Item = (&'a str, &'a FieldValue)>,
    ) -> Result<SqlWhere> {
        let mut clause = SqlWhere::default();
        for (column, value) in fields {
            if !clause.text.is_empty() {
                clause.text.push_str(" AND ");
            }
            clause.push_condition(writer, column, value)?;
        }
        Ok(clause)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append one condition for `column`. Recursive through groups; depth is
    /// bounded only by the caller-constructed tree.
    fn push_condition(
        &mut self,
        writer: &dyn SqlWriter,
        column: &str,
        value: &FieldValue,
    ) -> Result<()> {
        match value {
            FieldValue::Scalar(v) => {
                writer.write_identifier_quoted(&mut self.text, column);
                self.text.push_str(" = ?");
                self.values.push(v.clone());
            }
            FieldValue::Predicate(Predicate::Group { items, operator }) => {
                // Constructors refuse empty groups, but a group arriving
                // through another path must still fail loudly rather than
                // render a vacuous truth.
                if items.is_empty() {
                    return Err(crate::Error::msg(
                        "SqlWhere: empty predicate group, broken filter?",
                    ));
                }
                self.text.push_str("( ");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.text.push(' ');
                        self.text.push_str(operator.as_sql());
                        self.text.push(' ');
                    }
                    self.push_condition(writer, column, item)?;
                }
                self.text.push_str(" )");
            }
            FieldValue::Predicate(predicate) => {
                writer.write_identifier_quoted(&mut self.text, column);
                self.text.push(' ');
                self.text.push_str(predicate.operator_sql()?);
                self.text.push(' ');
                predicate.write_fragment(&mut self.text)?;
                self.values
                    .extend(predicate.placeholder_values().iter().cloned());
            }
        }
        Ok(())
    }
}
