use crate::Value;
use std::fmt::Write;
use time::{Date, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($out:ident, $value:expr) => {{
        let mut buffer = ryu::Buffer::new();
        if $value.is_finite() {
            $out.push_str(buffer.format($value));
        } else {
            // Dialect-portable spelling for inf / -inf / NaN.
            let _ = write!($out, "CAST('{}' AS DOUBLE)", buffer.format($value));
        }
    }};
}

/// Dialect printer converting identifiers and values into concrete SQL text.
///
/// Every method has an ANSI default, a driver overrides only what its
/// dialect spells differently.
pub trait SqlWriter {
    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + 1;
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', r#""""#);
        out.push('"');
    }

    /// Render a concrete value as a quoted / escaped literal.
    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(out),
            Value::Boolean(Some(v), ..) => self.write_value_bool(out, *v),
            Value::Int8(Some(v), ..) => write_integer!(out, *v),
            Value::Int16(Some(v), ..) => write_integer!(out, *v),
            Value::Int32(Some(v), ..) => write_integer!(out, *v),
            Value::Int64(Some(v), ..) => write_integer!(out, *v),
            Value::Int128(Some(v), ..) => write_integer!(out, *v),
            Value::UInt8(Some(v), ..) => write_integer!(out, *v),
            Value::UInt16(Some(v), ..) => write_integer!(out, *v),
            Value::UInt32(Some(v), ..) => write_integer!(out, *v),
            Value::UInt64(Some(v), ..) => write_integer!(out, *v),
            Value::UInt128(Some(v), ..) => write_integer!(out, *v),
            Value::Float32(Some(v), ..) => write_float!(out, *v),
            Value::Float64(Some(v), ..) => write_float!(out, *v),
            Value::Decimal(Some(v), ..) => drop(write!(out, "{}", v)),
            Value::Varchar(Some(v), ..) => self.write_value_string(out, v),
            Value::Blob(Some(v), ..) => self.write_value_blob(out, v.as_ref()),
            Value::Date(Some(v), ..) => {
                out.push('\'');
                self.write_value_date(out, v);
                out.push('\'');
            }
            Value::Time(Some(v), ..) => {
                out.push('\'');
                self.write_value_time(out, v);
                out.push('\'');
            }
            Value::Timestamp(Some(v), ..) => {
                out.push('\'');
                self.write_value_date(out, &v.date());
                out.push(' ');
                self.write_value_time(out, &v.time());
                out.push('\'');
            }
            Value::TimestampWithTimezone(Some(v), ..) => {
                out.push('\'');
                self.write_value_date(out, &v.date());
                out.push(' ');
                self.write_value_time(out, &v.time());
                let _ = write!(
                    out,
                    "{:+03}:{:02}",
                    v.offset().whole_hours(),
                    v.offset().whole_minutes().unsigned_abs() % 60
                );
                out.push('\'');
            }
            Value::Uuid(Some(v), ..) => drop(write!(out, "'{}'", v)),
            _ => {
                log::error!("Cannot write {:?}", value);
            }
        };
    }

    /// Render NULL literal.
    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL");
    }

    /// Render boolean literal.
    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    /// Quote a string literal, doubling inner single quotes.
    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        out.push_str(&hex::encode_upper(value));
        out.push('\'');
    }

    fn write_value_date(&self, out: &mut String, value: &Date) {
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    fn write_value_time(&self, out: &mut String, value: &Time) {
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second()
        );
        let mut subsecond = value.nanosecond();
        if subsecond != 0 {
            let mut width = 9;
            while width > 1 && subsecond % 10 == 0 {
                subsecond /= 10;
                width -= 1;
            }
            let _ = write!(out, ".{:0width$}", subsecond, width = width);
        }
    }
}

/// ANSI SQL writer relying entirely on the trait defaults.
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Default for GenericSqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for GenericSqlWriter {}
