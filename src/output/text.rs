//! Literal text output format

use std::fmt;
use std::hash::Hash;
use std::io::Write;

use anyhow::Result;
use indexmap::IndexMap;

use crate::diff::{DiffResult, FieldChange, TextKeyedDiff};
use crate::model::{format_float, CellValue, RowKey};

use super::OutputFormatter;

/// Values with a literal text rendering
pub trait Literal {
    fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl Literal for str {
    fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Literal for String {
    fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt_literal(f)
    }
}

impl Literal for CellValue {
    fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            v if v.is_missing() => f.write_str("null"),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => f.write_str(&format_float(*x)),
            other => write!(f, "{:?}", other.display()),
        }
    }
}

impl Literal for RowKey {
    fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Scalar(value) => value.fmt_literal(f),
            RowKey::Composite(values) => fmt_tuple(f, values.iter().map(|v| v as &dyn Literal)),
        }
    }
}

impl Literal for FieldChange {
    fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_tuple(
            f,
            [
                &self.column as &dyn Literal,
                &self.left as &dyn Literal,
                &self.right as &dyn Literal,
            ],
        )
    }
}

impl<T: Literal> Literal for Vec<T> {
    fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            item.fmt_literal(f)?;
        }
        f.write_str("]")
    }
}

impl<K: Literal, V: Literal> Literal for IndexMap<K, V> {
    fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            key.fmt_literal(f)?;
            f.write_str(": ")?;
            value.fmt_literal(f)?;
        }
        f.write_str("}")
    }
}

fn fmt_tuple<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = &'a dyn Literal>,
) -> fmt::Result {
    f.write_str("(")?;
    let mut count = 0;
    for item in items {
        if count > 0 {
            f.write_str(", ")?;
        }
        item.fmt_literal(f)?;
        count += 1;
    }
    // One-element tuples keep their trailing comma
    if count == 1 {
        f.write_str(",")?;
    }
    f.write_str(")")
}

/// Render a diff as `{"row_key": [...], "rows_added": {...}, ...}`
pub fn fmt_diff<K: Hash + Eq + Literal>(
    diff: &DiffResult<K>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let fields: [(&str, &dyn Literal); 6] = [
        ("row_key", &diff.row_key),
        ("rows_added", &diff.rows_added),
        ("rows_removed", &diff.rows_removed),
        ("rows_changed", &diff.rows_changed),
        ("cols_added", &diff.columns_added),
        ("cols_removed", &diff.columns_removed),
    ];

    f.write_str("{")?;
    for (i, (name, value)) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        name.fmt_literal(f)?;
        f.write_str(": ")?;
        value.fmt_literal(f)?;
    }
    f.write_str("}")
}

/// Canonical text output formatter
#[derive(Default)]
pub struct TextOutput;

impl TextOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for TextOutput {
    fn render(&self, diff: &TextKeyedDiff, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "{}", diff)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Lit<'a, T: ?Sized>(&'a T);

    impl<T: Literal + ?Sized> fmt::Display for Lit<'_, T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fmt_literal(f)
        }
    }

    #[test]
    fn test_scalar_literals() {
        assert_eq!(Lit(&CellValue::from("$6.00")).to_string(), r#""$6.00""#);
        assert_eq!(Lit(&CellValue::Float(4.9)).to_string(), "4.9");
        assert_eq!(Lit(&CellValue::Int(3)).to_string(), "3");
        assert_eq!(Lit(&CellValue::Null).to_string(), "null");
        assert_eq!(Lit(&CellValue::from("🍺")).to_string(), "\"🍺\"");
    }

    #[test]
    fn test_composite_key_renders_as_tuple() {
        assert_eq!(
            Lit(&RowKey::from(["1A", "beer"])).to_string(),
            r#"("1A", "beer")"#
        );
        assert_eq!(Lit(&RowKey::from("1A")).to_string(), r#""1A""#);
    }

    #[test]
    fn test_one_element_tuple_keeps_trailing_comma() {
        let key = RowKey::Composite(vec![CellValue::from("x")]);
        assert_eq!(Lit(&key).to_string(), r#"("x",)"#);
    }

    #[test]
    fn test_field_change_renders_as_triple() {
        let change = FieldChange::new("price", "$6.00".into(), "$5.25".into());
        assert_eq!(
            Lit(&change).to_string(),
            r#"("price", "$6.00", "$5.25")"#
        );
    }
}
