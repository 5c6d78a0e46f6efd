//! JSON output format

use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};

use crate::diff::TextKeyedDiff;
use crate::error::SerializationError;

use super::OutputFormatter;

/// Formatter escaping every non-ASCII character as `\uXXXX`
pub struct AsciiFormatter<F = CompactFormatter> {
    inner: F,
}

impl AsciiFormatter {
    pub fn compact() -> Self {
        Self {
            inner: CompactFormatter,
        }
    }
}

impl AsciiFormatter<PrettyFormatter<'static>> {
    pub fn pretty() -> Self {
        Self {
            inner: PrettyFormatter::new(),
        }
    }
}

impl<F: Formatter> Formatter for AsciiFormatter<F> {
    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

fn serialize_with<T: Serialize, F: Formatter>(
    value: &T,
    formatter: F,
) -> std::result::Result<String, SerializationError> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(out)?)
}

/// Compact JSON with non-ASCII characters escaped
pub fn to_ascii_json<T: Serialize>(value: &T) -> std::result::Result<String, SerializationError> {
    serialize_with(value, AsciiFormatter::compact())
}

/// Indented JSON with non-ASCII characters escaped
pub fn to_ascii_json_pretty<T: Serialize>(
    value: &T,
) -> std::result::Result<String, SerializationError> {
    serialize_with(value, AsciiFormatter::pretty())
}

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn render(&self, diff: &TextKeyedDiff, writer: &mut dyn Write) -> Result<()> {
        let json = if self.pretty {
            to_ascii_json_pretty(diff)?
        } else {
            to_ascii_json(diff)?
        };
        writeln!(writer, "{}", json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    #[test]
    fn test_escapes_non_ascii_as_surrogate_pairs() {
        assert_eq!(to_ascii_json(&"🍺").unwrap(), r#""\ud83c\udf7a""#);
        assert_eq!(to_ascii_json(&"café").unwrap(), r#""caf\u00e9""#);
        assert_eq!(to_ascii_json(&"plain \"q\"").unwrap(), r#""plain \"q\"""#);
    }

    #[test]
    fn test_non_finite_floats_fall_back_to_strings() {
        assert_eq!(
            to_ascii_json(&CellValue::Float(f64::INFINITY)).unwrap(),
            r#""inf""#
        );
        assert_eq!(
            to_ascii_json(&CellValue::Float(f64::NEG_INFINITY)).unwrap(),
            r#""-inf""#
        );
        assert_eq!(to_ascii_json(&CellValue::Float(f64::NAN)).unwrap(), "null");
        assert_eq!(to_ascii_json(&CellValue::Float(3.1)).unwrap(), "3.1");
    }

    #[test]
    fn test_pretty_keeps_escaping() {
        let json = to_ascii_json_pretty(&vec!["ü"]).unwrap();
        assert_eq!(json, "[\n  \"\\u00fc\"\n]");
    }
}
