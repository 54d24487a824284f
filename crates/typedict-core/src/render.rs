//! # Diagnostic Rendering
//!
//! Compact single-line text for values, used by `Display` impls and error
//! diagnostics. Not a serialization format: nothing here parses back.
//!
//! - `Null` → `NULL`, booleans → `TRUE` / `FALSE`
//! - lists → `[1, 2, 3]`, maps → `['a' => 1, 'b' => 2]`
//! - collections nested more than two levels deep → `[...]`

use std::fmt::{self, Write};

use crate::value::{Value, ValueMap};

/// Collections at this depth or deeper are elided.
const MAX_DEPTH: usize = 2;

/// Render a value as diagnostic text.
pub fn render(value: &Value) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_value(&mut out, value, 0);
    out
}

/// Render a map as diagnostic text.
pub fn render_map(map: &ValueMap) -> String {
    let mut out = String::new();
    let _ = write_map(&mut out, map, 0);
    out
}

fn write_value(out: &mut impl Write, value: &Value, depth: usize) -> fmt::Result {
    match value {
        Value::Null => out.write_str("NULL"),
        Value::Bool(true) => out.write_str("TRUE"),
        Value::Bool(false) => out.write_str("FALSE"),
        Value::Int(n) => write!(out, "{n}"),
        Value::Float(f) => write!(out, "{f}"),
        Value::String(s) => out.write_str(s),
        Value::Date(d) => out.write_str(&d.to_rfc3339()),
        Value::Object(o) => match o.get().to_text() {
            Some(text) => out.write_str(&text),
            None => write!(out, "class {}", o.class_name()),
        },
        Value::Resource(r) => write!(out, "resource({})", r.kind()),
        Value::List(items) => {
            if depth >= MAX_DEPTH {
                return out.write_str("[...]");
            }
            out.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write_value(out, item, depth + 1)?;
            }
            out.write_char(']')
        }
        Value::Map(map) => write_map(out, map, depth),
    }
}

fn write_map(out: &mut impl Write, map: &ValueMap, depth: usize) -> fmt::Result {
    if depth >= MAX_DEPTH {
        return out.write_str("[...]");
    }
    out.write_char('[')?;
    for (i, (key, item)) in map.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write!(out, "'{key}' => ")?;
        write_value(out, item, depth + 1)?;
    }
    out.write_char(']')
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, 0)
    }
}
