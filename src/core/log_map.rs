//! Attribute maps rendered as `key="value"` pairs
//!
//! A [`LogMap`] is attached to a log call to carry structured fields. Each
//! entry renders as `key="<value>"`, entries are separated by one space and
//! nothing trails the last one. Maps can be written in their natural hash
//! order or sorted by key for reproducible output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => f.write_str("<nil>"),
        }
    }
}

impl FieldValue {
    /// Name of the value's type as shown in format error markers
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::Int(_) => "int",
            FieldValue::UInt(_) => "uint",
            FieldValue::Float(_) => "float64",
            FieldValue::Bool(_) => "bool",
            FieldValue::Null => "nil",
        }
    }
}

macro_rules! field_value_from {
    ($variant:ident: $($ty:ty),+ => $target:ty) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    FieldValue::$variant(v as $target)
                }
            }
        )+
    };
}

field_value_from!(Int: i8, i16, i32, i64, isize => i64);
field_value_from!(UInt: u8, u16, u32, u64, usize => u64);
field_value_from!(Float: f32, f64 => f64);

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<char> for FieldValue {
    fn from(c: char) -> Self {
        FieldValue::String(c.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

/// Name to value mapping attached to a log call.
///
/// # Example
///
/// ```
/// use rust_kvlog::LogMap;
///
/// let map = LogMap::new().with("y", "z").with("x", 1);
/// assert_eq!(map.to_sorted_string(), r#"x="1" y="z""#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogMap {
    fields: HashMap<String, FieldValue>,
}

impl LogMap {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: HashMap::with_capacity(capacity),
        }
    }

    /// Add a field, replacing any previous value under the same key
    #[must_use]
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field, returning the value it replaced
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<FieldValue>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keys in iteration order (unspecified)
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Write entries in hash iteration order, which may differ between calls.
    ///
    /// Returns the number of entries written.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        self.write_entries(w, false, false)
    }

    /// Write entries ordered byte-wise by key.
    ///
    /// Returns the number of entries written.
    pub fn sorted_write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        self.write_entries(w, true, false)
    }

    /// Render sorted by key into a fresh `String`
    pub fn to_sorted_string(&self) -> String {
        Sorted(self).to_string()
    }

    pub(crate) fn write_entries<W: Write + ?Sized>(
        &self,
        w: &mut W,
        sorted: bool,
        escape: bool,
    ) -> io::Result<usize> {
        if sorted {
            write_pairs(w, self.sorted_entries().into_iter(), escape)
        } else {
            write_pairs(w, self.fields.iter(), escape)
        }
    }

    fn sorted_entries(&self) -> Vec<(&String, &FieldValue)> {
        let mut entries: Vec<_> = self.fields.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

fn write_pairs<'a, W, I>(w: &mut W, entries: I, escape: bool) -> io::Result<usize>
where
    W: Write + ?Sized,
    I: Iterator<Item = (&'a String, &'a FieldValue)>,
{
    let mut count = 0;
    for (key, value) in entries {
        if count > 0 {
            w.write_all(b" ")?;
        }
        if escape {
            write_escaped(w, key)?;
        } else {
            w.write_all(key.as_bytes())?;
        }
        w.write_all(b"=\"")?;
        write_value(w, value, escape)?;
        w.write_all(b"\"")?;
        count += 1;
    }
    Ok(count)
}

pub(crate) fn write_value<W: Write + ?Sized>(
    w: &mut W,
    value: &FieldValue,
    escape: bool,
) -> io::Result<()> {
    match value {
        FieldValue::String(s) if escape => write_escaped(w, s),
        FieldValue::String(s) => w.write_all(s.as_bytes()),
        other => write!(w, "{}", other),
    }
}

/// Write `s` with `"`, `\` and line control characters backslash-escaped
pub(crate) fn write_escaped<W: Write + ?Sized>(w: &mut W, s: &str) -> io::Result<()> {
    let bytes = s.as_bytes();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let replacement: &[u8] = match b {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            _ => continue,
        };
        w.write_all(&bytes[start..i])?;
        w.write_all(replacement)?;
        start = i + 1;
    }
    w.write_all(&bytes[start..])
}

fn fmt_pairs<'a, I>(f: &mut fmt::Formatter<'_>, entries: I) -> fmt::Result
where
    I: Iterator<Item = (&'a String, &'a FieldValue)>,
{
    for (i, (key, value)) in entries.enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}=\"{}\"", key, value)?;
    }
    Ok(())
}

impl fmt::Display for LogMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pairs(f, self.fields.iter())
    }
}

struct Sorted<'a>(&'a LogMap);

impl fmt::Display for Sorted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pairs(f, self.0.sorted_entries().into_iter())
    }
}

impl<K, V> FromIterator<(K, V)> for LogMap
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for LogMap
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.fields
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(map: &LogMap, sorted: bool) -> String {
        let mut buf = Vec::new();
        if sorted {
            map.sorted_write_to(&mut buf).unwrap();
        } else {
            map.write_to(&mut buf).unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_render_table() {
        let cases: Vec<(LogMap, &str)> = vec![
            (LogMap::new(), ""),
            (LogMap::new().with("x", "y"), r#"x="y""#),
            (LogMap::new().with("x", 1), r#"x="1""#),
            (LogMap::new().with("b", true).with("a", 2.5), r#"a="2.5" b="true""#),
            (LogMap::new().with("n", None::<i32>), r#"n="<nil>""#),
            (LogMap::new().with("u", 7u64).with("i", -7), r#"i="-7" u="7""#),
        ];

        for (map, expected) in cases {
            assert_eq!(render(&map, true), expected);
            assert_eq!(map.to_sorted_string(), expected);
        }
    }

    #[test]
    fn test_empty_map_writes_nothing() {
        let map = LogMap::new();
        let mut buf = Vec::new();
        assert_eq!(map.write_to(&mut buf).unwrap(), 0);
        assert_eq!(map.sorted_write_to(&mut buf).unwrap(), 0);
        assert!(buf.is_empty());
        assert_eq!(map.to_string(), "");
    }

    #[test]
    fn test_sorted_is_bytewise() {
        let map = LogMap::new().with("b", 1).with("B", 2).with("a", 3).with("_", 4);
        assert_eq!(render(&map, true), r#"B="2" _="4" a="3" b="1""#);
    }

    #[test]
    fn test_unordered_is_permutation() {
        let map: LogMap = (0..20).map(|i| (format!("k{}", i), i)).collect();
        let unordered = render(&map, false);
        let mut pairs: Vec<&str> = unordered.split(' ').collect();
        pairs.sort_unstable();
        let mut expected: Vec<String> = (0..20).map(|i| format!("k{}=\"{}\"", i, i)).collect();
        expected.sort_unstable();
        assert_eq!(pairs, expected);
        assert!(!unordered.ends_with(' '));
    }

    #[test]
    fn test_write_returns_entry_count() {
        let map = LogMap::new().with("a", 1).with("b", 2);
        let mut buf = Vec::new();
        assert_eq!(map.write_to(&mut buf).unwrap(), 2);
    }

    #[test]
    fn test_display_matches_unordered_writer_for_single_entry() {
        let map = LogMap::new().with("t", "u");
        assert_eq!(map.to_string(), render(&map, false));
    }

    #[test]
    fn test_quotes_are_not_escaped_by_default() {
        let map = LogMap::new().with("q", r#"say "hi""#);
        assert_eq!(render(&map, false), r#"q="say "hi"""#);
    }

    #[test]
    fn test_escaped_values() {
        let map = LogMap::new().with("q", "a\"b\\c\nd");
        let mut buf = Vec::new();
        map.write_entries(&mut buf, true, true).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), r#"q="a\"b\\c\nd""#);
    }

    #[test]
    fn test_escaped_keys() {
        let map = LogMap::new().with("bad\"key\nx", 1);
        let mut buf = Vec::new();
        map.write_entries(&mut buf, false, true).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), r#"bad\"key\nx="1""#);

        // Keys stay raw without escaping
        assert_eq!(render(&map, false), "bad\"key\nx=\"1\"");
    }

    #[test]
    fn test_insert_replaces() {
        let mut map = LogMap::new();
        assert!(map.insert("k", 1).is_none());
        assert_eq!(map.insert("k", 2), Some(FieldValue::Int(1)));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("k"), Some(&FieldValue::Int(2)));
        assert_eq!(map.remove("k"), Some(FieldValue::Int(2)));
        assert!(map.is_empty());
    }

    #[test]
    fn test_extend_and_keys() {
        let mut map = LogMap::new();
        map.extend([("a", 1), ("b", 2)]);
        let mut keys: Vec<&str> = map.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(FieldValue::from(1).type_name(), "int");
        assert_eq!(FieldValue::from(1u8).type_name(), "uint");
        assert_eq!(FieldValue::from(1.0f32).type_name(), "float64");
        assert_eq!(FieldValue::from("s").type_name(), "string");
        assert_eq!(FieldValue::from(false).type_name(), "bool");
    }
}
