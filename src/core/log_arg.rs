//! Arguments accepted by the level methods
//!
//! A log call takes one ordered slice that mixes positional format values and
//! attribute maps. [`LogArg`] tells the two apart explicitly; positional values
//! feed the message placeholders in order, maps are appended as attributes in
//! order.

use super::log_map::{FieldValue, LogMap};

#[derive(Debug, Clone, PartialEq)]
pub enum LogArg<'a> {
    /// Positional argument consumed by a message placeholder
    Value(FieldValue),
    /// Attribute map rendered after the message
    Map(&'a LogMap),
}

impl<'a> LogArg<'a> {
    pub fn as_value(&self) -> Option<&FieldValue> {
        match self {
            LogArg::Value(v) => Some(v),
            LogArg::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&'a LogMap> {
        match self {
            LogArg::Map(m) => Some(m),
            LogArg::Value(_) => None,
        }
    }
}

impl<'a> From<&'a LogMap> for LogArg<'a> {
    fn from(map: &'a LogMap) -> Self {
        LogArg::Map(map)
    }
}

impl From<FieldValue> for LogArg<'_> {
    fn from(value: FieldValue) -> Self {
        LogArg::Value(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for LogArg<'_> {
    fn from(value: Option<T>) -> Self {
        LogArg::Value(value.into())
    }
}

impl From<&str> for LogArg<'_> {
    fn from(value: &str) -> Self {
        LogArg::Value(value.into())
    }
}

impl From<&String> for LogArg<'_> {
    fn from(value: &String) -> Self {
        LogArg::Value(value.into())
    }
}

macro_rules! log_arg_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for LogArg<'_> {
                fn from(value: $ty) -> Self {
                    LogArg::Value(value.into())
                }
            }
        )+
    };
}

log_arg_from!(
    String, char, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let map = LogMap::new().with("x", "y");
        assert_eq!(LogArg::from(&map).as_map(), Some(&map));
        assert_eq!(LogArg::from(1).as_value(), Some(&FieldValue::Int(1)));
        assert_eq!(
            LogArg::from("s").as_value(),
            Some(&FieldValue::String("s".into()))
        );
        assert_eq!(LogArg::from(None::<u8>).as_value(), Some(&FieldValue::Null));
        assert!(LogArg::from(1.5).as_map().is_none());
    }
}
