//! Feature flags controlling which optional fields a line carries
//!
//! [`LogFlags`] is a plain value with one named boolean per feature. The
//! logger stores it packed into a single atomic byte so that flags can be
//! swapped while other threads are logging; a reader always sees one complete
//! set, never a mix of old and new bits.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

const TIME_BIT: u8 = 1 << 0;
const CALLER_BIT: u8 = 1 << 1;
const DEBUG_BIT: u8 = 1 << 2;
const SORT_BIT: u8 = 1 << 3;
const SHORT_CALLER_BIT: u8 = 1 << 4;
const ESCAPE_BIT: u8 = 1 << 5;

/// Independent feature toggles of a [`Logger`](crate::Logger).
///
/// # Example
///
/// ```
/// use rust_kvlog::LogFlags;
///
/// let flags = LogFlags::TIME | LogFlags::SORT;
/// assert!(flags.include_timestamp);
/// assert!(flags.sort_keys);
/// assert!(!flags.debug_enabled);
///
/// let parsed: LogFlags = "time|sort".parse().unwrap();
/// assert_eq!(parsed, flags);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFlags {
    /// Prefix each line with `time="..."`
    pub include_timestamp: bool,
    /// Add `caller="file:line"` after the level
    pub include_caller: bool,
    /// Emit lines logged at debug level
    pub debug_enabled: bool,
    /// Serialize each attribute map in sorted key order
    pub sort_keys: bool,
    /// Render only the last path component of the caller file
    pub short_caller: bool,
    /// Escape quotes, backslashes and line control characters in the message
    /// and in attribute keys and string values
    pub escape_values: bool,
}

impl LogFlags {
    pub const NONE: Self = Self::from_bits(0);
    pub const TIME: Self = Self::from_bits(TIME_BIT);
    pub const CALLER: Self = Self::from_bits(CALLER_BIT);
    pub const DEBUG_ENABLED: Self = Self::from_bits(DEBUG_BIT);
    /// Debug emission together with caller location
    pub const DEBUG: Self = Self::from_bits(CALLER_BIT | DEBUG_BIT);
    pub const SORT: Self = Self::from_bits(SORT_BIT);
    pub const SHORT_CALLER: Self = Self::from_bits(SHORT_CALLER_BIT);
    pub const ESCAPE: Self = Self::from_bits(ESCAPE_BIT);

    /// Pack into the byte representation used for atomic storage
    #[must_use]
    pub const fn bits(self) -> u8 {
        let mut bits = 0;
        if self.include_timestamp {
            bits |= TIME_BIT;
        }
        if self.include_caller {
            bits |= CALLER_BIT;
        }
        if self.debug_enabled {
            bits |= DEBUG_BIT;
        }
        if self.sort_keys {
            bits |= SORT_BIT;
        }
        if self.short_caller {
            bits |= SHORT_CALLER_BIT;
        }
        if self.escape_values {
            bits |= ESCAPE_BIT;
        }
        bits
    }

    /// Unpack from [`bits`](Self::bits); unknown bits are ignored
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            include_timestamp: bits & TIME_BIT != 0,
            include_caller: bits & CALLER_BIT != 0,
            debug_enabled: bits & DEBUG_BIT != 0,
            sort_keys: bits & SORT_BIT != 0,
            short_caller: bits & SHORT_CALLER_BIT != 0,
            escape_values: bits & ESCAPE_BIT != 0,
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self::from_bits(self.bits() | other.bits())
    }

    /// True if every toggle set in `other` is also set in `self`
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.bits() & other.bits() == other.bits()
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits() == 0
    }
}

impl BitOr for LogFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for LogFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for LogFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }

        let mut names = Vec::with_capacity(6);
        if self.include_timestamp {
            names.push("time");
        }
        if self.include_caller && self.debug_enabled {
            names.push("debug");
        } else if self.include_caller {
            names.push("caller");
        } else if self.debug_enabled {
            names.push("debug-level");
        }
        if self.sort_keys {
            names.push("sort");
        }
        if self.short_caller {
            names.push("shortfile");
        }
        if self.escape_values {
            names.push("escape");
        }
        f.write_str(&names.join("|"))
    }
}

impl FromStr for LogFlags {
    type Err = LoggerError;

    /// Parse names separated by `|` or `,`, e.g. `"time|debug|sort"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = LogFlags::NONE;
        for name in s.split(['|', ',']).map(str::trim).filter(|n| !n.is_empty()) {
            flags |= match name.to_ascii_lowercase().as_str() {
                "none" => LogFlags::NONE,
                "time" | "timestamp" => LogFlags::TIME,
                "caller" => LogFlags::CALLER,
                "debug" => LogFlags::DEBUG,
                "debug-level" => LogFlags::DEBUG_ENABLED,
                "sort" => LogFlags::SORT,
                "shortfile" => LogFlags::SHORT_CALLER,
                "escape" => LogFlags::ESCAPE,
                _ => {
                    return Err(LoggerError::config(
                        "LogFlags",
                        format!("unknown flag '{}'", name),
                    ))
                }
            };
        }
        Ok(flags)
    }
}
