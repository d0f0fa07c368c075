//! Runtime printf-style message formatting
//!
//! Messages may carry placeholders that are filled from the positional
//! [`LogArg::Value`](super::LogArg::Value) arguments of a log call. Because the
//! format string is only known at run time, mismatches cannot be rejected at
//! compile time; instead they are rendered inline as markers and the log line
//! is still written:
//!
//! | problem | rendered as |
//! |---|---|
//! | verb does not fit the value | `%!s(int=1)` |
//! | no value left for a verb | `%!d(MISSING)` |
//! | values left over | `%!(EXTRA int=2, string=x)` |
//! | `%` at the end of the message | `%!(NOVERB)` |
//! | null value for a typed verb | `%!d(<nil>)` |
//!
//! Supported verbs: `%v` (any), `%s %q` (strings), `%d %b %o %x %X %c %U`
//! (integers; `%x`/`%X` also hex-encode strings, `%q` quotes characters),
//! `%f %F %e %E %g` (floats), `%t` (booleans), `%T` (type name) and `%%`.
//! Flags `-` and `0`, a decimal width and a `.precision` are honoured; `+`,
//! space and `#` are accepted and ignored. Exponents follow Rust's notation
//! (`1.5e3`), and `%g` prints the shortest representation.

use super::log_map::FieldValue;
use std::io::{self, Write};

/// Upper bound applied to widths and precisions parsed from a message
const MAX_WIDTH: usize = 1024;

const DEFAULT_FLOAT_PRECISION: usize = 6;

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    minus: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
}

macro_rules! write_padded {
    ($w:expr, $spec:expr, $value:expr, $left:literal, $zero:literal, $right:literal) => {{
        let width = $spec.width;
        if $spec.minus {
            write!($w, $left, $value, width = width)
        } else if $spec.zero {
            write!($w, $zero, $value, width = width)
        } else {
            write!($w, $right, $value, width = width)
        }
    }};
}

macro_rules! write_padded_prec {
    ($w:expr, $spec:expr, $value:expr, $prec:expr, $left:literal, $zero:literal, $right:literal) => {{
        let width = $spec.width;
        let prec = $prec;
        if $spec.minus {
            write!($w, $left, $value, width = width, prec = prec)
        } else if $spec.zero {
            write!($w, $zero, $value, width = width, prec = prec)
        } else {
            write!($w, $right, $value, width = width, prec = prec)
        }
    }};
}

/// Format `format` with `args` into `w`.
pub fn sprintf<'a, W, I>(w: &mut W, format: &str, args: I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = &'a FieldValue>,
{
    let mut args = args.into_iter().peekable();
    let bytes = format.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        w.write_all(&bytes[literal_start..i])?;

        let (spec, next) = parse_spec(bytes, i + 1);
        i = next;
        // `i` only moved over ASCII, so it sits on a char boundary
        let Some(verb) = format[i..].chars().next() else {
            w.write_all(b"%!(NOVERB)")?;
            literal_start = i;
            break;
        };
        i += verb.len_utf8();
        literal_start = i;

        if verb == '%' {
            w.write_all(b"%")?;
            continue;
        }
        match args.next() {
            Some(arg) => write_verb(w, verb, &spec, arg)?,
            None => write!(w, "%!{}(MISSING)", verb)?,
        }
    }
    w.write_all(&bytes[literal_start..])?;

    if args.peek().is_some() {
        w.write_all(b"%!(EXTRA ")?;
        for (n, arg) in args.enumerate() {
            if n > 0 {
                w.write_all(b", ")?;
            }
            write!(w, "{}={}", arg.type_name(), arg)?;
        }
        w.write_all(b")")?;
    }
    Ok(())
}

/// Format into a new `String`
///
/// # Example
///
/// ```
/// use rust_kvlog::{printf, FieldValue};
///
/// let args = [FieldValue::from(3), FieldValue::from("disk")];
/// assert_eq!(printf::format("%d errors on %s", &args), "3 errors on disk");
/// assert_eq!(printf::format("%s", &[FieldValue::from(1)]), "%!s(int=1)");
/// ```
pub fn format(format: &str, args: &[FieldValue]) -> String {
    let mut out = Vec::with_capacity(format.len());
    // Writing into a Vec only fails if a Display impl reports an error
    if sprintf(&mut out, format, args).is_err() {
        out.extend_from_slice(b"%!(BADFORMAT)");
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn parse_spec(bytes: &[u8], mut i: usize) -> (Spec, usize) {
    let mut spec = Spec::default();
    while let Some(&b) = bytes.get(i) {
        match b {
            b'-' => spec.minus = true,
            b'0' => spec.zero = true,
            b'+' | b' ' | b'#' => {}
            _ => break,
        }
        i += 1;
    }

    let (width, next) = parse_number(bytes, i);
    spec.width = width.unwrap_or(0);
    i = next;

    if bytes.get(i) == Some(&b'.') {
        let (precision, next) = parse_number(bytes, i + 1);
        spec.precision = Some(precision.unwrap_or(0));
        i = next;
    }
    (spec, i)
}

fn parse_number(bytes: &[u8], mut i: usize) -> (Option<usize>, usize) {
    let mut value: Option<usize> = None;
    while let Some(&b) = bytes.get(i) {
        if !b.is_ascii_digit() {
            break;
        }
        let digit = usize::from(b - b'0');
        value = Some(
            value
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit)
                .min(MAX_WIDTH),
        );
        i += 1;
    }
    (value, i)
}

fn write_verb<W: Write + ?Sized>(
    w: &mut W,
    verb: char,
    spec: &Spec,
    arg: &FieldValue,
) -> io::Result<()> {
    match (verb, arg) {
        ('T', FieldValue::Null) => write_text(w, spec, "<nil>"),
        ('T', _) => write_text(w, spec, arg.type_name()),
        ('v', FieldValue::Null) => write_text(w, spec, "<nil>"),
        (_, FieldValue::Null) => write!(w, "%!{}(<nil>)", verb),

        ('v' | 's', FieldValue::String(s)) => write_str(w, spec, s),
        ('q', FieldValue::String(s)) => write!(w, "{:?}", s),
        ('x', FieldValue::String(s)) => s.bytes().try_for_each(|b| write!(w, "{:02x}", b)),
        ('X', FieldValue::String(s)) => s.bytes().try_for_each(|b| write!(w, "{:02X}", b)),

        ('v' | 't', FieldValue::Bool(b)) => write_text(w, spec, b),

        ('v' | 'd', FieldValue::Int(i)) => {
            write_padded!(w, spec, i, "{:<width$}", "{:0width$}", "{:>width$}")
        }
        ('v' | 'd', FieldValue::UInt(u)) => {
            write_padded!(w, spec, u, "{:<width$}", "{:0width$}", "{:>width$}")
        }
        ('b' | 'o' | 'x' | 'X' | 'c' | 'q' | 'U', FieldValue::Int(_) | FieldValue::UInt(_)) => {
            write_integer(w, verb, spec, arg)
        }

        ('f' | 'F', FieldValue::Float(f)) => write_padded_prec!(
            w,
            spec,
            f,
            spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION),
            "{:<width$.prec$}",
            "{:0width$.prec$}",
            "{:>width$.prec$}"
        ),
        ('e', FieldValue::Float(f)) => write_padded_prec!(
            w,
            spec,
            f,
            spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION),
            "{:<width$.prec$e}",
            "{:0width$.prec$e}",
            "{:>width$.prec$e}"
        ),
        ('E', FieldValue::Float(f)) => write_padded_prec!(
            w,
            spec,
            f,
            spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION),
            "{:<width$.prec$E}",
            "{:0width$.prec$E}",
            "{:>width$.prec$E}"
        ),
        ('v' | 'g', FieldValue::Float(f)) => match spec.precision {
            Some(prec) => write_padded_prec!(
                w,
                spec,
                f,
                prec,
                "{:<width$.prec$}",
                "{:0width$.prec$}",
                "{:>width$.prec$}"
            ),
            None => write_padded!(w, spec, f, "{:<width$}", "{:0width$}", "{:>width$}"),
        },

        _ => write!(w, "%!{}({}={})", verb, arg.type_name(), arg),
    }
}

/// Integer verbs other than `%d`; negative values keep their sign in front
/// of the magnitude instead of printing two's complement.
fn write_integer<W: Write + ?Sized>(
    w: &mut W,
    verb: char,
    spec: &Spec,
    arg: &FieldValue,
) -> io::Result<()> {
    let (negative, magnitude) = match *arg {
        FieldValue::Int(i) => (i < 0, i.unsigned_abs()),
        FieldValue::UInt(u) => (false, u),
        _ => return write!(w, "%!{}({}={})", verb, arg.type_name(), arg),
    };

    let as_char = || {
        u32::try_from(magnitude)
            .ok()
            .filter(|_| !negative)
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    };

    match verb {
        'c' => return write_text(w, spec, as_char()),
        'q' => return write!(w, "{:?}", as_char()),
        'U' => return write!(w, "U+{:04X}", magnitude),
        _ => {}
    }

    let mut spec = *spec;
    if negative {
        w.write_all(b"-")?;
        spec.width = spec.width.saturating_sub(1);
    }
    match verb {
        'b' => write_padded!(w, spec, magnitude, "{:<width$b}", "{:0width$b}", "{:>width$b}"),
        'o' => write_padded!(w, spec, magnitude, "{:<width$o}", "{:0width$o}", "{:>width$o}"),
        'x' => write_padded!(w, spec, magnitude, "{:<width$x}", "{:0width$x}", "{:>width$x}"),
        _ => write_padded!(w, spec, magnitude, "{:<width$X}", "{:0width$X}", "{:>width$X}"),
    }
}

/// Non-numeric text; the `0` flag does not apply
fn write_text<W: Write + ?Sized, T: std::fmt::Display>(
    w: &mut W,
    spec: &Spec,
    value: T,
) -> io::Result<()> {
    let width = spec.width;
    if spec.minus {
        write!(w, "{:<width$}", value, width = width)
    } else {
        write!(w, "{:>width$}", value, width = width)
    }
}

/// Strings honour precision as a maximum number of characters
fn write_str<W: Write + ?Sized>(w: &mut W, spec: &Spec, s: &str) -> io::Result<()> {
    match spec.precision {
        Some(prec) => {
            let width = spec.width;
            if spec.minus {
                write!(w, "{:<width$.prec$}", s, width = width, prec = prec)
            } else {
                write!(w, "{:>width$.prec$}", s, width = width, prec = prec)
            }
        }
        None if spec.width == 0 => w.write_all(s.as_bytes()),
        None => write_text(w, spec, s),
    }
}
