use crate::error::{AppError, Result};

/// Turns the raw `<id>` argument of a command into a store key.
///
/// Parsing is lenient in the usual command-line way: leading whitespace and an optional
/// sign are accepted, a `0x`/`0X` prefix switches to hexadecimal, and the leading run of
/// digits is used, so `"12abc"`, `"3.7"` and `"0x1A"` give `12`, `3` and `26`.
///
/// # Errors
///
/// `AppError::MissingArgument` when no id was supplied, `AppError::NotANumber` when
/// there are no leading digits or the value does not fit an `i64`.
pub fn parse_id(raw: Option<&str>) -> Result<i64> {
    let raw = raw.ok_or(AppError::MissingArgument)?;
    let trimmed = raw.trim_start();

    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits_len = rest
        .bytes()
        .take_while(|b| (*b as char).is_digit(radix))
        .count();
    if digits_len == 0 {
        return Err(AppError::NotANumber(raw.to_string()));
    }

    i64::from_str_radix(&format!("{sign}{}", &rest[..digits_len]), radix)
        .map_err(|_| AppError::NotANumber(raw.to_string()))
}
