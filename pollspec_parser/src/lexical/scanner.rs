//! Byte-level scanning helpers
//!
//! Every grammar in the crate is ASCII-structured, so scanning works on
//! bytes. A non-ASCII byte never satisfies an ASCII predicate, which means
//! a scan always stops on a char boundary.

/// Byte at `pos`, if any
pub fn peek(source: &str, pos: usize) -> Option<u8> {
    source.as_bytes().get(pos).copied()
}

/// End offset of the run of bytes satisfying `pred` starting at `pos`
pub fn scan_while(source: &str, pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    let bytes = source.as_bytes();
    let mut end = pos;
    while end < bytes.len() && pred(bytes[end]) {
        end += 1;
    }
    end
}

/// End offset of the maximal ASCII digit run at `pos`; equals `pos` when empty
pub fn scan_digits(source: &str, pos: usize) -> usize {
    scan_while(source, pos, |b| b.is_ascii_digit())
}

/// Digit run of at most `max` digits
///
/// Returns the end offset, or `Err(offset)` pointing at the first digit
/// past the limit.
pub fn scan_digits_limited(source: &str, pos: usize, max: usize) -> Result<usize, usize> {
    let end = scan_digits(source, pos);
    if end - pos > max {
        Err(pos + max)
    } else {
        Ok(end)
    }
}

/// Offset of the first non-whitespace byte at or after `pos`
pub fn skip_whitespace(source: &str, pos: usize) -> usize {
    scan_while(source, pos, is_whitespace)
}

pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Whether `source[pos..]` starts with `prefix`
pub fn starts_with_at(source: &str, pos: usize, prefix: &str) -> bool {
    source
        .as_bytes()
        .get(pos..)
        .is_some_and(|rest| rest.starts_with(prefix.as_bytes()))
}
