//! Positional placeholder rewriting for backends that number their parameters.
//!
//! Templates compile to bare `?` placeholders. PostgreSQL wants `$1`, `$2`, ...
//! so the postgres connector rewrites them here. Quoted strings, comments, and
//! dollar-quoted bodies are copied through untouched.

use std::borrow::Cow;

/// Target placeholder style for translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
    /// SQLite-style numbered placeholders like `?1`.
    Sqlite,
}

impl PlaceholderStyle {
    fn prefix(self) -> char {
        match self {
            PlaceholderStyle::Postgres => '$',
            PlaceholderStyle::Sqlite => '?',
        }
    }
}

/// Number every bare `?` in order, in the target style.
///
/// Already-numbered `?N` placeholders keep their number and do not advance the
/// counter. Returns a borrowed `Cow` when nothing was rewritten.
#[must_use]
pub fn number_placeholders(sql: &str, target: PlaceholderStyle) -> Cow<'_, str> {
    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut state = State::Normal;
    let mut next = 0usize;
    let mut idx = 0;
    let mut copied = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                    state = State::LineComment;
                    idx += 1;
                }
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' => {
                    if let Some((tag, end)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = end;
                    }
                }
                b'?' => {
                    let buf = out.get_or_insert_with(|| String::with_capacity(sql.len() + 8));
                    buf.push_str(&sql[copied..idx]);
                    buf.push(target.prefix());
                    match scan_digits(bytes, idx + 1) {
                        Some((digits_end, digits)) => {
                            buf.push_str(digits);
                            idx = digits_end - 1;
                        }
                        None => {
                            next += 1;
                            buf.push_str(&next.to_string());
                        }
                    }
                    copied = idx + 1;
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if b == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    idx += tag.len() + 1;
                    state = State::Normal;
                }
            }
        }
        idx += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied.min(sql.len())..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}

#[derive(Clone)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

fn scan_digits(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let mut idx = start;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == start {
        None
    } else {
        std::str::from_utf8(&bytes[start..idx])
            .ok()
            .map(|digits| (idx, digits))
    }
}

// `$tag$` opener; returns the tag and the index of the closing `$`.
fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphabetic() || b == b'_' || (idx > start + 1 && b.is_ascii_digit())) {
            return None;
        }
        idx += 1;
    }

    if idx < bytes.len() {
        let tag = String::from_utf8(bytes[start + 1..idx].to_vec()).ok()?;
        Some((tag, idx))
    } else {
        None
    }
}

fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    end < bytes.len() && &bytes[idx + 1..end] == tag.as_bytes() && bytes[end] == b'$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_bare_placeholders_for_postgres() {
        let sql = "select * from t where a = ? and b = ?";
        let res = number_placeholders(sql, PlaceholderStyle::Postgres);
        assert_eq!(res, "select * from t where a = $1 and b = $2");
    }

    #[test]
    fn keeps_explicit_numbers() {
        let sql = "insert into t values(?2, ?1)";
        let res = number_placeholders(sql, PlaceholderStyle::Postgres);
        assert_eq!(res, "insert into t values($2, $1)");
    }

    #[test]
    fn sqlite_style_numbers_in_place() {
        let res = number_placeholders("values(?, ?)", PlaceholderStyle::Sqlite);
        assert_eq!(res, "values(?1, ?2)");
    }

    #[test]
    fn skips_inside_literals_and_comments() {
        let sql = "select '?', \"?\" -- ?\n/* ? /* ? */ */ from t where a = ?";
        let res = number_placeholders(sql, PlaceholderStyle::Postgres);
        assert_eq!(
            res,
            "select '?', \"?\" -- ?\n/* ? /* ? */ */ from t where a = $1"
        );
    }

    #[test]
    fn skips_dollar_quoted_blocks() {
        let sql = "$fn$ select ? from t $fn$ where a = ?";
        let res = number_placeholders(sql, PlaceholderStyle::Postgres);
        assert_eq!(res, "$fn$ select ? from t $fn$ where a = $1");
    }

    #[test]
    fn untouched_sql_is_borrowed() {
        let sql = "select 1 where 'a?' = 'a?'";
        let res = number_placeholders(sql, PlaceholderStyle::Postgres);
        assert!(matches!(res, Cow::Borrowed(_)));
    }
}
