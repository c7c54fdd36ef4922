//! MySQL string-literal quoting.
//!
//! Every match pattern passes through [`quote`] before it is interpolated
//! into generated SQL; patterns are operator-supplied and must never reach
//! the statement text unescaped.

/// Render `value` as a single-quoted MySQL string literal, escaping the
/// characters the server treats specially inside quotes.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\0' => quoted.push_str("\\0"),
            '\'' => quoted.push_str("\\'"),
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\u{1a}' => quoted.push_str("\\Z"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::quote;

    /// Inverse of [`quote`] under the same escaping convention.
    fn unquote(literal: &str) -> String {
        let inner = literal
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
            .expect("literal should be single-quoted");
        let mut value = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                value.push(ch);
                continue;
            }
            match chars.next().expect("escape should be followed by a character") {
                '0' => value.push('\0'),
                'n' => value.push('\n'),
                'r' => value.push('\r'),
                'Z' => value.push('\u{1a}'),
                other => value.push(other),
            }
        }
        value
    }

    #[test]
    fn plain_patterns_are_wrapped_in_single_quotes() {
        assert_eq!(quote("root"), "'root'");
        assert_eq!(quote("%sleep%"), "'%sleep%'");
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        assert_eq!(quote("O'Brien"), r"'O\'Brien'");
        assert_eq!(quote(r"C:\tmp"), r"'C:\\tmp'");
        assert_eq!(quote(r#"say "hi""#), r#"'say \"hi\"'"#);
    }

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(quote("a\nb\rc\0d\u{1a}e"), r"'a\nb\rc\0d\Ze'");
    }

    #[test]
    fn quoting_round_trips_hostile_patterns() {
        let patterns = [
            "plain",
            "it's",
            r"back\slash",
            r"both'\mixed",
            "multi\nline'with\\quotes",
            "'; DROP TABLE users; --",
        ];
        for pattern in patterns {
            assert_eq!(unquote(&quote(pattern)), pattern, "pattern {pattern:?}");
        }
    }
}
