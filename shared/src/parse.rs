//! Reading generated headers back
//!
//! Only the subset of C that the emitters write is understood: one
//! `#define NAME VALUE` per line and flat array initializers. This is enough to verify and inspect generated files.

/// Header parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No array with the requested identifier
    #[error("array '{0}' not found")]
    ArrayNotFound(String),

    /// Array initializer has no closing brace
    #[error("array '{0}' is not terminated")]
    Unterminated(String),

    /// Literal could not be read as a number
    #[error("invalid literal '{0}'")]
    InvalidValue(String),
}

/// Return the literal tokens of the array named `identifier`.
pub fn parse_array(text: &str, identifier: &str) -> Result<Vec<String>, ParseError> {
    let needle = format!("{}[]", identifier);
    let start = text
        .match_indices(&needle)
        .map(|(i, _)| i)
        .find(|&i| !preceded_by_ident_char(text, i))
        .ok_or_else(|| ParseError::ArrayNotFound(identifier.to_string()))?;

    let rest = &text[start + needle.len()..];
    let open = rest
        .find('{')
        .ok_or_else(|| ParseError::Unterminated(identifier.to_string()))?;
    let body = &rest[open + 1..];
    let close = body
        .find('}')
        .ok_or_else(|| ParseError::Unterminated(identifier.to_string()))?;

    Ok(body[..close]
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect())
}

fn preceded_by_ident_char(text: &str, index: usize) -> bool {
    text[..index]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Value of `#define NAME VALUE`, if present.
///
/// Any run of spaces or tabs may separate the tokens.
pub fn parse_define<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("#define")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let (n, value) = rest.trim_start().split_once(char::is_whitespace)?;
        (n == name).then(|| value.trim()).filter(|v| !v.is_empty())
    })
}

/// Decimal or `0x`-prefixed hexadecimal integer literal.
///
/// C integer suffixes (`u`, `l`, `ul`, ...) are accepted and ignored.
pub fn parse_int_literal(token: &str) -> Option<u64> {
    let token = token.trim().trim_end_matches(['u', 'U', 'l', 'L']);
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).ok()
    } else {
        token.parse().ok()
    }
}
