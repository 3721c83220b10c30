//! Group name sanitization

/// Replace every character outside `[A-Za-z0-9\-.]` with `_`
#[must_use]
pub fn to_safe(word: &str) -> String {
    word.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
