/// Limits `value` to `0..=max`. LED arguments are clamped rather than rejected.
pub fn limit(value: u8, max: u8) -> u8 {
    value.min(max)
}

/// Lowercase substring test used for port matching.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
