pub const MAX_USERNAME_LENGTH: usize = 20;
pub const DEFAULT_USERNAME: &str = "Player";

/// Collapses whitespace, drops control characters and truncates. Blank names get the fallback.
pub fn sanitize_username(name: &str, fallback: &str) -> String {
    let cleaned = name
        .split_whitespace()
        .map(|word| word.chars().filter(|ch| !ch.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if cleaned.is_empty() {
        return fallback.to_string();
    }
    cleaned.chars().take(MAX_USERNAME_LENGTH).collect()
}
