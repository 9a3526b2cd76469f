pub const MAX_ROOM_NAME_LENGTH: usize = 64;

/// Keeps only `[A-Za-z0-9_-]`, truncated. An empty result means "use the default arena".
pub fn sanitize_room_name(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_')
        .take(MAX_ROOM_NAME_LENGTH)
        .collect()
}
