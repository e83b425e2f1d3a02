/// Title given to conversations created before the user has typed anything.
pub const DEFAULT_TITLE: &str = "New Conversation";

const AUTO_TITLE_CHARS: usize = 50;

/// Derive a conversation title from its first message: the first 50
/// characters, with `...` appended when the message is longer.
pub fn title_from_first_message(text: &str) -> String {
    let text = text.trim();
    let mut chars = text.char_indices();
    match chars.nth(AUTO_TITLE_CHARS) {
        Some((boundary, _)) => format!("{}...", &text[..boundary]),
        None => text.to_string(),
    }
}

/// Validate a user-supplied title. Returns `None` when nothing but
/// whitespace is left.
pub fn normalize_title(title: &str) -> Option<&str> {
    let trimmed = title.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
