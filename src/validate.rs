//! Input rules for task text.

/// Minimum number of characters a task may have after trimming.
pub const MIN_TASK_LEN: usize = 5;

/// Check raw task text. Returns the first failing rule's message, or an
/// empty string when the text is acceptable.
///
/// Rules apply to the trimmed text, in order: non-empty, at least
/// [`MIN_TASK_LEN`] characters, does not start with a digit.
pub fn validate_task_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "Task cannot be empty.".to_string();
    }
    if trimmed.chars().count() < MIN_TASK_LEN {
        return "Task must be at least 5 characters.".to_string();
    }
    if trimmed.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return "Task must not start with a number.".to_string();
    }
    String::new()
}
