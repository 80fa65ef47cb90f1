//! Operator-facing error messages.

use beatdesk_client::ApiError;

/// Default maximum message length in characters.
pub const DEFAULT_MESSAGE_LIMIT: usize = 200;

/// Suffix appended to truncated messages.
pub const ELLIPSIS: &str = "...";

/// Cuts `message` to at most `limit` characters, appending [`ELLIPSIS`] when
/// anything was removed.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate_message(message: &str, limit: usize) -> String {
    let message = message.trim();
    match message.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", message[..cut].trim_end(), ELLIPSIS),
        None => message.to_string(),
    }
}

/// The message shown for a failed request.
pub fn describe_error(err: &ApiError, limit: usize) -> String {
    truncate_message(&err.user_message(), limit)
}
