//! Helpers shared by the outbound HTTP clients.

/// Maximum number of code points of a response body kept in error messages.
const MAX_BODY_CHARS: usize = 200;

/// Shorten a response body for inclusion in an error, on a char boundary.
pub(crate) fn truncate_body(body: &str) -> String {
    if body.chars().count() > MAX_BODY_CHARS {
        format!("{}...", body.chars().take(MAX_BODY_CHARS).collect::<String>())
    } else {
        body.to_string()
    }
}
