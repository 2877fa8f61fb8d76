// src/services/sanitizer.rs
const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Strip a markdown code fence the model sometimes wraps around its JSON.
///
/// Only a reply that opens with a fence is touched: the interior up to the next fence
/// (or the end of the text) is returned, trimmed. Anything else comes back unchanged.
pub fn sanitize(reply: &str) -> String {
    let opened = reply.trim_start();
    let Some(rest) = opened
        .strip_prefix(JSON_FENCE)
        .or_else(|| opened.strip_prefix(FENCE))
    else {
        return reply.to_string();
    };

    let interior = rest.split(FENCE).next().unwrap_or_default();
    interior.trim().to_string()
}
