const KIND_PREFIXES: [&str; 2] = ["Transport failure:", "Malformed response:"];

/// Strip the error-kind prefix chain from an API error message
///
/// "Transport failure: Request failed: error sending request" becomes
/// "error sending request". Messages without a known prefix are returned trimmed.
pub fn extract_clean_error(error_msg: &str) -> String {
    let error_msg = error_msg.trim();
    if KIND_PREFIXES.iter().any(|prefix| error_msg.starts_with(prefix)) {
        // Everything after the last separator is the underlying cause
        if let Some(last_colon) = error_msg.rfind(": ") {
            return error_msg[last_colon + 2..].trim().to_string();
        }
    }
    error_msg.to_string()
}
