//! User-Agent header parsing for the `browser` and `os` tags.

use std::sync::OnceLock;

use woothee::parser::Parser;

// Parser construction builds lookup tables, so share one instance.
static PARSER: OnceLock<Parser> = OnceLock::new();

/// Browser and OS names derived from a User-Agent header value.
///
/// Agents the parser cannot classify yield empty strings for the
/// unclassified fields.
pub fn parse_user_agent(user_agent: &str) -> (String, String) {
    let parser = PARSER.get_or_init(Parser::new);
    match parser.parse(user_agent) {
        Some(result) => (known(result.name), known(result.os)),
        None => (String::new(), String::new()),
    }
}

/// Woothee reports fields it cannot classify as "UNKNOWN"; the tag
/// vocabulary uses the empty string for those.
fn known(value: &str) -> String {
    if value == "UNKNOWN" {
        String::new()
    } else {
        value.to_owned()
    }
}
