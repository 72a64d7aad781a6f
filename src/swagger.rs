use crate::errors::ErrorCode;

/// Sample error message for OpenAPI docs, in the `"<code> - <explanation>"`
/// format used across services.
pub fn error_example(code: ErrorCode) -> String {
    format!("{} - {}", code.code(), code.explanation())
}

/// Combine several sample error messages into one string.
pub fn combine_examples(examples: &[String]) -> String {
    examples.join(" | ")
}
