/// Result of normalizing a recognized utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    /// The original unmodified input.
    pub raw_text: String,
    /// Input after lower-casing and trimming surrounding whitespace.
    pub normalized_text: String,
}

impl ParsedCommand {
    pub fn is_empty(&self) -> bool {
        self.normalized_text.is_empty()
    }
}
