use super::types::ParsedCommand;

/// Words that end an interactive session when they appear anywhere in the input.
const QUIT_WORDS: [&str; 4] = ["goodbye", "bye", "exit", "quit"];

const HELP_PHRASES: [&str; 3] = ["help", "what can you do", "capabilities"];

/// Normalize a raw utterance: lower-case and strip surrounding whitespace.
///
/// Inner whitespace is left alone so match rules see exactly what was said.
pub fn parse(input: &str) -> ParsedCommand {
    ParsedCommand {
        raw_text: input.to_string(),
        normalized_text: input.trim().to_lowercase(),
    }
}

/// Whether the user asked to end the session.
///
/// Matches whole words only, so "exiting" does not count.
pub fn is_quit_command(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| QUIT_WORDS.contains(&word))
}

/// Whether the user asked what the assistant can do.
pub fn is_help_request(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    HELP_PHRASES.iter().any(|phrase| lower.contains(phrase))
}
