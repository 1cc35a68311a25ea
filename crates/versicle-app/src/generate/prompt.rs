//! Prompt building
//!
//! Natural-language prompts sent to the text-generation capability.
//! Callers pass a concrete theme; sentinel resolution happens before
//! prompts are built.

/// Prompt for the day's personalized message
pub fn revelation_prompt(name: &str, theme: &str) -> String {
    format!(
        "Write an inspirational message for {name} on the theme of {theme}. \
         Speak directly to {name} in a warm, encouraging, personal tone. \
         Do not open with a greeting or salutation of any kind; begin with \
         the message itself. The message should take about one minute to \
         read aloud at a calm pace."
    )
}

/// Prompt for a prayer that continues the day's message
pub fn prayer_prompt(name: &str, theme: &str) -> String {
    format!(
        "Write a short personal prayer for {name}, continuing today's \
         message on the theme of {theme}. Keep the same warm, hopeful tone, \
         with no greeting or preamble. It should take about half a minute \
         to read aloud."
    )
}
