//! Command classification: resolves a message's operation token to a command path.

use strata_core::StreamingMessage;

use super::operation::CommandPath;

/// The start and stop command names a processor answers to.
///
/// Either name may be absent; an absent name matches nothing. Matching is
/// ASCII case-insensitive, and an absent or empty operation token never
/// matches, even when a configured name is itself empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandNames {
    pub start: Option<String>,
    pub stop: Option<String>,
}

impl CommandNames {
    #[must_use]
    pub fn new(start: Option<&str>, stop: Option<&str>) -> Self {
        Self {
            start: start.map(str::to_string),
            stop: stop.map(str::to_string),
        }
    }

    /// Resolve `message` to at most one command path. Start is checked first.
    #[must_use]
    pub fn classify(&self, message: &StreamingMessage) -> Option<CommandPath> {
        let operation = message.operation()?;
        if matches(self.start.as_deref(), operation) {
            Some(CommandPath::Start)
        } else if matches(self.stop.as_deref(), operation) {
            Some(CommandPath::Stop)
        } else {
            None
        }
    }

    /// The configured name for `path`, if any.
    #[must_use]
    pub fn name(&self, path: CommandPath) -> Option<&str> {
        match path {
            CommandPath::Start => self.start.as_deref(),
            CommandPath::Stop => self.stop.as_deref(),
        }
    }
}

fn matches(command: Option<&str>, operation: &str) -> bool {
    command.is_some_and(|c| c.eq_ignore_ascii_case(operation))
}
