//! Response type for command execution results.

use std::time::Duration;

use crate::error::{DriverError, Result};

/// Response from a command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// The command output with the echo and trailing prompt removed.
    pub result: String,

    /// The raw output before normalization.
    pub raw_result: String,

    /// The prompt that was matched at the end.
    pub prompt: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,

    /// Failure marker found in the output, if the device rejected the command.
    pub failure_message: Option<String>,
}

impl Response {
    /// Create a new successful response.
    pub fn new(
        command: impl Into<String>,
        result: impl Into<String>,
        raw_result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            raw_result: raw_result.into(),
            prompt: prompt.into(),
            elapsed,
            failure_message: None,
        }
    }

    /// Mark this response as failed.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }

    /// Turn a rejected command into [`DriverError::CommandFailed`].
    pub fn ensure_success(self) -> Result<Self> {
        match self.failure_message {
            None => Ok(self),
            Some(message) => Err(DriverError::CommandFailed {
                command: self.command,
                message: first_line_containing(&self.result, &message)
                    .unwrap_or(message),
            }
            .into()),
        }
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

fn first_line_containing(text: &str, needle: &str) -> Option<String> {
    text.lines()
        .find(|line| line.contains(needle))
        .map(|line| line.trim().to_string())
}

/// Strip the echoed command from the top and the prompt from the bottom.
pub(crate) fn normalize_output(raw: &str, command: &str) -> String {
    let mut body = raw.trim_start_matches(['\r', '\n']);

    // The first line is the echo of what we typed (possibly after a prompt)
    if !command.is_empty() {
        if let Some(first) = body.lines().next() {
            if first.trim_end().ends_with(command.trim()) {
                body = body[first.len()..].trim_start_matches(['\r', '\n']);
            }
        }
    }

    let body = body.trim_end();
    match memchr::memrchr(b'\n', body.as_bytes()) {
        Some(pos) => body[..pos].trim_end_matches(['\r', '\n']).to_string(),
        // A lone line here is just the prompt
        None => String::new(),
    }
}
