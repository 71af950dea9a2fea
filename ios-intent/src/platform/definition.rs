//! Platform and privilege level definitions.

use indexmap::IndexMap;
use regex::bytes::Regex;

use crate::channel::combine_patterns;

/// One CLI mode of a device and how to move in and out of it.
///
/// Levels form a tree through `parent`: escalating into a level uses its
/// `escalate_command`, leaving it towards the parent uses
/// `deescalate_command`.
#[derive(Debug, Clone)]
pub struct PrivilegeLevel {
    /// Name of this level (e.g. "exec", "privilege_exec", "configuration").
    pub name: String,

    /// Prompt pattern for this level.
    pub pattern: Regex,

    /// Parent level, `None` for the root.
    pub parent: Option<String>,

    /// Command that enters this level from its parent.
    pub escalate_command: Option<String>,

    /// Command that returns from this level to its parent.
    pub deescalate_command: Option<String>,

    /// Password prompt shown while escalating, if the device asks for one.
    pub auth_prompt: Option<Regex>,

    /// Prompt substrings that rule this level out, for prompts that
    /// several patterns would otherwise accept.
    pub not_contains: Vec<String>,
}

impl PrivilegeLevel {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            parent: None,
            escalate_command: None,
            deescalate_command: None,
            auth_prompt: None,
            not_contains: vec![],
        })
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_escalate(mut self, command: impl Into<String>) -> Self {
        self.escalate_command = Some(command.into());
        self
    }

    pub fn with_deescalate(mut self, command: impl Into<String>) -> Self {
        self.deescalate_command = Some(command.into());
        self
    }

    /// Expect a password prompt matching `prompt_pattern` when escalating.
    pub fn with_auth(mut self, prompt_pattern: &str) -> Result<Self, regex::Error> {
        self.auth_prompt = Some(Regex::new(prompt_pattern)?);
        Ok(self)
    }

    pub fn with_not_contains(mut self, fragment: impl Into<String>) -> Self {
        self.not_contains.push(fragment.into());
        self
    }

    /// Check whether `prompt` belongs to this level.
    pub fn matches(&self, prompt: &str) -> bool {
        !self.not_contains.iter().any(|nc| prompt.contains(nc.as_str()))
            && self.pattern.is_match(prompt.as_bytes())
    }
}

/// Everything the driver needs to know about a device type.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Device type identifier (e.g. "cisco_ios").
    pub name: String,

    /// Privilege levels, root first.
    pub privilege_levels: IndexMap<String, PrivilegeLevel>,

    /// Level the driver settles in after login.
    pub default_privilege: String,

    /// Output fragments that mark a command as rejected.
    pub failed_when_contains: Vec<String>,

    /// Commands run right after login (paging off, width).
    pub on_open_commands: Vec<String>,

    /// Command that persists the running configuration.
    pub save_command: Option<String>,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,
}

impl PlatformDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privilege_levels: IndexMap::new(),
            default_privilege: String::new(),
            failed_when_contains: vec![],
            on_open_commands: vec![],
            save_command: None,
            terminal_width: 511,
            terminal_height: 24,
        }
    }

    pub fn with_privilege(mut self, level: PrivilegeLevel) -> Self {
        self.privilege_levels.insert(level.name.clone(), level);
        self
    }

    pub fn with_default_privilege(mut self, name: impl Into<String>) -> Self {
        self.default_privilege = name.into();
        self
    }

    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    pub fn with_save_command(mut self, command: impl Into<String>) -> Self {
        self.save_command = Some(command.into());
        self
    }

    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// A regex matching the prompt of any privilege level.
    pub fn prompt_pattern(&self) -> Result<Regex, regex::Error> {
        combine_patterns(self.privilege_levels.values().map(|l| l.pattern.as_str()))
    }

    /// First failure fragment found in `output`, if any.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }
}
