//! Error types for ios-intent.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for ios-intent operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform/device-type errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// CLI output could not be turned into records
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Intent documents are missing or invalid
    #[error("Intent error: {0}")]
    Intent(#[from] IntentError),
}

impl Error {
    /// Short category label used in per-device reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Transport(TransportError::AuthenticationFailed { .. }) => "authentication",
            Error::Transport(_) | Error::Channel(_) => "connection",
            Error::Driver(_) => "command",
            Error::Platform(_) => "platform",
            Error::Parse(_) => "parse",
            Error::Intent(_) => "intent",
        }
    }
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key is not present in known_hosts (strict checking)
    #[error("Host key for {host}:{port} is not known")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Channel layer errors (prompt matching, PTY operations).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Driver layer errors (command execution, privilege escalation).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call open() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// The device rejected a command
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Failed to acquire target privilege level
    #[error("Failed to acquire privilege level '{target}'")]
    PrivilegeAcquisitionFailed { target: String },

    /// Invalid configuration in the driver builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Unknown privilege level detected
    #[error("Unknown privilege level from prompt: '{prompt}'")]
    UnknownPrivilege { prompt: String },

    /// No path found between privilege levels
    #[error("No path from privilege '{from}' to '{to}'")]
    NoPrivilegePath { from: String, to: String },
}

/// Platform/device-type errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Device type identifier is not supported
    #[error("Unknown device type '{name}'")]
    UnknownPlatform { name: String },

    /// Invalid platform definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },
}

/// Errors raised while turning CLI output into records.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The expected column header never appeared
    #[error("'{command}' output has no header line starting with '{header}'")]
    MissingHeader {
        command: &'static str,
        header: &'static str,
    },

    /// A data row did not have the expected shape
    #[error("'{command}' line {line_no}: expected {expected} fields, got {found}: '{line}'")]
    MalformedRow {
        command: &'static str,
        line_no: usize,
        expected: usize,
        found: usize,
        line: String,
    },

    /// The address column held something other than an IPv4 address
    #[error("'{command}' line {line_no}: invalid address '{value}'")]
    InvalidAddress {
        command: &'static str,
        line_no: usize,
        value: String,
    },
}

/// Errors raised while loading intent documents.
#[derive(Error, Debug)]
pub enum IntentError {
    /// The file could not be read
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid YAML for its document type
    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed but violates a rule
    #[error("{path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Result type alias using ios-intent's Error.
pub type Result<T> = std::result::Result<T, Error>;
