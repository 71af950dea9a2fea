//! Generic driver implementation that works with any platform.

use std::time::{Duration, Instant};

use log::{debug, warn};
use regex::bytes::Regex;
use secrecy::{ExposeSecret, SecretString};

use super::Driver;
use super::privilege::PrivilegeManager;
use super::response::{Response, normalize_output};
use crate::channel::patterns::last_line;
use crate::channel::{PtyChannel, combine_patterns};
use crate::error::{ChannelError, DriverError, PlatformError, Result, TransportError};
use crate::platform::PlatformDefinition;
use crate::transport::{AuthMethod, SshConfig, SshTransport};

/// Bytes from the end of the output searched for a prompt.
const SEARCH_DEPTH: usize = 1000;

/// An open SSH session and its shell channel.
struct Session {
    transport: SshTransport,
    channel: PtyChannel,
}

/// Driver for any platform definition over SSH.
///
/// Handles:
/// - SSH transport and shell channel lifetime
/// - command execution with prompt detection
/// - privilege level navigation, including the enable password
/// - output normalization and failure detection
pub struct GenericDriver {
    ssh_config: SshConfig,
    platform: PlatformDefinition,
    enable_secret: Option<SecretString>,
    session: Option<Session>,
    privilege_manager: PrivilegeManager,
    timeout: Duration,
    /// Matches the prompt of any privilege level.
    prompt_pattern: Regex,
}

impl GenericDriver {
    /// Create a driver; nothing is connected until [`Driver::open`].
    pub fn new(
        ssh_config: SshConfig,
        platform: PlatformDefinition,
        enable_secret: Option<SecretString>,
    ) -> Result<Self> {
        let prompt_pattern =
            platform
                .prompt_pattern()
                .map_err(|e| PlatformError::InvalidDefinition {
                    message: format!("{}: {e}", platform.name),
                })?;

        Ok(Self {
            timeout: ssh_config.timeout,
            privilege_manager: PrivilegeManager::new(platform.privilege_levels.clone()),
            ssh_config,
            platform,
            enable_secret,
            session: None,
            prompt_pattern,
        })
    }

    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    pub fn host(&self) -> &str {
        &self.ssh_config.host
    }

    /// Password sent at the enable prompt.
    fn enable_password(&self) -> Option<&str> {
        match (&self.enable_secret, &self.ssh_config.auth) {
            (Some(secret), _) => Some(secret.expose_secret()),
            (None, AuthMethod::Password(password)) => Some(password.expose_secret()),
            (None, AuthMethod::PrivateKey { .. }) => None,
        }
    }

    /// Read up to the next prompt and record the privilege level it shows.
    async fn read_prompt(&mut self) -> Result<String> {
        let session = self.session.as_mut().ok_or(DriverError::NotConnected)?;
        let data = session
            .channel
            .read_until_pattern(&self.prompt_pattern, self.timeout)
            .await?;
        let prompt = String::from_utf8_lossy(last_line(&data)).trim().to_string();
        self.privilege_manager.update_from_prompt(&prompt);
        Ok(prompt)
    }

    /// Work out the current level when the last prompt was not recognised.
    async fn probe_privilege(&mut self) -> Result<String> {
        if let Some(name) = self.privilege_manager.current_name() {
            return Ok(name.to_string());
        }

        let session = self.session.as_mut().ok_or(DriverError::NotConnected)?;
        session.channel.send("").await?;
        let prompt = self.read_prompt().await?;

        match self.privilege_manager.current_name() {
            Some(name) => Ok(name.to_string()),
            None => Err(DriverError::UnknownPrivilege { prompt }.into()),
        }
    }

    /// Send one transition command and return the prompt that follows.
    async fn step_privilege(&mut self, command: &str, auth_prompt: Option<&Regex>) -> Result<String> {
        let Some(auth) = auth_prompt else {
            let session = self.session.as_mut().ok_or(DriverError::NotConnected)?;
            session.channel.send(command).await?;
            return self.read_prompt().await;
        };

        let either = combine_patterns([auth.as_str(), self.prompt_pattern.as_str()])
            .map_err(ChannelError::from)?;
        let password = self.enable_password().map(str::to_string);

        let session = self.session.as_mut().ok_or(DriverError::NotConnected)?;
        session.channel.send(command).await?;
        let data = session.channel.read_until_pattern(&either, self.timeout).await?;
        let tail = String::from_utf8_lossy(last_line(&data)).trim().to_string();

        if !auth.is_match(tail.as_bytes()) {
            // No password asked
            self.privilege_manager.update_from_prompt(&tail);
            return Ok(tail);
        }

        let Some(password) = password else {
            return Err(DriverError::PrivilegeAcquisitionFailed {
                target: command.to_string(),
            }
            .into());
        };

        session.channel.send_hidden(&password).await?;
        let data = session.channel.read_until_pattern(&either, self.timeout).await?;
        let tail = String::from_utf8_lossy(last_line(&data)).trim().to_string();
        if auth.is_match(tail.as_bytes()) {
            // Asked again: the secret was rejected
            return Err(DriverError::PrivilegeAcquisitionFailed {
                target: command.to_string(),
            }
            .into());
        }

        self.privilege_manager.update_from_prompt(&tail);
        Ok(tail)
    }
}

impl Driver for GenericDriver {
    async fn open(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }

        let transport = SshTransport::connect(self.ssh_config.clone()).await?;
        let channel = PtyChannel::new(transport.open_channel().await?, SEARCH_DEPTH);
        self.session = Some(Session { transport, channel });

        // Login banner, then the first prompt
        let prompt = self.read_prompt().await?;
        debug!("{}: logged in at prompt '{}'", self.ssh_config.host, prompt);

        for command in self.platform.on_open_commands.clone() {
            let response = self.send_command(&command).await?;
            if !response.is_success() {
                warn!(
                    "{}: session setup command '{}' was rejected",
                    self.ssh_config.host, command
                );
            }
        }

        let default_privilege = self.platform.default_privilege.clone();
        if !default_privilege.is_empty() {
            self.acquire_privilege(&default_privilege).await?;
        }

        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(Session { transport, channel }) = self.session.take() {
            if let Err(e) = channel.close().await {
                debug!("{}: channel close: {}", self.ssh_config.host, e);
            }
            transport.close().await?;
            debug!("{}: disconnected", self.ssh_config.host);
        }
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<Response> {
        let session = self.session.as_mut().ok_or(DriverError::NotConnected)?;
        if session.transport.is_closed() {
            return Err(TransportError::Disconnected.into());
        }

        let start = Instant::now();
        session.channel.send(command).await?;
        let data = session
            .channel
            .read_until_pattern(&self.prompt_pattern, self.timeout)
            .await?;
        let elapsed = start.elapsed();

        let raw_result = String::from_utf8_lossy(&data).into_owned();
        let prompt = String::from_utf8_lossy(last_line(&data)).trim().to_string();
        self.privilege_manager.update_from_prompt(&prompt);

        let result = normalize_output(&raw_result, command);
        let failure = self.platform.detect_failure(&result).map(str::to_string);

        debug!(
            "{}: '{}' -> {} bytes in {:?}{}",
            self.ssh_config.host,
            command,
            result.len(),
            elapsed,
            if failure.is_some() { " (rejected)" } else { "" }
        );

        let response = Response::new(command, result, raw_result, prompt, elapsed);
        Ok(match failure {
            Some(marker) => response.with_failure(marker),
            None => response,
        })
    }

    async fn acquire_privilege(&mut self, target: &str) -> Result<()> {
        let current = self.probe_privilege().await?;
        if current == target {
            return Ok(());
        }

        let path = self.privilege_manager.find_path(&current, target)?;
        for hop in path.windows(2) {
            let (from, to) = (&hop[0], &hop[1]);
            let transition = self.privilege_manager.transition(from, to).ok_or_else(|| {
                DriverError::NoPrivilegePath {
                    from: from.clone(),
                    to: to.clone(),
                }
            })?;

            debug!("{}: {} -> {} via '{}'", self.ssh_config.host, from, to, transition.command);
            self.step_privilege(&transition.command, transition.auth_prompt.as_ref())
                .await?;

            if self.privilege_manager.current_name() != Some(to.as_str()) {
                return Err(DriverError::PrivilegeAcquisitionFailed { target: to.clone() }.into());
            }
        }

        Ok(())
    }

    async fn save_config(&mut self) -> Result<Response> {
        let command = self.platform.save_command.clone().ok_or_else(|| {
            DriverError::InvalidConfig {
                message: format!("platform '{}' has no save command", self.platform.name),
            }
        })?;

        let target = self.platform.default_privilege.clone();
        self.acquire_privilege(&target).await?;
        self.send_command(&command).await?.ensure_success()
    }

    fn is_open(&self) -> bool {
        self.session.is_some()
    }

    fn current_privilege(&self) -> Option<&str> {
        self.privilege_manager.current_name()
    }
}
