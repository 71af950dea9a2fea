//! Builder for creating device drivers.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::generic::GenericDriver;
use crate::error::{DriverError, Result};
use crate::platform::Platform;
use crate::transport::config::{AuthMethod, HostKeyVerification, SshConfig};

/// Builder for constructing device drivers.
///
/// # Example
///
/// ```rust,no_run
/// use ios_intent::driver::{Driver, DriverBuilder};
///
/// # async fn example() -> Result<(), ios_intent::Error> {
/// let mut driver = DriverBuilder::new("192.168.99.1")
///     .username("admin")
///     .password("cisco")
///     .build()?;
/// driver.open().await?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: Option<AuthMethod>,
    enable_secret: Option<SecretString>,
    platform: Platform,
    timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            auth: None,
            enable_secret: None,
            platform: Platform::default(),
            timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<SecretString>) -> Self {
        self.auth = Some(AuthMethod::Password(password.into()));
        self
    }

    /// Set the enable secret. Without one, the login password is tried.
    pub fn enable_secret(mut self, secret: impl Into<SecretString>) -> Self {
        self.enable_secret = Some(secret.into());
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = Some(AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        });
        self
    }

    /// Set the device type (default: Cisco IOS).
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Set the connection and command timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Build the driver.
    ///
    /// This creates the driver but does not connect. Call `open()` on the
    /// returned driver to establish the connection.
    pub fn build(self) -> Result<GenericDriver> {
        let username = self.username.ok_or_else(|| DriverError::InvalidConfig {
            message: format!("{}: username is required", self.host),
        })?;
        let auth = self.auth.ok_or_else(|| DriverError::InvalidConfig {
            message: format!("{}: a password or private key is required", self.host),
        })?;

        let platform = self.platform.definition();

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            auth,
            timeout: self.timeout,
            terminal_width: platform.terminal_width,
            terminal_height: platform.terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        GenericDriver::new(ssh_config, platform, self.enable_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::driver::Driver;

    #[test]
    fn test_build_requires_username() {
        let err = DriverBuilder::new("10.0.0.1")
            .password("cisco")
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::Driver(DriverError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_build_requires_credentials() {
        let err = DriverBuilder::new("10.0.0.1")
            .username("admin")
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("password or private key"));
    }

    #[test]
    fn test_build_does_not_connect() {
        let driver = DriverBuilder::new("10.0.0.1")
            .username("admin")
            .password("cisco")
            .enable_secret("class")
            .timeout(Duration::from_secs(3))
            .build()
            .unwrap();
        assert!(!driver.is_open());
        assert_eq!(driver.host(), "10.0.0.1");
        assert_eq!(driver.platform().name, "cisco_ios");
        assert!(driver.current_privilege().is_none());
    }

    #[test]
    fn test_private_key_satisfies_credentials() {
        let driver = DriverBuilder::new("10.0.0.1")
            .username("admin")
            .private_key("/home/admin/.ssh/id_ed25519")
            .build()
            .unwrap();
        assert!(!driver.is_open());
    }
}
