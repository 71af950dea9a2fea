//! Run configuration shared by every operation.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::driver::DriverBuilder;
use crate::parse::DEFAULT_DOMAIN_SUFFIX;
use crate::platform::Platform;
use crate::transport::HostKeyVerification;

/// Everything an automation run needs besides the intent documents.
///
/// The defaults reproduce the lab setup: intent in `./config/`, one
/// `admin`/`cisco` login for every device, devices in `.npa.com`.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the intent YAML files.
    pub config_dir: PathBuf,
    pub username: String,
    pub password: SecretString,
    /// Private key to log in with instead of the password.
    pub identity_file: Option<PathBuf>,
    /// Enable secret; the login password is used when unset.
    pub enable_secret: Option<SecretString>,
    pub platform: Platform,
    pub port: u16,
    /// Connect and prompt wait timeout.
    pub timeout: Duration,
    pub host_key_verification: HostKeyVerification,
    pub known_hosts_path: Option<PathBuf>,
    /// CDP device IDs outside this domain are ignored.
    pub domain_suffix: String,
    /// Delay between progress characters; zero prints whole lines.
    pub print_delay: Duration,
    /// Save the configuration after ACL, discovery and description pushes.
    /// Interface corrections are always saved.
    pub save: bool,
    /// Stop at the first failed device.
    pub fail_fast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("./config/"),
            username: "admin".to_string(),
            password: SecretString::from("cisco"),
            identity_file: None,
            enable_secret: None,
            platform: Platform::default(),
            port: 22,
            timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            domain_suffix: DEFAULT_DOMAIN_SUFFIX.to_string(),
            print_delay: Duration::from_millis(50),
            save: false,
            fail_fast: false,
        }
    }
}

impl Settings {
    /// A driver builder for one device, carrying the shared login.
    pub fn driver_builder(&self, host: impl Into<String>) -> DriverBuilder {
        let mut builder = DriverBuilder::new(host)
            .port(self.port)
            .username(self.username.clone())
            .password(self.password.clone())
            .platform(self.platform)
            .timeout(self.timeout)
            .host_key_verification(self.host_key_verification);

        match (&self.enable_secret, &self.identity_file) {
            (Some(secret), _) => builder = builder.enable_secret(secret.clone()),
            // Key logins have no password for enable to fall back on
            (None, Some(_)) => builder = builder.enable_secret(self.password.clone()),
            (None, None) => {}
        }
        if let Some(path) = &self.identity_file {
            builder = builder.private_key(path.clone());
        }
        if let Some(path) = &self.known_hosts_path {
            builder = builder.known_hosts_path(path.clone());
        }
        builder
    }
}
