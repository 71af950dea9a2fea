//! High-level driver for device interaction.
//!
//! The driver layer provides the API the automation runs on: sending
//! commands, moving between privilege levels and pushing configuration.

mod builder;
mod generic;
mod privilege;
pub(crate) mod response;

pub use builder::DriverBuilder;
pub use generic::GenericDriver;
pub use privilege::{PrivilegeManager, Transition};
pub use response::Response;

use std::future::Future;

use log::warn;

use crate::error::Result;
use crate::platform::{CONFIGURATION, PRIVILEGE_EXEC};

/// Trait for device drivers.
///
/// Implementors provide the session primitives; configuration pushes are
/// built on top of them.
pub trait Driver: Send + Sync {
    /// Open the connection to the device.
    fn open(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Close the connection.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Send a command and wait for the prompt.
    fn send_command(&mut self, command: &str) -> impl Future<Output = Result<Response>> + Send;

    /// Move to the named privilege level.
    fn acquire_privilege(&mut self, privilege: &str) -> impl Future<Output = Result<()>> + Send;

    /// Persist the running configuration.
    fn save_config(&mut self) -> impl Future<Output = Result<Response>> + Send;

    /// Check if the driver is connected.
    fn is_open(&self) -> bool;

    /// Get the current privilege level name.
    fn current_privilege(&self) -> Option<&str>;

    /// Send commands in configuration mode.
    ///
    /// Enters configuration mode, sends the commands in order and returns to
    /// the level the driver was in before (privileged EXEC if it already was
    /// in configuration mode).
    ///
    /// The first command the device rejects stops the sequence: the rest are
    /// not sent, the driver tries to leave configuration mode, and the
    /// rejection is returned as [`DriverError::CommandFailed`]. Lines that were
    /// already accepted stay applied.
    ///
    /// [`DriverError::CommandFailed`]: crate::error::DriverError::CommandFailed
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use ios_intent::driver::Driver;
    ///
    /// # async fn example(driver: &mut impl Driver) -> Result<(), ios_intent::Error> {
    /// driver.send_config(&[
    ///     "interface GigabitEthernet0/1",
    ///     "ip address 10.1.1.1 255.255.255.0",
    ///     "no shutdown",
    /// ]).await?;
    /// # Ok(())
    /// # }
    /// ```
    fn send_config(
        &mut self,
        commands: &[&str],
    ) -> impl Future<Output = Result<Vec<Response>>> + Send {
        async move {
            let restore = match self.current_privilege() {
                Some(level) if level != CONFIGURATION => level.to_string(),
                _ => PRIVILEGE_EXEC.to_string(),
            };

            self.acquire_privilege(CONFIGURATION).await?;

            let mut responses = Vec::with_capacity(commands.len());
            for command in commands {
                match self.send_command(command).await?.ensure_success() {
                    Ok(response) => responses.push(response),
                    Err(e) => {
                        if let Err(cleanup) = self.acquire_privilege(&restore).await {
                            warn!("could not leave configuration mode after '{command}': {cleanup}");
                        }
                        return Err(e);
                    }
                }
            }

            self.acquire_privilege(&restore).await?;
            Ok(responses)
        }
    }
}
