//! Scripted IOS device for driving the operations without SSH.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ios_intent::driver::{Driver, Response};
use ios_intent::error::{DriverError, TransportError};
use ios_intent::ops::Connector;
use ios_intent::parse::abbreviate_interface;
use ios_intent::platform::{CONFIGURATION, PRIVILEGE_EXEC};

pub const CDP_SAMPLE: &str = "\
Capability Codes: R - Router, T - Trans Bridge, B - Source Route Bridge
                  S - Switch, H - Host, I - IGMP, r - Repeater, P - Phone,
                  D - Remote, C - CVTA, M - Two-port Mac Relay

Device ID        Local Intrfce     Holdtme    Capability  Platform  Port ID
S1.npa.com       Gig 0/1           166             S I    WS-C3750  Gig 1/0/1
R2.npa.com       Gig 0/2           155           R B S I  CISCO2911 Gig 0/0
SEP001122334455  Fas 0/3           140             H P    IP Phone  Port 1

Total cdp entries displayed : 3
";

/// Progress output kept in memory.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MockInterface {
    pub name: String,
    pub ip: Option<Ipv4Addr>,
    pub shutdown: bool,
}

/// What the device holds and everything it was sent.
#[derive(Debug, Default)]
pub struct DeviceState {
    pub interfaces: Vec<MockInterface>,
    pub cdp_output: String,
    /// Commands starting with one of these are rejected.
    pub reject: Vec<String>,
    /// Accept `ip address` lines without changing anything.
    pub ignore_address_changes: bool,
    /// Every line received, including mode changes.
    pub history: Vec<String>,
    /// Lines received in configuration mode.
    pub config_lines: Vec<String>,
    pub saves: usize,
    pub sessions: usize,
    pub closed: usize,
}

impl DeviceState {
    pub fn with_interface(mut self, name: &str, ip: Option<Ipv4Addr>) -> Self {
        self.interfaces.push(MockInterface {
            name: name.to_string(),
            ip,
            shutdown: ip.is_none(),
        });
        self
    }

    pub fn address_of(&self, name: &str) -> Option<Ipv4Addr> {
        self.find(name).and_then(|i| i.ip)
    }

    pub fn count(&self, command: &str) -> usize {
        self.history.iter().filter(|line| *line == command).count()
    }

    fn find(&self, name: &str) -> Option<&MockInterface> {
        let wanted = abbreviate_interface(name);
        self.interfaces
            .iter()
            .find(|i| abbreviate_interface(&i.name).eq_ignore_ascii_case(&wanted))
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut MockInterface> {
        let wanted = abbreviate_interface(name);
        self.interfaces
            .iter_mut()
            .find(|i| abbreviate_interface(&i.name).eq_ignore_ascii_case(&wanted))
    }

    fn interface_brief(&self) -> String {
        let mut out = String::from(
            "Interface              IP-Address      OK? Method Status                Protocol\n",
        );
        for interface in &self.interfaces {
            let (ip, method) = match interface.ip {
                Some(ip) => (ip.to_string(), "manual"),
                None => ("unassigned".to_string(), "unset"),
            };
            let (status, protocol) = if interface.shutdown {
                ("administratively down", "down")
            } else {
                ("up", "up")
            };
            out.push_str(&format!(
                "{:<22} {:<15} YES {:<6} {:<21} {}\n",
                interface.name, ip, method, status, protocol
            ));
        }
        out
    }
}

pub type SharedDevice = Arc<Mutex<DeviceState>>;

pub fn shared(state: DeviceState) -> SharedDevice {
    Arc::new(Mutex::new(state))
}

/// Session on a scripted device.
pub struct MockDriver {
    state: SharedDevice,
    privilege: Option<String>,
    interface: Option<String>,
}

impl MockDriver {
    fn execute(&mut self, command: &str) -> Response {
        let mut state = self.state.lock().unwrap();
        state.history.push(command.to_string());

        let in_config = self.privilege.as_deref() == Some(CONFIGURATION);
        if in_config {
            state.config_lines.push(command.to_string());
        }

        let response = |result: &str| {
            Response::new(command, result, result, "R1#", Duration::from_millis(1))
        };

        if state.reject.iter().any(|prefix| command.starts_with(prefix.as_str())) {
            return response("% Invalid input detected at '^' marker.")
                .with_failure("% Invalid input");
        }

        if command == "show ip interface brief" {
            return response(&state.interface_brief());
        }
        if command == "show cdp neighbors" {
            let output = state.cdp_output.clone();
            return response(&output);
        }
        if command == "write memory" {
            state.saves += 1;
            return response("Building configuration...\n[OK]");
        }

        if in_config {
            let words: Vec<&str> = command.split_whitespace().collect();
            match words.as_slice() {
                ["interface", name] => {
                    if state.find(name).is_none() {
                        state.interfaces.push(MockInterface {
                            name: name.to_string(),
                            ip: None,
                            shutdown: true,
                        });
                    }
                    self.interface = Some(name.to_string());
                }
                ["ip", "address", ip, _mask] => {
                    let ignore = state.ignore_address_changes;
                    if let (Some(name), false) = (&self.interface, ignore) {
                        let ip = ip.parse().ok();
                        if let Some(interface) = state.find_mut(name) {
                            interface.ip = ip;
                        }
                    }
                }
                ["no", "shutdown"] => {
                    if let Some(name) = &self.interface {
                        if let Some(interface) = state.find_mut(name) {
                            interface.shutdown = false;
                        }
                    }
                }
                ["exit"] => self.interface = None,
                _ => {}
            }
        }

        response("")
    }
}

impl Driver for MockDriver {
    async fn open(&mut self) -> ios_intent::Result<()> {
        self.privilege = Some(PRIVILEGE_EXEC.to_string());
        Ok(())
    }

    async fn close(&mut self) -> ios_intent::Result<()> {
        self.privilege = None;
        self.state.lock().unwrap().closed += 1;
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> ios_intent::Result<Response> {
        if self.privilege.is_none() {
            return Err(DriverError::NotConnected.into());
        }
        Ok(self.execute(command))
    }

    async fn acquire_privilege(&mut self, privilege: &str) -> ios_intent::Result<()> {
        let current = self.privilege.clone().ok_or(DriverError::NotConnected)?;
        if current == privilege {
            return Ok(());
        }

        let mode_change = match privilege {
            CONFIGURATION => "configure terminal",
            _ => "end",
        };
        self.state.lock().unwrap().history.push(mode_change.to_string());
        self.interface = None;
        self.privilege = Some(privilege.to_string());
        Ok(())
    }

    async fn save_config(&mut self) -> ios_intent::Result<Response> {
        self.acquire_privilege(PRIVILEGE_EXEC).await?;
        self.send_command("write memory").await?.ensure_success()
    }

    fn is_open(&self) -> bool {
        self.privilege.is_some()
    }

    fn current_privilege(&self) -> Option<&str> {
        self.privilege.as_deref()
    }
}

/// Hands out sessions to scripted devices by management address.
#[derive(Default)]
pub struct MockConnector {
    devices: HashMap<Ipv4Addr, SharedDevice>,
    unreachable: HashSet<Ipv4Addr>,
    pub attempts: Mutex<Vec<Ipv4Addr>>,
}

impl MockConnector {
    pub fn with_device(mut self, address: Ipv4Addr, device: SharedDevice) -> Self {
        self.devices.insert(address, device);
        self
    }

    pub fn with_unreachable(mut self, address: Ipv4Addr) -> Self {
        self.unreachable.insert(address);
        self
    }

    pub fn attempts(&self) -> Vec<Ipv4Addr> {
        self.attempts.lock().unwrap().clone()
    }
}

impl Connector for MockConnector {
    type Driver = MockDriver;

    async fn connect(&self, _device: &str, address: Ipv4Addr) -> ios_intent::Result<MockDriver> {
        self.attempts.lock().unwrap().push(address);

        let state = match self.devices.get(&address) {
            Some(state) if !self.unreachable.contains(&address) => state.clone(),
            _ => {
                return Err(TransportError::ConnectionFailed {
                    host: address.to_string(),
                    port: 22,
                    source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
                }
                .into());
            }
        };

        state.lock().unwrap().sessions += 1;
        let mut driver = MockDriver {
            state,
            privilege: None,
            interface: None,
        };
        driver.open().await?;
        Ok(driver)
    }
}
