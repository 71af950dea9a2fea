//! Cisco IOS platform definition.
//!
//! Privilege levels:
//! - `exec` - user EXEC mode with `>` prompt
//! - `privilege_exec` - privileged EXEC mode with `#` prompt
//! - `configuration` - global and sub-configuration modes, `(config*)#`
//!
//! # Prompt Examples
//!
//! ```text
//! R1>                     # exec
//! R1#                     # privilege_exec
//! R1(config)#             # configuration
//! R1(config-if)#          # configuration (interface)
//! S1(config-std-nacl)#    # configuration (named ACL)
//! S1(config-line)#        # configuration (vty lines)
//! ```
//!
//! # Privilege Graph
//!
//! ```text
//! ┌──────┐  enable     ┌────────────────┐  configure terminal  ┌───────────────┐
//! │ exec ├──────────────► privilege_exec ├──────────────────────► configuration │
//! │  >   │   disable   │       #        │        end           │  (config*)#   │
//! └──────┘◄────────────┴────────────────┘◄─────────────────────┴───────────────┘
//! ```

use super::{CONFIGURATION, EXEC, PRIVILEGE_EXEC, PlatformDefinition, PrivilegeLevel};

/// Device type identifier.
pub const NAME: &str = "cisco_ios";

const EXEC_PROMPT: &str = r"(?mi)^[\w.\-@/:]{1,63}>\s?$";
const PRIVILEGE_EXEC_PROMPT: &str = r"(?mi)^[\w.\-@/:]{1,63}#\s?$";
const CONFIGURATION_PROMPT: &str = r"(?mi)^[\w.\-@/:]{1,63}\(conf[\w.\-@/:+]{0,32}\)#\s?$";
const ENABLE_PASSWORD_PROMPT: &str = r"(?mi)^password:\s?$";

/// Create the Cisco IOS platform definition.
pub fn platform() -> PlatformDefinition {
    let exec = PrivilegeLevel::new(EXEC, EXEC_PROMPT).unwrap();

    // "(conf" keeps configuration prompts out of privileged EXEC
    let privilege_exec = PrivilegeLevel::new(PRIVILEGE_EXEC, PRIVILEGE_EXEC_PROMPT)
        .unwrap()
        .with_parent(EXEC)
        .with_escalate("enable")
        .with_deescalate("disable")
        .with_auth(ENABLE_PASSWORD_PROMPT)
        .unwrap()
        .with_not_contains("(conf");

    let configuration = PrivilegeLevel::new(CONFIGURATION, CONFIGURATION_PROMPT)
        .unwrap()
        .with_parent(PRIVILEGE_EXEC)
        .with_escalate("configure terminal")
        .with_deescalate("end");

    PlatformDefinition::new(NAME)
        .with_privilege(exec)
        .with_privilege(privilege_exec)
        .with_privilege(configuration)
        .with_default_privilege(PRIVILEGE_EXEC)
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid input")
        .with_failure_pattern("% Unknown command")
        .with_failure_pattern("% Bad mask")
        .with_failure_pattern("% CDP is not enabled")
        .with_failure_pattern("% Error")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
        .with_save_command("write memory")
        .with_terminal_size(511, 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ios_platform() {
        let platform = platform();
        assert_eq!(platform.name, "cisco_ios");
        assert_eq!(platform.privilege_levels.len(), 3);
        assert_eq!(platform.default_privilege, "privilege_exec");
        assert_eq!(platform.save_command.as_deref(), Some("write memory"));
    }

    #[test]
    fn test_exec_prompt_match() {
        let platform = platform();
        let exec = platform.privilege_levels.get("exec").unwrap();

        assert!(exec.matches("R1>"));
        assert!(exec.matches("S1.npa.com> "));
        assert!(!exec.matches("R1#"));
        assert!(!exec.matches("R1(config)#"));
    }

    #[test]
    fn test_privilege_exec_prompt_match() {
        let platform = platform();
        let priv_exec = platform.privilege_levels.get("privilege_exec").unwrap();

        assert!(priv_exec.matches("R1#"));
        assert!(priv_exec.matches("R1# "));
        assert!(!priv_exec.matches("R1(config)#"));
        assert!(!priv_exec.matches("R1(config-if)#"));
        assert!(!priv_exec.matches("R1>"));
    }

    #[test]
    fn test_configuration_prompt_match() {
        let platform = platform();
        let config = platform.privilege_levels.get("configuration").unwrap();

        assert!(config.matches("R1(config)#"));
        assert!(config.matches("R1(config-if)#"));
        assert!(config.matches("S1(config-std-nacl)#"));
        assert!(config.matches("S1(config-ext-nacl)#"));
        assert!(config.matches("S1(config-line)#"));
        assert!(!config.matches("R1#"));
        assert!(!config.matches("R1>"));
    }

    #[test]
    fn test_prompt_found_at_end_of_output() {
        let pattern = platform().prompt_pattern().unwrap();
        assert!(pattern.is_match(b"show ip interface brief\nInterface  IP-Address\nR1#"));
        assert!(pattern.is_match(b"interface g0/1\nR1(config-if)#"));
        assert!(!pattern.is_match(b"show ip interface brief\nInterface  IP-Address"));
    }

    #[test]
    fn test_enable_password_prompt() {
        let platform = platform();
        let priv_exec = platform.privilege_levels.get("privilege_exec").unwrap();
        let auth = priv_exec.auth_prompt.as_ref().unwrap();
        assert!(auth.is_match(b"enable\nPassword: "));
        assert!(auth.is_match(b"enable\npassword:"));
    }

    #[test]
    fn test_failure_patterns() {
        let platform = platform();
        assert_eq!(
            platform.detect_failure("% Invalid input detected at '^' marker."),
            Some("% Invalid input")
        );
        assert_eq!(
            platform.detect_failure("% Incomplete command."),
            Some("% Incomplete command")
        );
        assert_eq!(platform.detect_failure("Building configuration...\n[OK]"), None);
    }

    #[test]
    fn test_on_open_commands() {
        let platform = platform();
        assert_eq!(
            platform.on_open_commands,
            vec!["terminal length 0".to_string(), "terminal width 511".to_string()]
        );
    }
}
