//! Command line entry point.
//!
//! ```bash
//! ios-intent --config-dir ./config/ interfaces
//! IOS_INTENT_PASSWORD=secret ios-intent --save -v all
//! ios-intent validate
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use secrecy::SecretString;

use ios_intent::{Platform, Settings};
use ios_intent::intent::{self, AclPlan, IntentSet};
use ios_intent::ops::{RunSummary, Runner, SshConnector};
use ios_intent::progress::Progress;
use ios_intent::transport::HostKeyVerification;

#[derive(Parser, Debug)]
#[command(
    name = "ios-intent",
    version,
    about = "Bring Cisco IOS devices in line with YAML intent over SSH"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding the intent YAML files.
    #[arg(long, global = true, default_value = "./config/")]
    config_dir: PathBuf,

    /// Login for every device.
    #[arg(long, global = true, env = "IOS_INTENT_USERNAME", default_value = "admin")]
    username: String,

    #[arg(
        long,
        global = true,
        env = "IOS_INTENT_PASSWORD",
        default_value = "cisco",
        hide_default_value = true,
        hide_env_values = true
    )]
    password: String,

    /// Private key to log in with instead of the password.
    #[arg(long, global = true, env = "IOS_INTENT_IDENTITY_FILE", value_name = "PATH")]
    identity_file: Option<PathBuf>,

    /// Enable secret; defaults to the login password.
    #[arg(long, global = true, env = "IOS_INTENT_ENABLE_SECRET", hide_env_values = true)]
    enable_secret: Option<String>,

    /// Device type of every device, e.g. cisco_ios.
    #[arg(long, global = true, default_value_t = Platform::CiscoIos)]
    device_type: Platform,

    #[arg(long, global = true, default_value_t = 22)]
    port: u16,

    /// Connect and prompt timeout.
    #[arg(long, global = true, value_name = "SECONDS", default_value_t = 30)]
    timeout: u64,

    /// strict, accept-new or disabled.
    #[arg(long, global = true, default_value_t = HostKeyVerification::AcceptNew)]
    host_key_checking: HostKeyVerification,

    /// known_hosts file to check and learn keys in.
    #[arg(long, global = true)]
    known_hosts: Option<PathBuf>,

    /// Only CDP neighbors in this domain get descriptions.
    #[arg(long, global = true, default_value = ".npa.com")]
    domain_suffix: String,

    /// Delay between progress characters, 0 to print whole lines.
    #[arg(long, global = true, value_name = "MS", default_value_t = 50)]
    print_delay_ms: u64,

    /// Save the configuration after ACL, discovery and description pushes.
    #[arg(long, global = true)]
    save: bool,

    /// Stop at the first device that fails.
    #[arg(long, global = true)]
    fail_fast: bool,

    /// -v for progress details, -vv for session traffic.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Verify interface addresses and correct the ones that drifted
    Interfaces,
    /// Push access lists and bind them to lines and interfaces
    Acl,
    /// Enable CDP and LLDP
    Discovery,
    /// Describe interfaces after their CDP neighbors
    Descriptions,
    /// Run interfaces, acl, discovery and descriptions in that order
    All,
    /// Load and check the intent files without contacting devices
    Validate,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            config_dir: self.config_dir.clone(),
            username: self.username.clone(),
            password: SecretString::from(self.password.clone()),
            identity_file: self.identity_file.clone(),
            enable_secret: self.enable_secret.clone().map(SecretString::from),
            platform: self.device_type,
            port: self.port,
            timeout: Duration::from_secs(self.timeout),
            host_key_verification: self.host_key_checking,
            known_hosts_path: self.known_hosts.clone(),
            domain_suffix: self.domain_suffix.clone(),
            print_delay: Duration::from_millis(self.print_delay_ms),
            save: self.save,
            fail_fast: self.fail_fast,
            ..Settings::default()
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run the selected command; `Ok(false)` means some device did not succeed.
async fn run(cli: &Cli) -> Result<bool> {
    let settings = cli.settings();
    let dir = settings.config_dir.clone();
    let load_context = || format!("loading intent from {}", dir.display());

    let connector = SshConnector::new(settings.clone());
    let progress = Progress::stdout(settings.print_delay);
    let mut runner = Runner::new(connector, settings, progress);

    let summaries = match cli.command {
        Command::Validate => {
            let set = IntentSet::load(&dir).with_context(load_context)?;
            println!(
                "{}: {} interface devices, {} managed devices, {} access lists for {} devices",
                set.dir.display(),
                set.interfaces.len(),
                set.managed.len(),
                set.acls.catalog.len(),
                set.acls.devices.len()
            );
            return Ok(true);
        }
        Command::Interfaces => {
            let devices = intent::load_interface_intent(&dir).with_context(load_context)?;
            vec![runner.configure_interfaces(&devices).await]
        }
        Command::Acl => {
            let plan = AclPlan::load(&dir).with_context(load_context)?;
            vec![runner.configure_acls(&plan).await]
        }
        Command::Discovery => {
            let devices = intent::load_managed_devices(&dir).with_context(load_context)?;
            vec![runner.enable_discovery(&devices).await]
        }
        Command::Descriptions => {
            let devices = intent::load_managed_devices(&dir).with_context(load_context)?;
            vec![runner.describe_interfaces(&devices).await]
        }
        Command::All => {
            let set = IntentSet::load(&dir).with_context(load_context)?;
            runner.run_all(&set).await
        }
    };

    report(&summaries);
    Ok(summaries.iter().all(RunSummary::is_success))
}

fn report(summaries: &[RunSummary]) {
    println!();
    for summary in summaries {
        println!("{summary}");
        for outcome in summary.failures() {
            match &outcome.detail {
                Some(detail) => println!("  {} [{}]: {}", outcome.device, outcome.status, detail),
                None => println!("  {} [{}]", outcome.device, outcome.status),
            }
        }
    }
}
