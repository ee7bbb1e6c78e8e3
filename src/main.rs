use anyhow::Result;
use clap::Parser;
use log::info;
use otp_auth_probe::config::ProbeConfig;
use otp_auth_probe::models::auth::UserType;
use otp_auth_probe::{logging, probe};
use std::path::PathBuf;
use std::process::ExitCode;

/// Walks the phone OTP login flow against a running API: send OTP, verify it, fetch the profile.
#[derive(Parser, Debug)]
#[command(name = "otp-auth-probe", version, about)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Phone number to log in with, E.164 format
    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// customer or provider
    #[arg(long)]
    user_type: Option<UserType>,

    /// Also check that a wrong OTP is rejected
    #[arg(long)]
    check_invalid_otp: bool,

    /// Per-request timeout in seconds (none by default)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<ProbeConfig> {
        let mut config = match &self.config {
            Some(path) => ProbeConfig::from_file(path)?,
            None => ProbeConfig::default(),
        };
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(phone) = self.phone {
            config.phone = phone;
        }
        if let Some(first_name) = self.first_name {
            config.registration.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            config.registration.last_name = last_name;
        }
        if let Some(email) = self.email {
            config.registration.email = email;
        }
        if let Some(user_type) = self.user_type {
            config.registration.user_type = user_type;
        }
        if self.check_invalid_otp {
            config.check_invalid_otp = true;
        }
        if self.timeout_secs.is_some() {
            config.timeout_secs = self.timeout_secs;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    logging::init();

    let config = Cli::parse().into_config()?;
    let client = config.build_client()?;

    info!("Starting API tests against {}", config.base_url());
    let report = probe::run_sequence(&client, &config).await;

    for r in &report.stages {
        info!("{:<20} {}", r.stage.name(), r.outcome);
    }

    if report.is_success() {
        info!("All tests completed");
        Ok(ExitCode::SUCCESS)
    } else {
        info!("Tests completed with failures");
        Ok(ExitCode::FAILURE)
    }
}
