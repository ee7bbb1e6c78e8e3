use crate::api::auth::{send_otp, verify_otp};
use crate::api::profile::{get_profile, update_profile};
use crate::api::ApiError;
use crate::config::ProbeConfig;
use crate::models::auth::{SendOtpResponse, VerifyOtpResponse};
use crate::models::profile::Profile;
use log::{debug, error, info, warn};
use reqwest::Client;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SendOtp,
    VerifyOtp,
    GetProfile,
    UpdateProfile,
    RejectInvalidOtp,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::SendOtp => "send_otp",
            Stage::VerifyOtp => "verify_otp",
            Stage::GetProfile => "get_profile",
            Stage::UpdateProfile => "update_profile",
            Stage::RejectInvalidOtp => "reject_invalid_otp",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Passed,
    Failed(String),
    /// The call succeeded but a field the next stage depends on was absent or empty.
    Incomplete { missing: &'static str },
    Skipped,
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageOutcome::Passed => f.write_str("passed"),
            StageOutcome::Failed(reason) => write!(f, "failed: {}", reason),
            StageOutcome::Incomplete { missing } => write!(f, "incomplete: missing `{}`", missing),
            StageOutcome::Skipped => f.write_str("skipped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: StageOutcome,
}

#[derive(Debug, Default)]
pub struct ProbeReport {
    pub stages: Vec<StageReport>,
    pub profile: Option<Profile>,
}

impl ProbeReport {
    fn record(&mut self, stage: Stage, outcome: StageOutcome) {
        match &outcome {
            StageOutcome::Passed => info!("[{}] passed", stage),
            StageOutcome::Skipped => debug!("[{}] skipped", stage),
            other => error!("[{}] {}", stage, other),
        }
        self.stages.push(StageReport { stage, outcome });
    }

    // Stages a closed gate never reached.
    fn skip_unrecorded(&mut self, stages: &[Stage]) {
        for stage in stages {
            if self.outcome(*stage).is_none() {
                self.record(*stage, StageOutcome::Skipped);
            }
        }
    }

    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| &r.outcome)
    }

    pub fn is_success(&self) -> bool {
        self.stages
            .iter()
            .all(|r| r.outcome == StageOutcome::Passed)
    }
}

pub fn otp_credentials(response: &SendOtpResponse) -> Result<(&str, &str), &'static str> {
    let phone = non_empty(response.phone.as_deref()).ok_or("phone")?;
    let otp = non_empty(response.otp.as_deref()).ok_or("otp")?;
    Ok((phone, otp))
}

pub fn access_token(response: &VerifyOtpResponse) -> Result<&str, &'static str> {
    let tokens = response.tokens.as_ref().ok_or("tokens")?;
    let access = non_empty(tokens.access.as_deref()).ok_or("tokens.access")?;
    non_empty(tokens.refresh.as_deref()).ok_or("tokens.refresh")?;
    Ok(access)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn token_preview(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{}...", prefix)
}

pub async fn run_sequence(client: &Client, config: &ProbeConfig) -> ProbeReport {
    let mut report = ProbeReport::default();
    info!("Sending OTP to {}", config.phone);
    run_chain(client, config, &mut report).await;
    report.skip_unrecorded(&chain_stages(config));
    check_invalid_otp(client, config, &mut report).await;
    report
}

fn chain_stages(config: &ProbeConfig) -> Vec<Stage> {
    let mut stages = vec![Stage::SendOtp, Stage::VerifyOtp, Stage::GetProfile];
    if config.profile_update.is_some() {
        stages.push(Stage::UpdateProfile);
    }
    stages
}

async fn run_chain(client: &Client, config: &ProbeConfig, report: &mut ProbeReport) {
    let base_url = config.base_url();

    let sent = match send_otp(client, base_url, &config.phone).await {
        Ok(sent) => sent,
        Err(e) => return report.record(Stage::SendOtp, StageOutcome::Failed(e.to_string())),
    };
    let (phone, otp) = match otp_credentials(&sent) {
        Ok(pair) => pair,
        Err(missing) => {
            return report.record(Stage::SendOtp, StageOutcome::Incomplete { missing })
        }
    };
    info!("OTP code: {}", otp);
    report.record(Stage::SendOtp, StageOutcome::Passed);

    let verified = match verify_otp(client, base_url, phone, otp, &config.registration).await {
        Ok(verified) => verified,
        Err(e) => return report.record(Stage::VerifyOtp, StageOutcome::Failed(e.to_string())),
    };
    let token = match access_token(&verified) {
        Ok(token) => token,
        Err(missing) => {
            return report.record(Stage::VerifyOtp, StageOutcome::Incomplete { missing })
        }
    };
    if let Some(message) = &verified.message {
        info!("{}", message);
    }
    info!("Access token: {}", token_preview(token));
    report.record(Stage::VerifyOtp, StageOutcome::Passed);

    match get_profile(client, base_url, token).await {
        Ok(profile) => {
            debug!("Profile: {:?}", profile);
            report.profile = Some(profile);
            report.record(Stage::GetProfile, StageOutcome::Passed);
        }
        Err(e) => return report.record(Stage::GetProfile, StageOutcome::Failed(e.to_string())),
    }

    if let Some(update) = &config.profile_update {
        let outcome = match update_profile(client, base_url, token, update).await {
            Ok(resp) if resp.success => StageOutcome::Passed,
            Ok(resp) => StageOutcome::Failed(
                resp.message
                    .unwrap_or_else(|| "server reported success: false".to_owned()),
            ),
            Err(e) => StageOutcome::Failed(e.to_string()),
        };
        report.record(Stage::UpdateProfile, outcome);
    }
}

// A known-wrong code must come back as a 4xx.
async fn check_invalid_otp(client: &Client, config: &ProbeConfig, report: &mut ProbeReport) {
    if !config.check_invalid_otp {
        return;
    }

    info!("Verifying invalid OTP {} for {}", config.invalid_otp, config.phone);
    let outcome = match verify_otp(
        client,
        config.base_url(),
        &config.phone,
        &config.invalid_otp,
        &config.registration,
    )
    .await
    {
        Err(ApiError::Status { status, .. }) if status.is_client_error() => {
            info!("Invalid OTP rejected with {}", status);
            StageOutcome::Passed
        }
        Ok(resp) if resp.tokens.is_some() => {
            StageOutcome::Failed("server accepted an invalid OTP".to_owned())
        }
        Ok(_) => {
            warn!("Invalid OTP answered with a 2xx status but no tokens");
            StageOutcome::Failed("expected a client error status".to_owned())
        }
        Err(e) => StageOutcome::Failed(e.to_string()),
    };
    report.record(Stage::RejectInvalidOtp, outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Tokens;

    #[test]
    fn credentials_require_phone_and_otp() {
        let mut response = SendOtpResponse {
            phone: Some("+1234567890".to_owned()),
            otp: Some("123456".to_owned()),
            ..Default::default()
        };
        assert_eq!(otp_credentials(&response), Ok(("+1234567890", "123456")));

        response.otp = Some(String::new());
        assert_eq!(otp_credentials(&response), Err("otp"));

        response.phone = None;
        assert_eq!(otp_credentials(&response), Err("phone"));
    }

    #[test]
    fn access_token_requires_tokens() {
        let mut response = VerifyOtpResponse::default();
        assert_eq!(access_token(&response), Err("tokens"));

        response.tokens = Some(Tokens {
            access: Some(String::new()),
            refresh: Some("jkl.mno.pqr".to_owned()),
        });
        assert_eq!(access_token(&response), Err("tokens.access"));

        response.tokens = Some(Tokens {
            access: Some("abc.def.ghi".to_owned()),
            refresh: Some("jkl.mno.pqr".to_owned()),
        });
        assert_eq!(access_token(&response), Ok("abc.def.ghi"));
    }

    #[test]
    fn access_token_requires_refresh_token() {
        let mut response = VerifyOtpResponse {
            tokens: Some(Tokens {
                access: Some("a".to_owned()),
                refresh: Some(String::new()),
            }),
            ..Default::default()
        };
        assert_eq!(access_token(&response), Err("tokens.refresh"));

        response.tokens = Some(Tokens {
            access: Some("a".to_owned()),
            refresh: None,
        });
        assert_eq!(access_token(&response), Err("tokens.refresh"));
    }

    #[test]
    fn report_success_needs_every_stage_passed() {
        let mut report = ProbeReport::default();
        report.record(Stage::SendOtp, StageOutcome::Passed);
        assert!(report.is_success());

        report.record(Stage::VerifyOtp, StageOutcome::Incomplete { missing: "tokens" });
        report.skip_unrecorded(&[Stage::SendOtp, Stage::VerifyOtp, Stage::GetProfile]);
        assert!(!report.is_success());
        assert_eq!(report.stages.len(), 3);
        assert_eq!(report.outcome(Stage::SendOtp), Some(&StageOutcome::Passed));
        assert_eq!(report.outcome(Stage::GetProfile), Some(&StageOutcome::Skipped));
    }

    #[test]
    fn token_preview_is_truncated() {
        assert_eq!(token_preview("abcdefghijklmnop"), "abcdefgh...");
        assert_eq!(token_preview("abc"), "abc...");
    }
}
