use crate::api::error::{read_json, ApiError};
use crate::models::auth::{
    RegistrationProfile, SendOtpRequest, SendOtpResponse, VerifyOtpRequest, VerifyOtpResponse,
};
use log::{debug, info};
use reqwest::Client;

pub async fn send_otp(
    client: &Client,
    base_url: &str,
    phone: &str,
) -> Result<SendOtpResponse, ApiError> {
    debug!("Requesting OTP for {}", phone);
    let url = format!("{}/api/users/send-otp/", base_url);
    let request = SendOtpRequest {
        phone: phone.to_string(),
    };
    let resp = client.post(&url).json(&request).send().await?;

    let response = read_json::<SendOtpResponse>(resp).await?;
    info!("OTP sent successfully");
    Ok(response)
}

pub async fn verify_otp(
    client: &Client,
    base_url: &str,
    phone: &str,
    otp: &str,
    profile: &RegistrationProfile,
) -> Result<VerifyOtpResponse, ApiError> {
    debug!("Verifying OTP {} for {}", otp, phone);
    let url = format!("{}/api/users/verify-otp/", base_url);
    let request = VerifyOtpRequest {
        phone,
        otp,
        profile,
    };
    let resp = client.post(&url).json(&request).send().await?;

    let response = read_json::<VerifyOtpResponse>(resp).await?;
    info!("OTP verified successfully");
    Ok(response)
}
