use crate::api::error::{read_json, ApiError};
use crate::models::profile::{Profile, ProfileUpdate, ProfileUpdateResponse};
use log::info;
use reqwest::Client;

pub async fn get_profile(
    client: &Client,
    base_url: &str,
    token: &str,
) -> Result<Profile, ApiError> {
    let url = format!("{}/api/users/profile/", base_url);
    let resp = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", token))
        .header("Content-Type", "application/json")
        .send()
        .await?;

    let response = read_json::<Profile>(resp).await?;
    info!("Profile received successfully");
    Ok(response)
}

pub async fn update_profile(
    client: &Client,
    base_url: &str,
    token: &str,
    update: &ProfileUpdate,
) -> Result<ProfileUpdateResponse, ApiError> {
    let url = format!("{}/api/users/profile/", base_url);
    let resp = client
        .patch(&url)
        .header("Authorization", format!("Bearer {}", token))
        .json(update)
        .send()
        .await?;

    let response = read_json::<ProfileUpdateResponse>(resp).await?;
    info!("Profile updated successfully");
    Ok(response)
}
