use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Debug)]
pub struct SendOtpRequest {
    pub phone: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct SendOtpResponse {
    pub phone: Option<String>,
    pub otp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    Customer,
    Provider,
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(UserType::Customer),
            "provider" => Ok(UserType::Provider),
            other => Err(format!("unknown user type: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegistrationProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub user_type: UserType,
}

impl Default for RegistrationProfile {
    fn default() -> Self {
        Self {
            first_name: "John".to_owned(),
            last_name: "Doe".to_owned(),
            email: "john@example.com".to_owned(),
            user_type: UserType::Customer,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct VerifyOtpRequest<'a> {
    pub phone: &'a str,
    pub otp: &'a str,
    #[serde(flatten)]
    pub profile: &'a RegistrationProfile,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Tokens {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct VerifyOtpResponse {
    pub tokens: Option<Tokens>,
    #[serde(default)]
    pub created: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
