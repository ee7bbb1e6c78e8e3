use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Profile = Map<String, Value>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Deserialize, Debug)]
pub struct ProfileUpdateResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub user: Option<Profile>,
}
