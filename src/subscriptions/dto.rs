use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: &'static str,
}

impl SubscribeResponse {
    pub fn subscribed() -> Self {
        Self {
            success: true,
            message: "Thank you for subscribing!",
        }
    }
}
