use serde::{Deserialize, Serialize};

/// The signed-in user. Credential checks happen before a profile gets here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    /// Set for an account that was just created; signing it in starts from
    /// empty study data.
    #[serde(default)]
    pub is_new_user: bool,
}
