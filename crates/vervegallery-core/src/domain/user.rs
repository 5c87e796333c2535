//! Signed-in user profile

use serde::{Deserialize, Serialize};

/// Profile of the signed-in Google user
///
/// This is the record persisted by the session storage. Field names are
/// camelCase on the wire so records written by the web gallery can be read
/// back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Avatar URL, empty when the profile has none
    #[serde(default)]
    pub photo_url: String,
}

impl UserProfile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        photo_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            photo_url: photo_url.into(),
        }
    }
}
