use serde::Serialize;
use uuid::Uuid;

const DEFAULT_USERNAME: &str = "Player";

/// Offline identity handed to the client on the command line.
///
/// Only the display name comes from the user; the session id is random per
/// launch and the remaining fields are the fixed values an offline client
/// accepts.
#[derive(Debug, Clone, Serialize)]
pub struct OfflineProfile {
    pub username: String,
    pub session_uuid: String,
    pub access_token: String,
    pub user_properties: String,
    pub user_type: String,
}

impl OfflineProfile {
    pub fn new(username: &str) -> Self {
        Self::with_session(username, Uuid::new_v4().to_string())
    }

    pub fn with_session(username: &str, session_uuid: String) -> Self {
        Self {
            username: username.trim().to_string(),
            session_uuid,
            access_token: "0".into(),
            user_properties: "{}".into(),
            user_type: "legacy".into(),
        }
        .sanitized()
    }

    pub fn sanitized(mut self) -> Self {
        if self.username.trim().is_empty() {
            self.username = DEFAULT_USERNAME.into();
        }
        self
    }
}
