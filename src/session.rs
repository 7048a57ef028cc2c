use serde::{Deserialize, Serialize};

/// The authenticated identity for the current process. Only these three
/// fields exist; everything else about the user lives behind the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: u64,
    pub username: String,
    pub token: String,
}

/// Holds at most one active session. Logging in replaces any previous
/// session; logging out clears it.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    current: Option<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, session: Session) {
        self.current = Some(session);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }
}
