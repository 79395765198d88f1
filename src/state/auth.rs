#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use super::identity::Identity;

/// Authentication UI state: login/loading flags plus cheap mirrors of the
/// identity's display fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub is_logged_in: bool,
    pub is_loading: bool,
    pub username: String,
    pub email: String,
}

impl AuthState {
    /// Copy the display mirrors from `identity`.
    pub fn mirror(&mut self, identity: &Identity) {
        self.username.clone_from(&identity.name);
        self.email.clone_from(&identity.email);
    }

    /// Drop the login flag and mirrors, keeping `is_loading` as is.
    pub fn clear(&mut self) {
        self.is_logged_in = false;
        self.username.clear();
        self.email.clear();
    }
}
