/// The authenticated identity for the lifetime of the client process.
///
/// Exactly one identity is active at a time. Every login and logout bumps
/// the epoch; in-flight fetches carry the epoch they were issued under, and
/// results from a different epoch are discarded at completion time. An epoch
/// never spans two identities, so an epoch match implies the response was
/// fetched for the viewer who is still looking at the screen.
#[derive(Debug, Default)]
pub struct Session {
    identity: Option<String>,
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Establish an identity after the backend accepted the credentials.
    /// Never called on auth failure, so no partial identity can exist.
    pub fn login(&mut self, username: &str) {
        self.identity = Some(username.to_string());
        self.epoch += 1;
    }

    /// Clear the identity. Callers must also invalidate any identity-scoped
    /// caches; the epoch bump makes stragglers from the old identity
    /// undeliverable either way.
    pub fn logout(&mut self) {
        self.identity = None;
        self.epoch += 1;
    }

    pub fn current(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// The viewer's identity plus its privilege level, derived once per render
/// or command from the session and the configured administrator name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerScope {
    pub name: String,
    pub privileged: bool,
}

impl ViewerScope {
    /// Privilege is a binary branch on the single configured administrator
    /// name; every other identity is a scoped viewer.
    pub fn resolve(identity: &str, admin_user: &str) -> Self {
        ViewerScope {
            name: identity.to_string(),
            privileged: identity == admin_user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_sets_identity_and_bumps_epoch() {
        let mut session = Session::new();
        assert!(!session.is_authenticated());
        let before = session.epoch();

        session.login("Amy");
        assert_eq!(session.current(), Some("Amy"));
        assert_eq!(session.epoch(), before + 1);
    }

    #[test]
    fn test_logout_clears_identity_and_bumps_epoch() {
        let mut session = Session::new();
        session.login("Amy");
        let logged_in_epoch = session.epoch();

        session.logout();
        assert_eq!(session.current(), None);
        assert!(session.epoch() > logged_in_epoch);
    }

    #[test]
    fn test_relogin_same_name_gets_fresh_epoch() {
        // A response issued before logout must not be deliverable after a
        // re-login, even for the same username.
        let mut session = Session::new();
        session.login("Amy");
        let first = session.epoch();
        session.logout();
        session.login("Amy");
        assert_ne!(session.epoch(), first);
    }

    #[test]
    fn test_viewer_scope_privilege() {
        let admin = ViewerScope::resolve("Maclean", "Maclean");
        assert!(admin.privileged);

        let scoped = ViewerScope::resolve("Amy", "Maclean");
        assert!(!scoped.privileged);
        assert_eq!(scoped.name, "Amy");
    }
}
