//! Login session as an explicit value, not ambient process state. Handlers
//! receive a [`Session`] (or a bare [`Identity`] where auth is mandatory) as
//! a parameter; nothing in the crate reads a hidden current-user global.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated-identity token carried for the rest of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub admin: bool,
}

impl Identity {
    /// Pure predicate over the stored role flag.
    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

/// Two states, no partial-auth in between.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl Session {
    /// The only transition into `Authenticated`.
    pub fn login(&mut self, identity: Identity) {
        *self = Session::Authenticated(identity);
    }

    /// Unconditionally clears session state. Idempotent.
    pub fn logout(&mut self) {
        *self = Session::Anonymous;
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(identity) => Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(admin: bool) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "jo@example.com".into(),
            full_name: "Jo Smith".into(),
            admin,
        }
    }

    #[test]
    fn login_is_the_only_way_in() {
        let mut session = Session::default();
        assert!(!session.is_authenticated());

        session.login(identity(false));
        assert!(session.is_authenticated());
        assert_eq!(session.identity().unwrap().email, "jo@example.com");
    }

    #[test]
    fn logout_clears_and_is_idempotent() {
        let mut session = Session::default();
        session.login(identity(true));

        session.logout();
        assert_eq!(session, Session::Anonymous);

        // second logout from Anonymous is a no-op, not an error
        session.logout();
        assert_eq!(session, Session::Anonymous);
    }

    #[test]
    fn admin_flag_is_a_pure_predicate() {
        assert!(identity(true).is_admin());
        assert!(!identity(false).is_admin());
    }
}
