//! Page composer: which variant of the enter page the session calls for.

use nameclaim_core::session::Session;

/// The three variants of the enter page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    /// Nobody is signed in.
    #[default]
    SignIn,
    /// Signed in, no username claimed yet.
    UsernameForm,
    /// Signed in with a claimed username.
    SignOut,
}

impl Page {
    pub fn compose(session: &Session) -> Self {
        match (&session.identity, &session.claimed_username) {
            (None, _) => Page::SignIn,
            (Some(_), Some(_)) => Page::SignOut,
            (Some(_), None) => Page::UsernameForm,
        }
    }
}

#[cfg(test)]
mod tests {
    use nameclaim_core::identity::UserIdentity;

    use super::*;

    fn ada() -> UserIdentity {
        UserIdentity {
            id: "u1".to_string(),
            display_name: "Ada".to_string(),
            avatar_url: String::new(),
        }
    }

    #[test]
    fn test_compose_covers_all_variants() {
        assert_eq!(Page::compose(&Session::signed_out()), Page::SignIn);
        assert_eq!(
            Page::compose(&Session::signed_in(ada(), None)),
            Page::UsernameForm
        );
        assert_eq!(
            Page::compose(&Session::signed_in(ada(), Some("ada".to_string()))),
            Page::SignOut
        );
    }

    #[test]
    fn test_claimed_username_without_identity_is_sign_in() {
        let session = Session {
            identity: None,
            claimed_username: Some("ada".to_string()),
        };
        assert_eq!(Page::compose(&session), Page::SignIn);
    }
}
