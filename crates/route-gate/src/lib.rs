//! Route authorization decisions.
//!
//! A pure decision function over a route's declared requirement and the
//! current session. There is no error outcome: every input maps to
//! exactly one decision, and callers re-evaluate on every navigation
//! because the session can change between attempts.

use session_store::{Role, Session};
use std::convert::Infallible;
use std::str::FromStr;

/// Declared access requirement for a navigable destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement {
    /// Anyone, logged in or not.
    Public,
    /// Any authenticated session.
    Authenticated,
    /// Authenticated session with a specific role.
    Role(Role),
}

impl FromStr for RouteRequirement {
    type Err = Infallible;

    /// Parse a textual requirement.
    ///
    /// Unknown text fails toward requiring authentication, never toward
    /// open access.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "none" | "public" => Self::Public,
            "authenticated" => Self::Authenticated,
            "authenticated+role(user)" => Self::Role(Role::User),
            "authenticated+role(employer)" => Self::Role(Role::Employer),
            other => {
                tracing::warn!(
                    requirement = %other,
                    "unknown route requirement, requiring authentication"
                );
                Self::Authenticated
            }
        })
    }
}

/// Outcome of a gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the destination.
    Allow,
    /// Not logged in; send the caller to the login screen.
    RedirectLogin,
    /// Logged in with the wrong capability set; send the caller home,
    /// not back to login.
    RedirectHome,
}

/// Decide whether `session` may enter a destination gated by
/// `requirement`. First match wins:
///
/// 1. public destinations always allow;
/// 2. without a token, redirect to login regardless of role;
/// 3. with a token but the wrong role, redirect home;
/// 4. otherwise allow.
pub fn authorize(requirement: RouteRequirement, session: &Session) -> RouteDecision {
    if requirement == RouteRequirement::Public {
        return RouteDecision::Allow;
    }
    if !session.is_authenticated() {
        return RouteDecision::RedirectLogin;
    }
    if let RouteRequirement::Role(required) = requirement {
        if session.effective_role() != Some(required) {
            return RouteDecision::RedirectHome;
        }
    }
    RouteDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_store::Profile;

    fn logged_in(role: Role) -> Session {
        Session::authenticated("tok", Profile::new(1, role))
    }

    #[test]
    fn test_public_allows_anonymous() {
        let decision = authorize(RouteRequirement::Public, &Session::anonymous());
        assert_eq!(decision, RouteDecision::Allow);
    }

    #[test]
    fn test_public_allows_any_session() {
        for session in [
            Session::anonymous(),
            logged_in(Role::User),
            logged_in(Role::Employer),
        ] {
            assert_eq!(
                authorize(RouteRequirement::Public, &session),
                RouteDecision::Allow
            );
        }
    }

    #[test]
    fn test_authenticated_redirects_anonymous_to_login() {
        let decision = authorize(RouteRequirement::Authenticated, &Session::anonymous());
        assert_eq!(decision, RouteDecision::RedirectLogin);
    }

    #[test]
    fn test_authenticated_allows_either_role() {
        for role in [Role::User, Role::Employer] {
            assert_eq!(
                authorize(RouteRequirement::Authenticated, &logged_in(role)),
                RouteDecision::Allow
            );
        }
    }

    #[test]
    fn test_wrong_role_redirects_home_not_login() {
        let decision = authorize(RouteRequirement::Role(Role::Employer), &logged_in(Role::User));
        assert_eq!(decision, RouteDecision::RedirectHome);
    }

    #[test]
    fn test_missing_token_beats_role_requirement() {
        // An anonymous caller hitting a role-gated destination goes to
        // login, never home.
        let decision = authorize(RouteRequirement::Role(Role::Employer), &Session::anonymous());
        assert_eq!(decision, RouteDecision::RedirectLogin);
    }

    #[test]
    fn test_matching_role_allows() {
        assert_eq!(
            authorize(RouteRequirement::Role(Role::Employer), &logged_in(Role::Employer)),
            RouteDecision::Allow
        );
        assert_eq!(
            authorize(RouteRequirement::Role(Role::User), &logged_in(Role::User)),
            RouteDecision::Allow
        );
    }

    #[test]
    fn test_unknown_role_string_acts_as_user() {
        // A session whose stored role was unrecognized parses as `user`,
        // so it passes user gates and fails employer gates.
        let profile: Profile = serde_json::from_str(r#"{"id": 1, "role": "admin"}"#).unwrap();
        let session = Session::authenticated("tok", profile);

        assert_eq!(
            authorize(RouteRequirement::Role(Role::User), &session),
            RouteDecision::Allow
        );
        assert_eq!(
            authorize(RouteRequirement::Role(Role::Employer), &session),
            RouteDecision::RedirectHome
        );
    }

    #[test]
    fn test_requirement_parsing() {
        assert_eq!("none".parse(), Ok(RouteRequirement::Public));
        assert_eq!("public".parse(), Ok(RouteRequirement::Public));
        assert_eq!("authenticated".parse(), Ok(RouteRequirement::Authenticated));
        assert_eq!(
            "authenticated+role(user)".parse(),
            Ok(RouteRequirement::Role(Role::User))
        );
        assert_eq!(
            "authenticated+role(employer)".parse(),
            Ok(RouteRequirement::Role(Role::Employer))
        );
    }

    #[test]
    fn test_unknown_requirement_parses_as_authenticated() {
        assert_eq!(
            "open-sesame".parse(),
            Ok(RouteRequirement::Authenticated)
        );
        assert_eq!("".parse(), Ok(RouteRequirement::Authenticated));
    }

    #[test]
    fn test_login_scenario_precedence() {
        // Employer logs in, may manage listings but not use seeker pages.
        let employer = logged_in(Role::Employer);

        assert_eq!(
            authorize(RouteRequirement::Role(Role::Employer), &employer),
            RouteDecision::Allow
        );
        assert_eq!(
            authorize(RouteRequirement::Role(Role::User), &employer),
            RouteDecision::RedirectHome
        );
    }
}
