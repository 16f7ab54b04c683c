//! Route table: which destinations exist and what each one requires.
//!
//! This mirrors the web client's route declarations. The gate
//! itself lives in `route-gate`; this module only supplies the
//! requirement for each navigable destination.

use crate::context::AppContext;
use route_gate::{authorize, RouteDecision, RouteRequirement};
use session_store::Role;

/// Navigable destinations, one per screen of the web client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Landing page with hints.
    Welcome,
    /// Login form.
    Login,
    /// Signup form.
    Signup,
    /// Password reset form.
    Reset,
    /// Listing search / browse.
    Jobs,
    /// Single listing detail.
    Listing,
    /// Apply to a listing.
    Apply,
    /// Role-dispatched dashboard.
    Dashboard,
    /// Profile editor (role-dispatched, under the dashboard).
    Profile,
    /// Seeker's submitted applications.
    Applications,
    /// Seeker's resume.
    Resume,
    /// Employer listing management.
    Listings,
    /// Employer application review.
    Applicants,
    /// Chat assistant.
    Chat,
}

impl Destination {
    /// Requirement table consumed by the gate on every navigation.
    pub fn requirement(self) -> RouteRequirement {
        use Destination::*;
        match self {
            Welcome | Login | Signup | Reset | Jobs | Listing | Chat => RouteRequirement::Public,
            Dashboard | Profile => RouteRequirement::Authenticated,
            Apply | Applications | Resume => RouteRequirement::Role(Role::User),
            Listings | Applicants => RouteRequirement::Role(Role::Employer),
        }
    }
}

/// Evaluate the gate for a destination against the current session.
///
/// Called on every navigation attempt; never cached, since the session
/// can change between attempts (another terminal may have logged out).
pub fn gate(ctx: &AppContext, destination: Destination) -> RouteDecision {
    let session = ctx.manager.current();
    let decision = authorize(destination.requirement(), &session);
    tracing::debug!(
        destination = ?destination,
        decision = ?decision,
        authenticated = session.is_authenticated(),
        "route decision"
    );
    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_destinations() {
        for dest in [
            Destination::Welcome,
            Destination::Login,
            Destination::Signup,
            Destination::Reset,
            Destination::Jobs,
            Destination::Listing,
            Destination::Chat,
        ] {
            assert_eq!(dest.requirement(), RouteRequirement::Public);
        }
    }

    #[test]
    fn test_dashboard_requires_any_authenticated() {
        assert_eq!(
            Destination::Dashboard.requirement(),
            RouteRequirement::Authenticated
        );
        assert_eq!(
            Destination::Profile.requirement(),
            RouteRequirement::Authenticated
        );
    }

    #[test]
    fn test_seeker_destinations_require_user_role() {
        for dest in [
            Destination::Apply,
            Destination::Applications,
            Destination::Resume,
        ] {
            assert_eq!(dest.requirement(), RouteRequirement::Role(Role::User));
        }
    }

    #[test]
    fn test_employer_destinations_require_employer_role() {
        for dest in [Destination::Listings, Destination::Applicants] {
            assert_eq!(dest.requirement(), RouteRequirement::Role(Role::Employer));
        }
    }

    mod navigation {
        use super::*;
        use auth_session::SessionManager;
        use session_store::{MemoryStore, Profile, SessionStore};
        use std::sync::Arc;

        fn manager() -> Arc<SessionManager> {
            let store = Arc::new(SessionStore::new(Box::new(MemoryStore::new())));
            Arc::new(SessionManager::new(store).unwrap())
        }

        #[test]
        fn test_anonymous_is_sent_to_login_everywhere_gated() {
            let manager = manager();
            let session = manager.current();

            for dest in [
                Destination::Dashboard,
                Destination::Apply,
                Destination::Applications,
                Destination::Resume,
                Destination::Listings,
                Destination::Applicants,
            ] {
                assert_eq!(
                    authorize(dest.requirement(), &session),
                    RouteDecision::RedirectLogin,
                    "{:?}",
                    dest
                );
            }
        }

        #[test]
        fn test_employer_login_scenario() {
            let manager = manager();

            // Login as employer, the way a well-formed backend response
            // would land in the controller.
            manager
                .login(
                    Some("tok1".into()),
                    Some(Profile::new(1, Role::Employer)),
                )
                .unwrap();
            let session = manager.current();

            // Employer pages open, seeker pages bounce home, public
            // pages stay open.
            assert_eq!(
                authorize(Destination::Listings.requirement(), &session),
                RouteDecision::Allow
            );
            assert_eq!(
                authorize(Destination::Applications.requirement(), &session),
                RouteDecision::RedirectHome
            );
            assert_eq!(
                authorize(Destination::Jobs.requirement(), &session),
                RouteDecision::Allow
            );
            assert_eq!(
                authorize(Destination::Dashboard.requirement(), &session),
                RouteDecision::Allow
            );

            // After logout every gated page goes back to login.
            manager.logout().unwrap();
            let session = manager.current();
            assert_eq!(
                authorize(Destination::Listings.requirement(), &session),
                RouteDecision::RedirectLogin
            );
        }
    }
}
