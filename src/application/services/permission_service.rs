use crate::application::services::session_service::SessionSnapshot;
use crate::domain::entities::{Page, User, ACCESS_DENIED_PATH, LOGIN_PATH};

/// Outcome of guarding a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Session still hydrating; render nothing yet
    Pending,
    /// No session; send the operator to the login page
    Login,
    /// Signed in but the role lacks the page
    Denied,
    Granted,
}

impl AccessDecision {
    /// Where the front end should navigate, if anywhere.
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            AccessDecision::Login => Some(LOGIN_PATH),
            AccessDecision::Denied => Some(ACCESS_DENIED_PATH),
            AccessDecision::Pending | AccessDecision::Granted => None,
        }
    }
}

/// Service for checking page access based on the user's role
pub struct PermissionService;

impl PermissionService {
    /// Superusers see everything; otherwise the role needs an exact
    /// `page_name` record with `can_access`. Unknown pages are simply denied.
    pub fn has_permission(user: Option<&User>, page_name: &str) -> bool {
        match user {
            None => false,
            Some(user) if user.is_superuser => true,
            Some(user) => user
                .role
                .as_ref()
                .map(|role| role.grants(page_name))
                .unwrap_or(false),
        }
    }

    pub fn has_page(user: Option<&User>, page: Page) -> bool {
        Self::has_permission(user, page.as_str())
    }

    /// Navigation entries the user may see, in menu order
    pub fn visible_pages(user: Option<&User>) -> Vec<Page> {
        Page::ALL
            .into_iter()
            .filter(|page| Self::has_page(user, *page))
            .collect()
    }

    pub fn check_access(session: &SessionSnapshot, page: Page) -> AccessDecision {
        if session.loading {
            return AccessDecision::Pending;
        }

        let user = match (&session.user, session.authenticated) {
            (Some(user), true) => user,
            _ => return AccessDecision::Login,
        };

        if Self::has_page(Some(user), page) {
            AccessDecision::Granted
        } else {
            tracing::warn!(
                "User {} has no access to page {}",
                user.username,
                page.as_str()
            );
            AccessDecision::Denied
        }
    }
}
