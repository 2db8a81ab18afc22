//! Login and subscribe forms.

use crate::api::{ApiError, AuthService};
use crate::model::Credentials;
use crate::session::Session;
use tracing::{info, warn};

/// Where the front end should go after a successful auth action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Signed in: open the main screens.
    Home,
    /// Account created: go sign in.
    Login,
}

pub struct AuthForm<S> {
    service: S,
    session: Session,
    pub credentials: Credentials,
    error: Option<String>,
}

impl<S: AuthService> AuthForm<S> {
    pub fn new(service: S, session: Session) -> Self {
        Self {
            service,
            session,
            credentials: Credentials::default(),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// On success the token is stored in the session and persisted.
    pub async fn login(&mut self) -> Option<Route> {
        match self.service.login(&self.credentials).await {
            Ok(response) if response.token.is_empty() => {
                warn!(login = %self.credentials.login, "login answered without a token");
                self.error = Some("Internal server error".to_string());
                None
            }
            Ok(response) => {
                let user_id = response.user.and_then(|u| u.id);
                self.session.sign_in(response.token, user_id);
                if let Err(e) = self.session.save() {
                    warn!(error = %e, "could not persist session");
                }
                info!(login = %self.credentials.login, "signed in");
                self.credentials.password.clear();
                self.error = None;
                Some(Route::Home)
            }
            Err(ApiError::NotFound) => {
                self.error = Some("Invalid credentials".to_string());
                None
            }
            Err(_) => {
                self.error = Some("Internal server error".to_string());
                None
            }
        }
    }

    pub async fn subscribe(&mut self) -> Option<Route> {
        match self.service.subscribe(&self.credentials).await {
            Ok(()) => {
                info!(login = %self.credentials.login, "account created");
                self.error = None;
                Some(Route::Login)
            }
            Err(ApiError::Conflict) => {
                self.error = Some("Email already exists".to_string());
                None
            }
            Err(_) => {
                self.error = Some("Internal server error".to_string());
                None
            }
        }
    }

    pub fn logout(&mut self) {
        self.session.sign_out();
        if let Err(e) = self.session.save() {
            warn!(error = %e, "could not persist session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use crate::screens::testing::{Call, FakeService, Op};

    fn form(fake: &FakeService<User>) -> AuthForm<FakeService<User>> {
        let mut form = AuthForm::new(fake.clone(), Session::in_memory());
        form.credentials = Credentials {
            login: "ana@gym.test".into(),
            password: "secret".into(),
        };
        form
    }

    #[tokio::test]
    async fn unknown_account_is_invalid_credentials() {
        let fake = FakeService::<User>::default();
        fake.fail(Op::Login, ApiError::NotFound);
        let mut form = form(&fake);

        assert_eq!(form.login().await, None);
        assert_eq!(form.error(), Some("Invalid credentials"));
        assert!(!form.session().is_signed_in());
    }

    #[tokio::test]
    async fn successful_login_stores_token_and_navigates_once() {
        let fake = FakeService::<User>::default();
        let mut form = form(&fake);

        assert_eq!(form.login().await, Some(Route::Home));
        assert_eq!(form.session().token().as_deref(), Some("token-1"));
        assert_eq!(fake.calls(), vec![Call::Login("ana@gym.test".into())]);
        assert!(form.credentials.password.is_empty());
    }

    #[tokio::test]
    async fn other_login_failures_are_server_errors() {
        let fake = FakeService::<User>::default();
        fake.fail(Op::Login, ApiError::Failed);
        let mut form = form(&fake);

        assert_eq!(form.login().await, None);
        assert_eq!(form.error(), Some("Internal server error"));
    }

    #[tokio::test]
    async fn login_without_token_is_a_server_error() {
        let fake = FakeService::<User>::default();
        fake.set_token("");
        let mut form = form(&fake);

        assert_eq!(form.login().await, None);
        assert_eq!(form.error(), Some("Internal server error"));
        assert!(!form.session().is_signed_in());
    }

    #[tokio::test]
    async fn duplicate_subscription() {
        let fake = FakeService::<User>::default();
        fake.fail(Op::Subscribe, ApiError::Conflict);
        let mut form = form(&fake);

        assert_eq!(form.subscribe().await, None);
        assert_eq!(form.error(), Some("Email already exists"));
    }

    #[tokio::test]
    async fn subscription_leads_to_login() {
        let fake = FakeService::<User>::default();
        let mut form = form(&fake);

        assert_eq!(form.subscribe().await, Some(Route::Login));
        assert!(form.error().is_none());
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let fake = FakeService::<User>::default();
        let mut form = form(&fake);
        form.login().await;

        form.logout();

        assert!(!form.session().is_signed_in());
    }
}
