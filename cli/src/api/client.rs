use super::routes::{self, Resource};
use super::{
    ApiError, ApiResult, AuthService, ChallengeDirectory, EnrollmentService, EntityService,
    RowAction, RowActions,
};
use crate::model::{Challenge, Credentials, Enrollment, LoginResponse};
use crate::session::Session;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// reqwest-backed client for the platform API.
///
/// Cloning is cheap: the connection pool and the session are shared.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl RestClient {
    pub fn new(base_url: &str, session: Session, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gym-console/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request. The token is read from the session here, on every
    /// call, never cached.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "request did not complete");
            ApiError::Failed
        })?;

        let status = response.status();
        match classify(status) {
            Ok(()) => {
                debug!(%method, path, %status, "request succeeded");
                Ok(response)
            }
            Err(err) => {
                warn!(%method, path, %status, "request rejected");
                Err(err)
            }
        }
    }

    async fn call(&self, method: Method, path: &str) -> ApiResult<Response> {
        let builder = self.request(method.clone(), path);
        self.send(method, path, builder).await
    }

    async fn call_with<B>(&self, method: Method, path: &str, body: &B) -> ApiResult<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let builder = self.request(method.clone(), path).json(body);
        self.send(method, path, builder).await
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> ApiResult<T> {
    response.json::<T>().await.map_err(|e| {
        warn!(path, error = %e, "undecodable response body");
        ApiError::Failed
    })
}

/// Map an HTTP status onto the result taxonomy the screens understand.
pub(crate) fn classify(status: StatusCode) -> ApiResult<()> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(ApiError::NotFound)
    } else if status == StatusCode::CONFLICT {
        Err(ApiError::Conflict)
    } else {
        Err(ApiError::Failed)
    }
}

#[async_trait]
impl<E: Resource> EntityService<E> for RestClient {
    async fn list(&self) -> ApiResult<Vec<E>> {
        let path = E::list_path();
        let response = self.call(Method::GET, &path).await?;
        decode(&path, response).await
    }

    async fn create(&self, entity: &E) -> ApiResult<E> {
        let path = E::create_path();
        let response = self.call_with(Method::POST, &path, entity).await?;
        let body = response.bytes().await.map_err(|e| {
            warn!(path = %path, error = %e, "failed to read response body");
            ApiError::Failed
        })?;
        // Some endpoints answer 201 with no body
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(entity.clone());
        }
        serde_json::from_slice(&body).map_err(|e| {
            warn!(path = %path, error = %e, "undecodable response body");
            ApiError::Failed
        })
    }

    async fn update(&self, id: &str, entity: &E) -> ApiResult<()> {
        self.call_with(Method::PUT, &E::update_path(id), entity)
            .await
            .map(|_| ())
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        self.call(Method::DELETE, &E::delete_path(id))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl RowActions for RestClient {
    async fn perform(&self, action: RowAction, id: &str) -> ApiResult<()> {
        let (method, path) = match action {
            RowAction::Approve => (Method::POST, routes::approve_gym_path(id)),
            RowAction::Deactivate => (Method::PUT, routes::deactivate_user_path(id)),
        };
        self.call(method, &path).await.map(|_| ())
    }
}

#[async_trait]
impl ChallengeDirectory for RestClient {
    async fn list_by_gym(&self, gym_id: &str) -> ApiResult<Vec<Challenge>> {
        let path = routes::challenges_by_gym_path(gym_id);
        let response = self.call(Method::GET, &path).await?;
        decode(&path, response).await
    }
}

#[async_trait]
impl EnrollmentService for RestClient {
    async fn start_challenge(&self, challenge_id: &str) -> ApiResult<()> {
        let body = Enrollment {
            user_id: self.session.user_id(),
            challenge_id: challenge_id.to_string(),
        };
        self.call_with(Method::POST, routes::START_CHALLENGE_PATH, &body)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl AuthService for RestClient {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let response = self
            .call_with(Method::POST, routes::LOGIN_PATH, credentials)
            .await?;
        decode(routes::LOGIN_PATH, response).await
    }

    async fn subscribe(&self, credentials: &Credentials) -> ApiResult<()> {
        self.call_with(Method::POST, routes::SUBSCRIBE_PATH, credentials)
            .await
            .map(|_| ())
    }
}
