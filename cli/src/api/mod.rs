//! REST Service Module
//!
//! This module defines how the console talks to the platform backend:
//!
//! - Service traits the screens are written against (`EntityService`,
//!   `RowActions`, `ChallengeDirectory`, `EnrollmentService`, `AuthService`)
//! - `RestClient`: the reqwest implementation of all of them
//! - `GymChallenges`: an adapter scoping the challenge list to one gym
//!
//! Every call returns an [`ApiResult`]. Transport errors, unexpected statuses
//! and undecodable bodies all collapse into [`ApiError::Failed`] here; the
//! detail is logged and never reaches the screens.

mod client;
mod routes;

pub use client::RestClient;

use crate::model::{Challenge, Credentials, Entity, LoginResponse};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,

    #[error("resource already exists")]
    Conflict,

    #[error("request failed")]
    Failed,
}

pub type ApiResult<T> = Result<T, ApiError>;

/// CRUD operations for one entity kind.
#[async_trait]
pub trait EntityService<E: Entity>: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<E>>;
    async fn create(&self, entity: &E) -> ApiResult<E>;
    async fn update(&self, id: &str, entity: &E) -> ApiResult<()>;
    async fn delete(&self, id: &str) -> ApiResult<()>;
}

/// Single-row actions beyond CRUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Approve a pending gym.
    Approve,
    /// Deactivate a user account.
    Deactivate,
}

impl RowAction {
    pub fn verb(&self) -> &'static str {
        match self {
            RowAction::Approve => "approve",
            RowAction::Deactivate => "deactivate",
        }
    }
}

#[async_trait]
pub trait RowActions: Send + Sync {
    async fn perform(&self, action: RowAction, id: &str) -> ApiResult<()>;
}

#[async_trait]
pub trait ChallengeDirectory: Send + Sync {
    async fn list_by_gym(&self, gym_id: &str) -> ApiResult<Vec<Challenge>>;
}

#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Enroll the signed-in user in one challenge.
    async fn start_challenge(&self, challenge_id: &str) -> ApiResult<()>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse>;
    async fn subscribe(&self, credentials: &Credentials) -> ApiResult<()>;
}

/// Challenges of a single gym: listing goes through
/// [`ChallengeDirectory::list_by_gym`], everything else is forwarded.
#[derive(Clone)]
pub struct GymChallenges<S> {
    inner: S,
    gym_id: String,
}

impl<S> GymChallenges<S> {
    pub fn new(inner: S, gym_id: impl Into<String>) -> Self {
        Self {
            inner,
            gym_id: gym_id.into(),
        }
    }
}

#[async_trait]
impl<S> EntityService<Challenge> for GymChallenges<S>
where
    S: EntityService<Challenge> + ChallengeDirectory,
{
    async fn list(&self) -> ApiResult<Vec<Challenge>> {
        self.inner.list_by_gym(&self.gym_id).await
    }

    async fn create(&self, entity: &Challenge) -> ApiResult<Challenge> {
        self.inner.create(entity).await
    }

    async fn update(&self, id: &str, entity: &Challenge) -> ApiResult<()> {
        self.inner.update(id, entity).await
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl<S: RowActions> RowActions for GymChallenges<S> {
    async fn perform(&self, action: RowAction, id: &str) -> ApiResult<()> {
        self.inner.perform(action, id).await
    }
}
