//! In-memory service double for screen tests.

use crate::api::{
    ApiError, ApiResult, AuthService, ChallengeDirectory, EnrollmentService, EntityService,
    RowAction, RowActions,
};
use crate::model::{Challenge, Credentials, Entity, LoginResponse};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(Option<String>),
    Update(String),
    Delete(String),
    Action(RowAction, String),
    ListByGym(String),
    Start(String),
    Login(String),
    Subscribe(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Create,
    Update,
    Delete,
    Action,
    Login,
    Subscribe,
}

struct State<E> {
    items: Vec<E>,
    calls: Vec<Call>,
    failures: HashMap<Op, ApiError>,
    failing_starts: HashSet<String>,
    token: String,
}

/// Records every call and answers from `items`, unless told to fail.
pub struct FakeService<E> {
    state: Arc<Mutex<State<E>>>,
}

impl<E> Clone for FakeService<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E> Default for FakeService<E> {
    fn default() -> Self {
        Self::with_items(Vec::new())
    }
}

impl<E> FakeService<E> {
    pub fn with_items(items: Vec<E>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                items,
                calls: Vec::new(),
                failures: HashMap::new(),
                failing_starts: HashSet::new(),
                token: "token-1".to_string(),
            })),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn fail(&self, op: Op, err: ApiError) {
        self.state.lock().unwrap().failures.insert(op, err);
    }

    pub fn fail_start(&self, challenge_id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_starts
            .insert(challenge_id.to_string());
    }

    /// Token handed out by `login`.
    pub fn set_token(&self, token: &str) {
        self.state.lock().unwrap().token = token.to_string();
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock().unwrap();
        state.failures.clear();
        state.failing_starts.clear();
    }

    fn record(&self, call: Call, op: Option<Op>) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match op.and_then(|op| state.failures.get(&op).copied()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<E: Entity> EntityService<E> for FakeService<E> {
    async fn list(&self) -> ApiResult<Vec<E>> {
        self.record(Call::List, Some(Op::List))?;
        Ok(self.state.lock().unwrap().items.clone())
    }

    async fn create(&self, entity: &E) -> ApiResult<E> {
        self.record(Call::Create(entity.id().map(str::to_string)), Some(Op::Create))?;
        Ok(entity.clone())
    }

    async fn update(&self, id: &str, _entity: &E) -> ApiResult<()> {
        self.record(Call::Update(id.to_string()), Some(Op::Update))
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        self.record(Call::Delete(id.to_string()), Some(Op::Delete))
    }
}

#[async_trait]
impl<E: Send + Sync> RowActions for FakeService<E> {
    async fn perform(&self, action: RowAction, id: &str) -> ApiResult<()> {
        self.record(Call::Action(action, id.to_string()), Some(Op::Action))
    }
}

#[async_trait]
impl ChallengeDirectory for FakeService<Challenge> {
    async fn list_by_gym(&self, gym_id: &str) -> ApiResult<Vec<Challenge>> {
        self.record(Call::ListByGym(gym_id.to_string()), Some(Op::List))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .filter(|c| c.salle_id == gym_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl<E: Send + Sync> EnrollmentService for FakeService<E> {
    async fn start_challenge(&self, challenge_id: &str) -> ApiResult<()> {
        self.record(Call::Start(challenge_id.to_string()), None)?;
        if self
            .state
            .lock()
            .unwrap()
            .failing_starts
            .contains(challenge_id)
        {
            return Err(ApiError::Failed);
        }
        Ok(())
    }
}

#[async_trait]
impl<E: Send + Sync> AuthService for FakeService<E> {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        self.record(Call::Login(credentials.login.clone()), Some(Op::Login))?;
        Ok(LoginResponse {
            token: self.state.lock().unwrap().token.clone(),
            user: None,
        })
    }

    async fn subscribe(&self, credentials: &Credentials) -> ApiResult<()> {
        self.record(Call::Subscribe(credentials.login.clone()), Some(Op::Subscribe))
    }
}
