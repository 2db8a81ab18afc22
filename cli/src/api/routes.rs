use crate::model::{Badge, Challenge, Entity, ExerciseType, Gym, User};
use serde::{de::DeserializeOwned, Serialize};

/// Where an entity kind lives on the backend.
///
/// Most collections follow `/{collection}` and `/{collection}/{id}`; gyms
/// use their own verbs in the path.
pub trait Resource: Entity + Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    fn list_path() -> String {
        format!("/{}", Self::COLLECTION)
    }

    fn create_path() -> String {
        format!("/{}", Self::COLLECTION)
    }

    fn update_path(id: &str) -> String {
        format!("/{}/{}", Self::COLLECTION, id)
    }

    fn delete_path(id: &str) -> String {
        format!("/{}/{}", Self::COLLECTION, id)
    }
}

impl Resource for Badge {
    const COLLECTION: &'static str = "badges";
}

impl Resource for ExerciseType {
    const COLLECTION: &'static str = "exercise-types";
}

impl Resource for Challenge {
    const COLLECTION: &'static str = "challenges";
}

impl Resource for User {
    const COLLECTION: &'static str = "users";
}

impl Resource for Gym {
    const COLLECTION: &'static str = "gyms";

    fn list_path() -> String {
        "/salle".to_string()
    }

    fn update_path(id: &str) -> String {
        format!("/gyms/edit/{}", id)
    }

    fn delete_path(id: &str) -> String {
        format!("/gyms/delete/{}", id)
    }
}

pub fn approve_gym_path(id: &str) -> String {
    format!("/gyms/{}/approve", id)
}

pub fn deactivate_user_path(id: &str) -> String {
    format!("/users/{}/deactivate", id)
}

pub fn challenges_by_gym_path(gym_id: &str) -> String {
    format!("/challenges/salle/{}", gym_id)
}

pub const START_CHALLENGE_PATH: &str = "/userChallenge";
pub const LOGIN_PATH: &str = "/auth/login";
pub const SUBSCRIBE_PATH: &str = "/auth/subscribe";
