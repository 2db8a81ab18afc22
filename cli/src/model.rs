//! Domain Records
//!
//! Records exchanged with the platform's REST backend, plus the [`Entity`]
//! trait that lets the editor screens treat them uniformly.
//!
//! Drafts are plain entities built from `Default`: every scalar starts empty
//! or zero, every list starts empty, and the identifier is `None` until the
//! backend assigns one. Field updates go through a per-entity edit enum, and
//! list-valued fields are named by a per-entity list-field enum.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A persisted record managed by an editor screen.
pub trait Entity: Clone + Default + Debug + Send + Sync + 'static {
    /// One named scalar field update.
    type Edit: Debug + Send;
    /// The ordered string-list fields of this record.
    type ListField: Copy + Eq + Debug + Send + Sync;

    /// Lowercase singular noun, used in messages ("badge").
    const SINGULAR: &'static str;
    /// Lowercase plural noun, used in messages ("badges").
    const PLURAL: &'static str;

    fn id(&self) -> Option<&str>;
    fn apply(&mut self, edit: Self::Edit);
    fn list(&self, field: Self::ListField) -> &[String];
    fn list_mut(&mut self, field: Self::ListField) -> &mut Vec<String>;

    /// Text fragments the free-text search looks into.
    fn search_text(&self) -> Vec<&str>;

    /// Case-insensitive substring match over [`Entity::search_text`].
    /// An empty needle matches everything.
    fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        self.search_text()
            .iter()
            .any(|text| text.to_lowercase().contains(&needle))
    }
}

/// List-field type for records without list fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoList {}

// ============================================================================
// Badge
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Badge {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub criteria: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BadgeEdit {
    Name(String),
    Description(String),
    Criteria(String),
    ImageUrl(String),
}

impl Entity for Badge {
    type Edit = BadgeEdit;
    type ListField = NoList;

    const SINGULAR: &'static str = "badge";
    const PLURAL: &'static str = "badges";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn apply(&mut self, edit: BadgeEdit) {
        match edit {
            BadgeEdit::Name(v) => self.name = v,
            BadgeEdit::Description(v) => self.description = v,
            BadgeEdit::Criteria(v) => self.criteria = v,
            BadgeEdit::ImageUrl(v) => self.image_url = v,
        }
    }

    fn list(&self, field: NoList) -> &[String] {
        match field {}
    }

    fn list_mut(&mut self, field: NoList) -> &mut Vec<String> {
        match field {}
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.description.as_str(),
            self.criteria.as_str(),
        ]
    }
}

// ============================================================================
// Exercise type
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExerciseType {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub targeted_muscles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseTypeEdit {
    Name(String),
    Description(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseTypeList {
    TargetedMuscles,
}

impl Entity for ExerciseType {
    type Edit = ExerciseTypeEdit;
    type ListField = ExerciseTypeList;

    const SINGULAR: &'static str = "exercise type";
    const PLURAL: &'static str = "exercise types";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn apply(&mut self, edit: ExerciseTypeEdit) {
        match edit {
            ExerciseTypeEdit::Name(v) => self.name = v,
            ExerciseTypeEdit::Description(v) => self.description = v,
        }
    }

    fn list(&self, field: ExerciseTypeList) -> &[String] {
        match field {
            ExerciseTypeList::TargetedMuscles => &self.targeted_muscles,
        }
    }

    fn list_mut(&mut self, field: ExerciseTypeList) -> &mut Vec<String> {
        match field {
            ExerciseTypeList::TargetedMuscles => &mut self.targeted_muscles,
        }
    }

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.name.as_str(), self.description.as_str()];
        text.extend(self.targeted_muscles.iter().map(String::as_str));
        text
    }
}

// ============================================================================
// Gym
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Gym {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub address: String,
    pub description: String,
    pub contact: Vec<String>,
    pub capacity: u32,
    pub activities: Vec<String>,
    /// Set by the backend through the approve action only.
    #[serde(skip_serializing)]
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GymEdit {
    Name(String),
    Address(String),
    Description(String),
    Capacity(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GymList {
    Contact,
    Activities,
}

impl Entity for Gym {
    type Edit = GymEdit;
    type ListField = GymList;

    const SINGULAR: &'static str = "gym";
    const PLURAL: &'static str = "gyms";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn apply(&mut self, edit: GymEdit) {
        match edit {
            GymEdit::Name(v) => self.name = v,
            GymEdit::Address(v) => self.address = v,
            GymEdit::Description(v) => self.description = v,
            GymEdit::Capacity(v) => self.capacity = v,
        }
    }

    fn list(&self, field: GymList) -> &[String] {
        match field {
            GymList::Contact => &self.contact,
            GymList::Activities => &self.activities,
        }
    }

    fn list_mut(&mut self, field: GymList) -> &mut Vec<String> {
        match field {
            GymList::Contact => &mut self.contact,
            GymList::Activities => &mut self.activities,
        }
    }

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![
            self.name.as_str(),
            self.address.as_str(),
            self.description.as_str(),
        ];
        text.extend(self.contact.iter().map(String::as_str));
        text.extend(self.activities.iter().map(String::as_str));
        text
    }
}

// ============================================================================
// Challenge
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Cycles None → Easy → Medium → Hard → None.
    pub fn cycle(current: Option<Difficulty>) -> Option<Difficulty> {
        match current {
            None => Some(Difficulty::Easy),
            Some(Difficulty::Easy) => Some(Difficulty::Medium),
            Some(Difficulty::Medium) => Some(Difficulty::Hard),
            Some(Difficulty::Hard) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Challenge {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub equipment: Vec<String>,
    /// Free text on the wire; the browser filter compares it against
    /// [`Difficulty::as_str`].
    pub difficulty: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub salle_id: String,
    pub creator_id: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChallengeEdit {
    Name(String),
    Description(String),
    Difficulty(String),
    Kind(String),
    Points(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeList {
    Equipment,
}

impl Entity for Challenge {
    type Edit = ChallengeEdit;
    type ListField = ChallengeList;

    const SINGULAR: &'static str = "challenge";
    const PLURAL: &'static str = "challenges";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn apply(&mut self, edit: ChallengeEdit) {
        match edit {
            ChallengeEdit::Name(v) => self.name = v,
            ChallengeEdit::Description(v) => self.description = v,
            ChallengeEdit::Difficulty(v) => self.difficulty = v,
            ChallengeEdit::Kind(v) => self.kind = v,
            ChallengeEdit::Points(v) => self.points = v,
        }
    }

    fn list(&self, field: ChallengeList) -> &[String] {
        match field {
            ChallengeList::Equipment => &self.equipment,
        }
    }

    fn list_mut(&mut self, field: ChallengeList) -> &mut Vec<String> {
        match field {
            ChallengeList::Equipment => &mut self.equipment,
        }
    }

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![
            self.name.as_str(),
            self.description.as_str(),
            self.kind.as_str(),
            self.difficulty.as_str(),
        ];
        text.extend(self.equipment.iter().map(String::as_str));
        text
    }
}

// ============================================================================
// User
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub login: String,
    pub accesses: Vec<String>,
    /// Set by the backend through the deactivate action only.
    #[serde(skip_serializing)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserEdit {
    Login(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserList {
    Accesses,
}

impl Entity for User {
    type Edit = UserEdit;
    type ListField = UserList;

    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn apply(&mut self, edit: UserEdit) {
        match edit {
            UserEdit::Login(v) => self.login = v,
        }
    }

    fn list(&self, field: UserList) -> &[String] {
        match field {
            UserList::Accesses => &self.accesses,
        }
    }

    fn list_mut(&mut self, field: UserList) -> &mut Vec<String> {
        match field {
            UserList::Accesses => &mut self.accesses,
        }
    }

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.login.as_str()];
        text.extend(self.accesses.iter().map(String::as_str));
        text
    }
}

// ============================================================================
// Auth and enrollment payloads
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Body of a start-challenge call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub user_id: Option<String>,
    pub challenge_id: String,
}
