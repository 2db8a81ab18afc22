//! Form and table layout of each entity for the terminal front end.
//!
//! Text typed into a form cell is turned into the entity's edit enum here;
//! numeric fields reject keystrokes that would not parse.

use crate::api::RowAction;
use crate::model::{
    Badge, BadgeEdit, Challenge, ChallengeEdit, ChallengeList, Entity, ExerciseType,
    ExerciseTypeEdit, ExerciseTypeList, Gym, GymEdit, GymList, User, UserEdit, UserList,
};

pub trait FormLayout: Entity {
    const TITLE: &'static str;
    /// Labels of the editable scalar fields, in form order.
    const SCALARS: &'static [&'static str];
    /// Editable list fields with their labels.
    const LISTS: &'static [(Self::ListField, &'static str)];
    const COLUMNS: &'static [&'static str];
    /// Extra row action and the key bound to it.
    const ROW_ACTION: Option<(RowAction, char)> = None;

    fn scalar(&self, index: usize) -> String;
    fn edit(index: usize, text: &str) -> Option<Self::Edit>;
    fn row(&self) -> Vec<String>;

    /// Whether [`FormLayout::ROW_ACTION`] applies to this row.
    fn row_action_enabled(&self) -> bool {
        true
    }
}

/// One focusable cell of an entity form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<L> {
    Scalar(usize),
    Item(L, usize),
    AddItem(L),
}

/// Focusable cells for the current draft: scalars first, then every list
/// item followed by its "add" cell.
pub fn slots<E: FormLayout>(draft: &E) -> Vec<Slot<E::ListField>> {
    let mut slots: Vec<_> = (0..E::SCALARS.len()).map(Slot::Scalar).collect();
    for (field, _) in E::LISTS {
        let len = draft.list(*field).len();
        slots.extend((0..len).map(|i| Slot::Item(*field, i)));
        slots.push(Slot::AddItem(*field));
    }
    slots
}

fn number(text: &str) -> Option<u32> {
    if text.is_empty() {
        Some(0)
    } else {
        text.parse().ok()
    }
}

fn join(list: &[String]) -> String {
    list.join(", ")
}

impl FormLayout for Badge {
    const TITLE: &'static str = "Badges";
    const SCALARS: &'static [&'static str] = &["Name", "Description", "Criteria", "Image URL"];
    const LISTS: &'static [(Self::ListField, &'static str)] = &[];
    const COLUMNS: &'static [&'static str] = &["Name", "Description", "Criteria"];

    fn scalar(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.description.clone(),
            2 => self.criteria.clone(),
            3 => self.image_url.clone(),
            _ => String::new(),
        }
    }

    fn edit(index: usize, text: &str) -> Option<BadgeEdit> {
        let text = text.to_string();
        match index {
            0 => Some(BadgeEdit::Name(text)),
            1 => Some(BadgeEdit::Description(text)),
            2 => Some(BadgeEdit::Criteria(text)),
            3 => Some(BadgeEdit::ImageUrl(text)),
            _ => None,
        }
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone(),
            self.criteria.clone(),
        ]
    }
}

impl FormLayout for ExerciseType {
    const TITLE: &'static str = "Exercise Types";
    const SCALARS: &'static [&'static str] = &["Name", "Description"];
    const LISTS: &'static [(Self::ListField, &'static str)] =
        &[(ExerciseTypeList::TargetedMuscles, "Targeted muscles")];
    const COLUMNS: &'static [&'static str] = &["Name", "Description", "Muscles"];

    fn scalar(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.description.clone(),
            _ => String::new(),
        }
    }

    fn edit(index: usize, text: &str) -> Option<ExerciseTypeEdit> {
        let text = text.to_string();
        match index {
            0 => Some(ExerciseTypeEdit::Name(text)),
            1 => Some(ExerciseTypeEdit::Description(text)),
            _ => None,
        }
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone(),
            join(&self.targeted_muscles),
        ]
    }
}

impl FormLayout for Gym {
    const TITLE: &'static str = "Gyms";
    const SCALARS: &'static [&'static str] = &["Name", "Address", "Description", "Capacity"];
    const LISTS: &'static [(Self::ListField, &'static str)] =
        &[(GymList::Contact, "Contacts"), (GymList::Activities, "Activities")];
    const COLUMNS: &'static [&'static str] = &["Name", "Address", "Capacity", "Activities", "Status"];
    const ROW_ACTION: Option<(RowAction, char)> = Some((RowAction::Approve, 'a'));

    fn scalar(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.address.clone(),
            2 => self.description.clone(),
            3 => self.capacity.to_string(),
            _ => String::new(),
        }
    }

    fn edit(index: usize, text: &str) -> Option<GymEdit> {
        match index {
            0 => Some(GymEdit::Name(text.to_string())),
            1 => Some(GymEdit::Address(text.to_string())),
            2 => Some(GymEdit::Description(text.to_string())),
            3 => number(text).map(GymEdit::Capacity),
            _ => None,
        }
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.address.clone(),
            self.capacity.to_string(),
            join(&self.activities),
            if self.approved { "approved" } else { "pending" }.to_string(),
        ]
    }

    fn row_action_enabled(&self) -> bool {
        !self.approved
    }
}

impl FormLayout for Challenge {
    const TITLE: &'static str = "Challenges";
    const SCALARS: &'static [&'static str] = &["Name", "Description", "Difficulty", "Type", "Points"];
    const LISTS: &'static [(Self::ListField, &'static str)] = &[(ChallengeList::Equipment, "Equipment")];
    const COLUMNS: &'static [&'static str] = &["Name", "Difficulty", "Type", "Points"];

    fn scalar(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.description.clone(),
            2 => self.difficulty.clone(),
            3 => self.kind.clone(),
            4 => self.points.to_string(),
            _ => String::new(),
        }
    }

    fn edit(index: usize, text: &str) -> Option<ChallengeEdit> {
        match index {
            0 => Some(ChallengeEdit::Name(text.to_string())),
            1 => Some(ChallengeEdit::Description(text.to_string())),
            2 => Some(ChallengeEdit::Difficulty(text.to_string())),
            3 => Some(ChallengeEdit::Kind(text.to_string())),
            4 => number(text).map(ChallengeEdit::Points),
            _ => None,
        }
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.difficulty.clone(),
            self.kind.clone(),
            self.points.to_string(),
        ]
    }
}

impl FormLayout for User {
    const TITLE: &'static str = "Users";
    const SCALARS: &'static [&'static str] = &["Login"];
    const LISTS: &'static [(Self::ListField, &'static str)] = &[(UserList::Accesses, "Accesses")];
    const COLUMNS: &'static [&'static str] = &["Login", "Accesses", "Status"];
    const ROW_ACTION: Option<(RowAction, char)> = Some((RowAction::Deactivate, 'x'));

    fn scalar(&self, index: usize) -> String {
        match index {
            0 => self.login.clone(),
            _ => String::new(),
        }
    }

    fn edit(index: usize, text: &str) -> Option<UserEdit> {
        match index {
            0 => Some(UserEdit::Login(text.to_string())),
            _ => None,
        }
    }

    fn row(&self) -> Vec<String> {
        let status = match self.active {
            Some(false) => "inactive",
            _ => "active",
        };
        vec![self.login.clone(), join(&self.accesses), status.to_string()]
    }
}
