//! Generic CRUD screen.
//!
//! One [`EntityEditor`] drives a management screen: it holds the last
//! fetched list, a draft bound to the form, the edit-mode flag, a search term
//! and the current error message. Every successful mutation is followed by
//! exactly one full reload, so the list always shows what the server
//! confirmed.

use super::{Generation, LoadTicket};
use crate::api::{ApiResult, EntityService, RowAction, RowActions};
use crate::model::Entity;
use chrono::{DateTime, Local};
use tracing::debug;

pub struct EntityEditor<E: Entity, S> {
    service: S,
    items: Vec<E>,
    draft: E,
    blank: E,
    edit_mode: bool,
    search: String,
    error: Option<String>,
    generation: Generation,
    loaded_at: Option<DateTime<Local>>,
}

impl<E: Entity, S: EntityService<E>> EntityEditor<E, S> {
    pub fn new(service: S) -> Self {
        Self::with_blank(service, E::default())
    }

    /// `blank` is the draft the form starts from and returns to after a
    /// successful submit.
    pub fn with_blank(service: S, blank: E) -> Self {
        Self {
            service,
            items: Vec::new(),
            draft: blank.clone(),
            blank,
            edit_mode: false,
            search: String::new(),
            error: None,
            generation: Generation::default(),
            loaded_at: None,
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn draft(&self) -> &E {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.edit_mode
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn loaded_at(&self) -> Option<DateTime<Local>> {
        self.loaded_at
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Rows matching the search term, in list order.
    pub fn visible(&self) -> Vec<&E> {
        self.items
            .iter()
            .filter(|item| item.matches(&self.search))
            .collect()
    }

    // Loading

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation.issue()
    }

    /// Apply a list result. Returns false when the ticket was superseded by
    /// a newer load and the result was dropped.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: ApiResult<Vec<E>>) -> bool {
        if !self.generation.is_current(ticket) {
            debug!(kind = E::PLURAL, "dropping stale list response");
            return false;
        }

        match result {
            Ok(items) => {
                debug!(kind = E::PLURAL, count = items.len(), "list loaded");
                self.items = items;
                self.loaded_at = Some(Local::now());
                self.error = None;
            }
            Err(err) => {
                debug!(kind = E::PLURAL, %err, "list load failed");
                self.error = Some(format!("Failed to fetch {}", E::PLURAL));
            }
        }
        true
    }

    pub async fn load(&mut self) {
        let ticket = self.begin_load();
        let result = self.service.list().await;
        self.finish_load(ticket, result);
    }

    // Draft editing

    pub fn update_draft(&mut self, edit: E::Edit) {
        self.draft.apply(edit);
    }

    pub fn add_list_item(&mut self, field: E::ListField) {
        self.draft.list_mut(field).push(String::new());
    }

    pub fn set_list_item(&mut self, field: E::ListField, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.draft.list_mut(field).get_mut(index) {
            *slot = value.into();
        }
    }

    pub fn remove_list_item(&mut self, field: E::ListField, index: usize) {
        let list = self.draft.list_mut(field);
        if index < list.len() {
            list.remove(index);
        }
    }

    pub fn begin_edit(&mut self, entity: &E) {
        self.draft = entity.clone();
        self.edit_mode = true;
    }

    pub fn cancel_edit(&mut self) {
        self.draft = self.blank.clone();
        self.edit_mode = false;
    }

    // Mutations

    /// Update when editing a persisted record, create otherwise. A failure
    /// keeps the draft and edit mode so the user can retry.
    pub async fn submit(&mut self) -> ApiResult<()> {
        let result = match (self.edit_mode, self.draft.id()) {
            (true, Some(id)) => {
                let id = id.to_string();
                self.service.update(&id, &self.draft).await
            }
            _ => self.service.create(&self.draft).await.map(|_| ()),
        };

        match result {
            Ok(()) => {
                debug!(kind = E::SINGULAR, "draft saved");
                self.error = None;
                self.draft = self.blank.clone();
                self.edit_mode = false;
                self.load().await;
            }
            Err(_) => {
                self.error = Some(format!("Failed to save {}", E::SINGULAR));
            }
        }
        result
    }

    pub async fn remove(&mut self, id: &str) -> ApiResult<()> {
        let result = self.service.delete(id).await;
        match result {
            Ok(()) => {
                debug!(kind = E::SINGULAR, id, "deleted");
                self.error = None;
                self.load().await;
            }
            Err(_) => {
                self.error = Some(format!("Failed to delete {}", E::SINGULAR));
            }
        }
        result
    }
}

impl<E, S> EntityEditor<E, S>
where
    E: Entity,
    S: EntityService<E> + RowActions,
{
    pub async fn row_action(&mut self, action: RowAction, id: &str) -> ApiResult<()> {
        let result = self.service.perform(action, id).await;
        match result {
            Ok(()) => {
                debug!(kind = E::SINGULAR, id, action = action.verb(), "row action done");
                self.error = None;
                self.load().await;
            }
            Err(_) => {
                self.error = Some(format!("Failed to {} {}", action.verb(), E::SINGULAR));
            }
        }
        result
    }
}
