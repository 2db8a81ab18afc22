//! Screen State Machines
//!
//! Front-end independent state for every screen of the console:
//!
//! - `editor`: the generic CRUD screen (badges, exercise types, gyms,
//!   challenges, users)
//! - `browser`: challenge browsing with client-side filters and batch
//!   enrollment
//! - `auth`: login and subscribe forms
//!
//! Screens own their state and are driven through `&mut self` from the
//! event loop. They only see the backend through the traits in
//! [`crate::api`], and turn every failed call into one static message.

pub mod auth;
pub mod browser;
pub mod editor;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthForm, Route};
pub use browser::{ChallengeBrowser, ChallengeFilter};
pub use editor::EntityEditor;

/// Identifies one issued list request. Only the result of the most recently
/// issued ticket is applied; older results are dropped on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Monotonic request counter backing [`LoadTicket`].
#[derive(Debug, Default)]
pub(crate) struct Generation(u64);

impl Generation {
    pub(crate) fn issue(&mut self) -> LoadTicket {
        self.0 += 1;
        LoadTicket { generation: self.0 }
    }

    pub(crate) fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.0
    }
}
