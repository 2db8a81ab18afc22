//! Challenge browsing and batch enrollment.
//!
//! The browser fetches the challenge list once, derives a filtered view in
//! memory whenever the filter or the list changes, and lets the user pick
//! challenges across filter changes before enrolling in all of them.

use super::{Generation, LoadTicket};
use crate::api::{ApiResult, EnrollmentService, EntityService};
use crate::model::{Challenge, Difficulty};
use crate::session::Session;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// In-memory predicates; an unset or empty predicate matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeFilter {
    /// Exact match on the challenge difficulty.
    pub difficulty: Option<Difficulty>,
    /// Exact match on the challenge type.
    pub kind: Option<String>,
    /// Case-insensitive substring of the challenge name.
    pub name: Option<String>,
}

impl ChallengeFilter {
    pub fn is_empty(&self) -> bool {
        self.difficulty.is_none() && non_empty(&self.kind).is_none() && non_empty(&self.name).is_none()
    }

    pub fn matches(&self, challenge: &Challenge) -> bool {
        let difficulty_ok = self
            .difficulty
            .map_or(true, |d| challenge.difficulty == d.as_str());
        let kind_ok = non_empty(&self.kind).map_or(true, |k| challenge.kind == k);
        let name_ok = non_empty(&self.name).map_or(true, |n| {
            challenge.name.to_lowercase().contains(&n.to_lowercase())
        });
        difficulty_ok && kind_ok && name_ok
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Challenges of `list` matching `filter`, in list order.
pub fn apply_filter(list: &[Challenge], filter: &ChallengeFilter) -> Vec<Challenge> {
    list.iter().filter(|c| filter.matches(c)).cloned().collect()
}

/// Result of one start-challenge call of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentOutcome {
    pub challenge_id: String,
    pub result: ApiResult<()>,
}

pub struct ChallengeBrowser<S> {
    service: S,
    session: Session,
    challenges: Vec<Challenge>,
    filtered: Vec<Challenge>,
    filter: ChallengeFilter,
    selection: BTreeSet<String>,
    error: Option<String>,
    generation: Generation,
}

impl<S> ChallengeBrowser<S>
where
    S: EntityService<Challenge> + EnrollmentService,
{
    pub fn new(service: S, session: Session) -> Self {
        Self {
            service,
            session,
            challenges: Vec::new(),
            filtered: Vec::new(),
            filter: ChallengeFilter::default(),
            selection: BTreeSet::new(),
            error: None,
            generation: Generation::default(),
        }
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn filtered(&self) -> &[Challenge] {
        &self.filtered
    }

    pub fn filter(&self) -> &ChallengeFilter {
        &self.filter
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Issue a list request, or `None` when there is no session token.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.session.token().is_none() {
            self.error = Some("Token is undefined".to_string());
            return None;
        }
        Some(self.generation.issue())
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, result: ApiResult<Vec<Challenge>>) -> bool {
        if !self.generation.is_current(ticket) {
            debug!("dropping stale challenge list response");
            return false;
        }

        match result {
            Ok(challenges) => {
                debug!(count = challenges.len(), "challenges loaded");
                self.challenges = challenges;
                self.error = None;
                self.recompute_filtered();
            }
            Err(_) => {
                self.error = Some("Failed to fetch challenges".to_string());
            }
        }
        true
    }

    pub async fn load(&mut self) {
        let Some(ticket) = self.begin_load() else {
            return;
        };
        let result = self.service.list().await;
        self.finish_load(ticket, result);
    }

    pub fn set_filter(&mut self, filter: ChallengeFilter) {
        self.filter = filter;
        self.recompute_filtered();
    }

    pub fn recompute_filtered(&mut self) {
        self.filtered = apply_filter(&self.challenges, &self.filter);
    }

    /// Returns whether `id` is selected afterwards.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if self.selection.remove(id) {
            false
        } else {
            self.selection.insert(id.to_string());
            true
        }
    }

    /// Enroll in every selected challenge, one call at a time, then clear the
    /// selection whatever the individual outcomes.
    pub async fn commit_selection(&mut self) -> Vec<EnrollmentOutcome> {
        if self.session.token().is_none() {
            self.error = Some("User ID or Token is missing".to_string());
            return Vec::new();
        }

        let selected = std::mem::take(&mut self.selection);
        let mut outcomes = Vec::with_capacity(selected.len());
        for challenge_id in selected {
            let result = self.service.start_challenge(&challenge_id).await;
            outcomes.push(EnrollmentOutcome {
                challenge_id,
                result,
            });
        }

        let enrolled = outcomes.iter().filter(|o| o.result.is_ok()).count();
        info!(enrolled, requested = outcomes.len(), "enrollment batch done");
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::screens::testing::{Call, FakeService, Op};

    fn challenge(id: &str, name: &str, kind: &str, difficulty: &str) -> Challenge {
        Challenge {
            id: Some(id.into()),
            name: name.into(),
            kind: kind.into(),
            difficulty: difficulty.into(),
            ..Default::default()
        }
    }

    fn signed_in() -> Session {
        let session = Session::in_memory();
        session.sign_in("tok".into(), Some("u1".into()));
        session
    }

    fn sample() -> Vec<Challenge> {
        vec![
            challenge("1", "Plank hold", "core", "Easy"),
            challenge("2", "Deadlift", "strength", "Hard"),
            challenge("3", "Side plank", "core", "Medium"),
        ]
    }

    async fn loaded_browser(fake: &FakeService<Challenge>) -> ChallengeBrowser<FakeService<Challenge>> {
        let mut browser = ChallengeBrowser::new(fake.clone(), signed_in());
        browser.load().await;
        browser
    }

    #[tokio::test]
    async fn load_without_token_skips_network() {
        let fake = FakeService::with_items(sample());
        let mut browser = ChallengeBrowser::new(fake.clone(), Session::in_memory());

        browser.load().await;

        assert_eq!(browser.error(), Some("Token is undefined"));
        assert!(fake.calls().is_empty());
        assert!(browser.challenges().is_empty());
    }

    #[tokio::test]
    async fn failed_load_sets_message() {
        let fake = FakeService::with_items(sample());
        fake.fail(Op::List, ApiError::Failed);
        let browser = loaded_browser(&fake).await;

        assert_eq!(browser.error(), Some("Failed to fetch challenges"));
        assert!(browser.filtered().is_empty());
    }

    #[tokio::test]
    async fn empty_filter_keeps_full_list_in_order() {
        let fake = FakeService::with_items(sample());
        let browser = loaded_browser(&fake).await;

        assert_eq!(browser.filtered(), sample().as_slice());
        assert!(browser.filter().is_empty());
    }

    #[tokio::test]
    async fn filters_combine() {
        let fake = FakeService::with_items(sample());
        let mut browser = loaded_browser(&fake).await;

        browser.set_filter(ChallengeFilter {
            kind: Some("core".into()),
            ..Default::default()
        });
        assert_eq!(browser.filtered().len(), 2);

        browser.set_filter(ChallengeFilter {
            kind: Some("core".into()),
            difficulty: Some(Difficulty::Medium),
            name: None,
        });
        let ids: Vec<_> = browser.filtered().iter().filter_map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["3"]);

        browser.set_filter(ChallengeFilter {
            name: Some("PLANK".into()),
            kind: Some(String::new()),
            difficulty: None,
        });
        assert_eq!(browser.filtered().len(), 2);
    }

    #[test]
    fn unmatched_type_gives_empty_view() {
        let list = vec![
            challenge("1", "A", "", ""),
            challenge("2", "B", "", ""),
        ];
        let filter = ChallengeFilter {
            kind: Some("X".into()),
            ..Default::default()
        };
        assert!(apply_filter(&list, &filter).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let filter = ChallengeFilter {
            kind: Some("core".into()),
            ..Default::default()
        };
        let once = apply_filter(&sample(), &filter);
        let twice = apply_filter(&sample(), &filter);
        assert_eq!(once, twice);
        assert_eq!(apply_filter(&once, &filter), once);
    }

    #[tokio::test]
    async fn toggle_twice_restores_membership() {
        let fake = FakeService::with_items(sample());
        let mut browser = loaded_browser(&fake).await;
        browser.toggle_selection("1");
        let before = browser.selection().clone();

        assert!(browser.toggle_selection("2"));
        assert!(!browser.toggle_selection("2"));

        assert_eq!(browser.selection(), &before);
    }

    #[tokio::test]
    async fn selection_survives_filter_changes() {
        let fake = FakeService::with_items(sample());
        let mut browser = loaded_browser(&fake).await;
        browser.toggle_selection("2");

        browser.set_filter(ChallengeFilter {
            kind: Some("core".into()),
            ..Default::default()
        });

        assert!(browser.filtered().iter().all(|c| c.id.as_deref() != Some("2")));
        assert!(browser.is_selected("2"));
    }

    #[tokio::test]
    async fn commit_issues_one_call_per_id_and_clears() {
        let fake = FakeService::with_items(sample());
        let mut browser = loaded_browser(&fake).await;
        browser.toggle_selection("5");
        browser.toggle_selection("7");
        fake.fail_start("5");

        let outcomes = browser.commit_selection().await;

        assert_eq!(
            fake.calls(),
            vec![Call::List, Call::Start("5".into()), Call::Start("7".into())]
        );
        assert!(browser.selection().is_empty());
        assert_eq!(
            outcomes,
            vec![
                EnrollmentOutcome {
                    challenge_id: "5".into(),
                    result: Err(ApiError::Failed),
                },
                EnrollmentOutcome {
                    challenge_id: "7".into(),
                    result: Ok(()),
                },
            ]
        );
    }

    #[tokio::test]
    async fn commit_without_token_keeps_selection() {
        let fake = FakeService::with_items(sample());
        let session = signed_in();
        let mut browser = ChallengeBrowser::new(fake.clone(), session.clone());
        browser.toggle_selection("1");
        session.sign_out();

        let outcomes = browser.commit_selection().await;

        assert!(outcomes.is_empty());
        assert!(browser.is_selected("1"));
        assert_eq!(browser.error(), Some("User ID or Token is missing"));
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let mut browser = ChallengeBrowser::new(FakeService::<Challenge>::default(), signed_in());
        let first = browser.begin_load().unwrap();
        let second = browser.begin_load().unwrap();

        browser.finish_load(second, Ok(sample()));
        assert!(!browser.finish_load(first, Ok(Vec::new())));

        assert_eq!(browser.challenges().len(), 3);
    }
}
