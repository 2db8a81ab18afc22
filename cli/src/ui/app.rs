//! Application State and Logic
//!
//! This module defines the terminal application around the screen state
//! machines. It manages:
//!
//! - Tab navigation between the login, management and browse views
//! - One pane per view wrapping its screen state (row selection, focus,
//!   form cursor)
//! - Translating key presses into screen operations
//! - One-shot loading of a view's list on first visit
//!
//! The `App` struct is the central state container, and `run_app` is the
//! main event loop that processes user input and updates the UI.

use super::forms::{self, FormLayout, Slot};
use crate::api::{
    AuthService, EnrollmentService, EntityService, GymChallenges, RestClient, RowActions,
};
use crate::model::{Badge, Challenge, Difficulty, Entity, ExerciseType, Gym, User};
use crate::screens::browser::EnrollmentOutcome;
use crate::screens::{AuthForm, ChallengeBrowser, ChallengeFilter, EntityEditor, Route};
use crate::session::Session;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, widgets::ListState, Terminal};
use std::collections::HashSet;
use std::io::Stdout;
use tracing::{debug, info};

pub type AppResult<T> = Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Badges,
    ExerciseTypes,
    Gyms,
    Challenges,
    Users,
    Browse,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Login",
            View::Badges => "Badges",
            View::ExerciseTypes => "Exercise Types",
            View::Gyms => "Gyms",
            View::Challenges => "Challenges",
            View::Users => "Users",
            View::Browse => "Browse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Rows,
    Search,
    Form,
}

// ============================================================================
// Editor pane
// ============================================================================

pub struct EditorPane<E: Entity, S> {
    pub editor: EntityEditor<E, S>,
    pub rows: ListState,
    pub focus: Focus,
    pub slot: usize,
}

impl<E, S> EditorPane<E, S>
where
    E: FormLayout,
    S: EntityService<E> + RowActions,
{
    pub fn new(editor: EntityEditor<E, S>) -> Self {
        let mut rows = ListState::default();
        rows.select(Some(0));
        Self {
            editor,
            rows,
            focus: Focus::Rows,
            slot: 0,
        }
    }

    pub fn captures_text(&self) -> bool {
        self.focus != Focus::Rows
    }

    pub fn current_slot(&self) -> Option<Slot<E::ListField>> {
        forms::slots(self.editor.draft()).get(self.slot).copied()
    }

    fn selected(&self) -> Option<E> {
        let idx = self.rows.selected()?;
        self.editor.visible().get(idx).map(|item| (*item).clone())
    }

    fn selected_id(&self) -> Option<String> {
        self.selected().and_then(|item| item.id().map(str::to_string))
    }

    fn clamp_selection(&mut self) {
        let len = self.editor.visible().len();
        let idx = self.rows.selected().unwrap_or(0);
        self.rows.select(Some(idx.min(len.saturating_sub(1))));
    }

    fn clamp_slot(&mut self) {
        let len = forms::slots(self.editor.draft()).len();
        self.slot = self.slot.min(len.saturating_sub(1));
    }

    pub async fn load(&mut self) {
        self.editor.load().await;
        self.clamp_selection();
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        match self.focus {
            Focus::Rows => self.handle_rows_key(key).await,
            Focus::Search => self.handle_search_key(key),
            Focus::Form => self.handle_form_key(key).await,
        }
    }

    async fn handle_rows_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.rows.selected().unwrap_or(0);
                if i < self.editor.visible().len().saturating_sub(1) {
                    self.rows.select(Some(i + 1));
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.rows.selected().unwrap_or(0);
                if i > 0 {
                    self.rows.select(Some(i - 1));
                }
            }
            KeyCode::Home => self.rows.select(Some(0)),
            KeyCode::End => {
                let len = self.editor.visible().len();
                self.rows.select(Some(len.saturating_sub(1)));
            }
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('n') => {
                self.editor.cancel_edit();
                self.slot = 0;
                self.focus = Focus::Form;
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(item) = self.selected() {
                    self.editor.begin_edit(&item);
                    self.slot = 0;
                    self.focus = Focus::Form;
                }
            }
            KeyCode::Tab => {
                self.clamp_slot();
                self.focus = Focus::Form;
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    let _ = self.editor.remove(&id).await;
                    self.clamp_selection();
                }
            }
            KeyCode::Char('r') => self.load().await,
            KeyCode::Char(c) => {
                let Some((action, bound)) = E::ROW_ACTION else {
                    return;
                };
                let target = self
                    .selected()
                    .filter(|item| c == bound && item.row_action_enabled());
                if let Some(id) = target.as_ref().and_then(|item| item.id()) {
                    let _ = self.editor.row_action(action, id).await;
                    self.clamp_selection();
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                let mut term = self.editor.search().to_string();
                term.push(c);
                self.editor.set_search(term);
            }
            KeyCode::Backspace => {
                let mut term = self.editor.search().to_string();
                term.pop();
                self.editor.set_search(term);
            }
            KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => self.focus = Focus::Rows,
            _ => {}
        }
        self.clamp_selection();
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        let slot_count = forms::slots(self.editor.draft()).len();
        match key.code {
            KeyCode::Down => self.slot = (self.slot + 1) % slot_count.max(1),
            KeyCode::Up => self.slot = (self.slot + slot_count.max(1) - 1) % slot_count.max(1),
            KeyCode::Tab => self.focus = Focus::Rows,
            KeyCode::Esc => {
                self.editor.cancel_edit();
                self.slot = 0;
                self.focus = Focus::Rows;
            }
            KeyCode::Char(c) => self.edit_text(|text| text.push(c)),
            KeyCode::Backspace => self.edit_text(|text| {
                text.pop();
            }),
            KeyCode::Delete => {
                if let Some(Slot::Item(field, index)) = self.current_slot() {
                    self.editor.remove_list_item(field, index);
                    self.clamp_slot();
                }
            }
            KeyCode::Enter => match self.current_slot() {
                // The new item takes the add cell's position, so the cursor
                // lands on it.
                Some(Slot::AddItem(field)) => self.editor.add_list_item(field),
                _ => {
                    if self.editor.submit().await.is_ok() {
                        self.slot = 0;
                        self.focus = Focus::Rows;
                        self.clamp_selection();
                    }
                }
            },
            _ => {}
        }
    }

    fn edit_text(&mut self, change: impl FnOnce(&mut String)) {
        match self.current_slot() {
            Some(Slot::Scalar(index)) => {
                let mut text = self.editor.draft().scalar(index);
                change(&mut text);
                if let Some(edit) = E::edit(index, &text) {
                    self.editor.update_draft(edit);
                }
            }
            Some(Slot::Item(field, index)) => {
                if let Some(current) = self.editor.draft().list(field).get(index) {
                    let mut text = current.clone();
                    change(&mut text);
                    self.editor.set_list_item(field, index, text);
                }
            }
            Some(Slot::AddItem(_)) | None => {}
        }
    }
}

// ============================================================================
// Browse pane
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterInput {
    Kind,
    Name,
}

fn filter_text(filter: &mut ChallengeFilter, input: FilterInput) -> &mut Option<String> {
    match input {
        FilterInput::Kind => &mut filter.kind,
        FilterInput::Name => &mut filter.name,
    }
}

/// One-line report of an enrollment batch, naming the ids that failed.
pub fn batch_summary(outcomes: &[EnrollmentOutcome]) -> String {
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| o.result.is_err())
        .map(|o| o.challenge_id.as_str())
        .collect();
    let mut summary = format!(
        "Enrolled in {} of {} challenges",
        outcomes.len() - failed.len(),
        outcomes.len()
    );
    if !failed.is_empty() {
        summary.push_str(&format!(" (failed: {})", failed.join(", ")));
    }
    summary
}

pub struct BrowsePane<S> {
    pub browser: ChallengeBrowser<S>,
    pub rows: ListState,
    pub typing: Option<FilterInput>,
    pub last_batch: Option<String>,
}

impl<S> BrowsePane<S>
where
    S: EntityService<Challenge> + EnrollmentService,
{
    pub fn new(browser: ChallengeBrowser<S>) -> Self {
        let mut rows = ListState::default();
        rows.select(Some(0));
        Self {
            browser,
            rows,
            typing: None,
            last_batch: None,
        }
    }

    pub fn captures_text(&self) -> bool {
        self.typing.is_some()
    }

    fn clamp_selection(&mut self) {
        let len = self.browser.filtered().len();
        let idx = self.rows.selected().unwrap_or(0);
        self.rows.select(Some(idx.min(len.saturating_sub(1))));
    }

    pub async fn load(&mut self) {
        self.browser.load().await;
        self.clamp_selection();
    }

    fn edit_filter(&mut self, change: impl FnOnce(&mut ChallengeFilter)) {
        let mut filter = self.browser.filter().clone();
        change(&mut filter);
        self.browser.set_filter(filter);
        self.clamp_selection();
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if let Some(input) = self.typing {
            match key.code {
                KeyCode::Char(c) => self.edit_filter(|f| {
                    filter_text(f, input)
                        .get_or_insert_with(String::new)
                        .push(c)
                }),
                KeyCode::Backspace => self.edit_filter(|f| {
                    if let Some(text) = filter_text(f, input) {
                        text.pop();
                    }
                }),
                KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => self.typing = None,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.rows.selected().unwrap_or(0);
                if i < self.browser.filtered().len().saturating_sub(1) {
                    self.rows.select(Some(i + 1));
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.rows.selected().unwrap_or(0);
                if i > 0 {
                    self.rows.select(Some(i - 1));
                }
            }
            KeyCode::Char(' ') => {
                let id = self
                    .rows
                    .selected()
                    .and_then(|i| self.browser.filtered().get(i))
                    .and_then(|c| c.id.clone());
                if let Some(id) = id {
                    self.browser.toggle_selection(&id);
                }
            }
            KeyCode::Char('f') => {
                self.edit_filter(|f| f.difficulty = Difficulty::cycle(f.difficulty))
            }
            KeyCode::Char('t') => self.typing = Some(FilterInput::Kind),
            KeyCode::Char('/') => self.typing = Some(FilterInput::Name),
            KeyCode::Char('x') => self.edit_filter(|f| *f = ChallengeFilter::default()),
            KeyCode::Char('c') => {
                if self.browser.selection().is_empty() {
                    return;
                }
                let outcomes = self.browser.commit_selection().await;
                if !outcomes.is_empty() {
                    self.last_batch = Some(batch_summary(&outcomes));
                }
            }
            KeyCode::Char('r') => self.load().await,
            _ => {}
        }
    }
}

// ============================================================================
// Login pane
// ============================================================================

pub struct LoginPane<S> {
    pub form: AuthForm<S>,
    /// 0 = login, 1 = password
    pub field: usize,
    pub notice: Option<String>,
}

impl<S: AuthService> LoginPane<S> {
    pub fn new(form: AuthForm<S>) -> Self {
        Self {
            form,
            field: 0,
            notice: None,
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Option<Route> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => {
                let route = self.form.subscribe().await;
                if route == Some(Route::Login) {
                    self.notice = Some("Account created, you can sign in".to_string());
                    self.form.credentials.password.clear();
                    self.field = 1;
                }
                route
            }
            KeyCode::Char('o') if ctrl => {
                self.form.logout();
                self.notice = Some("Signed out".to_string());
                None
            }
            KeyCode::Char(c) => {
                self.field_mut().push(c);
                None
            }
            KeyCode::Backspace => {
                self.field_mut().pop();
                None
            }
            KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => {
                self.field = 1 - self.field;
                None
            }
            KeyCode::Enter => {
                self.notice = None;
                self.form.login().await
            }
            _ => None,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        if self.field == 0 {
            &mut self.form.credentials.login
        } else {
            &mut self.form.credentials.password
        }
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub current_view: View,
    pub running: bool,
    pub views: Vec<View>,
    pub session: Session,
    pub server: String,

    pub login: LoginPane<RestClient>,
    pub badges: EditorPane<Badge, RestClient>,
    pub exercise_types: EditorPane<ExerciseType, RestClient>,
    pub gyms: EditorPane<Gym, RestClient>,
    /// Owner view, present only when a gym was given on the command line.
    pub challenges: Option<EditorPane<Challenge, GymChallenges<RestClient>>>,
    pub users: EditorPane<User, RestClient>,
    pub browse: BrowsePane<RestClient>,

    /// Set when the current view still has to fetch its list; the event
    /// loop draws one frame before running the fetch.
    pub loading: bool,
    loaded: HashSet<View>,
}

impl App {
    pub fn new(client: RestClient, gym_id: Option<String>) -> Self {
        let session = client.session().clone();

        let challenges = gym_id.map(|gym_id| {
            let blank = Challenge {
                salle_id: gym_id.clone(),
                ..Default::default()
            };
            let scoped = GymChallenges::new(client.clone(), gym_id);
            EditorPane::new(EntityEditor::with_blank(scoped, blank))
        });

        let mut views = vec![View::Login, View::Badges, View::ExerciseTypes, View::Gyms];
        if challenges.is_some() {
            views.push(View::Challenges);
        }
        views.extend([View::Users, View::Browse]);

        Self {
            current_view: View::Login,
            running: true,
            views,
            server: client.base_url().to_string(),
            login: LoginPane::new(AuthForm::new(client.clone(), session.clone())),
            badges: EditorPane::new(EntityEditor::new(client.clone())),
            exercise_types: EditorPane::new(EntityEditor::new(client.clone())),
            gyms: EditorPane::new(EntityEditor::new(client.clone())),
            challenges,
            users: EditorPane::new(EntityEditor::new(client.clone())),
            browse: BrowsePane::new(ChallengeBrowser::new(client, session.clone())),
            session,
            loading: false,
            loaded: HashSet::new(),
        }
    }

    /// Whether the current view is taking free text, in which case letter
    /// shortcuts go to the view instead of the app.
    pub fn captures_text(&self) -> bool {
        match self.current_view {
            View::Login => true,
            View::Badges => self.badges.captures_text(),
            View::ExerciseTypes => self.exercise_types.captures_text(),
            View::Gyms => self.gyms.captures_text(),
            View::Challenges => self
                .challenges
                .as_ref()
                .is_some_and(|pane| pane.captures_text()),
            View::Users => self.users.captures_text(),
            View::Browse => self.browse.captures_text(),
        }
    }

    /// Switch view. A view not loaded yet is flagged for loading.
    pub fn enter_view(&mut self, view: View) {
        self.current_view = view;
        self.loading = !self.loaded.contains(&view);
    }

    /// Lists fetched before login may be empty or stale, so every view
    /// refetches.
    fn signed_in(&mut self) {
        info!("signed in, reloading views");
        self.loaded.clear();
        self.enter_view(View::Badges);
    }

    pub async fn load_current(&mut self) {
        let view = self.current_view;
        debug!(view = view.title(), "loading view");
        match view {
            View::Login => {}
            View::Badges => self.badges.load().await,
            View::ExerciseTypes => self.exercise_types.load().await,
            View::Gyms => self.gyms.load().await,
            View::Challenges => {
                if let Some(pane) = self.challenges.as_mut() {
                    pane.load().await;
                }
            }
            View::Users => self.users.load().await,
            View::Browse => self.browse.load().await,
        }
        self.loaded.insert(view);
        self.loading = false;
    }

    pub fn next_view(&mut self) {
        let idx = self.view_index();
        let next = self.views[(idx + 1) % self.views.len()];
        self.enter_view(next);
    }

    pub fn prev_view(&mut self) {
        let idx = self.view_index();
        let len = self.views.len();
        let prev = self.views[(idx + len - 1) % len];
        self.enter_view(prev);
    }

    pub fn goto_view(&mut self, index: usize) {
        if let Some(view) = self.views.get(index).copied() {
            self.enter_view(view);
        }
    }

    pub fn view_index(&self) -> usize {
        self.views
            .iter()
            .position(|v| *v == self.current_view)
            .unwrap_or(0)
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        let text = self.captures_text();
        match key.code {
            KeyCode::Right => self.next_view(),
            KeyCode::Left => self.prev_view(),
            KeyCode::Char('q') if !text => self.running = false,
            KeyCode::Esc if !text || self.current_view == View::Login => self.running = false,
            KeyCode::Char(c @ '1'..='9') if !text => {
                let index = c as usize - '1' as usize;
                self.goto_view(index);
            }
            _ => self.dispatch(key).await,
        }
    }

    async fn dispatch(&mut self, key: KeyEvent) {
        match self.current_view {
            View::Login => {
                if self.login.handle_key(key).await == Some(Route::Home) {
                    self.signed_in();
                }
            }
            View::Badges => self.badges.handle_key(key).await,
            View::ExerciseTypes => self.exercise_types.handle_key(key).await,
            View::Gyms => self.gyms.handle_key(key).await,
            View::Challenges => {
                if let Some(pane) = self.challenges.as_mut() {
                    pane.handle_key(key).await;
                }
            }
            View::Users => self.users.handle_key(key).await,
            View::Browse => self.browse.handle_key(key).await,
        }
    }
}

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App,
) -> AppResult<()> {
    // Start on the management views when a saved session exists
    if app.session.is_signed_in() {
        app.enter_view(View::Badges);
    }

    loop {
        terminal.draw(|f| super::views::draw(f, &mut app))?;

        // The frame above shows the loading state; fetch before reading keys
        if app.loading {
            app.load_current().await;
            continue;
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key).await;
                }
            }
        }

        if !app.running {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, RowAction};
    use crate::model::GymList;
    use crate::screens::testing::{Call, FakeService};
    use std::time::Duration;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn signed_in() -> Session {
        let session = Session::in_memory();
        session.sign_in("tok".into(), Some("u1".into()));
        session
    }

    fn challenge(id: &str) -> Challenge {
        Challenge {
            id: Some(id.into()),
            name: format!("Challenge {}", id),
            ..Default::default()
        }
    }

    fn gym(id: &str, approved: bool) -> Gym {
        Gym {
            id: Some(id.into()),
            approved,
            ..Default::default()
        }
    }

    fn offline_app() -> App {
        let client = RestClient::new(
            "http://127.0.0.1:9",
            Session::in_memory(),
            Duration::from_millis(50),
        )
        .unwrap();
        App::new(client, None)
    }

    #[test]
    fn batch_summary_names_failed_ids() {
        let outcomes = vec![
            EnrollmentOutcome {
                challenge_id: "1".into(),
                result: Ok(()),
            },
            EnrollmentOutcome {
                challenge_id: "2".into(),
                result: Err(ApiError::Failed),
            },
            EnrollmentOutcome {
                challenge_id: "3".into(),
                result: Ok(()),
            },
        ];

        assert_eq!(
            batch_summary(&outcomes),
            "Enrolled in 2 of 3 challenges (failed: 2)"
        );
        assert_eq!(batch_summary(&outcomes[..1]), "Enrolled in 1 of 1 challenges");
    }

    #[tokio::test]
    async fn commit_key_enrolls_picked_challenges() {
        let fake = FakeService::with_items(vec![challenge("1"), challenge("2")]);
        fake.fail_start("2");
        let mut pane = BrowsePane::new(ChallengeBrowser::new(fake.clone(), signed_in()));
        pane.load().await;

        pane.handle_key(press(KeyCode::Char(' '))).await;
        pane.handle_key(press(KeyCode::Down)).await;
        pane.handle_key(press(KeyCode::Char(' '))).await;
        pane.handle_key(press(KeyCode::Char('c'))).await;

        assert_eq!(
            pane.last_batch.as_deref(),
            Some("Enrolled in 1 of 2 challenges (failed: 2)")
        );
        assert_eq!(
            fake.calls(),
            vec![Call::List, Call::Start("1".into()), Call::Start("2".into())]
        );
        assert!(pane.browser.selection().is_empty());
    }

    #[tokio::test]
    async fn enter_on_add_cell_appends_an_item() {
        let fake = FakeService::<Gym>::default();
        let mut pane = EditorPane::new(EntityEditor::new(fake.clone()));

        pane.handle_key(press(KeyCode::Char('n'))).await;
        // Four scalar cells come first
        for _ in 0..4 {
            pane.handle_key(press(KeyCode::Down)).await;
        }
        assert_eq!(pane.current_slot(), Some(Slot::AddItem(GymList::Contact)));

        pane.handle_key(press(KeyCode::Enter)).await;
        assert_eq!(pane.editor.draft().contact, vec![String::new()]);
        assert_eq!(pane.current_slot(), Some(Slot::Item(GymList::Contact, 0)));

        pane.handle_key(press(KeyCode::Char('x'))).await;
        assert_eq!(pane.editor.draft().contact, vec!["x".to_string()]);
        assert_eq!(pane.focus, Focus::Form);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_key_removes_focused_item() {
        let existing = Gym {
            contact: vec!["a".into(), "b".into()],
            ..gym("g1", false)
        };
        let fake = FakeService::with_items(vec![existing]);
        let mut pane = EditorPane::new(EntityEditor::new(fake.clone()));
        pane.load().await;

        pane.handle_key(press(KeyCode::Char('e'))).await;
        for _ in 0..4 {
            pane.handle_key(press(KeyCode::Down)).await;
        }
        pane.handle_key(press(KeyCode::Delete)).await;

        assert_eq!(pane.editor.draft().contact, vec!["b".to_string()]);
        assert!(pane.editor.is_editing());
        assert_eq!(fake.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn approve_key_skips_approved_gyms() {
        let fake = FakeService::with_items(vec![gym("g1", true), gym("g2", false)]);
        let mut pane = EditorPane::new(EntityEditor::new(fake.clone()));
        pane.load().await;

        pane.handle_key(press(KeyCode::Char('a'))).await;
        assert_eq!(fake.calls(), vec![Call::List]);

        pane.handle_key(press(KeyCode::Down)).await;
        pane.handle_key(press(KeyCode::Char('a'))).await;
        assert_eq!(
            fake.calls(),
            vec![
                Call::List,
                Call::Action(RowAction::Approve, "g2".into()),
                Call::List
            ]
        );
    }

    #[tokio::test]
    async fn login_pane_fills_fields_and_signs_in() {
        let fake = FakeService::<User>::default();
        let mut pane = LoginPane::new(AuthForm::new(fake.clone(), Session::in_memory()));

        for c in "ana".chars() {
            pane.handle_key(press(KeyCode::Char(c))).await;
        }
        pane.handle_key(press(KeyCode::Tab)).await;
        pane.handle_key(press(KeyCode::Char('p'))).await;

        assert_eq!(pane.form.credentials.login, "ana");
        assert_eq!(pane.handle_key(press(KeyCode::Enter)).await, Some(Route::Home));
        assert_eq!(fake.calls(), vec![Call::Login("ana".into())]);
    }

    #[test]
    fn entering_a_view_flags_it_for_loading_once() {
        let mut app = offline_app();

        app.enter_view(View::Gyms);
        assert_eq!(app.current_view, View::Gyms);
        assert!(app.loading);

        app.loaded.insert(View::Gyms);
        app.enter_view(View::Gyms);
        assert!(!app.loading);
    }

    #[test]
    fn sign_in_forgets_loaded_views() {
        let mut app = offline_app();
        app.loaded.insert(View::Badges);
        app.loaded.insert(View::Browse);

        app.signed_in();

        assert!(app.loaded.is_empty());
        assert_eq!(app.current_view, View::Badges);
        assert!(app.loading);
    }
}
