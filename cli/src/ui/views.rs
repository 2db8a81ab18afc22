use super::app::{App, BrowsePane, EditorPane, FilterInput, Focus, LoginPane, View};
use super::forms::{self, FormLayout, Slot};
use crate::api::{AuthService, EnrollmentService, EntityService, RowActions};
use crate::model::Challenge;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CELL_WIDTH: usize = 28;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_main(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .views
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let num = format!("[{}] ", i + 1);
            let style = if *v == app.current_view {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(num, Style::default().fg(Color::DarkGray)),
                Span::styled(v.title(), style),
            ])
        })
        .collect();

    let title = format!(" Gym Console  [←/→ or 1-{} to switch tabs] ", app.views.len());
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().fg(Color::Yellow))
        .select(app.view_index());

    f.render_widget(tabs, area);
}

fn draw_main(f: &mut Frame, app: &App, area: Rect) {
    match app.current_view {
        View::Login => draw_login(f, &app.login, area),
        View::Badges => draw_editor(f, &app.badges, area),
        View::ExerciseTypes => draw_editor(f, &app.exercise_types, area),
        View::Gyms => draw_editor(f, &app.gyms, area),
        View::Challenges => {
            if let Some(pane) = app.challenges.as_ref() {
                draw_editor(f, pane, area);
            }
        }
        View::Users => draw_editor(f, &app.users, area),
        View::Browse => draw_browse(f, &app.browse, area),
    }
}

/// Cut `text` to at most `max` terminal columns, marking the cut with an
/// ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

/// First row to draw so that `selected` stays inside a window of `height`.
fn scroll_offset(selected: usize, height: usize) -> usize {
    selected.saturating_sub(height.saturating_sub(1))
}

fn message_line(error: Option<&str>, success: Option<&str>) -> Option<Line<'static>> {
    if let Some(err) = error {
        Some(Line::from(vec![
            Span::styled("✗ ", Style::default().fg(Color::Red)),
            Span::styled(err.to_string(), Style::default().fg(Color::Red)),
        ]))
    } else {
        success.map(|msg| {
            Line::from(vec![
                Span::styled("✓ ", Style::default().fg(Color::Green)),
                Span::styled(msg.to_string(), Style::default().fg(Color::Green)),
            ])
        })
    }
}

// ============================================================================
// Management views
// ============================================================================

fn draw_editor<E, S>(f: &mut Frame, pane: &EditorPane<E, S>, area: Rect)
where
    E: FormLayout,
    S: EntityService<E> + RowActions,
{
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(columns[0]);

    draw_search(f, pane, left[0]);
    draw_table(f, pane, left[1]);
    draw_form(f, pane, columns[1]);
}

fn draw_search<E, S>(f: &mut Frame, pane: &EditorPane<E, S>, area: Rect)
where
    E: FormLayout,
    S: EntityService<E> + RowActions,
{
    let active = pane.focus == Focus::Search;
    let term = pane.editor.search();
    let text = if term.is_empty() && !active {
        Span::styled("(/ to search)", Style::default().fg(Color::DarkGray))
    } else {
        let cursor = if active { "█" } else { "" };
        Span::styled(
            format!("{}{}", term, cursor),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )
    };
    let border = if active { Color::Yellow } else { Color::DarkGray };
    let search = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Search "),
    );
    f.render_widget(search, area);
}

fn draw_table<E, S>(f: &mut Frame, pane: &EditorPane<E, S>, area: Rect)
where
    E: FormLayout,
    S: EntityService<E> + RowActions,
{
    let visible = pane.editor.visible();
    let selected_idx = pane.rows.selected().unwrap_or(0);

    let mut title = format!(" {} ({}/{}) ", E::TITLE, visible.len(), pane.editor.items().len());
    if let Some(at) = pane.editor.loaded_at() {
        title.push_str(&format!("· loaded {} ", at.format("%H:%M:%S")));
    }

    let header = Row::new(
        E::COLUMNS
            .iter()
            .map(|c| Cell::from(*c).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)))
            .collect::<Vec<_>>(),
    )
    .height(1)
    .bottom_margin(1);

    // Borders, header and its margin
    let height = area.height.saturating_sub(4) as usize;
    let offset = scroll_offset(selected_idx, height);
    let focused = pane.focus == Focus::Rows;

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, item)| {
            let selected = i == selected_idx;
            let style = if selected && focused {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else if selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if selected { "▶ " } else { "  " };
            let cells: Vec<Cell> = item
                .row()
                .iter()
                .enumerate()
                .map(|(col, text)| {
                    let text = truncate(text, CELL_WIDTH);
                    if col == 0 {
                        Cell::from(format!("{}{}", prefix, text))
                    } else {
                        Cell::from(text)
                    }
                })
                .collect();
            Row::new(cells).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = E::COLUMNS
        .iter()
        .map(|_| Constraint::Ratio(1, E::COLUMNS.len() as u32))
        .collect();

    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title),
    );

    f.render_widget(table, area);
}

fn draw_form<E, S>(f: &mut Frame, pane: &EditorPane<E, S>, area: Rect)
where
    E: FormLayout,
    S: EntityService<E> + RowActions,
{
    let draft = pane.editor.draft();
    let slots = forms::slots(draft);
    let active = pane.focus == Focus::Form;
    let current = if active { slots.get(pane.slot).copied() } else { None };

    let label_style = |on: bool| {
        if on {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let value_style = |on: bool| {
        if on {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    };
    let indicator = |on: bool| if on { "▶ " } else { "  " };
    let cursor = |on: bool| if on { "█" } else { "" };

    let mut lines: Vec<Line> = Vec::new();
    for (i, label) in E::SCALARS.iter().enumerate() {
        let on = current == Some(Slot::Scalar(i));
        lines.push(Line::from(vec![
            Span::styled(indicator(on), label_style(on)),
            Span::styled(format!("{}: ", label), label_style(on)),
            Span::styled(format!("{}{}", draft.scalar(i), cursor(on)), value_style(on)),
        ]));
    }
    for (field, label) in E::LISTS {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", label),
            Style::default().fg(Color::Cyan),
        )));
        for (i, item) in draft.list(*field).iter().enumerate() {
            let on = current == Some(Slot::Item(*field, i));
            lines.push(Line::from(vec![
                Span::styled(indicator(on), label_style(on)),
                Span::styled("  - ", label_style(on)),
                Span::styled(format!("{}{}", item, cursor(on)), value_style(on)),
            ]));
        }
        let on = current == Some(Slot::AddItem(*field));
        lines.push(Line::from(vec![
            Span::styled(indicator(on), label_style(on)),
            Span::styled("  + add", label_style(on)),
        ]));
    }

    if let Some(msg) = message_line(pane.editor.error(), None) {
        lines.push(Line::from(""));
        lines.push(msg);
    }

    let title = if pane.editor.is_editing() {
        format!(" Edit {} ", E::SINGULAR)
    } else {
        format!(" New {} ", E::SINGULAR)
    };
    let border = if active { Color::Yellow } else { Color::DarkGray };
    let form = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title),
    );
    f.render_widget(form, area);
}

// ============================================================================
// Browse view
// ============================================================================

fn draw_browse<S>(f: &mut Frame, pane: &BrowsePane<S>, area: Rect)
where
    S: EntityService<Challenge> + EnrollmentService,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filters
            Constraint::Min(0),    // Challenges
            Constraint::Length(3), // Messages
        ])
        .split(area);

    let filter = pane.browser.filter();
    let field = |label: &'static str, value: Option<&str>, input: Option<FilterInput>| {
        let typing = input.is_some() && pane.typing == input;
        let text = match value {
            Some(v) if !v.is_empty() || typing => format!("{}{}", v, if typing { "█" } else { "" }),
            _ if typing => "█".to_string(),
            _ => "any".to_string(),
        };
        let style = if typing {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        vec![
            Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
            Span::styled(text, style),
            Span::raw("   "),
        ]
    };
    let mut spans = field("Difficulty", filter.difficulty.map(|d| d.as_str()), None);
    spans.extend(field("Type", filter.kind.as_deref(), Some(FilterInput::Kind)));
    spans.extend(field("Name", filter.name.as_deref(), Some(FilterInput::Name)));
    let (filter_title, filter_border) = if filter.is_empty() {
        (" Filters ", Color::DarkGray)
    } else {
        (" Filters (active) ", Color::Cyan)
    };
    let filters = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(filter_border))
            .title(filter_title),
    );
    f.render_widget(filters, chunks[0]);

    let selected_idx = pane.rows.selected().unwrap_or(0);
    let height = chunks[1].height.saturating_sub(2) as usize;
    let offset = scroll_offset(selected_idx, height);

    let items: Vec<ListItem> = if pane.browser.filtered().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "  No challenges match the current filters.",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        pane.browser
            .filtered()
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, c)| {
                let picked = c.id.as_deref().is_some_and(|id| pane.browser.is_selected(id));
                let current = i == selected_idx;
                let prefix = if current { "▶ " } else { "  " };
                let check = if picked { "[x] " } else { "[ ] " };
                let line = Line::from(vec![
                    Span::raw(prefix),
                    Span::styled(check, Style::default().fg(if picked { Color::Green } else { Color::DarkGray })),
                    Span::styled(
                        format!("{:<30}", truncate(&c.name, CELL_WIDTH)),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("{:<8}", c.difficulty), Style::default().fg(Color::Cyan)),
                    Span::raw(" "),
                    Span::styled(format!("[{}]", c.kind), Style::default().fg(Color::Magenta)),
                    Span::raw(" "),
                    Span::styled(format!("{} pts", c.points), Style::default().fg(Color::DarkGray)),
                ]);
                let style = if current {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };
                ListItem::new(line).style(style)
            })
            .collect()
    };

    let title = format!(
        " Challenges ({}/{}) · {} selected ",
        pane.browser.filtered().len(),
        pane.browser.challenges().len(),
        pane.browser.selection().len()
    );
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title),
    );
    f.render_widget(list, chunks[1]);

    if let Some(msg) = message_line(pane.browser.error(), pane.last_batch.as_deref()) {
        let msg = Paragraph::new(msg)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::TOP));
        f.render_widget(msg, chunks[2]);
    }
}

// ============================================================================
// Login view
// ============================================================================

fn draw_login<S: AuthService>(f: &mut Frame, pane: &LoginPane<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Login
            Constraint::Length(3), // Password
            Constraint::Length(2), // Hint
            Constraint::Min(0),    // Messages
        ])
        .margin(1)
        .split(area);

    let status = if pane.form.session().is_signed_in() {
        " Account (signed in) "
    } else {
        " Account "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(status);
    f.render_widget(block, area);

    let masked = "•".repeat(pane.form.credentials.password.chars().count());
    let fields = [
        ("Email", pane.form.credentials.login.as_str(), "your login"),
        ("Password", masked.as_str(), "your password"),
    ];

    for (i, (label, value, hint)) in fields.iter().enumerate() {
        let is_selected = pane.field == i;

        let (label_style, input_style, border_color) = if is_selected {
            (
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                Color::Yellow,
            )
        } else {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::Gray),
                Color::DarkGray,
            )
        };

        let cursor = if is_selected { "█" } else { "" };
        let display_value = if value.is_empty() && !is_selected {
            format!("({})", hint)
        } else {
            format!("{}{}", value, cursor)
        };

        let indicator = if is_selected { "▶ " } else { "  " };
        let text = Line::from(vec![
            Span::styled(indicator, label_style),
            Span::styled(format!("{}: ", label), label_style),
            Span::styled(display_value, input_style),
        ]);

        let paragraph = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(border_color)),
        );
        f.render_widget(paragraph, chunks[i]);
    }

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Green)),
        Span::styled(" Sign in  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Ctrl+S", Style::default().fg(Color::Cyan)),
        Span::styled(" Create account  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Ctrl+O", Style::default().fg(Color::Red)),
        Span::styled(" Sign out", Style::default().fg(Color::DarkGray)),
    ]));
    f.render_widget(hint, chunks[2]);

    if let Some(msg) = message_line(pane.form.error(), pane.notice.as_deref()) {
        f.render_widget(Paragraph::new(msg).wrap(Wrap { trim: true }), chunks[3]);
    }
}

// ============================================================================
// Status bar
// ============================================================================

fn editor_help<E, S>(pane: &EditorPane<E, S>) -> String
where
    E: FormLayout,
    S: EntityService<E> + RowActions,
{
    match pane.focus {
        Focus::Rows => {
            let action = E::ROW_ACTION
                .map(|(action, key)| format!("{}:{}  ", key, action.verb()))
                .unwrap_or_default();
            format!(" ↑/↓:Select  e:Edit  n:New  d:Delete  {}/:Search  Tab:Form  r:Refresh  q:Quit ", action)
        }
        Focus::Search => " Type to filter  Enter/Esc:Done ".to_string(),
        Focus::Form => " ↑/↓:Fields  Enter:Save or add item  Del:Remove item  Tab:Rows  Esc:Cancel ".to_string(),
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.loading {
        "Loading...".to_string()
    } else {
        match app.current_view {
            View::Login => " Tab:Field  Enter:Sign in  ←/→:Tabs  Esc:Quit ".to_string(),
            View::Badges => editor_help(&app.badges),
            View::ExerciseTypes => editor_help(&app.exercise_types),
            View::Gyms => editor_help(&app.gyms),
            View::Challenges => app
                .challenges
                .as_ref()
                .map(editor_help)
                .unwrap_or_default(),
            View::Users => editor_help(&app.users),
            View::Browse => {
                if app.browse.typing.is_some() {
                    " Type to filter  Enter/Esc:Done ".to_string()
                } else {
                    " ↑/↓:Select  Space:Pick  f:Difficulty  t:Type  /:Name  x:Clear  c:Enroll  r:Refresh  q:Quit ".to_string()
                }
            }
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    // Left: context-sensitive help
    let help_style = if app.loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let help = Paragraph::new(Line::from(Span::styled(help_text, help_style)))
        .block(Block::default().borders(Borders::ALL).title(" Keys "));

    // Right: global info
    let who = if app.session.is_signed_in() {
        "signed in"
    } else {
        "signed out"
    };
    let info = format!(" {} | {} ", app.server, who);
    let info_widget = Paragraph::new(Line::from(Span::styled(info, Style::default().fg(Color::DarkGray))))
        .block(Block::default().borders(Borders::ALL).title(" Info "));

    f.render_widget(help, chunks[0]);
    f.render_widget(info_widget, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        // Wide characters take two columns each
        assert_eq!(truncate("日本語テキスト", 7), "日本語…");
    }

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(12, 10), 3);
        assert_eq!(scroll_offset(3, 0), 3);
    }
}
