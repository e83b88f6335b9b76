//! Initiative tracker view.
//!
//! Modes: Browse → Entry (add form) / Conditions (picker) / ConfirmEnd.
//! The view owns only cursor and form state; every change to the encounter
//! goes through [`EncounterTracker`].

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::session::{
    Combatant, CombatantType, Condition, Encounter, EncounterTracker, KnownNames,
};
use crate::core::storage::EncounterRepository;
use crate::tui::events::{Notification, NotificationLevel};
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

// ============================================================================
// Mode State Machine
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerMode {
    Browse,
    Entry,
    Conditions,
    ConfirmEnd,
}

/// Which field the entry form is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryField {
    Name,
    Initiative,
    Type,
}

impl EntryField {
    fn next(self) -> Self {
        match self {
            Self::Name => Self::Initiative,
            Self::Initiative => Self::Type,
            Self::Type => Self::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Name => Self::Type,
            Self::Initiative => Self::Name,
            Self::Type => Self::Initiative,
        }
    }
}

/// What the app should do after the view handled a key.
#[derive(Debug, Clone)]
pub enum TrackerResult {
    Consumed,
    Notify(Notification),
}

// ============================================================================
// Tracker View State
// ============================================================================

pub struct TrackerViewState {
    mode: TrackerMode,

    // Entry form
    entry_name: InputBuffer,
    entry_init: InputBuffer,
    entry_type: CombatantType,
    entry_field: EntryField,
    /// Position in Known Names while cycling with Up/Down.
    name_cursor: Option<usize>,

    // Browse
    selected_idx: usize,
    condition_cursor: usize,
}

impl Default for TrackerViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerViewState {
    pub fn new() -> Self {
        Self {
            mode: TrackerMode::Browse,
            entry_name: InputBuffer::new(),
            entry_init: InputBuffer::new(),
            entry_type: CombatantType::Player,
            entry_field: EntryField::Name,
            name_cursor: None,
            selected_idx: 0,
            condition_cursor: 0,
        }
    }

    pub fn mode(&self) -> TrackerMode {
        self.mode
    }

    pub fn selected_index(&self) -> usize {
        self.selected_idx
    }

    /// True while the entry form is capturing text.
    pub fn is_editing(&self) -> bool {
        self.mode == TrackerMode::Entry
    }

    // ────────────────────────────────────────────────────────────────────
    // Input handling
    // ────────────────────────────────────────────────────────────────────

    /// Returns `None` when the key is left for the global bindings.
    pub fn handle_input<R: EncounterRepository>(
        &mut self,
        event: &Event,
        tracker: &mut EncounterTracker<R>,
    ) -> Option<TrackerResult> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match self.mode {
            TrackerMode::Browse => self.handle_browse(*code, tracker),
            TrackerMode::Entry => Some(self.handle_entry(*code, *modifiers, tracker)),
            TrackerMode::Conditions => Some(self.handle_conditions(*code, tracker)),
            TrackerMode::ConfirmEnd => Some(self.handle_confirm_end(*code, tracker)),
        }
    }

    fn handle_browse<R: EncounterRepository>(
        &mut self,
        code: KeyCode,
        tracker: &mut EncounterTracker<R>,
    ) -> Option<TrackerResult> {
        let len = tracker.encounter().len();
        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                if len > 0 {
                    self.selected_idx = (self.selected_idx + 1) % len;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if len > 0 {
                    self.selected_idx = (self.selected_idx + len - 1) % len;
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('n') => {
                let result = tracker.next_turn();
                self.selected_idx = tracker.encounter().turn_index();
                if result.round_changed {
                    return Some(TrackerResult::Notify(Notification::new(
                        format!("Round {} begins", result.round),
                        NotificationLevel::Info,
                    )));
                }
            }
            KeyCode::Char('p') => {
                tracker.previous_turn();
                self.selected_idx = tracker.encounter().turn_index();
            }
            KeyCode::Char('a') | KeyCode::Char('i') => {
                self.reset_entry_form();
                self.mode = TrackerMode::Entry;
            }
            KeyCode::Char('c') => {
                if len > 0 {
                    self.condition_cursor = 0;
                    self.mode = TrackerMode::Conditions;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let id = tracker
                    .encounter()
                    .combatants()
                    .get(self.selected_idx)?
                    .id
                    .clone();
                let removed = tracker.remove_combatant(&id)?;
                self.clamp_selection(tracker.encounter());
                return Some(TrackerResult::Notify(Notification::new(
                    format!("Removed {}", removed.name),
                    NotificationLevel::Warning,
                )));
            }
            KeyCode::Char('E') => {
                self.mode = TrackerMode::ConfirmEnd;
            }
            _ => return None,
        }
        Some(TrackerResult::Consumed)
    }

    fn handle_entry<R: EncounterRepository>(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        tracker: &mut EncounterTracker<R>,
    ) -> TrackerResult {
        match code {
            KeyCode::Esc => {
                self.mode = TrackerMode::Browse;
            }
            KeyCode::Tab => {
                self.entry_field = self.entry_field.next();
            }
            KeyCode::BackTab => {
                self.entry_field = self.entry_field.prev();
            }
            KeyCode::Enter => self.submit_combatant(tracker),
            _ => match self.entry_field {
                EntryField::Name => match code {
                    KeyCode::Down => self.cycle_known_name(tracker.known_names(), true),
                    KeyCode::Up => self.cycle_known_name(tracker.known_names(), false),
                    _ => {
                        if edit_buffer(&mut self.entry_name, code, modifiers) {
                            self.name_cursor = None;
                        }
                    }
                },
                EntryField::Initiative => {
                    edit_buffer(&mut self.entry_init, code, modifiers);
                }
                EntryField::Type => match code {
                    KeyCode::Char('p') | KeyCode::Char('P') => {
                        self.entry_type = CombatantType::Player;
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') => {
                        self.entry_type = CombatantType::Monster;
                    }
                    KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                        self.entry_type = self.entry_type.toggled();
                    }
                    _ => {}
                },
            },
        }
        TrackerResult::Consumed
    }

    fn handle_conditions<R: EncounterRepository>(
        &mut self,
        code: KeyCode,
        tracker: &mut EncounterTracker<R>,
    ) -> TrackerResult {
        let count = Condition::ALL.len();
        match code {
            KeyCode::Esc | KeyCode::Char('c') => {
                self.mode = TrackerMode::Browse;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.condition_cursor = (self.condition_cursor + 1) % count;
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.condition_cursor = (self.condition_cursor + count - 1) % count;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let condition = Condition::ALL[self.condition_cursor];
                let selected = tracker
                    .encounter()
                    .combatants()
                    .get(self.selected_idx)
                    .map(|c| c.id.clone());
                match selected {
                    Some(id) => {
                        tracker.toggle_condition(&id, condition);
                    }
                    None => self.mode = TrackerMode::Browse,
                }
            }
            _ => {}
        }
        TrackerResult::Consumed
    }

    fn handle_confirm_end<R: EncounterRepository>(
        &mut self,
        code: KeyCode,
        tracker: &mut EncounterTracker<R>,
    ) -> TrackerResult {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                tracker.end_encounter();
                self.selected_idx = 0;
                self.mode = TrackerMode::Browse;
                TrackerResult::Notify(Notification::new(
                    "Encounter ended",
                    NotificationLevel::Success,
                ))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mode = TrackerMode::Browse;
                TrackerResult::Consumed
            }
            _ => TrackerResult::Consumed,
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Helpers
    // ────────────────────────────────────────────────────────────────────

    fn submit_combatant<R: EncounterRepository>(&mut self, tracker: &mut EncounterTracker<R>) {
        let added = tracker.add_combatant(
            self.entry_name.text(),
            self.entry_init.text(),
            self.entry_type,
        );
        // Invalid input leaves the form as typed.
        if let Some(id) = added {
            if let Some(position) = tracker.encounter().position_of(&id) {
                self.selected_idx = position;
            }
            self.reset_entry_form();
        }
    }

    fn cycle_known_name(&mut self, names: &KnownNames, forward: bool) {
        if names.is_empty() {
            return;
        }
        let len = names.len();
        let next = match (self.name_cursor, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        if let Some(name) = names.get(next) {
            self.entry_name.set_text(name);
            self.name_cursor = Some(next);
        }
    }

    fn reset_entry_form(&mut self) {
        self.entry_name.clear();
        self.entry_init.clear();
        self.entry_type = CombatantType::Player;
        self.entry_field = EntryField::Name;
        self.name_cursor = None;
    }

    fn clamp_selection(&mut self, encounter: &Encounter) {
        if self.selected_idx >= encounter.len() {
            self.selected_idx = encounter.len().saturating_sub(1);
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Rendering
    // ────────────────────────────────────────────────────────────────────

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        encounter: &Encounter,
        known_names: &KnownNames,
    ) {
        let block = theme::block_focused("Initiative Tracker")
            .style(Style::default().bg(theme::BG_BASE).fg(theme::TEXT));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let v_chunks = Layout::vertical([
            Constraint::Length(2), // Round header
            Constraint::Min(5),    // Body
        ])
        .split(inner);

        self.render_round_header(frame, v_chunks[0], encounter);

        let h_chunks = Layout::horizontal([
            Constraint::Length(34), // Entry form
            Constraint::Min(20),    // Initiative list
            Constraint::Length(36), // Status
        ])
        .split(v_chunks[1]);

        self.render_entry_form(frame, h_chunks[0], known_names);
        self.render_initiative_list(frame, h_chunks[1], encounter);
        render_status(frame, h_chunks[2], encounter.current_combatant());

        match self.mode {
            TrackerMode::Conditions => self.render_condition_picker(frame, inner, encounter),
            TrackerMode::ConfirmEnd => render_confirm_end(frame, inner, encounter.len()),
            TrackerMode::Browse | TrackerMode::Entry => {}
        }
    }

    fn render_round_header(&self, frame: &mut Frame, area: Rect, encounter: &Encounter) {
        let current_name = encounter
            .current_combatant()
            .map(|c| c.name.as_str())
            .unwrap_or("—");

        let line = Line::from(vec![
            Span::styled(format!(" Round {} ", encounter.round()), theme::title()),
            Span::styled("│ ", theme::dim()),
            Span::styled("Turn: ", theme::muted()),
            Span::styled(current_name.to_string(), theme::heading()),
        ]);

        let hints: &[(&str, &str)] = match self.mode {
            TrackerMode::Entry => &[
                ("Enter", ":add "),
                ("Tab", ":field "),
                ("↑↓", ":known names "),
                ("Esc", ":back"),
            ],
            _ => &[
                ("Space", ":next "),
                ("p", ":prev "),
                ("a", ":add "),
                ("c", ":cond "),
                ("d", ":remove "),
                ("E", ":end "),
                ("?", ":help"),
            ],
        };
        let hint = Line::from(
            hints
                .iter()
                .flat_map(|(key, label)| {
                    [
                        Span::styled(*key, theme::key_hint()),
                        Span::styled(*label, theme::dim()),
                    ]
                })
                .collect::<Vec<_>>(),
        );

        frame.render_widget(Paragraph::new(vec![line, hint]), area);
    }

    fn render_entry_form(&self, frame: &mut Frame, area: Rect, known_names: &KnownNames) {
        let editing = self.mode == TrackerMode::Entry;
        let block = if editing {
            theme::block_focused("Add Combatant")
        } else {
            theme::block_default("Add Combatant")
        }
        .style(Style::default().bg(theme::BG_SURFACE));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Initiative
            Constraint::Length(2), // Type selector
            Constraint::Min(1),    // Known names
        ])
        .split(inner);

        self.render_entry_field(
            frame,
            chunks[0],
            "Name",
            &self.entry_name,
            editing && self.entry_field == EntryField::Name,
        );
        self.render_entry_field(
            frame,
            chunks[1],
            "Initiative",
            &self.entry_init,
            editing && self.entry_field == EntryField::Initiative,
        );

        let type_focused = editing && self.entry_field == EntryField::Type;
        let type_spans: Vec<Span> = [
            ("P", CombatantType::Player),
            ("M", CombatantType::Monster),
        ]
        .into_iter()
        .flat_map(|(key, combatant_type)| {
            let style = if self.entry_type == combatant_type {
                Style::default()
                    .fg(theme::type_color(combatant_type))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else if type_focused {
                Style::default().fg(theme::TEXT)
            } else {
                theme::dim()
            };
            [
                Span::styled(format!(" [{key}]"), theme::key_hint()),
                Span::styled(format!("{} ", combatant_type.label()), style),
            ]
        })
        .collect();
        frame.render_widget(Paragraph::new(Line::from(type_spans)), chunks[2]);

        let mut lines = vec![Line::styled(" Known Names", theme::heading())];
        if known_names.is_empty() {
            lines.push(Line::styled("  none yet", theme::dim()));
        }
        lines.extend(known_names.iter().enumerate().map(|(i, name)| {
            let style = if editing && self.name_cursor == Some(i) {
                theme::highlight()
            } else {
                theme::muted()
            };
            Line::styled(format!("  {name}"), style)
        }));
        frame.render_widget(Paragraph::new(lines), chunks[3]);
    }

    fn render_entry_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        label: &str,
        buf: &InputBuffer,
        focused: bool,
    ) {
        let block = Block::default()
            .title(format!(" {label} "))
            .borders(Borders::ALL)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text = buf.text();
        let (display, style) = if text.is_empty() {
            (label, theme::dim())
        } else {
            (text, Style::default().fg(theme::TEXT))
        };
        frame.render_widget(Paragraph::new(Span::styled(display.to_string(), style)), inner);

        if focused {
            frame.set_cursor_position((inner.x + buf.cursor_column() as u16, inner.y));
        }
    }

    fn render_initiative_list(&self, frame: &mut Frame, area: Rect, encounter: &Encounter) {
        let block = theme::block_focused("Initiative");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if encounter.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" No combatants yet. Press a to add.", theme::dim())),
                inner,
            );
            return;
        }

        let name_width = (inner.width as usize).saturating_sub(10);
        let lines: Vec<Line> = encounter
            .combatants()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let is_current = i == encounter.turn_index();
                let is_selected = i == self.selected_idx;

                let prefix = if is_selected { "▸" } else { " " };
                let row_style = if is_current {
                    theme::current_turn()
                } else if is_selected {
                    theme::highlight().bg(theme::BG_ROW)
                } else {
                    Style::default().fg(theme::TEXT).bg(theme::BG_ROW)
                };

                let mut spans = vec![
                    Span::styled(prefix, theme::highlight()),
                    Span::styled(
                        format!("{} ", theme::type_icon(c.combatant_type)),
                        Style::default().fg(theme::type_color(c.combatant_type)),
                    ),
                    Span::styled(format!("{:>3} ", c.initiative), theme::heading()),
                    Span::raw(truncate_name(&c.name, name_width)),
                ];
                let conditions = condition_abbreviations(c);
                if !conditions.is_empty() {
                    spans.push(Span::styled(
                        format!(" {conditions}"),
                        Style::default().fg(theme::WARNING),
                    ));
                }

                Line::from(spans).style(row_style)
            })
            .collect();

        let visible = inner.height as usize;
        let scroll = self.selected_idx.saturating_sub(visible.saturating_sub(1));
        frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), inner);
    }

    fn render_condition_picker(&self, frame: &mut Frame, area: Rect, encounter: &Encounter) {
        let Some(target) = encounter.combatants().get(self.selected_idx) else {
            return;
        };

        let height = (Condition::ALL.len() as u16 + 6).min(area.height.saturating_sub(2));
        let width = 52.min(area.width.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let modal = Rect::new(x, y, width, height);

        frame.render_widget(Clear, modal);
        let block = Block::default()
            .title(format!(" Conditions: {} ", target.name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::WARNING))
            .style(Style::default().bg(theme::BG_SURFACE));

        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(4)]).split(inner);

        let lines: Vec<Line> = Condition::ALL
            .iter()
            .enumerate()
            .map(|(i, condition)| {
                let is_sel = i == self.condition_cursor;
                let mark = if target.has_condition(*condition) { "[x]" } else { "[ ]" };
                let prefix = if is_sel { "▸" } else { " " };
                let style = if is_sel {
                    theme::highlight()
                } else {
                    Style::default().fg(theme::TEXT)
                };
                Line::styled(format!("{prefix}{mark} {condition}"), style)
            })
            .collect();

        let visible = chunks[0].height as usize;
        let scroll = self.condition_cursor.saturating_sub(visible.saturating_sub(1));
        frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), chunks[0]);

        let description = Condition::ALL[self.condition_cursor].description();
        frame.render_widget(
            Paragraph::new(Span::styled(description, theme::muted()))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::TOP)
                        .border_style(theme::border_default()),
                ),
            chunks[1],
        );
    }
}

// ============================================================================
// Free helpers
// ============================================================================

/// Edit `buf` for a text key. Returns true when the content may have changed.
fn edit_buffer(buf: &mut InputBuffer, code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            buf.insert_char(c);
            true
        }
        KeyCode::Backspace => {
            buf.backspace();
            true
        }
        KeyCode::Delete => {
            buf.delete();
            true
        }
        KeyCode::Left => {
            buf.move_left();
            false
        }
        KeyCode::Right => {
            buf.move_right();
            false
        }
        KeyCode::Home => {
            buf.move_home();
            false
        }
        KeyCode::End => {
            buf.move_end();
            false
        }
        _ => false,
    }
}

fn render_status(frame: &mut Frame, area: Rect, current: Option<&Combatant>) {
    let block = theme::block_default("Status");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(c) = current else {
        frame.render_widget(
            Paragraph::new(Span::styled("No character selected.", theme::dim()))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", theme::type_icon(c.combatant_type)),
                Style::default().fg(theme::type_color(c.combatant_type)),
            ),
            Span::styled(c.name.clone(), theme::title()),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Type:       ", theme::muted()),
            Span::styled(
                c.combatant_type.label(),
                Style::default().fg(theme::type_color(c.combatant_type)),
            ),
        ]),
        Line::from(vec![
            Span::styled("Initiative: ", theme::muted()),
            Span::raw(c.initiative.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Conditions: ", theme::muted()),
            Span::raw(c.conditions.summary()),
        ]),
    ];
    if !c.conditions.is_empty() {
        lines.push(Line::raw(""));
        for condition in c.conditions.iter() {
            lines.push(Line::styled(format!("{condition}"), theme::heading()));
            lines.push(Line::styled(condition.description(), theme::muted()));
        }
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn render_confirm_end(frame: &mut Frame, area: Rect, count: usize) {
    let width = 44.min(area.width.saturating_sub(4));
    let height = 5.min(area.height);
    let modal = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, modal);
    let block = Block::default()
        .title(" End Encounter ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ERROR))
        .style(Style::default().bg(theme::BG_SURFACE));

    let lines = vec![
        Line::raw(format!("Clear all {count} combatants?")),
        Line::from(vec![
            Span::styled("y", theme::key_hint()),
            Span::styled(":end  ", theme::dim()),
            Span::styled("n", theme::key_hint()),
            Span::styled(":keep", theme::dim()),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        modal,
    );
}

fn condition_abbreviations(c: &Combatant) -> String {
    c.conditions
        .iter()
        .map(Condition::abbreviation)
        .collect::<Vec<_>>()
        .join(",")
}

fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else if max > 1 {
        let mut out: String = name.chars().take(max - 1).collect();
        out.push('…');
        out
    } else {
        name.chars().take(max).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::core::session::TurnAnchor;
    use crate::core::storage::{MemoryStore, SnapshotRepository};

    type MemoryTracker = EncounterTracker<SnapshotRepository<MemoryStore>>;

    fn tracker() -> MemoryTracker {
        EncounterTracker::open(
            SnapshotRepository::new(MemoryStore::new()),
            TurnAnchor::Combatant,
        )
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn press(
        state: &mut TrackerViewState,
        tracker: &mut MemoryTracker,
        code: KeyCode,
    ) -> Option<TrackerResult> {
        state.handle_input(&key(code), tracker)
    }

    fn type_text(state: &mut TrackerViewState, tracker: &mut MemoryTracker, text: &str) {
        for c in text.chars() {
            press(state, tracker, KeyCode::Char(c));
        }
    }

    /// Add through the form the way a user would, then return to the list.
    fn add(
        state: &mut TrackerViewState,
        tracker: &mut MemoryTracker,
        name: &str,
        init: &str,
        monster: bool,
    ) {
        press(state, tracker, KeyCode::Char('a'));
        type_text(state, tracker, name);
        press(state, tracker, KeyCode::Tab);
        type_text(state, tracker, init);
        if monster {
            press(state, tracker, KeyCode::Tab);
            press(state, tracker, KeyCode::Char('m'));
        }
        press(state, tracker, KeyCode::Enter);
        press(state, tracker, KeyCode::Esc);
    }

    fn setup_three() -> (TrackerViewState, MemoryTracker) {
        let mut state = TrackerViewState::new();
        let mut tracker = tracker();
        add(&mut state, &mut tracker, "Zeth", "20", true);
        add(&mut state, &mut tracker, "Aria", "15", false);
        add(&mut state, &mut tracker, "Grog", "15", true);
        (state, tracker)
    }

    fn names(tracker: &MemoryTracker) -> Vec<&str> {
        tracker
            .encounter()
            .combatants()
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    #[test]
    fn test_initial_mode() {
        let state = TrackerViewState::new();
        assert_eq!(state.mode(), TrackerMode::Browse);
        assert!(!state.is_editing());
    }

    #[test]
    fn test_add_through_form() {
        let (state, tracker) = setup_three();
        assert_eq!(state.mode(), TrackerMode::Browse);
        assert_eq!(names(&tracker), ["Zeth", "Aria", "Grog"]);
        assert_eq!(
            tracker.encounter().combatants()[0].combatant_type,
            CombatantType::Monster
        );
        assert_eq!(tracker.known_names().iter().collect::<Vec<_>>(), ["Aria"]);
    }

    #[test]
    fn test_invalid_submit_keeps_form() {
        let mut state = TrackerViewState::new();
        let mut tracker = tracker();
        press(&mut state, &mut tracker, KeyCode::Char('a'));
        type_text(&mut state, &mut tracker, "Bob");
        press(&mut state, &mut tracker, KeyCode::Tab);
        type_text(&mut state, &mut tracker, "abc");
        press(&mut state, &mut tracker, KeyCode::Enter);

        assert!(tracker.encounter().is_empty());
        assert!(state.is_editing());
        assert_eq!(state.entry_name.text(), "Bob");
    }

    #[test]
    fn test_form_resets_type_after_add() {
        let mut state = TrackerViewState::new();
        let mut tracker = tracker();
        press(&mut state, &mut tracker, KeyCode::Char('a'));
        type_text(&mut state, &mut tracker, "Grog");
        press(&mut state, &mut tracker, KeyCode::Tab);
        type_text(&mut state, &mut tracker, "12");
        press(&mut state, &mut tracker, KeyCode::Tab);
        press(&mut state, &mut tracker, KeyCode::Char(' '));
        assert_eq!(state.entry_type, CombatantType::Monster);
        press(&mut state, &mut tracker, KeyCode::Enter);

        assert_eq!(state.entry_type, CombatantType::Player);
        assert_eq!(state.entry_field, EntryField::Name);
        assert!(state.entry_name.text().is_empty());
        assert!(tracker.known_names().is_empty());
    }

    #[test]
    fn test_known_names_cycle() {
        let mut state = TrackerViewState::new();
        let mut tracker = tracker();
        add(&mut state, &mut tracker, "Aria", "15", false);
        add(&mut state, &mut tracker, "Bryn", "12", false);

        press(&mut state, &mut tracker, KeyCode::Char('a'));
        press(&mut state, &mut tracker, KeyCode::Down);
        assert_eq!(state.entry_name.text(), "Aria");
        press(&mut state, &mut tracker, KeyCode::Down);
        assert_eq!(state.entry_name.text(), "Bryn");
        press(&mut state, &mut tracker, KeyCode::Down);
        assert_eq!(state.entry_name.text(), "Aria");
        press(&mut state, &mut tracker, KeyCode::Up);
        assert_eq!(state.entry_name.text(), "Bryn");

        press(&mut state, &mut tracker, KeyCode::Char('2'));
        assert_eq!(state.name_cursor, None);
        assert_eq!(state.entry_name.text(), "Bryn2");
    }

    #[test]
    fn test_next_turn_notifies_new_round() {
        let (mut state, mut tracker) = setup_three();

        assert!(matches!(
            press(&mut state, &mut tracker, KeyCode::Char(' ')),
            Some(TrackerResult::Consumed)
        ));
        press(&mut state, &mut tracker, KeyCode::Char('n'));
        assert_eq!(tracker.encounter().turn_index(), 2);
        assert_eq!(state.selected_index(), 2);

        let result = press(&mut state, &mut tracker, KeyCode::Char(' '));
        match result {
            Some(TrackerResult::Notify(n)) => assert_eq!(n.message, "Round 2 begins"),
            other => panic!("expected notification, got {other:?}"),
        }
        assert_eq!(tracker.encounter().round(), 2);

        press(&mut state, &mut tracker, KeyCode::Char('p'));
        assert_eq!(tracker.encounter().turn_index(), 2);
        assert_eq!(tracker.encounter().round(), 1);
    }

    #[test]
    fn test_selection_wraps() {
        let (mut state, mut tracker) = setup_three();
        state.selected_idx = 0;
        for _ in 0..3 {
            press(&mut state, &mut tracker, KeyCode::Char('j'));
        }
        assert_eq!(state.selected_index(), 0);
        press(&mut state, &mut tracker, KeyCode::Char('k'));
        assert_eq!(state.selected_index(), 2);
    }

    #[test]
    fn test_remove_selected() {
        let (mut state, mut tracker) = setup_three();
        state.selected_idx = 2;
        let result = press(&mut state, &mut tracker, KeyCode::Char('d'));
        match result {
            Some(TrackerResult::Notify(n)) => assert_eq!(n.message, "Removed Grog"),
            other => panic!("expected notification, got {other:?}"),
        }
        assert_eq!(names(&tracker), ["Zeth", "Aria"]);
        assert_eq!(state.selected_index(), 1);
    }

    #[test]
    fn test_condition_picker_toggles_selected() {
        let (mut state, mut tracker) = setup_three();
        state.selected_idx = 1;
        press(&mut state, &mut tracker, KeyCode::Char('c'));
        assert_eq!(state.mode(), TrackerMode::Conditions);

        press(&mut state, &mut tracker, KeyCode::Down);
        press(&mut state, &mut tracker, KeyCode::Enter);
        assert!(tracker.encounter().combatants()[1].has_condition(Condition::Charmed));

        press(&mut state, &mut tracker, KeyCode::Char(' '));
        assert!(tracker.encounter().combatants()[1].conditions.is_empty());

        press(&mut state, &mut tracker, KeyCode::Esc);
        assert_eq!(state.mode(), TrackerMode::Browse);
    }

    #[test]
    fn test_condition_picker_needs_combatant() {
        let mut state = TrackerViewState::new();
        let mut tracker = tracker();
        press(&mut state, &mut tracker, KeyCode::Char('c'));
        assert_eq!(state.mode(), TrackerMode::Browse);
    }

    #[test]
    fn test_end_encounter_asks_first() {
        let (mut state, mut tracker) = setup_three();
        press(&mut state, &mut tracker, KeyCode::Char('E'));
        assert_eq!(state.mode(), TrackerMode::ConfirmEnd);
        press(&mut state, &mut tracker, KeyCode::Char('n'));
        assert_eq!(tracker.encounter().len(), 3);

        press(&mut state, &mut tracker, KeyCode::Char('E'));
        let result = press(&mut state, &mut tracker, KeyCode::Char('y'));
        assert!(matches!(result, Some(TrackerResult::Notify(_))));
        assert!(tracker.encounter().is_empty());
        assert_eq!(tracker.encounter().round(), 1);
        assert_eq!(tracker.known_names().len(), 1);
        assert_eq!(state.mode(), TrackerMode::Browse);
    }

    #[test]
    fn test_global_keys_fall_through_in_browse() {
        let mut state = TrackerViewState::new();
        let mut tracker = tracker();
        assert!(press(&mut state, &mut tracker, KeyCode::Char('q')).is_none());
        assert!(press(&mut state, &mut tracker, KeyCode::Char('?')).is_none());

        press(&mut state, &mut tracker, KeyCode::Char('a'));
        assert!(press(&mut state, &mut tracker, KeyCode::Char('q')).is_some());
        assert_eq!(state.entry_name.text(), "q");
    }

    #[test]
    fn test_entry_field_cycling() {
        assert_eq!(EntryField::Name.next(), EntryField::Initiative);
        assert_eq!(EntryField::Initiative.next(), EntryField::Type);
        assert_eq!(EntryField::Type.next(), EntryField::Name);
        assert_eq!(EntryField::Name.prev(), EntryField::Type);
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Goblin", 10), "Goblin");
        assert_eq!(truncate_name("Goblin King of the Mountain", 10), "Goblin Ki…");
        assert_eq!(truncate_name("Zoë", 2), "Z…");
    }

    fn rendered(state: &TrackerViewState, tracker: &MemoryTracker) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|frame| {
                state.render(frame, frame.area(), tracker.encounter(), tracker.known_names())
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_empty_status() {
        let state = TrackerViewState::new();
        let tracker = tracker();
        let screen = rendered(&state, &tracker);
        assert!(screen.contains("Round 1"));
        assert!(screen.contains("No character selected."));
    }

    #[test]
    fn test_render_current_turn_status() {
        let (state, tracker) = setup_three();
        let screen = rendered(&state, &tracker);
        assert!(screen.contains("Turn: Zeth"));
        assert!(screen.contains("Initiative: 20"));
        assert!(!screen.contains("No character selected."));
    }
}
