//! Terminal front-end: history pane, chat scrollback, input line, status
//! line and a modal settings form.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, List, ListItem, Paragraph};
use ratatui::{DefaultTerminal, Frame};

use crate::core::ChatError;
use crate::session::ChatSession;
use crate::ui::surface::{project_history, DisplaySurface};

const STATUS_READY: &str = "Ready";
const STATUS_TYPING: &str = "Bot is typing...";
const STATUS_SETTINGS_SAVED: &str = "Settings updated.";
const STATUS_SETTINGS_INVALID: &str = "Invalid settings input.";

const TICK: Duration = Duration::from_millis(50);

const SETTINGS_LABELS: [&str; 3] = ["Max Length:", "Temperature:", "Top p:"];

/// Modal form for the three generation settings.
struct SettingsForm {
    fields: [String; 3],
    focus: usize,
}

impl SettingsForm {
    fn from_session(session: &ChatSession) -> Self {
        let params = session.params();
        Self {
            fields: [
                params.max_len.to_string(),
                params.temperature.to_string(),
                params.top_p.to_string(),
            ],
            focus: 0,
        }
    }

    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn prev_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }
}

/// The interactive chat application.
///
/// All conversation state lives in the [`ChatSession`]; the app only keeps
/// what the widgets need between frames. The left history pane is re-rendered
/// from the store after every completed turn; the right scrollback collects
/// lines as they happen.
pub struct ChatApp {
    session: ChatSession,
    input: String,
    transcript: Vec<String>,
    history: Vec<String>,
    status: String,
    settings: Option<SettingsForm>,
    should_quit: bool,
}

impl ChatApp {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session,
            input: String::new(),
            transcript: Vec::new(),
            history: Vec::new(),
            status: STATUS_READY.to_string(),
            settings: None,
            should_quit: false,
        }
    }

    /// Drive the UI until the user quits.
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == event::KeyEventKind::Press {
                        self.on_key(key);
                    }
                }
            }
            self.on_tick();
        }
        Ok(())
    }

    /// Drain the worker: append the reply or surface the failure.
    fn on_tick(&mut self) {
        if let Some(outcome) = self.session.poll_reply() {
            match outcome {
                Ok(turn) => {
                    self.transcript.append_line(&turn.display_line());
                    self.transcript.append_line("");
                    self.status = STATUS_READY.to_string();
                }
                Err(err) => {
                    self.transcript.append_line(&format!("[error] {err}"));
                    self.status = format!("Error: {err}");
                }
            }
            project_history(self.session.conversation(), &mut self.history);
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.settings.is_some() {
            self.on_settings_key(key);
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('s') if ctrl => {
                self.settings = Some(SettingsForm::from_session(&self.session));
            }
            KeyCode::Char('l') if ctrl => {
                if self.session.clear().is_ok() {
                    self.transcript.clear();
                    project_history(self.session.conversation(), &mut self.history);
                    self.status = STATUS_READY.to_string();
                }
            }
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !ctrl => self.input.push(c),
            _ => {}
        }
    }

    fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.input);
        match self.session.submit(&text) {
            Ok(()) => {
                if let Some(turn) = self.session.conversation().turns().last() {
                    self.transcript.append_line(&turn.display_line());
                }
                project_history(self.session.conversation(), &mut self.history);
                self.status = STATUS_TYPING.to_string();
            }
            // Blank input is ignored outright, no status change.
            Err(ChatError::EmptyInput) => {}
            Err(ChatError::Busy) => {
                self.input = text;
                self.status = STATUS_TYPING.to_string();
            }
            Err(err) => {
                self.input = text;
                self.status = format!("Error: {err}");
            }
        }
    }

    fn on_settings_key(&mut self, key: KeyEvent) {
        let Some(form) = self.settings.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.settings = None,
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Backspace => {
                form.fields[form.focus].pop();
            }
            KeyCode::Enter => {
                let [max_len, temperature, top_p] = form.fields.clone();
                let result = self.session.update_params(&max_len, &temperature, &top_p);
                self.status = match result {
                    Ok(()) => STATUS_SETTINGS_SAVED.to_string(),
                    Err(_) => STATUS_SETTINGS_INVALID.to_string(),
                };
                // The form closes either way; the status line carries the
                // verdict.
                self.settings = None;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.fields[form.focus].push(c);
            }
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [main_area, input_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [history_area, chat_area] =
            Layout::horizontal([Constraint::Percentage(30), Constraint::Min(1)]).areas(main_area);

        let history = List::new(
            self.history
                .iter()
                .map(|line| ListItem::new(line.as_str())),
        )
        .block(Block::bordered().title("History"));
        frame.render_widget(history, history_area);

        // Keep the scrollback pinned to the newest line.
        let visible = chat_area.height.saturating_sub(2) as usize;
        let start = self.transcript.len().saturating_sub(visible);
        let lines: Vec<Line> = self.transcript[start..]
            .iter()
            .map(|line| Line::from(line.as_str()))
            .collect();
        frame.render_widget(
            Paragraph::new(lines).block(Block::bordered().title("Chat")),
            chat_area,
        );

        frame.render_widget(
            Paragraph::new(self.input.as_str()).block(
                Block::bordered().title("Message (Enter send, Ctrl-S settings, Esc quit)"),
            ),
            input_area,
        );
        if self.settings.is_none() {
            frame.set_cursor_position((
                input_area.x + 1 + self.input.chars().count() as u16,
                input_area.y + 1,
            ));
        }

        frame.render_widget(Paragraph::new(self.status.as_str()), status_area);

        if let Some(form) = &self.settings {
            self.draw_settings(frame, form);
        }
    }

    fn draw_settings(&self, frame: &mut Frame, form: &SettingsForm) {
        let area = centered_rect(40, 7, frame.area());
        frame.render_widget(Clear, area);

        let focused = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line> = SETTINGS_LABELS
            .iter()
            .zip(form.fields.iter())
            .enumerate()
            .map(|(i, (label, value))| {
                let text = format!("{label} {value}");
                if i == form.focus {
                    Line::styled(text, focused)
                } else {
                    Line::from(text)
                }
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from("Enter save, Esc cancel, Tab next field"));

        frame.render_widget(
            Paragraph::new(lines).block(Block::bordered().title("Settings")),
            area,
        );
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
