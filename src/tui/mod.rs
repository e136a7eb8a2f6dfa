//! Ratatui-based terminal form.
//!
//! The form collects borrower inputs, shows the derived loan-to-income ratio,
//! and on "Calculate Risk" posts the payload to the scoring service and renders
//! the answer (or the error) in the result panel.

use std::io;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::client::{Outcome, ScoringClient};
use crate::error::AppError;
use crate::form::{Field, FormState};

/// Start the form.
pub fn run() -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(ScoringClient::new());
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    form: FormState,
    selected: usize,
    /// Text buffer while a numeric field is being typed into.
    editing: Option<String>,
    status: String,
    client: ScoringClient,
    result: Option<(Outcome, DateTime<Local>)>,
}

impl App {
    fn new(client: ScoringClient) -> Self {
        Self {
            form: FormState::default(),
            selected: 0,
            editing: None,
            status: format!("Service: {}", client.base_url()),
            client,
            result: None,
        }
    }

    fn field(&self) -> Field {
        Field::ALL[self.selected]
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Tab => {
                if self.selected + 1 < Field::ALL.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Left => self.form.adjust(self.field(), -1),
            KeyCode::Right => self.form.adjust(self.field(), 1),
            KeyCode::Enter => match self.field() {
                Field::Submit => self.submit(),
                f if f.is_numeric() => {
                    self.editing = Some(String::new());
                    self.status = format!("Editing {}. Enter to apply, Esc to cancel.", f.label());
                }
                f => self.form.adjust(f, 1),
            },
            KeyCode::Char('c') => self.submit(),
            _ => {}
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let Some(buf) = self.editing.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let text = buf.clone();
                self.editing = None;
                let field = self.field();
                if text.trim().is_empty() {
                    self.status = "Edit canceled.".to_string();
                    return;
                }
                self.status = match self.form.set_from_text(field, &text) {
                    Ok(v) => format!("{}: {v:.0}", field.label()),
                    Err(e) => e,
                };
            }
            KeyCode::Backspace => {
                buf.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '.' || c == ',' {
                    buf.push(c);
                }
            }
            _ => {}
        }
    }

    fn submit(&mut self) {
        let payload = self.form.to_payload();
        let outcome = self.client.submit(&payload);
        self.status = if outcome.is_success() {
            "Prediction received.".to_string()
        } else {
            "Request failed.".to_string()
        };
        self.result = Some((outcome, Local::now()));
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("Credit Risk Modelling", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" | loan default prediction"),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_result(frame, chunks[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let highlight = Style::default().fg(Color::Black).bg(Color::White);
        let mut lines: Vec<Line> = Vec::with_capacity(Field::ALL.len() + 2);

        for (idx, field) in Field::ALL.iter().copied().enumerate() {
            let selected = idx == self.selected;
            let marker = if selected { "» " } else { "  " };

            let line = if field == Field::Submit {
                Line::from(Span::styled(
                    format!("{marker}[ {} ]", field.label()),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ))
            } else {
                let value = match (&self.editing, selected) {
                    (Some(buf), true) => format!("{buf}_"),
                    _ => self.form.display_value(field),
                };
                let hint = if field.is_numeric() { "" } else { "  ◂ ▸" };
                Line::from(format!("{marker}{:<26}{value}{hint}", field.label()))
            };
            lines.push(if selected { line.style(highlight) } else { line });

            if field == Field::LoanAmount {
                lines.push(Line::from(Span::styled(
                    format!("  {:<26}{:.2}", "Loan to Income Ratio:", self.form.loan_to_income()),
                    Style::default().fg(Color::Gray),
                )));
            }
        }

        let unflagged = self.form.unflagged_selections();
        if !unflagged.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  note: {} has no model flag; sent as all false", unflagged.join(", ")),
                Style::default().fg(Color::DarkGray),
            )));
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Borrower").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Result").borders(Borders::ALL);

        let Some((outcome, at)) = &self.result else {
            let msg = Paragraph::new("Press c (or Enter on Calculate Risk) to score.")
                .style(Style::default().fg(Color::Gray))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let mut lines: Vec<Line> = Vec::new();
        match outcome {
            Outcome::Success(_) => {
                let texts = outcome.lines();
                let styles = [
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    Style::default().fg(Color::Cyan),
                ];
                for (text, style) in texts.into_iter().zip(styles) {
                    lines.push(Line::from(Span::styled(text, style)));
                }
            }
            _ => {
                for text in outcome.lines() {
                    lines.push(Line::from(Span::styled(text, Style::default().fg(Color::Red))));
                }
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("at {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        )));

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit  c calculate  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
