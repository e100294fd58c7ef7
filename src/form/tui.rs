//! Terminal rendering of the stress form.
//!
//! Keys: `Tab` switches tabs, `q` or `Ctrl+C` quits.
//! Questionnaire: arrows move, `y`/`n` or `Space` choose, `Enter` submits.
//! Analysis: arrows pick a CSV file, `Enter` loads it, `c` computes, `r` rescans.

use super::{csv_files_in, FormController, Tab};
use crate::classifier::Answer;
use crate::config::ReportConfig;
use crate::report::palette::coolwarm;
use crate::stats::GroupedCorrelation;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::warn;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

const LABEL_WIDTH: usize = 38;
const CELL_WIDTH: usize = 8;

pub struct FormApp {
    controller: FormController,
    dir: PathBuf,
    files: Vec<PathBuf>,
    file_cursor: usize,
    question_cursor: usize,
    quit: bool,
}

impl FormApp {
    pub fn new(config: ReportConfig, dir: PathBuf) -> Self {
        let mut app = Self {
            controller: FormController::new(config),
            dir,
            files: Vec::new(),
            file_cursor: 0,
            question_cursor: 0,
            quit: false,
        };
        app.rescan();
        app
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn rescan(&mut self) {
        match csv_files_in(&self.dir) {
            Ok(files) => self.files = files,
            Err(err) => {
                warn!("cannot list {:?}: {err}", self.dir);
                self.files.clear();
            }
        }
        self.file_cursor = self.file_cursor.min(self.files.len().saturating_sub(1));
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }
        if self.controller.dialog().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.controller.dismiss_dialog();
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Tab | KeyCode::BackTab => self.controller.tab = self.controller.tab.next(),
            _ => match self.controller.tab {
                Tab::Predict => self.handle_predict_key(key.code),
                Tab::Analyze => self.handle_analyze_key(key.code).await,
            },
        }
    }

    fn handle_predict_key(&mut self, code: KeyCode) {
        let last = self.controller.questionnaire.questions().len() - 1;
        match code {
            KeyCode::Up => self.question_cursor = self.question_cursor.saturating_sub(1),
            KeyCode::Down => self.question_cursor = (self.question_cursor + 1).min(last),
            KeyCode::Char('y') | KeyCode::Left => {
                self.controller.questionnaire.set(self.question_cursor, Answer::Yes)
            }
            KeyCode::Char('n') | KeyCode::Right => {
                self.controller.questionnaire.set(self.question_cursor, Answer::No)
            }
            KeyCode::Char(' ') => self.controller.questionnaire.toggle(self.question_cursor),
            KeyCode::Enter => {
                self.controller.predict_stress_level();
            }
            _ => {}
        }
    }

    async fn handle_analyze_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.file_cursor = self.file_cursor.saturating_sub(1),
            KeyCode::Down => {
                self.file_cursor = (self.file_cursor + 1).min(self.files.len().saturating_sub(1))
            }
            KeyCode::Enter => {
                if let Some(path) = self.files.get(self.file_cursor).cloned() {
                    self.controller.load_csv_file(path);
                }
            }
            KeyCode::Char('r') => self.rescan(),
            KeyCode::Char('c') => self.controller.calculate_and_visualize().await,
            _ => {}
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(f.area());

        let titles = [Tab::Predict, Tab::Analyze].map(|t| Line::from(t.title()));
        let selected = match self.controller.tab {
            Tab::Predict => 0,
            Tab::Analyze => 1,
        };
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("Stress Level Analysis"))
            .select(selected)
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, chunks[0]);

        match self.controller.tab {
            Tab::Predict => self.render_predict(f, chunks[1]),
            Tab::Analyze => self.render_analyze(f, chunks[1]),
        }

        let help = match self.controller.tab {
            Tab::Predict => "↑/↓ question  y/n/space answer  enter calculate  tab switch  q quit",
            Tab::Analyze => "↑/↓ file  enter load  c calculate  r rescan  tab switch  q quit",
        };
        f.render_widget(
            Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
            chunks[2],
        );

        if let Some(dialog) = self.controller.dialog() {
            let area = centered_rect(60, 30, f.area());
            f.render_widget(Clear, area);
            f.render_widget(
                Paragraph::new(vec![
                    Line::from(dialog.message.as_str()),
                    Line::from(""),
                    Line::from(Span::styled("[Enter] OK", Style::default().fg(Color::DarkGray))),
                ])
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(dialog.title.as_str())
                        .border_style(Style::default().fg(Color::Red)),
                ),
                area,
            );
        }
    }

    fn render_predict(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(7), Constraint::Length(4)])
            .split(area);

        let questionnaire = &self.controller.questionnaire;
        let lines: Vec<Line> = questionnaire
            .questions()
            .iter()
            .zip(questionnaire.answers())
            .enumerate()
            .map(|(i, (question, answer))| {
                let radio = |choice: Answer| {
                    if *answer == choice {
                        format!("(•) {choice}")
                    } else {
                        format!("( ) {choice}")
                    }
                };
                let style = if i == self.question_cursor {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{question:<66}"), style),
                    Span::raw(format!("{}   {}", radio(Answer::Yes), radio(Answer::No))),
                ])
            })
            .collect();
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Questionnaire")),
            chunks[0],
        );

        f.render_widget(
            Paragraph::new(self.controller.readout())
                .block(Block::default().borders(Borders::ALL).title("Result")),
            chunks[1],
        );
    }

    fn render_analyze(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(8),
                Constraint::Min(4),
            ])
            .split(area);

        let selected = self
            .controller
            .selection()
            .map(|s| s.path().display().to_string())
            .unwrap_or_default();
        f.render_widget(
            Paragraph::new(format!("CSV File: {selected}"))
                .block(Block::default().borders(Borders::ALL).title("File Loading")),
            chunks[0],
        );

        let items: Vec<ListItem> = self
            .files
            .iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                ListItem::new(name)
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("CSV files in {}", self.dir.display())),
            )
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .highlight_symbol("▸ ");
        let mut state = ListState::default().with_selected(if self.files.is_empty() {
            None
        } else {
            Some(self.file_cursor)
        });
        f.render_stateful_widget(list, chunks[1], &mut state);

        let (title, lines) = match self.controller.outcome() {
            Some(outcome) => (
                format!(
                    "Correlation by Stress Level ({} respondents, heatmap: {})",
                    outcome.dataset.height(),
                    outcome.heatmap.display()
                ),
                correlation_lines(&outcome.correlation),
            ),
            None => (
                "Correlation by Stress Level".to_string(),
                vec![Line::from("Load a CSV file and press c to calculate stress levels.")],
            ),
        };
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
            chunks[2],
        );
    }
}

/// Correlation grid as text, each cell tinted with the heatmap colors.
pub fn correlation_lines(correlation: &GroupedCorrelation) -> Vec<Line<'static>> {
    let mut header = vec![Span::raw(" ".repeat(LABEL_WIDTH))];
    header.extend(correlation.variables.iter().map(|var| {
        let short: String = var.chars().take(CELL_WIDTH - 1).collect();
        Span::styled(
            format!("{short:>width$}", width = CELL_WIDTH),
            Style::default().add_modifier(Modifier::BOLD),
        )
    }));

    let mut lines = vec![Line::from(header)];
    for (label, row) in correlation.row_labels().into_iter().zip(correlation.stacked_rows()) {
        let label: String = label.chars().take(LABEL_WIDTH - 1).collect();
        let mut spans = vec![Span::raw(format!("{label:<width$}", width = LABEL_WIDTH))];
        spans.extend(row.iter().map(|value| match value {
            Some(v) => {
                let c = coolwarm(*v);
                Span::styled(
                    format!("{v:>width$.2}", width = CELL_WIDTH),
                    Style::default().bg(Color::Rgb(c.0, c.1, c.2)).fg(Color::Black),
                )
            }
            None => Span::raw(format!("{:>width$}", "", width = CELL_WIDTH)),
        }));
        lines.push(Line::from(spans));
    }
    lines
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Owns the terminal for the lifetime of the form.
pub struct FormTerminal {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: FormApp,
}

impl FormTerminal {
    pub fn new(app: FormApp) -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, app })
    }

    /// Event loop; actions run on this thread between redraws.
    pub async fn run(&mut self) -> Result<(), Box<dyn Error>> {
        while !self.app.should_quit() {
            self.terminal.draw(|f| self.app.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.app.handle_key(key).await;
                    }
                }
            }
        }

        self.cleanup()?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), Box<dyn Error>> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for FormTerminal {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
