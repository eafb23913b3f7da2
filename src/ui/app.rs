use std::time::Instant;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::controller::{Controller, NoticeKind};
use crate::models::{Book, View};

use super::helpers::{centered_rect, rating_stars, surface_error};

/// Footer space reserved for the notice and key hints.
const FOOTER_HEIGHT: u16 = 3;
/// Search and filter lines above the book list.
const HEADER_HEIGHT: u16 = 4;

/// Whether keystrokes go to the search line or to navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Searching,
}

fn notice_style(kind: NoticeKind) -> Style {
    match kind {
        NoticeKind::Success => Style::default().fg(Color::Green),
        NoticeKind::Error => Style::default().fg(Color::Red),
    }
}

/// Terminal-side state: the controller plus the list cursor and input mode.
pub struct App {
    controller: Controller,
    selected: usize,
    mode: Mode,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            selected: 0,
            mode: Mode::Normal,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Clear a success notice whose lifetime has run out.
    pub fn tick(&mut self, now: Instant) {
        self.controller.expire_notice(now);
    }

    /// Process one key press. Returns `Ok(true)` when the user asked to quit.
    /// Storage failures end up in the footer instead of the return value.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let outcome = if self.controller.detail().is_some() {
            self.handle_detail_key(code)
        } else {
            match self.mode {
                Mode::Searching => {
                    self.handle_search_key(code);
                    Ok(())
                }
                Mode::Normal => self.handle_normal_key(code, &mut exit),
            }
        };

        if let Err(err) = outcome {
            self.controller.report_error(surface_error(&err));
        }
        self.ensure_in_bounds();
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<()> {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Char('h') | KeyCode::Char('H') => self.switch_view(View::Home)?,
            KeyCode::Char('l') | KeyCode::Char('L') => self.switch_view(View::MyLibrary)?,
            KeyCode::Tab => {
                let next = match self.controller.view() {
                    View::Home => View::MyLibrary,
                    View::MyLibrary => View::Home,
                };
                self.switch_view(next)?;
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-5),
            KeyCode::PageDown => self.move_selection(5),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.listed_len().saturating_sub(1),
            _ => match self.controller.view() {
                View::Home => self.handle_home_key(code),
                View::MyLibrary => self.handle_library_key(code)?,
            },
        }
        Ok(())
    }

    fn handle_home_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('/') | KeyCode::Char('f') => {
                self.controller.clear_notice();
                self.mode = Mode::Searching;
            }
            KeyCode::Char('g') | KeyCode::Char('G') => {
                self.controller.cycle_genre();
                self.selected = 0;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.controller.cycle_min_rating();
                self.selected = 0;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.controller.clear_filters();
                self.selected = 0;
            }
            KeyCode::Enter => {
                if let Some(id) = self.current_book().map(|book| book.id) {
                    self.controller.open_details(id);
                } else {
                    self.controller.report_error("No book selected.");
                }
            }
            _ => {}
        }
    }

    fn handle_library_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('d') | KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(id) = self.current_book().map(|book| book.id) {
                    self.controller.remove_from_library(id)?;
                } else {
                    self.controller.report_error("No book selected to remove.");
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.current_book().map(|book| book.id) {
                    self.controller.open_details(id);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_detail_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Enter => {
                self.controller.add_selected_to_library()?;
            }
            KeyCode::Esc | KeyCode::Char('q') => self.controller.close_details(),
            _ => {}
        }
        Ok(())
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter => self.mode = Mode::Normal,
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Backspace => {
                let mut term = self.controller.criteria().term.clone();
                if term.pop().is_some() {
                    self.controller.set_search_term(term);
                    self.selected = 0;
                }
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                let mut term = self.controller.criteria().term.clone();
                term.push(ch);
                self.controller.set_search_term(term);
                self.selected = 0;
            }
            _ => {}
        }
    }

    fn switch_view(&mut self, view: View) -> Result<()> {
        if self.controller.view() != view {
            self.selected = 0;
        }
        self.controller.set_view(view)
    }

    fn current_book(&self) -> Option<&Book> {
        self.controller.listed_books().get(self.selected).copied()
    }

    fn listed_len(&self) -> usize {
        self.controller.listed_books().len()
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.listed_len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as isize + offset).clamp(0, len as isize - 1);
        self.selected = next as usize;
    }

    fn ensure_in_bounds(&mut self) {
        let len = self.listed_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_books(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if let Some(book) = self.controller.detail() {
            self.draw_details(frame, area, book);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let lines = match self.controller.view() {
            View::Home => {
                let criteria = self.controller.criteria();
                let cursor = if self.mode == Mode::Searching { "_" } else { "" };
                let search_style = if self.mode == Mode::Searching {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                vec![
                    Line::from(vec![
                        Span::raw("Search by title, author, or genre: "),
                        Span::styled(format!("{}{cursor}", criteria.term), search_style),
                    ]),
                    Line::from(format!(
                        "Genre: {}    Rating: {}",
                        criteria.genre.as_deref().unwrap_or("Any"),
                        rating_stars(criteria.min_rating)
                    )),
                ]
            }
            View::MyLibrary => vec![Line::from(format!(
                "{} book(s) kept",
                self.controller.library().len()
            ))],
        };

        let title = match self.controller.view() {
            View::Home => "Discover Your Next Favorite Book",
            View::MyLibrary => "My Library",
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_books(&self, frame: &mut Frame, area: Rect) {
        let books = self.controller.listed_books();
        if books.is_empty() {
            let paragraph = Paragraph::new(self.controller.empty_message())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = books
            .iter()
            .map(|book| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        book.display_title(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("  Genre: {}  Rating: {}", book.genre, book.rating)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_details(&self, frame: &mut Frame, area: Rect, book: &Book) {
        let popup = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup);

        let mut lines = vec![
            Line::from(format!("Author: {}", book.author)),
            Line::from(format!("Genre: {}", book.genre)),
            Line::from(format!("Rating: {}", book.rating)),
            Line::from(format!("Publication Year: {}", book.publication_year)),
            Line::from(""),
            Line::from(book.description.clone()),
            Line::from(""),
        ];
        if self.controller.library().contains(book.id) {
            lines.push(Line::from("Already in your library.   Esc: close"));
        } else {
            lines.push(Line::from("a: Add to Library   Esc: close"));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(book.title.clone());
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(notice) = self.controller.notice() {
            Line::from(vec![Span::styled(notice.text.clone(), notice_style(notice.kind))])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let text = if self.controller.detail().is_some() {
            "a: add to library | Esc: close"
        } else if self.mode == Mode::Searching {
            "type to search | Backspace: delete | Enter/Esc: done"
        } else {
            match self.controller.view() {
                View::Home => {
                    "/: search | g: genre | r: rating | c: clear | Enter: details | l: library | q: quit"
                }
                View::MyLibrary => "d: remove | Enter: details | h: home | q: quit",
            }
        };
        Line::from(text)
    }
}
