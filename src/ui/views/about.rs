use crate::api::Post;
use crate::context::Context;
use crate::hooks::use_posts;
use crate::query::Query;
use crate::ui::components::{Button, ButtonGroup, ButtonVariant, KeyResult};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{preview_lines, truncate};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::Route;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap};
use std::sync::Arc;

const REFRESH: usize = 0;
const BACK: usize = 1;
const BODY_LINES: usize = 3;
const LOAD_ERROR: &str = "Error loading posts. Please check your internet connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AboutAction {
  Refresh,
  Home,
}

/// Latest posts from the API, served through the query cache
pub struct AboutView {
  query: Query<Vec<Post>>,
  buttons: ButtonGroup<AboutAction>,
  list_state: ListState,
}

impl AboutView {
  pub fn new(ctx: &Context) -> Self {
    let query = use_posts(&ctx.queries, &ctx.api);
    let buttons = ButtonGroup::new(vec![
      Button::new("Refresh Posts", AboutAction::Refresh).hotkey('r'),
      Button::new("← Back to Home", AboutAction::Home)
        .variant(ButtonVariant::Secondary)
        .hotkey('h'),
    ]);

    let mut view = Self {
      query,
      buttons,
      list_state: ListState::default(),
    };
    view.sync_refresh_button();
    view
  }

  /// Whether the refresh button currently ignores presses
  pub fn refresh_disabled(&self) -> bool {
    self.buttons.buttons()[REFRESH].is_disabled()
  }

  fn sync_refresh_button(&mut self) {
    let fetching = self.query.is_fetching();
    if let Some(button) = self.buttons.button_mut(REFRESH) {
      button.set_label(if fetching { "Refreshing..." } else { "Refresh Posts" });
      button.set_disabled(fetching);
    }
  }

  fn posts(&self) -> Option<Arc<Vec<Post>>> {
    self.query.data()
  }

  fn render_info(&self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(" About Page ")
      .borders(Borders::ALL)
      .border_type(BorderType::Rounded)
      .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Min(1), Constraint::Length(1)])
      .split(inner);

    let text = Paragraph::new(
      "This page fetches posts through the query cache. Cached posts stay \
       visible while a refresh runs in the background.",
    )
    .wrap(Wrap { trim: true })
    .style(Style::default().fg(Color::Gray));
    frame.render_widget(text, chunks[0]);

    let focused = self.buttons.focused() == Some(REFRESH);
    self.buttons.buttons()[REFRESH].render(frame, chunks[1], focused);
  }

  fn render_status(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let block = Block::default()
      .borders(Borders::ALL)
      .border_type(BorderType::Rounded)
      .border_style(Style::default().fg(color));
    let paragraph = Paragraph::new(message)
      .alignment(Alignment::Center)
      .wrap(Wrap { trim: true })
      .style(Style::default().fg(color).bold())
      .block(block);
    frame.render_widget(paragraph, area);
  }

  fn render_posts(&mut self, frame: &mut Frame, area: Rect) {
    let result = self.query.result();

    if result.is_loading() {
      Self::render_status(frame, area, "Loading posts...", Color::Blue);
      return;
    }

    if result.is_error() && result.data.is_none() {
      Self::render_status(frame, area, LOAD_ERROR, Color::Red);
      return;
    }

    let posts = match &result.data {
      Some(posts) => Arc::clone(posts),
      None => return,
    };

    // A failed refresh keeps the cached list under the error banner
    let area = if result.is_error() {
      let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);
      Self::render_status(frame, chunks[0], LOAD_ERROR, Color::Red);
      chunks[1]
    } else {
      area
    };
    ensure_valid_selection(&mut self.list_state, posts.len());
    // Borders and highlight symbol
    let text_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = posts
      .iter()
      .map(|post| {
        let mut lines = vec![
          Line::from(Span::styled(
            format!("#{}", post.id),
            Style::default().fg(Color::Blue).bold(),
          )),
          Line::from(Span::styled(
            truncate(&post.title, text_width),
            Style::default().bold(),
          )),
        ];
        lines.extend(
          preview_lines(&post.body, BODY_LINES)
            .into_iter()
            .map(|l| {
              Line::from(Span::styled(
                truncate(&l, text_width),
                Style::default().fg(Color::Gray),
              ))
            }),
        );
        lines.push(Line::default());
        ListItem::new(lines)
      })
      .collect();

    let title = if result.is_fetching {
      " Latest Posts (cached, refreshing) "
    } else if result.is_error() {
      " Latest Posts (cached, refresh failed) "
    } else {
      " Latest Posts (cached) "
    };
    let block = Block::default()
      .title(title)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray));

    let list = List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::DarkGray))
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  // Key handling helpers for or_else chain pattern
  fn handle_buttons(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match self.buttons.handle_key(key) {
      KeyResult::Event(AboutAction::Refresh) => {
        self.query.refetch();
        self.sync_refresh_button();
        Some(ViewAction::None)
      }
      KeyResult::Event(AboutAction::Home) => Some(ViewAction::Navigate(Route::Home)),
      KeyResult::Handled => Some(ViewAction::None),
      KeyResult::NotHandled => None,
    }
  }

  fn handle_navigation(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
        Some(ViewAction::None)
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
        Some(ViewAction::None)
      }
      _ => None,
    }
  }

  fn handle_actions(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Enter => {
        let posts = self.posts()?;
        let post = posts.get(self.list_state.selected()?)?;
        Some(ViewAction::Navigate(Route::User(post.user_id)))
      }
      KeyCode::Char('q') | KeyCode::Esc => Some(ViewAction::Pop),
      _ => None,
    }
  }
}

impl View for AboutView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    self
      .handle_buttons(key)
      .or_else(|| self.handle_navigation(key))
      .or_else(|| self.handle_actions(key))
      .unwrap_or(ViewAction::None)
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.sync_refresh_button();

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(6), // Info card with refresh button
        Constraint::Min(3),    // Posts
        Constraint::Length(1), // Back button
      ])
      .split(area);

    self.render_info(frame, chunks[0]);
    self.render_posts(frame, chunks[1]);

    let focused = self.buttons.focused() == Some(BACK);
    self.buttons.buttons()[BACK].render(frame, chunks[2], focused);
  }

  fn route(&self) -> Route {
    Route::About
  }

  fn breadcrumb_label(&self) -> String {
    "About".to_string()
  }

  fn tick(&mut self) {
    if self.query.poll() {
      self.sync_refresh_button();
    }
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command").with_priority(10),
      Shortcut::new("r", "refresh").with_priority(20),
      Shortcut::new("j/k", "select").with_priority(30),
      Shortcut::new("enter", "author").with_priority(40),
      Shortcut::new("h", "home").with_priority(50),
      Shortcut::new("q", "back").with_priority(90),
    ]
  }
}
