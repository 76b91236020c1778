use crate::api::User;
use crate::context::Context;
use crate::hooks::use_user;
use crate::query::Query;
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::Route;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tracing::warn;

const LOAD_ERROR: &str = "Error loading user. Please check your internet connection.";

/// Details of one user, the author of a post
pub struct UserView {
  user_id: u64,
  query: Query<User>,
}

impl UserView {
  pub fn new(ctx: &Context, user_id: u64) -> Self {
    Self {
      user_id,
      query: use_user(&ctx.queries, &ctx.api, user_id),
    }
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect) {
    let result = self.query.result();

    let title = if result.is_loading() {
      format!(" User #{} (loading...) ", self.user_id)
    } else if result.is_fetching {
      format!(" User #{} (refreshing...) ", self.user_id)
    } else {
      format!(" User #{} ", self.user_id)
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if result.is_loading() {
      let paragraph = Paragraph::new("Loading user...").style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
      return;
    }

    let user = match (&result.data, &result.error) {
      (Some(user), _) => user,
      (None, Some(_)) => {
        let paragraph = Paragraph::new(format!("{}\n\nPress 'r' to retry.", LOAD_ERROR))
          .wrap(Wrap { trim: true })
          .style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, inner);
        return;
      }
      (None, None) => return,
    };

    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
      Line::from(vec![
        Span::styled("Name:  ", label),
        Span::styled(user.name.clone(), Style::default().bold()),
      ]),
      Line::from(vec![
        Span::styled("Email: ", label),
        Span::styled(user.email.clone(), Style::default().fg(Color::Cyan)),
      ]),
      Line::from(vec![Span::styled("Phone: ", label), Span::raw(user.phone.clone())]),
    ];

    if let Some(updated_at) = result.updated_at {
      lines.push(Line::default());
      lines.push(Line::from(Span::styled(
        format!("Fetched {}", updated_at.format("%H:%M:%S")),
        label,
      )));
    }

    // A failed refresh keeps showing the cached user
    if result.error.is_some() {
      lines.push(Line::from(Span::styled(
        "Refresh failed. Showing the last loaded details.",
        Style::default().fg(Color::Red),
      )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
  }
}

impl View for UserView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('r') => {
        self.query.refetch();
        ViewAction::None
      }
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_detail(frame, area);
  }

  fn route(&self) -> Route {
    Route::User(self.user_id)
  }

  fn breadcrumb_label(&self) -> String {
    format!("User #{}", self.user_id)
  }

  fn tick(&mut self) {
    if self.query.poll() {
      if let Some(error) = self.query.error() {
        warn!(user_id = self.user_id, %error, "failed to load user");
      }
    }
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command").with_priority(10),
      Shortcut::new("r", "refresh").with_priority(20),
      Shortcut::new("q", "back").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::mock;
  use crate::config::{ApiConfig, Config};
  use crate::ui::test_support::render_view;
  use axum::http::StatusCode;
  use crossterm::event::KeyModifiers;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;
  use std::time::Duration;

  fn context(base_url: &str) -> Context {
    let config = Config {
      api: ApiConfig {
        base_url: base_url.to_string(),
        ..ApiConfig::default()
      },
      ..Config::default()
    };
    Context::new(&config).unwrap()
  }

  async fn settle(view: &UserView) {
    for _ in 0..400 {
      if !view.query.is_fetching() {
        return;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("user never settled");
  }

  #[tokio::test]
  async fn test_renders_user_details() {
    let hits = Arc::new(AtomicUsize::new(0));
    let server = mock::serve(mock::users_router(hits)).await;
    let mut view = UserView::new(&context(&server), 7);
    settle(&view).await;

    let text = render_view(&mut view, 60, 12);
    assert!(text.contains("User #7"));
    assert!(text.contains("User 7"));
    assert!(text.contains("user7@example.com"));
    assert!(text.contains("555-0100"));
  }

  #[tokio::test]
  async fn test_reopening_within_stale_time_uses_cache() {
    let hits = Arc::new(AtomicUsize::new(0));
    let server = mock::serve(mock::users_router(hits.clone())).await;
    let ctx = context(&server);

    let first = UserView::new(&ctx, 2);
    settle(&first).await;
    drop(first);

    let mut second = UserView::new(&ctx, 2);
    let text = render_view(&mut second, 60, 12);
    assert!(text.contains("user2@example.com"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_error_hides_request_details() {
    let server = mock::serve(mock::status_router(StatusCode::NOT_FOUND)).await;
    let mut view = UserView::new(&context(&server), 99);
    settle(&view).await;

    let text = render_view(&mut view, 120, 12);
    assert!(text.contains("Error loading user. Please check your internet connection."));
    assert!(text.contains("Press 'r' to retry."));
    // No diagnostics on screen
    assert!(!text.contains("404"));
    assert!(!text.contains("127.0.0.1"));
    assert!(!text.contains("/users/99"));
  }

  #[tokio::test]
  async fn test_keys() {
    let hits = Arc::new(AtomicUsize::new(0));
    let server = mock::serve(mock::users_router(hits.clone())).await;
    let mut view = UserView::new(&context(&server), 1);
    settle(&view).await;

    let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
    assert_eq!(view.handle_key(key(KeyCode::Char('r'))), ViewAction::None);
    settle(&view).await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(view.handle_key(key(KeyCode::Esc)), ViewAction::Pop);
    assert_eq!(view.route(), Route::User(1));
  }
}
