use crate::ui::components::{Button, ButtonGroup, ButtonVariant, KeyResult};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::Route;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// (heading, caption, accent)
const FEATURES: &[(&str, &str, Color)] = &[
  ("ratatui + crossterm", "View stack navigation", Color::Blue),
  ("Query cache", "Data fetching & caching", Color::Magenta),
  ("Counter store", "State management", Color::Green),
  ("Button variants", "Primary, secondary and danger styles", Color::LightRed),
  ("Rust", "Full type safety", Color::Yellow),
];

const CARD_HEIGHT: u16 = 4;
const BUTTON_HEIGHT: u16 = 3;

/// Landing screen: feature list and links to the other screens
pub struct HomeView {
  buttons: ButtonGroup<Route>,
}

impl HomeView {
  pub fn new() -> Self {
    let buttons = ButtonGroup::new(vec![
      Button::new("View About Page", Route::About).hotkey('a'),
      Button::new("Try Counter", Route::Counter)
        .variant(ButtonVariant::Secondary)
        .hotkey('c'),
    ])
    .focus_first();

    Self { buttons }
  }

  fn render_feature(frame: &mut Frame, area: Rect, heading: &str, caption: &str, accent: Color) {
    let block = Block::default()
      .borders(Borders::ALL)
      .border_type(BorderType::Rounded)
      .border_style(Style::default().fg(accent));

    let lines = vec![
      Line::from(Span::styled(
        format!("✓ {}", heading),
        Style::default().fg(accent).bold(),
      )),
      Line::from(Span::styled(caption, Style::default().fg(Color::DarkGray))),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
  }
}

impl Default for HomeView {
  fn default() -> Self {
    Self::new()
  }
}

impl View for HomeView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.buttons.handle_key(key) {
      KeyResult::Event(route) => return ViewAction::Navigate(route),
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .borders(Borders::ALL)
      .border_type(BorderType::Rounded)
      .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![
      Constraint::Length(1), // Title
      Constraint::Length(1), // Subtitle
      Constraint::Length(1),
    ];
    constraints.extend(FEATURES.iter().map(|_| Constraint::Length(CARD_HEIGHT)));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(self.buttons.height(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let width = inner.width.min(60);
    let column = Rect {
      x: inner.x + (inner.width - width) / 2,
      width,
      ..inner
    };
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints(constraints)
      .split(column);

    frame.render_widget(
      Paragraph::new("tstack")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Blue).bold()),
      chunks[0],
    );
    frame.render_widget(
      Paragraph::new("A starter stack for terminal apps")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray)),
      chunks[1],
    );

    for (i, (heading, caption, accent)) in FEATURES.iter().enumerate() {
      Self::render_feature(frame, chunks[3 + i], heading, caption, *accent);
    }

    let buttons_area = chunks[4 + FEATURES.len()];
    self.buttons.render(frame, buttons_area, BUTTON_HEIGHT);
  }

  fn route(&self) -> Route {
    Route::Home
  }

  fn breadcrumb_label(&self) -> String {
    "Home".to_string()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command").with_priority(10),
      Shortcut::new("a", "about").with_priority(20),
      Shortcut::new("c", "counter").with_priority(30),
      Shortcut::new("tab", "focus").with_priority(40),
      Shortcut::new("q", "quit").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ui::test_support::render_view;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_hotkeys_navigate() {
    let mut view = HomeView::new();
    assert_eq!(
      view.handle_key(key(KeyCode::Char('a'))),
      ViewAction::Navigate(Route::About)
    );
    assert_eq!(
      view.handle_key(key(KeyCode::Char('c'))),
      ViewAction::Navigate(Route::Counter)
    );
  }

  #[test]
  fn test_enter_presses_focused_button() {
    let mut view = HomeView::new();
    assert_eq!(view.handle_key(key(KeyCode::Enter)), ViewAction::Navigate(Route::About));

    view.handle_key(key(KeyCode::Tab));
    assert_eq!(
      view.handle_key(key(KeyCode::Enter)),
      ViewAction::Navigate(Route::Counter)
    );
  }

  #[test]
  fn test_q_pops() {
    let mut view = HomeView::new();
    assert_eq!(view.handle_key(key(KeyCode::Char('q'))), ViewAction::Pop);
  }

  #[test]
  fn test_render_lists_features_and_buttons() {
    let mut view = HomeView::new();
    let text = render_view(&mut view, 70, 40);
    assert!(text.contains("tstack"));
    assert!(text.contains("Query cache"));
    assert!(text.contains("View About Page"));
    assert!(text.contains("Try Counter"));
  }
}
