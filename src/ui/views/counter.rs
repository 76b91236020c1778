use crate::store::CounterStore;
use crate::ui::components::{Button, ButtonGroup, ButtonVariant, KeyResult};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::Route;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};
use tokio::sync::watch;

const BUTTON_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CounterAction {
  Increment,
  Decrement,
  Reset,
  Home,
}

/// Counter demo driven by the shared [`CounterStore`]
pub struct CounterView {
  store: CounterStore,
  count: watch::Receiver<i64>,
  buttons: ButtonGroup<CounterAction>,
}

impl CounterView {
  pub fn new(store: CounterStore) -> Self {
    let count = store.subscribe();
    let buttons = ButtonGroup::new(vec![
      Button::new("+ Increment", CounterAction::Increment).hotkey('+'),
      Button::new("- Decrement", CounterAction::Decrement)
        .variant(ButtonVariant::Danger)
        .hotkey('-'),
      Button::new("Reset", CounterAction::Reset)
        .variant(ButtonVariant::Secondary)
        .hotkey('0'),
      Button::new("← Back to Home", CounterAction::Home).hotkey('h'),
    ])
    .focus_first();

    Self {
      store,
      count,
      buttons,
    }
  }

  fn apply(&mut self, action: CounterAction) -> ViewAction {
    match action {
      CounterAction::Increment => self.store.increment(),
      CounterAction::Decrement => self.store.decrement(),
      CounterAction::Reset => self.store.reset(),
      CounterAction::Home => return ViewAction::Navigate(Route::Home),
    }
    ViewAction::None
  }
}

impl View for CounterView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.buttons.handle_key(key) {
      KeyResult::Event(action) => return self.apply(action),
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let count = *self.count.borrow_and_update();

    let block = Block::default()
      .title(" Counter Demo ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_type(BorderType::Rounded)
      .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width.min(50);
    let column = Rect {
      x: inner.x + (inner.width - width) / 2,
      width,
      ..inner
    };
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Subtitle
        Constraint::Length(1),
        Constraint::Length(5), // Count card
        Constraint::Length(1),
        Constraint::Length(self.buttons.height(BUTTON_HEIGHT)),
        Constraint::Length(1),
        Constraint::Length(1), // Note
        Constraint::Min(0),
      ])
      .split(column);

    frame.render_widget(
      Paragraph::new("Shared state through the counter store")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray)),
      chunks[0],
    );

    let card = Paragraph::new(vec![
      Line::from(Span::styled(
        count.to_string(),
        Style::default().fg(Color::White).bold(),
      )),
      Line::from(Span::styled("Current Count", Style::default().fg(Color::LightGreen))),
    ])
    .alignment(Alignment::Center)
    .block(
      Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Green))
        .padding(Padding::top(1)),
    )
    .style(Style::default().bg(Color::Green));
    frame.render_widget(card, chunks[2]);

    self.buttons.render(frame, chunks[4], BUTTON_HEIGHT);

    frame.render_widget(
      Paragraph::new("The count survives navigating away and back")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray)),
      chunks[6],
    );
  }

  fn route(&self) -> Route {
    Route::Counter
  }

  fn breadcrumb_label(&self) -> String {
    "Counter".to_string()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command").with_priority(10),
      Shortcut::new("+/-", "change").with_priority(20),
      Shortcut::new("0", "reset").with_priority(30),
      Shortcut::new("tab", "focus").with_priority(40),
      Shortcut::new("q", "back").with_priority(90),
    ]
  }
}
