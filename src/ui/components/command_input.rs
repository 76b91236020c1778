use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::commands::{self, Command};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

/// Events emitted by command input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
  /// Command line submitted, command word already resolved against suggestions
  Submitted(String),
  /// Command cancelled
  Cancelled,
}

/// Command palette opened with `:`, with autocomplete
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
  input: TextInput,
  active: bool,
  selected_suggestion: usize,
}

impl CommandInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn value(&self) -> &str {
    self.input.value()
  }

  pub fn activate(&mut self) {
    self.active = true;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  fn deactivate(&mut self) {
    self.active = false;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  pub fn suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(self.input.value())
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }

  /// Handle a key event
  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<CommandEvent> {
    if !self.active {
      if key.code == KeyCode::Char(':') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => {
        self.deactivate();
        return KeyResult::Event(CommandEvent::Cancelled);
      }
      KeyCode::Enter => {
        let line = self.resolve_line();
        self.deactivate();
        return KeyResult::Event(CommandEvent::Submitted(line));
      }
      KeyCode::Tab | KeyCode::Down => {
        let count = self.suggestions().len();
        if count > 0 {
          self.selected_suggestion = (self.selected_suggestion + 1) % count;
        }
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        let count = self.suggestions().len();
        if count > 0 {
          self.selected_suggestion = self
            .selected_suggestion
            .checked_sub(1)
            .unwrap_or(count - 1);
        }
        return KeyResult::Handled;
      }
      _ => {}
    }

    match self.input.handle_key(key) {
      InputResult::Consumed => {
        self.selected_suggestion = 0; // Reset on input change
        KeyResult::Handled
      }
      InputResult::Submitted(_) | InputResult::Cancelled => KeyResult::Handled,
      // Swallow everything else while the palette is open
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Replace the typed command word with the selected suggestion, keep arguments
  fn resolve_line(&self) -> String {
    let typed = self.input.value().trim();
    let args: Vec<&str> = typed.split_whitespace().skip(1).collect();
    let suggestions = self.suggestions();

    let name = match suggestions.get(self.selected_suggestion) {
      Some(cmd) => cmd.name.to_string(),
      None => typed
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase(),
    };

    std::iter::once(name.as_str())
      .chain(args)
      .collect::<Vec<_>>()
      .join(" ")
  }

  /// Render the command overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let suggestions = self.suggestions();

    let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
    let suggestion_count = suggestions.len().min(8) as u16;
    let height = (3 + suggestion_count).min(area.height);

    let overlay_area = Rect::new(area.x + 1, area.y + 1, width, height).intersection(area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Command ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Input line
        Constraint::Min(0),    // Suggestions
      ])
      .split(inner);

    let input_line = Line::from(vec![
      Span::styled(":", Style::default().fg(Color::Yellow)),
      Span::raw(self.input.value()),
      Span::styled("_", Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    if !suggestions.is_empty() && chunks[1].height > 0 {
      let items: Vec<ListItem> = suggestions
        .iter()
        .take(8)
        .map(|cmd| {
          ListItem::new(Line::from(vec![
            Span::styled(format!("{:<12}", cmd.name), Style::default().fg(Color::Cyan)),
            Span::styled(cmd.description, Style::default().fg(Color::DarkGray)),
          ]))
        })
        .collect();

      let list =
        List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

      let mut state = ListState::default();
      state.select(Some(self.selected_suggestion));

      frame.render_stateful_widget(list, chunks[1], &mut state);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_text(input: &mut CommandInput, text: &str) {
    for c in text.chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn test_colon_activates() {
    let mut input = CommandInput::new();
    assert_eq!(input.handle_key(key(KeyCode::Char('x'))), KeyResult::NotHandled);
    assert_eq!(input.handle_key(key(KeyCode::Char(':'))), KeyResult::Handled);
    assert!(input.is_active());
  }

  #[test]
  fn test_submit_resolves_alias() {
    let mut input = CommandInput::new();
    input.activate();
    type_text(&mut input, "c");

    let result = input.handle_key(key(KeyCode::Enter));
    assert_eq!(result, KeyResult::Event(CommandEvent::Submitted("counter".to_string())));
    assert!(!input.is_active());
  }

  #[test]
  fn test_submit_keeps_arguments() {
    let mut input = CommandInput::new();
    input.activate();
    type_text(&mut input, "u 4");

    let result = input.handle_key(key(KeyCode::Enter));
    assert_eq!(result, KeyResult::Event(CommandEvent::Submitted("user 4".to_string())));
  }

  #[test]
  fn test_tab_selects_next_suggestion() {
    let mut input = CommandInput::new();
    input.activate();
    input.handle_key(key(KeyCode::Tab));
    assert_eq!(input.selected_suggestion(), 1);

    let result = input.handle_key(key(KeyCode::Enter));
    assert_eq!(result, KeyResult::Event(CommandEvent::Submitted("about".to_string())));
  }

  #[test]
  fn test_backtab_wraps() {
    let mut input = CommandInput::new();
    input.activate();
    input.handle_key(key(KeyCode::BackTab));
    assert_eq!(input.selected_suggestion(), commands::COMMANDS.len() - 1);
  }

  #[test]
  fn test_escape_cancels() {
    let mut input = CommandInput::new();
    input.activate();
    type_text(&mut input, "ab");
    assert_eq!(
      input.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(CommandEvent::Cancelled)
    );
    assert!(!input.is_active());
    assert_eq!(input.value(), "");
  }

  #[test]
  fn test_unknown_command_passes_through() {
    let mut input = CommandInput::new();
    input.activate();
    type_text(&mut input, "zzz");
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("zzz".to_string()))
    );
  }
}
