use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Padding, Paragraph};

/// Visual style of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
  #[default]
  Primary,
  Secondary,
  Danger,
}

impl ButtonVariant {
  /// Background at rest
  pub fn color(self) -> Color {
    match self {
      ButtonVariant::Primary => Color::Blue,
      ButtonVariant::Secondary => Color::DarkGray,
      ButtonVariant::Danger => Color::Red,
    }
  }

  /// Background while focused
  pub fn active_color(self) -> Color {
    match self {
      ButtonVariant::Primary => Color::LightBlue,
      ButtonVariant::Secondary => Color::Gray,
      ButtonVariant::Danger => Color::LightRed,
    }
  }
}

/// A labelled, pressable control.
///
/// Pressing yields a clone of `action`; the button itself holds no state
/// beyond its props.
#[derive(Debug, Clone)]
pub struct Button<A> {
  label: String,
  variant: ButtonVariant,
  hotkey: Option<char>,
  disabled: bool,
  action: A,
}

impl<A: Clone> Button<A> {
  pub fn new(label: impl Into<String>, action: A) -> Self {
    Self {
      label: label.into(),
      variant: ButtonVariant::default(),
      hotkey: None,
      disabled: false,
      action,
    }
  }

  pub fn variant(mut self, variant: ButtonVariant) -> Self {
    self.variant = variant;
    self
  }

  /// Key that presses the button regardless of focus
  pub fn hotkey(mut self, key: char) -> Self {
    self.hotkey = Some(key);
    self
  }

  pub fn set_label(&mut self, label: impl Into<String>) {
    self.label = label.into();
  }

  pub fn is_disabled(&self) -> bool {
    self.disabled
  }

  pub fn set_disabled(&mut self, disabled: bool) {
    self.disabled = disabled;
  }

  pub fn get_variant(&self) -> ButtonVariant {
    self.variant
  }

  /// The action to perform, or `None` while disabled
  pub fn press(&self) -> Option<A> {
    (!self.disabled).then(|| self.action.clone())
  }

  pub fn style(&self, focused: bool) -> Style {
    if self.disabled {
      return Style::default().fg(Color::Gray).bg(Color::DarkGray);
    }
    let bg = if focused {
      self.variant.active_color()
    } else {
      self.variant.color()
    };
    let style = Style::default().fg(Color::White).bg(bg).bold();
    if focused {
      style.underlined()
    } else {
      style
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
    let text = match self.hotkey {
      Some(key) if !self.disabled => format!("{}  [{}]", self.label, key),
      _ => self.label.clone(),
    };
    let padding = if area.height >= 3 {
      Padding::vertical((area.height - 1) / 2)
    } else {
      Padding::ZERO
    };
    let paragraph = Paragraph::new(text)
      .alignment(Alignment::Center)
      .block(Block::default().padding(padding))
      .style(self.style(focused));
    frame.render_widget(paragraph, area);
  }
}

/// A column of buttons with keyboard focus.
///
/// Tab/Shift-Tab (and Up/Down) move focus, Enter
/// presses the focused button and hotkeys press their button directly.
/// Focus may rest on no button at all, leaving Enter to the parent view.
#[derive(Debug, Clone)]
pub struct ButtonGroup<A> {
  buttons: Vec<Button<A>>,
  focused: Option<usize>,
}

impl<A: Clone> ButtonGroup<A> {
  pub fn new(buttons: Vec<Button<A>>) -> Self {
    Self {
      buttons,
      focused: None,
    }
  }

  /// Start with the first button focused
  pub fn focus_first(mut self) -> Self {
    self.focused = (!self.buttons.is_empty()).then_some(0);
    self
  }

  pub fn buttons(&self) -> &[Button<A>] {
    &self.buttons
  }

  pub fn button_mut(&mut self, index: usize) -> Option<&mut Button<A>> {
    self.buttons.get_mut(index)
  }

  pub fn focused(&self) -> Option<usize> {
    self.focused
  }

  fn focus_next(&mut self) {
    let len = self.buttons.len();
    self.focused = match self.focused {
      None if len > 0 => Some(0),
      Some(i) if i + 1 < len => Some(i + 1),
      _ => None,
    };
  }

  fn focus_previous(&mut self) {
    let len = self.buttons.len();
    self.focused = match self.focused {
      None if len > 0 => Some(len - 1),
      Some(i) if i > 0 => Some(i - 1),
      _ => None,
    };
  }

  fn press(&self, index: usize) -> KeyResult<A> {
    match self.buttons.get(index).and_then(Button::press) {
      Some(action) => KeyResult::Event(action),
      // Disabled buttons swallow the key
      None => KeyResult::Handled,
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<A> {
    if key
      .modifiers
      .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Tab => {
        self.focus_next();
        KeyResult::Handled
      }
      KeyCode::BackTab => {
        self.focus_previous();
        KeyResult::Handled
      }
      KeyCode::Down if self.focused.is_some() => {
        self.focus_next();
        KeyResult::Handled
      }
      KeyCode::Up if self.focused.is_some() => {
        self.focus_previous();
        KeyResult::Handled
      }
      KeyCode::Enter => match self.focused {
        Some(index) => self.press(index),
        None => KeyResult::NotHandled,
      },
      KeyCode::Char(c) => match self.buttons.iter().position(|b| b.hotkey == Some(c)) {
        Some(index) => self.press(index),
        None => KeyResult::NotHandled,
      },
      _ => KeyResult::NotHandled,
    }
  }

  /// Render buttons `button_height` rows tall with a one-row gap
  pub fn render(&self, frame: &mut Frame, area: Rect, button_height: u16) {
    if self.buttons.is_empty() {
      return;
    }
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints(self.buttons.iter().map(|_| Constraint::Length(button_height)))
      .spacing(1)
      .split(area);

    for (i, (button, chunk)) in self.buttons.iter().zip(chunks.iter()).enumerate() {
      button.render(frame, *chunk, self.focused == Some(i));
    }
  }

  /// Rows needed to render the group
  pub fn height(&self, button_height: u16) -> u16 {
    let n = self.buttons.len() as u16;
    n * button_height + n.saturating_sub(1)
  }
}
