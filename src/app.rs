use crate::commands::{self, CommandTarget};
use crate::config::Config;
use crate::context::Context;
use crate::event::{Event, EventHandler};
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::Route;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use tracing::{debug, info, warn};

const DEFAULT_TITLE: &str = "tstack";

/// Main application state
pub struct App {
  /// Navigation stack - root is always Home at index 0
  view_stack: Vec<Box<dyn View>>,

  /// Command palette (opened with :)
  command: CommandInput,

  /// Services shared with every view
  ctx: Context,

  /// Application configuration
  config: Config,

  /// Last command error, cleared on the next key press
  status_message: Option<String>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let ctx = Context::new(&config).wrap_err("Failed to create API client")?;
    let home = Route::Home.build(&ctx);

    Ok(Self {
      view_stack: vec![home],
      command: CommandInput::new(),
      ctx,
      config,
      status_message: None,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(self.config.ui.tick_rate());
    info!(base_url = %self.ctx.api.base_url(), "tstack started");

    let result = self.event_loop(&mut terminal, &mut events).await;

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop<B: Backend>(
    &mut self,
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit() {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.tick(),
    }
  }

  fn tick(&mut self) {
    if let Some(view) = self.view_stack.last_mut() {
      view.tick();
    }
    let evicted = self.ctx.queries.collect_garbage(self.config.query.gc_time());
    if evicted > 0 {
      debug!(evicted, "collected unobserved queries");
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    self.status_message = None;

    match self.command.handle_key(key) {
      KeyResult::Event(CommandEvent::Submitted(line)) => {
        self.execute_command(&line);
        return;
      }
      KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
      KeyResult::NotHandled => {}
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => ViewAction::Quit,
    };
    self.apply_action(action);
  }

  fn apply_action(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Navigate(route) => self.navigate(route),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
      ViewAction::Quit => self.should_quit = true,
    }
  }

  /// Go back to `route` if it is on the stack, else push a new view for it
  fn navigate(&mut self, route: Route) {
    if let Some(index) = self.view_stack.iter().position(|v| v.route() == route) {
      self.view_stack.truncate(index + 1);
      debug!(%route, depth = self.view_stack.len(), "navigated back");
    } else {
      self.view_stack.push(route.build(&self.ctx));
      debug!(%route, depth = self.view_stack.len(), "pushed view");
    }
  }

  fn execute_command(&mut self, line: &str) {
    let name = line.split_whitespace().next().unwrap_or("");
    if name.is_empty() {
      return;
    }

    match commands::resolve(name, line) {
      Ok(CommandTarget::Route(route)) => self.navigate(route),
      Ok(CommandTarget::Quit) => self.should_quit = true,
      Err(message) => {
        warn!(command = line, %message, "command failed");
        self.status_message = Some(message);
      }
    }
  }

  // Accessors for ui::draw

  pub fn current_view_mut(&mut self) -> Option<&mut (dyn View + 'static)> {
    self.view_stack.last_mut().map(|v| v.as_mut())
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command
  }

  pub fn title(&self) -> &str {
    self.config.ui.title.as_deref().unwrap_or(DEFAULT_TITLE)
  }

  pub fn api_url(&self) -> &str {
    self.ctx.api.base_url().as_str()
  }

  pub fn status_message(&self) -> Option<&str> {
    self.status_message.as_deref()
  }

  pub fn shortcuts(&self) -> Vec<Shortcut> {
    self
      .view_stack
      .last()
      .map(|v| v.shortcuts())
      .unwrap_or_default()
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self.view_stack.iter().map(|v| v.breadcrumb_label()).collect()
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::mock;
  use crate::config::ApiConfig;
  use ratatui::backend::TestBackend;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn app(base_url: &str) -> App {
    let config = Config {
      api: ApiConfig {
        base_url: base_url.to_string(),
        ..ApiConfig::default()
      },
      ..Config::default()
    };
    App::new(config).unwrap()
  }

  fn routes(app: &App) -> Vec<Route> {
    app.view_stack.iter().map(|v| v.route()).collect()
  }

  fn type_command(app: &mut App, line: &str) {
    app.handle_key(key(KeyCode::Char(':')));
    for c in line.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));
  }

  #[tokio::test]
  async fn test_starts_at_home() {
    let app = app(&mock::serve(mock::posts_router(1)).await);
    assert_eq!(routes(&app), vec![Route::Home]);
    assert_eq!(app.breadcrumb(), vec!["Home".to_string()]);
  }

  #[tokio::test]
  async fn test_q_at_root_quits() {
    let mut app = app(&mock::serve(mock::posts_router(1)).await);
    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit());
  }

  #[tokio::test]
  async fn test_ctrl_c_quits_from_anywhere() {
    let mut app = app(&mock::serve(mock::posts_router(1)).await);
    app.handle_key(key(KeyCode::Char(':')));
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit());
  }

  #[tokio::test]
  async fn test_navigation_pushes_and_pops() {
    let mut app = app(&mock::serve(mock::posts_router(1)).await);

    app.handle_key(key(KeyCode::Char('c')));
    assert_eq!(routes(&app), vec![Route::Home, Route::Counter]);

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(routes(&app), vec![Route::Home]);
    assert!(!app.should_quit());
  }

  #[tokio::test]
  async fn test_navigate_truncates_to_existing_route() {
    let mut app = app(&mock::serve(mock::posts_router(1)).await);

    app.handle_key(key(KeyCode::Char('a')));
    type_command(&mut app, "counter");
    assert_eq!(routes(&app), vec![Route::Home, Route::About, Route::Counter]);

    type_command(&mut app, "about");
    assert_eq!(routes(&app), vec![Route::Home, Route::About]);

    // Back to Home from About
    app.handle_key(key(KeyCode::Char('h')));
    assert_eq!(routes(&app), vec![Route::Home]);
  }

  #[tokio::test]
  async fn test_user_command() {
    let mut app = app(&mock::serve(mock::posts_router(1)).await);
    type_command(&mut app, "user 4");
    assert_eq!(routes(&app), vec![Route::Home, Route::User(4)]);
    assert_eq!(app.breadcrumb().last().map(String::as_str), Some("User #4"));
  }

  #[tokio::test]
  async fn test_bad_command_sets_status() {
    let mut app = app(&mock::serve(mock::posts_router(1)).await);
    type_command(&mut app, "user x");
    assert_eq!(routes(&app), vec![Route::Home]);
    assert_eq!(app.status_message(), Some("not a user id: x"));

    // Any key clears it
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.status_message(), None);
  }

  #[tokio::test]
  async fn test_quit_command() {
    let mut app = app(&mock::serve(mock::posts_router(1)).await);
    type_command(&mut app, "q");
    assert!(app.should_quit());
  }

  #[tokio::test]
  async fn test_draw_renders_header_view_and_footer() {
    let mut app = app(&mock::serve(mock::posts_router(1)).await);
    app.handle_key(key(KeyCode::Char('c')));

    let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
    terminal.draw(|frame| ui::draw(frame, &mut app)).unwrap();
    let text = ui::test_support::buffer_text(terminal.backend().buffer());

    assert!(text.contains("tstack"));
    assert!(text.contains("127.0.0.1"));
    assert!(text.contains("Home > Counter"));
    assert!(text.contains("Current Count"));
  }

  #[tokio::test]
  async fn test_counter_survives_navigation() {
    let mut app = app(&mock::serve(mock::posts_router(1)).await);
    app.handle_key(key(KeyCode::Char('c')));
    app.handle_key(key(KeyCode::Char('+')));
    app.handle_key(key(KeyCode::Char('+')));
    app.handle_key(key(KeyCode::Char('h')));
    app.handle_key(key(KeyCode::Char('c')));
    assert_eq!(app.ctx.counter.count(), 2);
  }
}
