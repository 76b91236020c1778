mod about;
mod counter;
mod home;
mod user;

pub use about::AboutView;
pub use counter::CounterView;
pub use home::HomeView;
pub use user::UserView;

use crate::context::Context;
use crate::ui::view::View;

/// Screens reachable through navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
  /// Landing screen, always at the bottom of the stack
  Home,
  About,
  Counter,
  /// Author of a post
  User(u64),
}

impl Route {
  /// Route name as used by the command palette
  pub fn name(&self) -> &'static str {
    match self {
      Route::Home => "index",
      Route::About => "about",
      Route::Counter => "counter",
      Route::User(_) => "user",
    }
  }

  /// Create the view for this route
  pub fn build(self, ctx: &Context) -> Box<dyn View> {
    match self {
      Route::Home => Box::new(HomeView::new()),
      Route::About => Box::new(AboutView::new(ctx)),
      Route::Counter => Box::new(CounterView::new(ctx.counter.clone())),
      Route::User(id) => Box::new(UserView::new(ctx, id)),
    }
  }
}

impl std::fmt::Display for Route {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Route::User(id) => write!(f, "user/{}", id),
      other => f.write_str(other.name()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_route_names() {
    assert_eq!(Route::Home.name(), "index");
    assert_eq!(Route::About.name(), "about");
    assert_eq!(Route::Counter.name(), "counter");
    assert_eq!(Route::User(3).to_string(), "user/3");
  }
}
