//! Available commands and autocomplete logic

use crate::ui::views::Route;

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "home",
    aliases: &["h", "index"],
    description: "Go to the home screen",
  },
  Command {
    name: "about",
    aliases: &["a", "posts"],
    description: "Latest posts (cached)",
  },
  Command {
    name: "counter",
    aliases: &["c", "count"],
    description: "Shared counter demo",
  },
  Command {
    name: "user",
    aliases: &["u", "author"],
    description: "Show a user: user <id>",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit tstack",
  },
];

/// What a submitted command line resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTarget {
  Route(Route),
  Quit,
}

/// Get autocomplete suggestions for the command word of `input`
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input
    .split_whitespace()
    .next()
    .unwrap_or("")
    .to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    let priority = if cmd.name == input_lower {
      0
    } else if cmd.aliases.contains(&input_lower.as_str()) {
      1
    } else if cmd.name.starts_with(&input_lower) {
      2
    } else if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      3
    } else if cmd.name.contains(&input_lower) {
      4
    } else if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      5
    } else {
      continue;
    };
    matches.push((cmd, priority));
  }

  // Stable sort keeps declaration order within a priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

/// Resolve a command line such as `about` or `user 3`.
///
/// `name` is the command already picked from the suggestions; arguments are
/// taken from `line`.
pub fn resolve(name: &str, line: &str) -> Result<CommandTarget, String> {
  let args: Vec<&str> = line.split_whitespace().skip(1).collect();

  match name {
    "home" => Ok(CommandTarget::Route(Route::Home)),
    "about" => Ok(CommandTarget::Route(Route::About)),
    "counter" => Ok(CommandTarget::Route(Route::Counter)),
    "user" => {
      let id = args
        .first()
        .ok_or_else(|| "usage: user <id>".to_string())?
        .parse::<u64>()
        .map_err(|_| format!("not a user id: {}", args[0]))?;
      Ok(CommandTarget::Route(Route::User(id)))
    }
    "quit" => Ok(CommandTarget::Quit),
    other => Err(format!("unknown command: {}", other)),
  }
}
