mod button;
mod command_input;
mod input;
mod key_result;

pub use button::{Button, ButtonGroup, ButtonVariant};
pub use command_input::{CommandEvent, CommandInput};
pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
