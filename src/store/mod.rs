//! Local application state shared between views.

mod counter;

pub use counter::CounterStore;
