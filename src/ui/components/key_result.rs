/// Result of offering a key event to a component.
///
/// Components return this to their parent view, which chains handlers with
/// `NotHandled` falling through to the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Key was consumed, no event for parent to handle
  Handled,
  /// Key was consumed, here's an event for parent to process
  Event(T),
  /// Key was not consumed, parent should try next handler
  NotHandled,
}
