//! crates/logging/src/capture.rs
//! Capture frames recorded while logging is disabled.

use serde::Serialize;
use serde_json::Value;

use crate::levels::Level;

/// A log call that was captured instead of dispatched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CapturedCall {
    /// Message exactly as passed to the logger.
    pub message: Value,
    /// Normalized level; `Off` when the call used an unrecognised level.
    pub level: Level,
}

/// Calls captured between one `disable()` and its matching `enable()`.
pub type CaptureFrame = Vec<CapturedCall>;

/// LIFO stack of capture frames.
///
/// Every push must be matched by a pop before dispatch resumes. Popping an
/// empty stack yields an empty frame.
#[derive(Clone, Debug, Default)]
pub struct CaptureStack {
    frames: Vec<CaptureFrame>,
}

impl CaptureStack {
    /// Creates an empty stack.
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Opens a new, empty frame on top of the stack.
    pub fn push(&mut self) {
        self.frames.push(CaptureFrame::new());
    }

    /// Closes the top frame and returns what it captured.
    pub fn pop(&mut self) -> CaptureFrame {
        self.frames.pop().unwrap_or_default()
    }

    /// Reports whether any frame is open.
    pub fn is_active(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Appends `call` to the top frame. Returns `false` when no frame is open.
    pub fn record(&mut self, call: CapturedCall) -> bool {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.push(call);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(message: &str, level: Level) -> CapturedCall {
        CapturedCall {
            message: Value::from(message),
            level,
        }
    }

    #[test]
    fn record_without_frame_is_rejected() {
        let mut stack = CaptureStack::new();
        assert!(!stack.record(call("lost", Level::Error)));
        assert!(!stack.is_active());
    }

    #[test]
    fn frames_are_popped_in_lifo_order() {
        let mut stack = CaptureStack::new();
        stack.push();
        assert!(stack.record(call("outer", Level::Info)));
        stack.push();
        assert!(stack.record(call("inner", Level::Error)));
        assert_eq!(stack.depth(), 2);

        assert_eq!(stack.pop(), vec![call("inner", Level::Error)]);
        assert!(stack.is_active());
        assert_eq!(stack.pop(), vec![call("outer", Level::Info)]);
        assert!(!stack.is_active());
    }

    #[test]
    fn pop_on_empty_stack_returns_empty_frame() {
        let mut stack = CaptureStack::new();
        assert!(stack.pop().is_empty());
        assert_eq!(stack.depth(), 0);
    }
}
