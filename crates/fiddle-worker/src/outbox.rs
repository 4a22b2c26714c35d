//! Outbound message sink
//!
//! The host never talks to `postMessage` directly. In the browser the sink
//! posts to the worker's global scope; in tests it records messages.

use std::cell::RefCell;
use std::rc::Rc;

use fiddle_protocol::Response;

/// Destination for worker → page messages.
///
/// Implementations must deliver messages in call order.
pub trait Outbox {
    fn post(&self, message: Response);
}

impl<T: Outbox + ?Sized> Outbox for Rc<T> {
    fn post(&self, message: Response) {
        (**self).post(message)
    }
}

/// Outbox that records every message
#[derive(Clone, Debug, Default)]
pub struct RecordingOutbox {
    messages: Rc<RefCell<Vec<Response>>>,
}

impl RecordingOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything posted so far
    pub fn messages(&self) -> Vec<Response> {
        self.messages.borrow().clone()
    }

    /// Remove and return everything posted so far
    pub fn drain(&self) -> Vec<Response> {
        core::mem::take(&mut *self.messages.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl Outbox for RecordingOutbox {
    fn post(&self, message: Response) {
        self.messages.borrow_mut().push(message);
    }
}
