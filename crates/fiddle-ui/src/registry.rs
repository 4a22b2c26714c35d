//! Message handler registry
//!
//! Maps each inbound [`MessageKind`] to an ordered list of handlers. Every
//! handler registered for a kind runs, in registration order, for every
//! message of that kind. A handler can ask to have all handlers for the
//! current kind removed once dispatch finishes, which is how one-shot
//! handlers are built.

use std::collections::BTreeMap;
use std::rc::Rc;

use fiddle_protocol::{MessageKind, Response};

/// What a handler wants done after it ran
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Stay registered
    Continue,
    /// Remove every handler for this message's kind after dispatch
    Unregister,
}

/// A message handler over context `C`
pub type Handler<C> = Rc<dyn Fn(&mut C, &Response) -> Flow>;

/// Handler registry over context `C`
pub struct HandlerRegistry<C> {
    handlers: BTreeMap<MessageKind, Vec<Handler<C>>>,
}

impl<C> Default for HandlerRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> HandlerRegistry<C> {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Register `handler` for every kind in `kinds`
    pub fn add<F>(&mut self, kinds: impl IntoIterator<Item = MessageKind>, handler: F) -> &mut Self
    where
        F: Fn(&mut C, &Response) -> Flow + 'static,
    {
        let handler: Handler<C> = Rc::new(handler);
        self.add_handler(kinds, handler)
    }

    /// Register an already shared handler for every kind in `kinds`
    pub fn add_handler(
        &mut self,
        kinds: impl IntoIterator<Item = MessageKind>,
        handler: Handler<C>,
    ) -> &mut Self {
        for kind in kinds {
            self.handlers.entry(kind).or_default().push(handler.clone());
        }
        self
    }

    /// Remove every handler for `kind`; returns how many were removed
    pub fn clear(&mut self, kind: MessageKind) -> usize {
        self.handlers.remove(&kind).map_or(0, |list| list.len())
    }

    /// Number of handlers registered for `kind`
    pub fn count(&self, kind: MessageKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Run every handler registered for the message's kind.
    ///
    /// Returns `false` (after logging a warning) when nothing is registered.
    pub fn dispatch(&mut self, ctx: &mut C, message: &Response) -> bool {
        let kind = message.kind();
        let Some(list) = self.handlers.get(&kind) else {
            log::warn!("[fiddle-ui] No handlers found for message type: {}", kind);
            return false;
        };

        let mut unregister = false;
        for handler in list {
            if (**handler)(ctx, message) == Flow::Unregister {
                unregister = true;
            }
        }
        if unregister {
            self.clear(kind);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handlers_run_in_registration_order() {
        let mut registry: HandlerRegistry<Vec<String>> = HandlerRegistry::new();
        registry
            .add([MessageKind::Stdout], |log, _| {
                log.push("first".into());
                Flow::Continue
            })
            .add([MessageKind::Stdout], |log, _| {
                log.push("second".into());
                Flow::Continue
            });

        let mut log = Vec::new();
        assert!(registry.dispatch(&mut log, &Response::Stdout("x".into())));
        assert!(registry.dispatch(&mut log, &Response::Stdout("y".into())));
        assert_eq!(log, vec!["first", "second", "first", "second"]);
    }

    #[test]
    fn test_one_handler_many_kinds() {
        let mut registry: HandlerRegistry<Vec<String>> = HandlerRegistry::new();
        registry.add([MessageKind::Stdout, MessageKind::Stderr], |log, msg| {
            log.push(msg.output_text().unwrap_or_default().to_string());
            Flow::Continue
        });

        let mut log = Vec::new();
        registry.dispatch(&mut log, &Response::Stdout("out".into()));
        registry.dispatch(&mut log, &Response::Stderr("err".into()));
        assert_eq!(log, vec!["out", "err"]);
        assert_eq!(registry.count(MessageKind::Stdout), 1);
        assert_eq!(registry.count(MessageKind::Stderr), 1);
    }

    #[test]
    fn test_missing_handler_is_not_fatal() {
        let mut registry: HandlerRegistry<u32> = HandlerRegistry::new();
        let mut calls = 0;
        assert!(!registry.dispatch(&mut calls, &Response::FiddleReady));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_one_shot_handler() {
        let mut registry: HandlerRegistry<u32> = HandlerRegistry::new();
        registry.add([MessageKind::FiddleReady], |calls, _| {
            *calls += 1;
            Flow::Unregister
        });

        let mut calls = 0;
        assert!(registry.dispatch(&mut calls, &Response::FiddleReady));
        assert!(!registry.dispatch(&mut calls, &Response::FiddleReady));
        assert_eq!(calls, 1);
        assert_eq!(registry.count(MessageKind::FiddleReady), 0);
    }

    #[test]
    fn test_unregister_runs_remaining_handlers_first() {
        let mut registry: HandlerRegistry<Vec<u8>> = HandlerRegistry::new();
        registry
            .add([MessageKind::FiddleReady], |log, _| {
                log.push(1);
                Flow::Unregister
            })
            .add([MessageKind::FiddleReady], |log, _| {
                log.push(2);
                Flow::Continue
            });

        let mut log = Vec::new();
        registry.dispatch(&mut log, &Response::FiddleReady);
        assert_eq!(log, vec![1, 2]);
        assert_eq!(registry.clear(MessageKind::FiddleReady), 0);
    }
}
