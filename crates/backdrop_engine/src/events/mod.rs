//! Scene event delivery
//!
//! Key principles:
//! - Handlers register for the event types they care about
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Events raised during a frame are queued and delivered once the frame
//!   has finished updating, so handlers never observe a half-updated pool
//! - A panicking handler is logged and counted; delivery carries on

use crate::backgrounds::BackgroundKind;
use crate::collision::{panic_message, CollectionEvent};
use crate::scene::StopReason;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Scene loop began running
    Started,
    /// An entity was collected
    Collected,
    /// Running score changed
    ScoreChanged,
    /// Surface was resized
    Resized,
    /// Scene loop stopped
    Stopped,
}

/// Event emitted by a scene driver
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Scene loop began running
    Started {
        /// Variant that started
        kind: BackgroundKind,
    },
    /// An entity was collected
    Collected(CollectionEvent),
    /// Running score changed
    ScoreChanged {
        /// New total score
        score: u64,
    },
    /// Surface was resized
    Resized {
        /// New width
        width: u32,
        /// New height
        height: u32,
    },
    /// Scene loop stopped (terminal)
    Stopped(StopReason),
}

impl SceneEvent {
    /// Type tag used for handler registration
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Started { .. } => EventType::Started,
            Self::Collected(_) => EventType::Collected,
            Self::ScoreChanged { .. } => EventType::ScoreChanged,
            Self::Resized { .. } => EventType::Resized,
            Self::Stopped(_) => EventType::Stopped,
        }
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &SceneEvent) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(&SceneEvent) -> bool,
{
    fn on_event(&mut self, event: &SceneEvent) -> bool {
        self(event)
    }
}

/// Event system with registration and queuing
/// Follows chain of responsibility pattern
#[derive(Default)]
pub struct EventSystem {
    queue: Vec<SceneEvent>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific event type
    /// Only handlers registered for this type will be notified
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Number of handlers registered for a type
    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.handlers.get(&event_type).map_or(0, Vec::len)
    }

    /// Queue an event for the next dispatch
    pub fn send(&mut self, event: SceneEvent) {
        self.queue.push(event);
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Dispatch all pending events in the order they were sent
    ///
    /// Returns the number of handler calls that panicked. A panicking
    /// handler counts as not having consumed the event.
    pub fn dispatch(&mut self) -> usize {
        let pending = std::mem::take(&mut self.queue);
        pending.iter().map(|event| self.dispatch_event(event)).sum()
    }

    /// Dispatch single event to registered handlers
    /// Stops on first handler that returns true (consumed)
    fn dispatch_event(&mut self, event: &SceneEvent) -> usize {
        let mut failures = 0;
        if let Some(handlers) = self.handlers.get_mut(&event.event_type()) {
            for handler in handlers.iter_mut() {
                match catch_unwind(AssertUnwindSafe(|| handler.on_event(event))) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(payload) => {
                        log::warn!(
                            "Isolated panic in {:?} handler: {}",
                            event.event_type(),
                            panic_message(payload.as_ref())
                        );
                        failures += 1;
                    }
                }
            }
        }
        failures
    }

    /// Drop queued events and every handler
    pub fn clear(&mut self) {
        self.queue.clear();
        self.handlers.clear();
    }
}

impl std::fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSystem")
            .field("pending", &self.queue.len())
            .field("handler_types", &self.handlers.len())
            .finish()
    }
}
