//! Change notifications
//!
//! Events are published synchronously by the store after each committed
//! mutation; handlers run on the mutating call's stack before it returns.
//! The dispatcher is owned by the store that publishes into it, not a
//! process-wide bus, so different stores never observe each other's events.

use cutkit_core::data::{BoardEdge, PartId};
use cutkit_core::units::format_inches;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// A change that happened in a part store
///
/// Cloneable and serializable for logging/replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartEvent {
    /// A part was created from fresh stock.
    Created {
        /// The new part's id.
        id: PartId,
    },
    /// A part's position, rotation, or dimensions changed.
    Modified {
        /// The mutated part's id.
        id: PartId,
    },
    /// A part was split into two pieces.
    Cut {
        /// The parent, now a tombstone.
        parent: PartId,
        /// The low-side piece.
        piece1: PartId,
        /// The high-side piece.
        piece2: PartId,
    },
    /// A part was deleted outright.
    Removed {
        /// The removed part's id.
        id: PartId,
    },
    /// A board was planed down to a new thickness.
    Planed {
        /// The planed board's id.
        id: PartId,
        /// The thickness after planing, inches.
        new_thickness: f64,
    },
    /// A profile was routed onto a board edge.
    EdgeRouted {
        /// The routed board's id.
        id: PartId,
        /// Which edge carries the new profile.
        edge: BoardEdge,
    },
    /// The project record was written out.
    ProjectSaved {
        /// Number of parts in the saved record.
        part_count: usize,
    },
    /// A project record was loaded into the store.
    ProjectLoaded {
        /// Number of parts in the loaded record.
        part_count: usize,
    },
}

impl PartEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            PartEvent::Created { .. } | PartEvent::Cut { .. } | PartEvent::Removed { .. } => {
                EventCategory::Lifecycle
            }
            PartEvent::Modified { .. } | PartEvent::Planed { .. } | PartEvent::EdgeRouted { .. } => {
                EventCategory::Geometry
            }
            PartEvent::ProjectSaved { .. } | PartEvent::ProjectLoaded { .. } => {
                EventCategory::Project
            }
        }
    }
}

impl fmt::Display for PartEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartEvent::Created { id } => write!(f, "part {} created", id),
            PartEvent::Modified { id } => write!(f, "part {} modified", id),
            PartEvent::Cut {
                parent,
                piece1,
                piece2,
            } => write!(f, "part {} cut into {} and {}", parent, piece1, piece2),
            PartEvent::Removed { id } => write!(f, "part {} removed", id),
            PartEvent::Planed { id, new_thickness } => {
                write!(f, "part {} planed to {}\"", id, format_inches(*new_thickness))
            }
            PartEvent::EdgeRouted { id, edge } => {
                write!(f, "part {} {} edge routed", id, edge)
            }
            PartEvent::ProjectSaved { part_count } => {
                write!(f, "project saved ({} parts)", part_count)
            }
            PartEvent::ProjectLoaded { part_count } => {
                write!(f, "project loaded ({} parts)", part_count)
            }
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Parts entering or leaving the live collection.
    Lifecycle,
    /// Shape or placement changes to an existing part.
    Geometry,
    /// Project save/load notifications.
    Project,
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventCategory::Lifecycle => write!(f, "Lifecycle"),
            EventCategory::Geometry => write!(f, "Geometry"),
            EventCategory::Project => write!(f, "Project"),
        }
    }
}

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &PartEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

/// Type alias for event handler functions
type EventHandler = Box<dyn Fn(&PartEvent)>;

/// Synchronous event dispatcher
///
/// Handlers are called on the publishing thread and should return quickly.
/// Single-threaded: handlers need no `Send` bound and may capture
/// `Rc`/`Cell` state.
pub struct EventDispatcher {
    handlers: HashMap<SubscriptionId, (EventFilter, EventHandler)>,
}

impl EventDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Subscribe to events matching a filter
    pub fn subscribe<F>(&mut self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&PartEvent) + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.insert(id, (filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.handlers.remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Deliver an event to every matching handler
    ///
    /// Returns the number of handlers that received it.
    pub fn publish(&self, event: &PartEvent) -> usize {
        let mut delivered = 0;
        for (filter, handler) in self.handlers.values() {
            if filter.matches(event) {
                handler(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let mut dispatcher = EventDispatcher::new();

        let id = dispatcher.subscribe(EventFilter::All, |_| {});
        assert_eq!(dispatcher.subscriber_count(), 1);

        assert!(dispatcher.unsubscribe(id));
        assert_eq!(dispatcher.subscriber_count(), 0);

        // Double unsubscribe should return false
        assert!(!dispatcher.unsubscribe(id));
    }

    #[test]
    fn test_event_delivery() {
        let mut dispatcher = EventDispatcher::new();
        let counter = Rc::new(Cell::new(0usize));
        let counter_clone = counter.clone();

        dispatcher.subscribe(EventFilter::All, move |_| {
            counter_clone.set(counter_clone.get() + 1);
        });

        let delivered = dispatcher.publish(&PartEvent::Created { id: PartId::new() });
        assert_eq!(delivered, 1);
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_event_filtering() {
        let mut dispatcher = EventDispatcher::new();
        let lifecycle_count = Rc::new(Cell::new(0usize));
        let geometry_count = Rc::new(Cell::new(0usize));

        let lc = lifecycle_count.clone();
        dispatcher.subscribe(
            EventFilter::Categories(vec![EventCategory::Lifecycle]),
            move |_| {
                lc.set(lc.get() + 1);
            },
        );

        let gc = geometry_count.clone();
        dispatcher.subscribe(
            EventFilter::Categories(vec![EventCategory::Geometry]),
            move |_| {
                gc.set(gc.get() + 1);
            },
        );

        dispatcher.publish(&PartEvent::Created { id: PartId::new() });
        dispatcher.publish(&PartEvent::Modified { id: PartId::new() });

        assert_eq!(lifecycle_count.get(), 1);
        assert_eq!(geometry_count.get(), 1);
    }

    #[test]
    fn test_filter_matches() {
        let event = PartEvent::Removed { id: PartId::new() };

        assert!(EventFilter::All.matches(&event));
        assert!(EventFilter::Categories(vec![EventCategory::Lifecycle]).matches(&event));
        assert!(!EventFilter::Categories(vec![EventCategory::Project]).matches(&event));
        assert!(
            EventFilter::Categories(vec![EventCategory::Project, EventCategory::Lifecycle])
                .matches(&event)
        );
    }

    #[test]
    fn test_event_categories() {
        let id = PartId::new();
        assert_eq!(
            PartEvent::Created { id }.category(),
            EventCategory::Lifecycle
        );
        assert_eq!(
            PartEvent::Cut {
                parent: id,
                piece1: PartId::new(),
                piece2: PartId::new()
            }
            .category(),
            EventCategory::Lifecycle
        );
        assert_eq!(
            PartEvent::Planed {
                id,
                new_thickness: 0.625
            }
            .category(),
            EventCategory::Geometry
        );
        assert_eq!(
            PartEvent::ProjectSaved { part_count: 4 }.category(),
            EventCategory::Project
        );
    }

    #[test]
    fn test_event_display() {
        let id = PartId::new();
        assert_eq!(
            PartEvent::Planed {
                id,
                new_thickness: 0.625
            }
            .to_string(),
            format!("part {} planed to 5/8\"", id)
        );
        assert_eq!(
            PartEvent::ProjectSaved { part_count: 3 }.to_string(),
            "project saved (3 parts)"
        );
    }
}
