//! Shared-handle aliases for single-threaded embedding.
//!
//! The store and its collaborators run on one thread; where the embedding
//! application needs the same object reachable from several UI callbacks,
//! it clones one of these handles instead of reaching for locks.

use std::cell::RefCell;
use std::rc::Rc;

use cutkit_parts::PartStore;

/// Shared handle to a single-threaded collaborator
pub type Shared<T> = Rc<RefCell<T>>;

/// Store handle cloned into UI callbacks
pub type SharedStore = Shared<PartStore>;

/// Wrap a collaborator for shared use
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
