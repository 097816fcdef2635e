//! Element identifiers and the factories that mint them.
//!
//! Every feature, constraint and model carries an [`Identifier`]. A model
//! draws fresh identifiers from an injected [`IdentifierFactory`], so the
//! numbering strategy can be swapped without touching the model code.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Process-wide sequence shared by all [`CounterIdentifierFactory::new`] factories.
static NEXT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a model element.
///
/// # Example
///
/// ```
/// use featureforge_core::identifier::{CounterIdentifierFactory, IdentifierFactory};
///
/// let mut factory = CounterIdentifierFactory::starting_at(7);
/// let a = factory.next_identifier();
/// let b = factory.next_identifier();
/// assert_ne!(a, b);
/// assert_eq!(a.to_string(), "7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Identifier {
    /// Sequential numeric identifier.
    Counter(u64),
    /// Random v4 UUID.
    Uuid(Uuid),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Counter(n) => write!(f, "{n}"),
            Identifier::Uuid(u) => write!(f, "{}", u.hyphenated()),
        }
    }
}

/// Mints identifiers that are unique for the lifetime of a model.
pub trait IdentifierFactory: Send + Sync + fmt::Debug {
    /// Returns a fresh identifier.
    fn next_identifier(&mut self) -> Identifier;

    /// Clones this factory behind a new box.
    fn box_clone(&self) -> Box<dyn IdentifierFactory>;
}

impl Clone for Box<dyn IdentifierFactory> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Counter-based identifiers.
///
/// [`CounterIdentifierFactory::new`] draws from a process-wide sequence, so
/// identifiers from different models never collide and models can be mounted
/// into each other. [`CounterIdentifierFactory::starting_at`] keeps a private
/// sequence, which is useful for reproducible numbering in tests.
#[derive(Debug, Clone, Default)]
pub struct CounterIdentifierFactory {
    local: Option<u64>,
}

impl CounterIdentifierFactory {
    /// Creates a factory backed by the shared sequence.
    pub fn new() -> Self {
        Self { local: None }
    }

    /// Creates a factory with a private sequence beginning at `start`.
    pub fn starting_at(start: u64) -> Self {
        Self { local: Some(start) }
    }
}

impl IdentifierFactory for CounterIdentifierFactory {
    fn next_identifier(&mut self) -> Identifier {
        match self.local.as_mut() {
            Some(next) => {
                let id = *next;
                *next += 1;
                Identifier::Counter(id)
            }
            None => Identifier::Counter(NEXT_COUNTER.fetch_add(1, Ordering::Relaxed)),
        }
    }

    fn box_clone(&self) -> Box<dyn IdentifierFactory> {
        Box::new(self.clone())
    }
}

/// Random UUID identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdentifierFactory;

impl IdentifierFactory for UuidIdentifierFactory {
    fn next_identifier(&mut self) -> Identifier {
        Identifier::Uuid(Uuid::new_v4())
    }

    fn box_clone(&self) -> Box<dyn IdentifierFactory> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_counter_is_sequential() {
        let mut factory = CounterIdentifierFactory::starting_at(1);
        assert_eq!(factory.next_identifier(), Identifier::Counter(1));
        assert_eq!(factory.next_identifier(), Identifier::Counter(2));
    }

    #[test]
    fn test_shared_counter_never_repeats() {
        let mut a = CounterIdentifierFactory::new();
        let mut b = CounterIdentifierFactory::new();
        let ids = [a.next_identifier(), b.next_identifier(), a.next_identifier()];
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }

    #[test]
    fn test_uuid_identifiers_differ() {
        let mut factory = UuidIdentifierFactory;
        let a = factory.next_identifier();
        let b = factory.next_identifier();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 36);
    }

    #[test]
    fn test_boxed_clone_continues_private_sequence() {
        let mut factory: Box<dyn IdentifierFactory> =
            Box::new(CounterIdentifierFactory::starting_at(10));
        factory.next_identifier();
        let mut copy = factory.clone();
        assert_eq!(copy.next_identifier(), Identifier::Counter(11));
    }
}
