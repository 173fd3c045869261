use chrono::{DateTime, Utc};

/// A domain event emitted by an aggregate's decision logic.
///
/// Events are facts: they are applied to the in-memory aggregate and logged,
/// while the aggregate snapshot is what gets persisted.
pub trait DomainEvent: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "inventory.items.reserved").
    fn event_type(&self) -> &'static str;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
