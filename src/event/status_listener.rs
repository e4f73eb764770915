use crate::CqEvent;

/// Callback contract driven by the CQ delivery threads.
///
/// Every method is fire-and-forget: implementations must not block the
/// delivering thread for longer than a few atomic or container operations,
/// and must not panic on unexpected input.
pub trait CqStatusListener<K>: Send + Sync {
    /// A matching event was delivered for the query
    fn on_event(&self, event: &CqEvent<K>);

    /// The query failed to process an event
    fn on_error(&self, event: &CqEvent<K>);

    /// The query's subscription connected (or reconnected) to a server
    fn on_cq_connected(&self);

    /// The query lost its last server connection
    fn on_cq_disconnected(&self);

    /// The query was closed
    fn close(&self);
}
