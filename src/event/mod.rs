mod cq_event;
mod operation;
mod status_listener;

pub use cq_event::CqEvent;
pub use operation::Operation;
pub use status_listener::CqStatusListener;
