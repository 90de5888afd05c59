//! The session container and its observers.

pub mod session;
pub mod subscribers;

pub use session::SessionService;
pub use subscribers::{SessionEvent, SubscriberRegistry};
