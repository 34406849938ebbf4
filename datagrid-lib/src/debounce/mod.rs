//! Debounced value propagation.
//!
//! A [`Debouncer`] sits between a rapidly changing input (keystrokes in a
//! search box, toggles in a filter panel) and whatever reacts to it. Only a
//! value that stays unchanged for the whole quiescence window is promoted to
//! the stable value and delivered to subscribers.

mod debouncer;
mod subscription;

pub use debouncer::DEFAULT_WINDOW;
pub use debouncer::Debouncer;
pub use subscription::Subscription;
