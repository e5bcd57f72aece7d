//! Dispatcher: synchronous fan-out and sequential waterfall.
//!
//! Both modes work on a snapshot of the event's entries taken when the
//! publish starts. Subscriptions and removals made while the publish is in
//! flight only affect later publishes. Once-entries are removed from the
//! live registry right before they are invoked, in both modes.

mod fanout;
mod invocation;
mod pending;
mod waterfall;

pub use invocation::{Invocation, Next};
pub use pending::PendingPublish;

pub(crate) use fanout::fan_out;
pub(crate) use waterfall::start as start_waterfall;
