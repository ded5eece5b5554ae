//! Change notification: ordered callback lists.

mod observers;

pub use observers::{Observers, SubscriptionId};
