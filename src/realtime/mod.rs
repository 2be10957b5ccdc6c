//! Real-time Module
//!
//! Row-change fan-out for open chat views. Writers publish a
//! `ChangeEvent` after every successful message mutation; subscribed
//! clients receive it over SSE and re-fetch the affected conversation.
//! Delivery is best-effort and unordered: events carry no payload
//! beyond table/scope/op, so a missed or lagged event is healed by the
//! next full re-fetch.

/// Change events and the broadcast channel
pub mod broadcast;

/// SSE subscription handler
pub mod subscription;

pub use broadcast::{broadcast_change, ChangeBroadcast, ChangeEvent, ChangeOp};
pub use subscription::handle_realtime_subscription;
