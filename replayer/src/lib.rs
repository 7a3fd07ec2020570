//! Replays recorded BVE input sessions.
//!
//! A recording is fed to a freshly started receiver process over its stdin,
//! byte for byte, with the recorded pauses between frames reproduced so the
//! receiver cannot tell the replay from a live session.

pub mod config;
pub mod consumer;
pub mod driver;
pub mod error;
pub mod pacer;

pub use consumer::{Consumer, ConsumerCommand, ConsumerProcess};
pub use driver::{ReplayDriver, ReplaySummary};
pub use error::ReplayError;
