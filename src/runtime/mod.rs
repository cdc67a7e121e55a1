//! Runtime Module
//!
//! Hosting for a round outside the pure simulation:
//!
//! - `session`: Round session (keyboard + world + renderer + recorder)
//! - `driver`: Wall-clock frame loop on tokio

pub mod session;
pub mod driver;

pub use session::{FrameOutput, RoundSession, SessionError};
pub use driver::{DriverEvent, DriverOutcome, FrameSink, RealtimeDriver, StopReason, TracingSink};
