//! Gateway: the bridge between chat transports and the agent, plus the
//! channel transports themselves.

pub mod bridge;
pub mod channels;
pub mod utils;

pub use bridge::AgentBridge;
