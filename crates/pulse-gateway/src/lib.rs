//! Pulse Gateway - presence client for the real-time gateway protocol.
//!
//! This crate keeps one authenticated gateway connection alive and turns
//! what arrives on it into typed notifications:
//! - Handshake (Hello, Identify, `READY`) driven by a pure state machine
//! - Periodic heartbeats carrying the last sequence number
//! - `PRESENCE_UPDATE` tracking for the authenticated user
//! - Outbound presence updates (set or clear an activity)
//! - Fixed-delay reconnection while a token is held
//!
//! # Architecture
//!
//! ```text
//! GatewayClient (handle)
//! └── actor task (owns all state)
//!     ├── machine      pure (state, input) -> (state, effects)
//!     ├── session      sequence, identity, presence
//!     ├── router       READY / PRESENCE_UPDATE -> session
//!     ├── heartbeat    periodic tick task
//!     ├── reconnect    fixed-delay retry timer
//!     └── connection   WebSocket reader + writer tasks
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use pulse_gateway::prelude::*;
//!
//! # async fn example() -> GatewayResult<()> {
//! let client = GatewayClient::spawn(GatewayConfig::default());
//! let mut events = client.subscribe();
//!
//! client.connect("my-token").await?;
//! while let Ok(event) = events.recv().await {
//!     if let GatewayEvent::StatusChanged(ConnectionState::Connected) = event {
//!         client
//!             .set_activity(ActivityKind::Playing, "Chess", None, None)
//!             .await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod client;
pub mod config;
mod connection;
pub mod error;
pub mod events;
pub mod heartbeat;
pub mod machine;
pub mod presence;
pub mod protocol;
pub mod reconnect;
pub mod router;
pub mod session;

pub use client::{GatewayClient, Snapshot};
pub use config::GatewayConfig;
pub use error::{DecodeError, GatewayError, GatewayResult};
pub use events::{GatewayEvent, Severity};
pub use machine::ConnectionState;
pub use presence::{Activity, ActivityKind, Presence, Status};
pub use reconnect::ReconnectPolicy;
pub use session::SessionIdentity;
