//! Prelude module - commonly used types for convenient import.
//!
//! Use `use pulse_gateway::prelude::*;` to import all essential types.

// Errors
pub use crate::{GatewayError, GatewayResult};

// Client
pub use crate::{GatewayClient, GatewayConfig, ReconnectPolicy, Snapshot};

// Notifications
pub use crate::{ConnectionState, GatewayEvent, Severity};

// Presence
pub use crate::{Activity, ActivityKind, Presence, SessionIdentity, Status};
