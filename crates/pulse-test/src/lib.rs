//! Pulse Test - Shared test utilities for the Pulse workspace.
//!
//! This crate provides a scripted gateway server, canned protocol frames,
//! and small async helpers that can be used across Pulse crates as a
//! dev-dependency.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! pulse-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! use pulse_test::{MockGateway, fixtures};
//!
//! #[tokio::test]
//! async fn handshake() {
//!     let gateway = MockGateway::bind().await.unwrap();
//!     // point a client at gateway.url() and connect ...
//!     let mut session = gateway.accept().await.unwrap();
//!     session.send_json(&fixtures::hello(50)).await.unwrap();
//!     let identify = session.recv_op(2).await.unwrap();
//!     assert_eq!(identify["d"]["token"], "test-token");
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;
pub mod mock_gateway;

pub use harness::*;
pub use mock_gateway::*;
