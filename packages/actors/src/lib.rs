//! Actor system for the grading dispatcher.
//!
//! This crate provides the Ractor-based actor that owns all mutable job
//! state and enforces the scoring concurrency cap.
//!
//! # Architecture
//!
//! - `DispatcherActor` - owns the job store and the pending queue, pulls
//!   queued jobs while a slot is free, and runs the reaper
//! - `registry` - process-scoped slot that pins the single dispatcher
//!
//! # Usage
//!
//! ```ignore
//! use actors::{DispatcherMessage, start_dispatcher};
//!
//! // Start the dispatcher
//! let (dispatcher, handle) = start_dispatcher(config, grader).await?;
//!
//! // Enqueue work via message
//! dispatcher.send_message(DispatcherMessage::Submit { .. })?;
//! ```

mod dispatcher;
mod messages;
mod reaper;
pub mod registry;

pub use dispatcher::{DispatcherActor, DispatcherState, start_dispatcher};
pub use messages::{DispatchError, DispatcherMessage};
pub use registry::{DispatcherRegistry, global_registry};

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort, concurrency};
