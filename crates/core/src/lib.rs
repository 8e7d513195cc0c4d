//! # Cek Fakta Core
//!
//! Domain types, traits, and error definitions for the medical fact-checking
//! agent. This crate has no HTTP or framework dependencies; it defines the
//! model every other crate implements against.
//!
//! - [`Provider`] abstracts the hosted language model.
//! - [`Tool`] abstracts a named capability the agent loop can invoke.
//! - [`Conversation`] is the append-only log of user/assistant turns.
//! - [`EventBus`] carries domain events to whoever wants to watch a turn.

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use event::{DomainEvent, EventBus};
pub use message::{Conversation, ConversationId, ConversationTurn, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use tool::{Tool, ToolRegistry, ToolResult};
