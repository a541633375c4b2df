//! Tasklane: orchestration core for agent-driven kanban boards.
//!
//! This crate provides the logic that sits between a task store and the AI
//! agents working on it: resolving loose task references, keeping columns
//! ordered without renumbering, tracking blocking dependencies, and resuming
//! agent sessions when a human replies to a question.
//!
//! # Architecture
//!
//! Tasklane follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory stores, process
//!   execution)
//!
//! # Modules
//!
//! - [`config`]: Explicit service configuration
//! - [`task`]: Tasks, boards, comments and the services acting on them

pub mod config;
pub mod task;
