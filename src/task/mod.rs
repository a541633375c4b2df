//! Task orchestration on kanban boards.
//!
//! Tasks live in board columns, ordered by fractional positions, and may be
//! blocked by other tasks. When a human answers a task that is waiting on
//! input and mentions the agent, the resume trigger moves the task back into
//! progress and relaunches the agent session that asked. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
