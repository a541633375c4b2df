//! Unit tests for the task module.
//!
//! Tests are organised by domain concept: identifiers and aggregates,
//! reference resolution, fractional positions, the dependency graph, wire
//! normalization, resume commands and the orchestration services.
