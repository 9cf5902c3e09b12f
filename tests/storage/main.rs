//! Integration tests for Layer 1: Storage
//!
//! Tests for the entity pool, registries, relations, and world state.

mod relations;
mod world;
