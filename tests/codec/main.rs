//! Integration tests for the document codec
//!
//! Worlds are captured, replayed into fresh or populated destinations, and
//! checked component by component.

mod errors;
mod filters;
