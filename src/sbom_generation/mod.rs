//! Core of the tool: the package record model, the graph passes that turn
//! raw package sets into a consistent working set, and BOM assembly.

pub mod domain;
pub mod policies;
pub mod services;
