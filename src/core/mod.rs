// MediAdmin - core/mod.rs
//
// Core business logic layer: data model, access checks, filter and table
// state, timers. Pure logic.
// Must NOT depend on: ui, platform, app, or any I/O crate directly.

pub mod access;
pub mod filter;
pub mod model;
pub mod pointer;
pub mod table;
pub mod timer;
