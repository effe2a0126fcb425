// MediAdmin - ui/mod.rs
//
// UI layer: presentation only.
// Dependencies: app (view controllers), core (read-only models), egui.
// Must NOT depend on: platform, direct I/O.

pub mod columns;
pub mod panels;
pub mod theme;
