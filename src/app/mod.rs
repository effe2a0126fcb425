// MediAdmin - app/mod.rs
//
// Application layer: backend access, background loading, list view
// controllers, notifications and translations.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod backend;
pub mod http;
pub mod i18n;
pub mod loader;
pub mod notifications;
pub mod stats;
pub mod view;
