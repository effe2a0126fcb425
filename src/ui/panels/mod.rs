// MediAdmin - ui/panels/mod.rs

pub mod actions;
pub mod filters;
pub mod modals;
pub mod nav;
pub mod notifications;
pub mod stats;
pub mod table;
