// MediAdmin - platform/mod.rs
//
// Platform layer: configuration directories and config.toml loading.

pub mod config;
