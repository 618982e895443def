//! Gazette: categorised articles served through a public site and a
//! table-editor admin surface.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
