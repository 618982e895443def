//! Application services layer.

pub mod admin;
pub mod compose;
pub mod error;
pub mod feed;
pub mod repos;
