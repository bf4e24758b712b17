// Read-only review listing and per-business statistics.

pub mod handlers;
pub mod service;
