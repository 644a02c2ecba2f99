// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod app;
pub mod config;
pub mod draft;
pub mod players;
pub mod protocol;
pub mod rankings;
pub mod ws_server;
