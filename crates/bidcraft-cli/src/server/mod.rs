//! HTTP server exposing the learning store.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
