//! HTTP route handlers

pub mod board;
pub mod session;
pub mod shapes;
pub mod status;
