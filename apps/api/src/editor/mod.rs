//! Document editor: typed edit commands, section navigation and per-user sessions.

pub mod commands;
pub mod handlers;
pub mod registry;
pub mod sections;
pub mod service;
pub mod session;
