//! API Routes
//!
//! Route handlers organized by functionality.

pub mod admin;
pub mod auth;
pub mod content;
pub mod dashboard;
pub mod email;
pub mod health;
pub mod quotes;
pub mod site;
