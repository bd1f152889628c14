//! Blogging tool - a CRUD backend for a blogging platform
//!
//! Users own email accounts, email accounts own blogs, blogs own articles
//! and articles collect comments and likes. Deleting any row removes
//! everything below it through the schema's cascading foreign keys.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
