//! Database query modules.
//!
//! One module per table. Each exposes insert, get, list (newest first) and
//! delete; clients and services also support update.

pub mod banners;
pub mod clients;
pub mod services;
