//! Gambo Admin library.
//!
//! Back-office functionality: reporting, order management, catalog and
//! offer administration. Exposed as a library so the handlers can be
//! tested without the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
