//! Integration tests for Gambo Commerce.
//!
//! The tests in `tests/` exercise the storefront and admin JSON APIs over
//! HTTP. They are all `#[ignore]`d by default because they need live
//! servers and a migrated database.
//!
//! # Running Tests
//!
//! ```bash
//! # Start a local PostgreSQL, point GAMBO_DATABASE_URL at it, then
//! # apply migrations and load demo data
//! cargo run -p gambo-cli -- migrate
//! cargo run -p gambo-cli -- seed
//!
//! # Start both servers
//! cargo run -p gambo-storefront &
//! cargo run -p gambo-admin &
//!
//! # Run the ignored tests
//! cargo test -p gambo-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `GAMBO_DATABASE_URL` (or `DATABASE_URL`) - connection string, used by
//!   tests that mutate seeded rows directly
//! - `STOREFRONT_BASE_URL` - storefront base URL (default `http://localhost:3000`)
//! - `ADMIN_BASE_URL` - admin base URL (default `http://localhost:3001`)
//! - `ADMIN_TEST_EMAIL` / `ADMIN_TEST_PASSWORD` - credentials for an existing
//!   admin account (create one with `gambo-cli admin create`)
