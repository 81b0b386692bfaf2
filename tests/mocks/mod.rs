//! Shared test infrastructure for the e2e suite

#![allow(dead_code)]

pub mod test_server;

pub use test_server::TestServer;
