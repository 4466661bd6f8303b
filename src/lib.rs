//! Fail-fast service startup: connect the datastore, then expose the listener.

pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod startup;
pub mod state;
