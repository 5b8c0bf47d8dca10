//! HTTP transport for the solar insolation API.
//!
//! The router lives in the library target so integration tests can drive it
//! in-process; `main` only wires config, clients, and the listener.

pub mod routes;
