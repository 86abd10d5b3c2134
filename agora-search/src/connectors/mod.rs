//! Concrete connector implementations.
//!
//! Product sources are consumed through the [`crate::connector::Connector`]
//! trait; this module holds the implementations shipped with the engine.
//! [`rest::RestConnector`] covers any source that exposes a JSON search
//! endpoint, which in practice is all of them.

pub mod rest;

pub use rest::RestConnector;
