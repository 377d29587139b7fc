//! Infrastructure layer for botdesk.
//!
//! Contains implementations of the ports defined in `botdesk-core`: the
//! reqwest-based platform client (with SSE decoding for chat), file and
//! environment credential stores, and the config/data-dir loaders.

pub mod config;
pub mod credentials;
pub mod http;
