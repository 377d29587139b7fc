//! HTTP adapter for the chatbot platform.

pub mod client;
pub mod error;
pub mod sse;

pub use client::HttpPlatformClient;
