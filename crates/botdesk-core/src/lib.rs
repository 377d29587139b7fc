//! Client logic and port definitions for botdesk.
//!
//! This crate defines the "ports" the infrastructure layer implements (the
//! platform API and the credential store) and the console's own logic on
//! top of them: conversation state, pagination, the session refresh feed,
//! and the services each command drives. It depends only on
//! `botdesk-types` -- never on `botdesk-infra` or an HTTP client.

pub mod api;
pub mod chat;
pub mod credentials;
pub mod pagination;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
