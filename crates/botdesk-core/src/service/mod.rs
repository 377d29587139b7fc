//! Use cases behind each console command.
//!
//! Services validate input, call the platform through the `PlatformApi`
//! port, and keep follow-up refreshes in one place. They depend on traits
//! (ports) -- never on concrete infrastructure implementations.

pub mod auth;
pub mod chatbot;
pub mod embed;
pub mod knowledge;
