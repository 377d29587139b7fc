//! Interactive chat: conversation state, the streamed-turn service, and
//! the shared session feed.

pub mod conversation;
pub mod service;
pub mod session_feed;
