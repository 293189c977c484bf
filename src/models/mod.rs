pub mod analysis;
pub mod chat;
pub mod common;
pub mod med42;
pub mod webhook;
