//! Follows an EverQuest log: who is in which guild, which items dropped,
//! and who bid what on them.
pub mod auction;
pub mod config;
pub mod engine;
pub mod event;
pub mod history;
pub mod items;
pub mod line;
pub mod service;
pub mod sink;
