//! Command implementations for the channelsync CLI

pub mod agent;
pub mod bootstrap;
pub mod canonicalize;
pub mod catalog;
pub mod completions;
pub mod helpers;
pub mod login;
pub mod reconcile;
pub mod version;
