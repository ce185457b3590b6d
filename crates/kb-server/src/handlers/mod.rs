//! HTTP request handlers.

pub(crate) mod data;
pub(crate) mod events;
pub(crate) mod search;
pub(crate) mod shell;
