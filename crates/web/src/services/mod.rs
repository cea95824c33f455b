//! Application services: authentication and media storage.

pub mod auth;
pub mod media;
