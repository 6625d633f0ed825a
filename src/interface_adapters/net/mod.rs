// Network adapter modules split by viewer sockets vs plain HTTP routes.

pub mod client;
pub mod internal;

pub use client::{spawn_match_serializer, ws_handler};
pub use internal::state_handler;
