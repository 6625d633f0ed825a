// Interface adapters: wire protocol, viewer networking, and external service clients.

pub mod clients;
pub mod http;
pub mod net;
pub mod protocol;
pub mod state;
pub mod utils;
