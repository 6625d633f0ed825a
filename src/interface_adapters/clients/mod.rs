// Clients for the external chat and prediction services.

pub mod chat_bot;
pub mod predictions;

pub use chat_bot::ChatBotClient;
pub use predictions::PredictionClient;
