//! Mock implementations of external collaborators

pub mod mock_bot_api;

pub use mock_bot_api::MockBotApi;
