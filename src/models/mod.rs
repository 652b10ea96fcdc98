mod message;
mod request;

pub use message::{Message, MessageRole};
pub use request::{ChatRequest, DEFAULT_MODEL};
