pub mod chat;
pub mod classifier;
pub mod image;
pub mod openai_compatible;
pub mod realtime;
pub mod traits;

pub use chat::AssistantChat;
pub use classifier::DecisionClassifier;
pub use image::ImageGenerator;
pub use openai_compatible::OpenAICompatibleModel;
pub use realtime::RealtimeChat;
pub use traits::{ChatModel, Message, ProviderError};
