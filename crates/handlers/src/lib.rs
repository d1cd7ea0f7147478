pub mod apps;
pub mod content;
pub mod media;
pub mod os;
pub mod search;
pub mod system;
pub mod web;

pub use apps::{CloseAppHandler, OpenAppHandler};
pub use content::{ContentGenerator, WriteContentHandler};
pub use media::PlayMediaHandler;
pub use os::{OsError, OsResult};
pub use search::{VideoSearchHandler, WebSearchHandler};
pub use system::SystemCommandHandler;
