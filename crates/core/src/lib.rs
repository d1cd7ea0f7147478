pub mod command;
pub mod dispatch;
pub mod executor;
pub mod handler;
pub mod parser;

pub use command::{Command, CommandKind, ExecutionBatch, TaskOutcome};
pub use dispatch::{dispatch, DispatchPlan};
pub use executor::Executor;
pub use handler::{Handler, HandlerError, HandlerRegistry};
pub use parser::parse;
