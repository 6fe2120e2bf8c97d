mod agent;
mod error;
mod events;
pub mod llm;
pub mod tools;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use agent::{Agent, AgentBuilder, DEFAULT_MAX_ITERATIONS};
pub use events::{AgentEvent, EventSender, event_channel};
