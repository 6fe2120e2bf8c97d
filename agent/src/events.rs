use tokio::sync::mpsc;

/// Progress events emitted while a turn is running, in the order they occur.
/// A run ends with either a final answer or an error on the run future; the
/// event stream itself carries no terminal marker.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    ToolCallRequested { name: String, input: String },
    ToolResult { output: String },
    AnswerFragment(String),
}

pub type EventSender = mpsc::UnboundedSender<AgentEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<AgentEvent>;

/// Unbounded so the loop never blocks on a slow renderer.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
