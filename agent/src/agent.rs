use crate::events::{AgentEvent, EventSender};
use crate::llm;
use crate::tools;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_MAX_ITERATIONS: usize = 10;

const RECOVERY_PROMPT: &str = "Your last reply contained neither a final answer nor a tool call. \
Reply with your final answer for the user, or request one of the available tools.";

type Tool = Box<dyn tools::Tool + Send>;

/// A tool-using conversation loop bounded by a fixed iteration cap.
///
/// One call to [`Agent::run`] handles one turn: the transcript so far plus the
/// latest user utterance go in, progress events stream out, and the run future
/// resolves with the final answer or a terminal error for that turn. Tool
/// calls and their results stay inside the run; the caller owns the durable
/// transcript.
pub struct Agent {
    llm: Arc<dyn llm::LLM + Send + Sync>,
    system_prompt: String,
    tools: HashMap<String, Tool>,
    tool_defs: Vec<tools::ToolDefinition>,
    max_iterations: usize,
}

impl Agent {
    pub async fn run(
        &mut self,
        transcript: &[llm::Message],
        utterance: &str,
        events: &EventSender,
    ) -> Result<String> {
        let mut messages = Vec::with_capacity(transcript.len() + 2);
        messages.push(llm::Message::System(self.system_prompt.clone()));
        messages.extend_from_slice(transcript);
        messages.push(llm::Message::User(utterance.to_string()));

        for iteration in 0..self.max_iterations {
            tracing::debug!(iteration, "requesting completion");

            let next = self
                .llm
                .completion(llm::CompletionRequest {
                    messages: &messages,
                    tools: &self.tool_defs,
                })
                .await?;

            messages.push(llm::Message::Assistant(
                next.content.clone(),
                next.tool_calls.clone(),
            ));

            if next.tool_calls.is_empty() {
                if next.content.trim().is_empty() {
                    // Neither an answer nor a tool call: re-prompt and let the
                    // iteration cap bound the retries.
                    tracing::warn!(iteration, "unparseable completion, re-prompting");
                    messages.push(llm::Message::User(RECOVERY_PROMPT.to_string()));
                    continue;
                }

                let _ = events.send(AgentEvent::AnswerFragment(next.content.clone()));
                return Ok(next.content);
            }

            for tool_call in &next.tool_calls {
                messages = self.execute_tool_call(tool_call, messages, events).await?;
            }
        }

        Err(Error::IterationLimit(self.max_iterations))
    }

    async fn execute_tool_call(
        &mut self,
        tool_call: &tools::ToolCall,
        mut messages: Vec<llm::Message>,
        events: &EventSender,
    ) -> Result<Vec<llm::Message>> {
        let Some(tool) = self.tools.get_mut(&tool_call.name) else {
            // A call to an unregistered tool is malformed output, not a tool
            // failure: answer the call with an observation and keep going.
            tracing::warn!(tool = %tool_call.name, "unknown tool requested");
            messages.push(llm::Message::Tool {
                id: tool_call.id.clone(),
                name: tool_call.name.clone(),
                result: format!(
                    "There is no tool named {}. Use one of the available tools or reply with your final answer.",
                    tool_call.name
                ),
            });
            return Ok(messages);
        };

        let _ = events.send(AgentEvent::ToolCallRequested {
            name: tool_call.name.clone(),
            input: tool_call.args.clone(),
        });
        tracing::info!(tool = %tool_call.name, "invoking tool");

        match tool.invoke(tool_call, messages.clone()).await {
            Ok(messages) => {
                if let Some(llm::Message::Tool { result, .. }) = messages.last() {
                    let _ = events.send(AgentEvent::ToolResult {
                        output: result.clone(),
                    });
                }
                Ok(messages)
            }
            Err(Error::JsonError(err)) => {
                // Unparseable arguments are also malformed output.
                tracing::warn!(tool = %tool_call.name, %err, "bad tool arguments, re-prompting");
                messages.push(llm::Message::Tool {
                    id: tool_call.id.clone(),
                    name: tool_call.name.clone(),
                    result: format!(
                        "The arguments for {} could not be parsed: {}. Call it again with valid arguments.",
                        tool_call.name, err
                    ),
                });
                Ok(messages)
            }
            Err(err) => Err(err),
        }
    }
}

pub struct AgentBuilder {
    llm: Option<Arc<dyn llm::LLM + Send + Sync>>,
    system_prompt: Option<String>,
    tools: Vec<Tool>,
    max_iterations: usize,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            llm: None,
            system_prompt: None,
            tools: Vec::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn llm(mut self, llm: Arc<dyn llm::LLM + Send + Sync>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn system_prompt(mut self, prompt: String) -> Self {
        self.system_prompt = Some(prompt);
        self
    }

    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let mut tool_defs = Vec::new();
        let mut tools = HashMap::new();

        for tool in self.tools {
            let def = tool.definition()?;
            tools.insert(def.name.clone(), tool);
            tool_defs.push(def);
        }

        Ok(Agent {
            llm: self
                .llm
                .ok_or(Error::MissingArg("llm is required for agent".to_string()))?,
            system_prompt: self.system_prompt.ok_or(Error::MissingArg(
                "system_prompt is required for agent".to_string(),
            ))?,
            tools,
            tool_defs,
            max_iterations: self.max_iterations,
        })
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
