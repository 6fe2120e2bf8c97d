use async_openai::error::OpenAIError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Openai error: {0}")]
    OpenaiError(#[from] OpenAIError),

    #[error("No response from llm: {0}")]
    LLMResponseError(String),

    #[error("Tool {0} does not exist")]
    ToolDoesNotExist(String),

    #[error("Search request failed: {0}")]
    SearchError(String),

    #[error("Http error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Missing arg: {0}")]
    MissingArg(String),

    #[error("Missing credential: the {0} environment variable is not set")]
    MissingCredential(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Agent reached the limit of {0} iterations without a final answer")]
    IterationLimit(usize),

    #[error("A turn is already in progress")]
    TurnInProgress,

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
}
