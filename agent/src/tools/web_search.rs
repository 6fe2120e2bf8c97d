use crate::llm::Message;
use crate::tools::{FunctionalTool, ToolCall, ToolDefinition};
use crate::{Error, Result};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";
const MAX_RESULTS: usize = 5;

/// Web search backed by the Tavily API, returning ranked result snippets.
pub struct WebSearchTool {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Deserialize, JsonSchema)]
struct SearchArgs {
    /// The search query.
    query: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    title: String,
    url: String,
    content: String,
}

impl WebSearchTool {
    pub fn new(api_key: String) -> Box<Self> {
        Box::new(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }

    async fn search(&self, query: &str) -> Result<String> {
        tracing::debug!(query, "web search");

        let response = self
            .client
            .post(TAVILY_ENDPOINT)
            .json(&serde_json::json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": MAX_RESULTS,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::SearchError(format!(
                "search provider returned status {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await?;

        Ok(format_results(&body))
    }
}

fn format_results(response: &SearchResponse) -> String {
    if response.results.is_empty() {
        return "No search results found.".to_string();
    }

    let mut s = String::new();
    for (rank, result) in response.results.iter().take(MAX_RESULTS).enumerate() {
        s.push_str(&format!(
            "{}. {} ({})\n{}\n\n",
            rank + 1,
            result.title,
            result.url,
            result.content
        ));
    }
    s
}

#[async_trait]
impl FunctionalTool for WebSearchTool {
    fn definition(&self) -> Result<ToolDefinition> {
        ToolDefinition::new::<SearchArgs>(
            "web_search",
            "Search the web for recent trends and articles. Returns up to 5 ranked result snippets.",
        )
    }

    async fn invoke_fn(&mut self, call: &ToolCall) -> Result<Message> {
        let args: SearchArgs = call.args()?;
        let result = self.search(&args.query).await?;

        Ok(Message::Tool {
            id: call.id.clone(),
            name: "web_search".to_string(),
            result,
        })
    }
}
