use crate::prompt;
use agent::llm::{self, OpenAI};
use agent::tools::WebSearchTool;
use agent::{Agent, AgentBuilder, Error, EventSender, Result};

pub const MODELS: [&str; 5] = [
    "gpt-4.1-nano",
    "gpt-4.1-mini",
    "gpt-4.1",
    "gpt-4o-mini",
    "gpt-4o",
];

pub const GREETING: &str =
    "Hello! I'm here to help you generate research ideas. What topics are you interested in?";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AgentConfig {
    pub model: String,
    pub temperature: f32,
    pub framework: String,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if !MODELS.contains(&self.model.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "unknown model {}, expected one of: {}",
                self.model,
                MODELS.join(", ")
            )));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(Error::InvalidConfig(format!(
                "temperature {} is outside [0.0, 1.0]",
                self.temperature
            )));
        }
        Ok(())
    }
}

pub struct Credentials {
    pub openai_api_key: String,
    pub tavily_api_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |var: &str| {
            lookup(var)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::MissingCredential(var.to_string()))
        };

        Ok(Self {
            openai_api_key: require("OPENAI_API_KEY")?,
            tavily_api_key: require("TAVILY_API_KEY")?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    AwaitingInput,
    RunningLoop,
}

/// One chat session: owns the transcript and configuration, and the single
/// live agent instance built from them.
pub struct Session {
    credentials: Credentials,
    config: AgentConfig,
    agent: Agent,
    transcript: Vec<Turn>,
    state: State,
}

fn build_agent(credentials: &Credentials, config: &AgentConfig) -> Result<Agent> {
    AgentBuilder::new()
        .llm(OpenAI::new(
            config.model.clone(),
            config.temperature,
            &credentials.openai_api_key,
        ))
        .system_prompt(prompt::render_system_prompt(&config.framework))
        .tool(WebSearchTool::new(credentials.tavily_api_key.clone()))
        .build()
}

fn greeting_turn() -> Turn {
    Turn {
        role: Role::Assistant,
        text: GREETING.to_string(),
    }
}

impl Session {
    pub fn new(credentials: Credentials, config: AgentConfig) -> Result<Self> {
        config.validate()?;
        let agent = build_agent(&credentials, &config)?;

        Ok(Self {
            credentials,
            config,
            agent,
            transcript: vec![greeting_turn()],
            state: State::Idle,
        })
    }

    #[cfg(test)]
    fn with_agent(credentials: Credentials, config: AgentConfig, agent: Agent) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            credentials,
            config,
            agent,
            transcript: vec![greeting_turn()],
            state: State::Idle,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn await_input(&mut self) {
        if self.state == State::Idle {
            self.state = State::AwaitingInput;
        }
    }

    pub fn set_model(&mut self, model: &str) -> Result<()> {
        let mut config = self.config.clone();
        config.model = model.to_string();
        self.reconfigure(config)
    }

    pub fn set_temperature(&mut self, temperature: f32) -> Result<()> {
        let mut config = self.config.clone();
        config.temperature = temperature;
        self.reconfigure(config)
    }

    pub fn set_framework(&mut self, framework: &str) -> Result<()> {
        let mut config = self.config.clone();
        config.framework = framework.to_string();
        self.reconfigure(config)
    }

    /// Apply a new configuration. This is a destructive reset: the old agent
    /// is replaced and the transcript is reseeded with a single greeting.
    pub fn reconfigure(&mut self, config: AgentConfig) -> Result<()> {
        if self.state == State::RunningLoop {
            return Err(Error::TurnInProgress);
        }
        config.validate()?;
        if config == self.config {
            return Ok(());
        }

        self.agent = build_agent(&self.credentials, &config)?;
        self.config = config;
        self.transcript.clear();
        self.transcript.push(greeting_turn());

        Ok(())
    }

    /// Run one turn. The transcript always records the attempt, including
    /// failed turns; the session stays usable after an error.
    pub async fn submit(&mut self, utterance: &str, events: &EventSender) -> Result<String> {
        if self.state == State::RunningLoop {
            return Err(Error::TurnInProgress);
        }
        self.state = State::RunningLoop;

        // The in-progress turn is not part of the history the loop sees.
        let history = self.history();
        let result = self.agent.run(&history, utterance, events).await;
        self.state = State::Idle;

        self.transcript.push(Turn {
            role: Role::User,
            text: utterance.to_string(),
        });
        let reply = match &result {
            Ok(answer) => answer.clone(),
            Err(err) => failure_text(err),
        };
        self.transcript.push(Turn {
            role: Role::Assistant,
            text: reply,
        });

        result
    }

    fn history(&self) -> Vec<llm::Message> {
        self.transcript
            .iter()
            .map(|turn| match turn.role {
                Role::User => llm::Message::User(turn.text.clone()),
                Role::Assistant => llm::Message::Assistant(turn.text.clone(), vec![]),
            })
            .collect()
    }
}

fn failure_text(err: &Error) -> String {
    match err {
        Error::IterationLimit(_) => {
            "I couldn't reach a final answer within the allowed number of steps. \
             Please try rephrasing or narrowing your request."
                .to_string()
        }
        Error::SearchError(_) | Error::HttpError(_) => {
            "The web search failed, so I couldn't finish this turn. Please try again.".to_string()
        }
        _ => "I encountered an error. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{AgentConfig, Credentials, GREETING, MODELS, Role, Session, State, failure_text};
    use crate::frameworks;
    use agent::llm::{CompletionRequest, CompletionResponse, LLM};
    use agent::{Agent, AgentBuilder, Error, Result, event_channel};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    fn credentials() -> Credentials {
        Credentials {
            openai_api_key: "sk-test".to_string(),
            tavily_api_key: "tvly-test".to_string(),
        }
    }

    fn config() -> AgentConfig {
        AgentConfig {
            model: "gpt-4.1-nano".to_string(),
            temperature: 0.7,
            framework: frameworks::AUTO.to_string(),
        }
    }

    struct StubLLM {
        reply: Option<&'static str>,
        request_sizes: Mutex<Vec<usize>>,
    }

    impl StubLLM {
        fn agent(reply: Option<&'static str>) -> Result<(Arc<Self>, Agent)> {
            let llm = Arc::new(Self {
                reply,
                request_sizes: Mutex::new(Vec::new()),
            });
            let agent = AgentBuilder::new()
                .llm(llm.clone())
                .system_prompt("test prompt".to_string())
                .build()?;
            Ok((llm, agent))
        }
    }

    #[async_trait]
    impl LLM for StubLLM {
        async fn completion<'a>(
            &self,
            request: CompletionRequest<'a>,
        ) -> Result<CompletionResponse> {
            self.request_sizes
                .lock()
                .unwrap()
                .push(request.messages.len());
            match self.reply {
                Some(reply) => Ok(CompletionResponse {
                    content: reply.to_string(),
                    tool_calls: vec![],
                }),
                None => Err(Error::LLMResponseError("backend down".to_string())),
            }
        }
    }

    #[test]
    fn test_construction_is_offline_for_all_models() -> Result<()> {
        for model in MODELS {
            let session = Session::new(
                credentials(),
                AgentConfig {
                    model: model.to_string(),
                    temperature: 0.0,
                    framework: frameworks::CATALOG[0].label(),
                },
            )?;
            assert_eq!(session.state(), State::Idle);
        }
        Ok(())
    }

    #[test]
    fn test_greeting_seeded_on_new() -> Result<()> {
        let session = Session::new(credentials(), config())?;

        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role, Role::Assistant);
        assert_eq!(session.transcript()[0].text, GREETING);

        Ok(())
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            Session::new(
                credentials(),
                AgentConfig {
                    model: "gpt-2".to_string(),
                    ..config()
                }
            ),
            Err(Error::InvalidConfig(_))
        ));

        for temperature in [-0.1, 1.1] {
            assert!(matches!(
                Session::new(
                    credentials(),
                    AgentConfig {
                        temperature,
                        ..config()
                    }
                ),
                Err(Error::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_missing_credentials_independently() {
        let result = Credentials::from_lookup(|var| match var {
            "TAVILY_API_KEY" => Some("tvly-test".to_string()),
            _ => None,
        });
        assert!(matches!(
            result,
            Err(Error::MissingCredential(var)) if var == "OPENAI_API_KEY"
        ));

        let result = Credentials::from_lookup(|var| match var {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        });
        assert!(matches!(
            result,
            Err(Error::MissingCredential(var)) if var == "TAVILY_API_KEY"
        ));

        let result = Credentials::from_lookup(|var| match var {
            "OPENAI_API_KEY" => Some(String::new()),
            _ => Some("tvly-test".to_string()),
        });
        assert!(matches!(result, Err(Error::MissingCredential(_))));

        assert!(Credentials::from_lookup(|_| Some("value".to_string())).is_ok());
    }

    #[test]
    fn test_reconfigure_reseeds_single_greeting() -> Result<()> {
        let mut session = Session::new(credentials(), config())?;
        session.transcript.push(super::Turn {
            role: Role::User,
            text: "old question".to_string(),
        });
        session.transcript.push(super::Turn {
            role: Role::Assistant,
            text: "old answer".to_string(),
        });

        session.set_model("gpt-4o")?;

        assert_eq!(session.config().model, "gpt-4o");
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].text, GREETING);

        Ok(())
    }

    #[test]
    fn test_reconfigure_same_config_keeps_transcript() -> Result<()> {
        let mut session = Session::new(credentials(), config())?;
        session.transcript.push(super::Turn {
            role: Role::User,
            text: "question".to_string(),
        });

        session.set_temperature(0.7)?;

        assert_eq!(session.transcript().len(), 2);
        Ok(())
    }

    #[test]
    fn test_each_field_change_resets() -> Result<()> {
        let changes: [fn(&mut Session) -> Result<()>; 3] = [
            |s| s.set_model("gpt-4o-mini"),
            |s| s.set_temperature(0.2),
            |s| s.set_framework("PICO | components | disciplines"),
        ];
        for apply in changes {
            let mut session = Session::new(credentials(), config())?;
            session.transcript.push(super::Turn {
                role: Role::User,
                text: "question".to_string(),
            });

            apply(&mut session)?;

            assert_eq!(session.transcript().len(), 1);
            assert_eq!(session.transcript()[0].text, GREETING);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_records_exchange() -> Result<()> {
        let (llm, agent) = StubLLM::agent(Some("here are some ideas"))?;
        let mut session = Session::with_agent(credentials(), config(), agent)?;
        let (tx, _rx) = event_channel();

        let answer = session.submit("microplastics", &tx).await?;

        assert_eq!(answer, "here are some ideas");
        assert_eq!(session.state(), State::Idle);

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].role, Role::User);
        assert_eq!(transcript[1].text, "microplastics");
        assert_eq!(transcript[2].role, Role::Assistant);
        assert_eq!(transcript[2].text, "here are some ideas");

        // system + greeting + utterance, nothing from the in-progress turn
        assert_eq!(*llm.request_sizes.lock().unwrap(), vec![3]);

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_turn_recorded_and_session_continues() -> Result<()> {
        let (_llm, agent) = StubLLM::agent(None)?;
        let mut session = Session::with_agent(credentials(), config(), agent)?;
        let (tx, _rx) = event_channel();

        let result = session.submit("microplastics", &tx).await;

        assert!(result.is_err());
        assert_eq!(session.state(), State::Idle);

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[2].role, Role::Assistant);
        assert_eq!(
            transcript[2].text,
            failure_text(&Error::LLMResponseError("backend down".to_string()))
        );

        Ok(())
    }

    #[test]
    fn test_failure_text_by_error_kind() {
        assert!(failure_text(&Error::IterationLimit(10)).contains("number of steps"));
        assert!(failure_text(&Error::SearchError("quota".to_string())).contains("web search"));
        assert!(
            failure_text(&Error::LLMResponseError("x".to_string())).contains("encountered an error")
        );
    }
}
