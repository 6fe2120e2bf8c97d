mod chat;
mod frameworks;
mod prompt;
mod session;

use clap::Parser;
use session::{AgentConfig, Credentials, Session};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "novelix", about = "Research idea generation AI agent")]
struct Cli {
    /// Model to use
    #[arg(long, default_value = "gpt-4.1-nano")]
    model: String,

    /// Sampling temperature in [0.0, 1.0]
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,

    /// Research framework: "auto", a name like "PICO", or a catalog index
    #[arg(long, default_value = "auto")]
    framework: String,
}

#[tokio::main]
async fn main() -> agent::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("Set OPENAI_API_KEY and TAVILY_API_KEY in the environment before starting Novelix.");
            std::process::exit(1);
        }
    };

    let framework = match frameworks::resolve(&cli.framework) {
        Some(framework) => framework,
        None => {
            eprintln!(
                "Unknown framework: {}. Use \"auto\", a framework name like \"PICO\", or a catalog index.",
                cli.framework
            );
            std::process::exit(1);
        }
    };

    let mut session = Session::new(
        credentials,
        AgentConfig {
            model: cli.model,
            temperature: cli.temperature,
            framework,
        },
    )?;

    chat::run(&mut session).await
}
