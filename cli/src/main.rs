mod inspect;
mod transport;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::rc::Rc;

use clap::{Args, Parser, Subcommand};
use linkback::config::ConfigError;
use linkback::link::LinkError;
use linkback::supabase::SupabaseBackend;
use linkback::{AuthAdapter, CallbackConfig, CallbackFlow, CancelToken, FlowResult, OutcomeState, ProfileStore, Redirect};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::inspect::LinkReport;
use crate::transport::ReqwestTransport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Link(#[from] LinkError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("callback failed: {0}")]
    CallbackFailed(String),
    #[error("callback interrupted before completion")]
    Abandoned,
}

#[derive(Parser, Debug)]
#[command(name = "linkback-cli", about = "Complete or inspect sign-in callback links")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct ConfigArgs {
    #[arg(long, env = "LINKBACK_SUPABASE_URL")]
    supabase_url: Option<String>,

    #[arg(long, env = "LINKBACK_SUPABASE_ANON_KEY", hide_env_values = true)]
    anon_key: Option<String>,

    #[arg(long, env = "LINKBACK_LANDING_ROUTE")]
    landing_route: Option<String>,

    #[arg(long, env = "LINKBACK_PLACEHOLDER_NAME")]
    placeholder_name: Option<String>,

    #[arg(long, env = "LINKBACK_NATIVE_URL_SESSION", help = "true or false")]
    native_url_session: Option<String>,

    #[arg(long, env = "LINKBACK_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<String>,
}

impl ConfigArgs {
    /// Validate the flags through the same rules the browser build uses.
    fn resolve(&self) -> Result<CallbackConfig, ConfigError> {
        CallbackConfig::from_lookup(|var| {
            let value = match var {
                "LINKBACK_SUPABASE_URL" => &self.supabase_url,
                "LINKBACK_SUPABASE_ANON_KEY" => &self.anon_key,
                "LINKBACK_LANDING_ROUTE" => &self.landing_route,
                "LINKBACK_PLACEHOLDER_NAME" => &self.placeholder_name,
                "LINKBACK_NATIVE_URL_SESSION" => &self.native_url_session,
                "LINKBACK_REQUEST_TIMEOUT_SECS" => &self.request_timeout_secs,
                _ => return None,
            };
            value.clone()
        })
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Describe what a link carries without contacting the backend.
    Inspect { url: String },
    /// Run the full callback flow for a link.
    Complete { url: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect { url } => run_inspect(&url),
        Command::Complete { url } => run_complete(&cli.config.resolve()?, &url).await,
    }
}

fn run_inspect(url: &str) -> Result<(), CliError> {
    let link = linkback::CallbackLink::parse(url)?;
    let report = LinkReport::from_link(&link);
    print_json(&serde_json::to_value(&report)?)
}

async fn run_complete(config: &CallbackConfig, url: &str) -> Result<(), CliError> {
    let transport = ReqwestTransport::new(config.request_timeout_secs)?;
    let backend = Rc::new(SupabaseBackend::from_config(transport, config));
    let profiles: Rc<dyn ProfileStore> = backend.clone();
    let flow = CallbackFlow::from_config(config, AuthAdapter::select(backend, config.native_url_session), profiles);

    let cancel = CancelToken::new();
    let run = flow.run_href(url, &cancel);
    tokio::pin!(run);
    let interrupted = tokio::select! {
        result = &mut run => Ok(result),
        _ = tokio::signal::ctrl_c() => Err(()),
    };
    let result = match interrupted {
        Ok(result) => result,
        Err(()) => {
            tracing::warn!("interrupted; abandoning callback");
            cancel.cancel();
            run.await
        }
    };
    if matches!(result, FlowResult::Abandoned) {
        return Err(CliError::Abandoned);
    }

    let mut state = OutcomeState::default();
    let redirect = result.apply(&mut state);
    print_json(&outcome_report(&state, redirect.as_ref()))?;
    match state.failure_message() {
        Some(message) => Err(CliError::CallbackFailed(message.to_owned())),
        None => Ok(()),
    }
}

fn outcome_report(state: &OutcomeState, redirect: Option<&Redirect>) -> Value {
    match state {
        OutcomeState::Pending => serde_json::json!({ "state": "pending" }),
        OutcomeState::Succeeded => serde_json::json!({
            "state": "succeeded",
            "redirect": redirect.map(|r| r.route.as_str()),
            "replace": redirect.is_some_and(|r| r.replace),
        }),
        OutcomeState::Failed { .. } => serde_json::json!({
            "state": "failed",
            "message": state.failure_message(),
        }),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
