use lume_flow::config::{LoggingSettings, Settings};
use lume_flow::core::FlowEvent;
use lume_flow::services::{CatalogSource, ChannelSink, FileCatalog, InMemoryProfileStore, StaticCatalog, StaticInviteValidator};
use lume_flow::{
    Collaborators, Decision, DecisionOutcome, Dismissal, FlowError, FlowState, MatchPolicy, ProfileSubmission,
    RandomMatchPolicy, Session,
};
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// One line of driver input
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Invite(String),
    Profile(ProfileSubmission),
    Decide(Decision),
    Dismiss(Dismissal),
    Status,
    Stack,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match verb.to_lowercase().as_str() {
            "invite" => Ok(Command::Invite(rest.to_string())),
            // profile <first name> <age> <bio...>
            "profile" => {
                let mut parts = rest.splitn(3, ' ');
                let first_name = parts.next().unwrap_or_default().to_string();
                let age = parts
                    .next()
                    .unwrap_or_default()
                    .parse::<u8>()
                    .map_err(|e| format!("Invalid age: {}", e))?;
                let bio = parts.next().unwrap_or_default().to_string();
                Ok(Command::Profile(ProfileSubmission {
                    first_name,
                    age,
                    photo: None,
                    bio,
                }))
            }
            "close" => Ok(Command::Dismiss(Dismissal::Closed)),
            "hello" => Ok(Command::Dismiss(Dismissal::Acknowledged)),
            "status" => Ok(Command::Status),
            "stack" => Ok(Command::Stack),
            "quit" | "exit" => Ok(Command::Quit),
            other => other
                .parse::<Decision>()
                .map(Command::Decide)
                .map_err(|e| e.to_string()),
        }
    }
}

fn init_logging(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn build_collaborators(settings: &Settings, sink: ChannelSink) -> Collaborators {
    let catalog: Arc<dyn CatalogSource> = match &settings.catalog.path {
        Some(path) => {
            info!("Using catalog file {}", path);
            Arc::new(FileCatalog::new(path))
        }
        None => Arc::new(StaticCatalog::demo()),
    };

    let matcher: Arc<dyn MatchPolicy> = match settings.matching.seed {
        Some(seed) => Arc::new(RandomMatchPolicy::seeded(settings.matching.probability, seed)),
        None => Arc::new(RandomMatchPolicy::new(settings.matching.probability)),
    };

    Collaborators {
        catalog,
        invites: Arc::new(StaticInviteValidator::new(settings.invite.codes.clone())),
        profiles: Arc::new(InMemoryProfileStore::new()),
        matcher,
        notifier: Arc::new(sink),
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize output: {}", e),
    }
}

/// Decide on the top card; `None` once the deck is used up
fn decide_current(session: &Session, decision: Decision) -> Result<Option<DecisionOutcome>, FlowError> {
    match session.current() {
        Some(candidate) => session.decide(&candidate.id, decision).map(Some),
        None if session.state() == FlowState::Discovering => Ok(None),
        None => Err(FlowError::InvalidTransition {
            state: session.state(),
            event: FlowEvent::Decision,
        }),
    }
}

async fn run(session: &Session, command: Command) {
    let result = match command {
        Command::Invite(code) => session.redeem_invite(&code).await,
        Command::Profile(profile) => session.submit_profile(&profile).await,
        Command::Decide(decision) => decide_current(session, decision).map(|outcome| {
            if outcome.is_none() {
                info!("No candidates left");
            }
        }),
        Command::Dismiss(dismissal) => session.dismiss_match(dismissal).map(|_| ()),
        Command::Status => {
            print_json(&session.snapshot());
            Ok(())
        }
        Command::Stack => {
            print_json(&session.stack());
            Ok(())
        }
        Command::Quit => Ok(()),
    };

    if let Err(e) = result {
        error!("{}", e);
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    init_logging(&settings.as_ref().map(|s| s.logging.clone()).unwrap_or_default());

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Configuration loaded successfully");

    let (sink, mut notifications) = ChannelSink::channel();
    let printer = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            print_json(&notification);
        }
    });

    let session = Session::new(build_collaborators(&settings, sink))
        .with_peek_depth(settings.session.peek_depth);

    info!("Session {} started (match probability {})", session.id(), settings.matching.probability);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => run(&session, command).await,
            Err(e) => error!("{}", e),
        }
    }

    drop(session);
    printer.await.ok();

    info!("Session ended");
    Ok(())
}
