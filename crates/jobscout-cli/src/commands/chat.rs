//! Interactive chat REPL.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};

use jobscout_core::session::{Sender, SessionEvent};
use jobscout_engine::{SessionController, UserIdentity};
use jobscout_transport::{ChatClient, ClientConfig, WsPushConnector};

pub async fn run(
    backend: Option<String>,
    user: Option<String>,
    profile: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(backend)?;
    let identity = match (profile, user) {
        (Some(path), _) => UserIdentity::from_profile(load_profile(&path)?)?,
        (None, Some(user)) => UserIdentity::new(user),
        (None, None) => bail!("either --user or --profile is required"),
    };

    let client = Arc::new(ChatClient::new(&config));
    let push = Arc::new(WsPushConnector::new(&config));
    let controller = Arc::new(SessionController::new(
        identity,
        config.poll_interval(),
        client.clone(),
        client,
        push,
    ));

    controller.start().await;
    let watcher = spawn_event_printer(controller.clone());

    println!("Connected to {}. Type a message, /jobs, or /quit.", config.base_url);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        match line {
            "/quit" | "/exit" => break,
            "/jobs" => {
                let state = controller.job_state().await;
                println!("applied: {}, rejected: {}", state.applied.len(), state.rejected.len());
                continue;
            }
            _ => {}
        }

        controller.submit(line).await;
        let messages = controller.messages().await;
        if let Some(message) = messages.last()
            && message.sender == Sender::Assistant
        {
            println!("{}", message.text);
        }
        if controller.pending_interrupt().await.is_some() {
            println!("(the assistant is waiting on your answer)");
        }
    }

    watcher.abort();
    controller.stop().await;
    Ok(())
}

pub(crate) fn resolve_config(backend: Option<String>) -> Result<ClientConfig> {
    Ok(match backend {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::load()?,
    })
}

fn load_profile(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read profile {}", path.display()))?;
    serde_json::from_str(&raw).context("profile is not valid JSON")
}

/// Prints out-of-band updates (push advisories, dropped stream) between turns.
fn spawn_event_printer(controller: Arc<SessionController>) -> tokio::task::JoinHandle<()> {
    let mut events = controller.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SessionEvent::NotificationArrived => {
                    if let Some(notification) = controller.notifications().await.first() {
                        eprintln!("* {}", notification.message);
                    }
                }
                SessionEvent::PushConnectionLost => {
                    eprintln!("* push stream lost; live notifications disabled");
                }
                _ => {}
            }
        }
    })
}
