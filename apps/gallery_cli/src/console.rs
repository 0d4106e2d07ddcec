//! Terminal implementations of the gallery's user-facing collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use gallery_core::{ConfirmationPrompt, Navigator, Notice, Notifier};
use shared::gallery::Route;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn go_to(&self, route: Route) {
        info!(route = %route.path(), "navigating");
        println!("-> {}", route.path());
    }
}

#[derive(Default)]
pub struct ConsoleNotifier {
    shown: AtomicUsize,
}

impl ConsoleNotifier {
    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::Relaxed)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        self.shown.fetch_add(1, Ordering::Relaxed);
        eprintln!("error: {}", notice.title);
        if let Some(description) = &notice.description {
            eprintln!("  {description}");
        }
        for line in &notice.details {
            eprintln!("  {line}");
        }
        eprintln!("  cause: {}", notice.cause);
    }
}

pub struct AssumeYes;

#[async_trait]
impl ConfirmationPrompt for AssumeYes {
    async fn confirm(&self, title: &str, _message: &str) -> bool {
        info!(title, "confirmation assumed");
        true
    }
}

/// Asks on stderr and reads a y/N answer from stdin.
pub struct StdinConfirmation;

#[async_trait]
impl ConfirmationPrompt for StdinConfirmation {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        eprint!("{title}: {message} [y/N] ");

        let mut answer = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        if let Err(err) = stdin.read_line(&mut answer).await {
            warn!(error = %err, "failed to read confirmation; treating as declined");
            return false;
        }

        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}
