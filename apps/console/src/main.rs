use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{
    NotificationKind, Notifier, RequiredFieldsValidator, ServiceRequestClient, SessionProvider,
};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    server_url: String,
    #[arg(long)]
    session_token: String,
    /// Submit a new request (with --description) before listing.
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Filter the listed requests by subject/description substring.
    #[arg(long, default_value = "")]
    search: String,
}

struct CliSessionProvider {
    token: String,
}

#[async_trait::async_trait]
impl SessionProvider for CliSessionProvider {
    async fn fetch_session_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        println!("[{}] {message}", kind.title());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let client = ServiceRequestClient::new_with_dependencies(
        &args.server_url,
        Arc::new(CliSessionProvider {
            token: args.session_token,
        }),
        Arc::new(RequiredFieldsValidator),
        Arc::new(TerminalNotifier),
    )?;

    client.initialize().await;

    if let (Some(subject), Some(description)) = (args.subject, args.description) {
        client.set_subject(subject).await;
        client.set_description(description).await;
        client.submit_request().await;
    }

    if !args.search.is_empty() {
        client.set_search_term(args.search.as_str()).await;
    }

    let snapshot = client.snapshot().await;
    match snapshot.requests {
        Some(requests) => {
            for request in &requests {
                println!(
                    "{:<12} {:<28} {}",
                    request.status.as_str(),
                    request.subject,
                    request.created_at_formatted,
                );
            }
            println!("{} request(s)", requests.len());
        }
        None => println!("request list unavailable"),
    }

    Ok(())
}
