//! The `repaste` / `unpaste` chat commands.

mod parse;

pub use parse::{Command, RepasteTarget};

use crate::chat::{ChatHost, ChatMessage};
use crate::config::AppConfig;
use crate::formatter::{CodeFormatter, PrettierFormatter};
use crate::http::{HttpTransport, ReqwestTransport};
use crate::paste::{
    FetchPipeline, FetchedFiles, FiddleFetcher, JsfiddleFetcher, PasteError, PasteResult,
    PasteSiteResolver, Resolution, ScraperExtractor, TextExtractor, find_link_in_logs,
};
use crate::snippet::{GistClient, RepublishService, SnippetError, SnippetHost};
use anyhow::Result;
use std::sync::Arc;

/// How a command invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Usage,
    InvalidId,
    Deleted,
    DeleteFailed,
    NotConfigured,
    NoLinkFound,
    UnknownService,
    FetchFailed,
    NothingToRepaste,
    Repasted { url: String },
    RepasteFailed,
}

/// The external services a handler talks to.
pub struct Collaborators {
    pub transport: Arc<dyn HttpTransport>,
    pub extractor: Arc<dyn TextExtractor>,
    pub fiddle: Arc<dyn FiddleFetcher>,
    pub formatter: Arc<dyn CodeFormatter>,
    pub snippets: Arc<dyn SnippetHost>,
}

impl Collaborators {
    pub fn production(config: &AppConfig) -> Result<Self> {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new()?);
        let extractor: Arc<dyn TextExtractor> = Arc::new(ScraperExtractor);
        let fiddle = Arc::new(JsfiddleFetcher::new(transport.clone(), extractor.clone()));

        Ok(Self {
            transport,
            extractor,
            fiddle,
            formatter: Arc::new(PrettierFormatter::new(config.prettier_path.clone())),
            snippets: Arc::new(GistClient::new(
                config.gist_api_base.clone(),
                config.shortener_url.clone(),
            )?),
        })
    }
}

pub struct CommandHandler {
    resolver: PasteSiteResolver,
    transport: Arc<dyn HttpTransport>,
    extractor: Arc<dyn TextExtractor>,
    fiddle: Arc<dyn FiddleFetcher>,
    republish: RepublishService,
    log_window: usize,
    maintainer: String,
}

impl CommandHandler {
    pub fn new(config: &AppConfig, collaborators: Collaborators) -> Self {
        let republish = RepublishService::new(
            collaborators.snippets,
            collaborators.formatter,
            config.token().map(str::to_string),
            config.jsx_channels.clone(),
        );

        Self {
            resolver: PasteSiteResolver::default(),
            transport: collaborators.transport,
            extractor: collaborators.extractor,
            fiddle: collaborators.fiddle,
            republish,
            log_window: config.log_window,
            maintainer: config.maintainer.clone(),
        }
    }

    pub fn with_resolver(mut self, resolver: PasteSiteResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Runs one command. Every failure ends in a chat reply; nothing is
    /// returned as an error.
    pub async fn handle(&self, msg: &ChatMessage, host: &dyn ChatHost) -> Outcome {
        let Some(text) = msg.command.as_deref() else {
            return Outcome::Ignored;
        };

        match Command::parse(text) {
            None => Outcome::Ignored,
            Some(Command::Unpaste { id }) => {
                host.handling();
                self.unpaste(id.as_deref(), host).await
            }
            Some(Command::Repaste(target)) => {
                host.handling();
                self.repaste(msg, target, host).await
            }
        }
    }

    async fn unpaste(&self, id: Option<&str>, host: &dyn ChatHost) -> Outcome {
        let Some(id) = id else {
            host.respond_with_mention("Usage: unpaste <gist id>").await;
            return Outcome::Usage;
        };

        match self.republish.unpaste(id).await {
            Ok(()) => {
                host.respond_with_mention(&format!("Deleted {}", id)).await;
                Outcome::Deleted
            }
            Err(SnippetError::NotConfigured) => {
                host.respond_with_mention(
                    "I'm not configured with a github token, so I can't delete the gist.",
                )
                .await;
                Outcome::NotConfigured
            }
            Err(SnippetError::InvalidId(_)) => {
                host.respond_with_mention(&format!("\"{}\" is not a gist id.", id))
                    .await;
                Outcome::InvalidId
            }
            Err(e) => {
                host.vlog(&format!("Failed to delete gist {}: {}", id, e));
                host.respond_with_mention(&format!(
                    "Failed to delete the gist. Message: \"{}\"",
                    e.host_message().unwrap_or("unknown")
                ))
                .await;
                Outcome::DeleteFailed
            }
        }
    }

    async fn repaste(
        &self,
        msg: &ChatMessage,
        target: RepasteTarget,
        host: &dyn ChatHost,
    ) -> Outcome {
        let window = &msg.logs[..msg.logs.len().min(self.log_window)];

        let (user, url) = match target {
            RepasteTarget::Url(url) => (None, url),
            RepasteTarget::Author(author) => match find_link_in_logs(window, Some(&author)) {
                Some(found) => (found.user, found.url),
                None => {
                    host.respond_with_mention(&format!("I couldn't find a link from {}", author))
                        .await;
                    return Outcome::NoLinkFound;
                }
            },
            RepasteTarget::Latest => match find_link_in_logs(window, None) {
                Some(found) => (found.user, found.url),
                None => {
                    host.respond_with_mention(&format!(
                        "I couldn't find a link in the past {} messages. Maybe I was restarted recently.",
                        self.log_window
                    ))
                    .await;
                    return Outcome::NoLinkFound;
                }
            },
        };

        let files = match self.fetch_code(&url, host).await {
            Ok(files) => files,
            Err(PasteError::UnknownService { .. }) => return Outcome::UnknownService,
            Err(e) => {
                host.respond_with_mention("Failed to get raw paste data.").await;
                host.vlog(&e.to_string());
                return Outcome::FetchFailed;
            }
        };

        if files.is_empty() {
            host.respond_with_mention(&format!("Nothing to repaste at {}.", url))
                .await;
            return Outcome::NothingToRepaste;
        }

        let vlog = |line: &str| host.vlog(line);
        match self.republish.republish(&files, &msg.to, &vlog).await {
            Ok(result) => {
                let reply = match &user {
                    Some(user) => format!("Repasted {}'s paste to {}", user, result.url),
                    None => format!("Repasted {} to {}", url, result.url),
                };
                host.respond_with_mention(&reply).await;
                Outcome::Repasted { url: result.url }
            }
            Err(e) if e.is_host_error() => {
                host.vlog(&format!("Failed to create gist: {}", e));
                host.respond_with_mention("Failed to create gist. Possibly a rate limit")
                    .await;
                Outcome::RepasteFailed
            }
            Err(e) => {
                host.vlog(&format!("Failed to create gist: {}", e));
                host.respond_with_mention(&format!(
                    "Failed due to an unknown error. {}, ping! {}",
                    self.maintainer, e
                ))
                .await;
                Outcome::RepasteFailed
            }
        }
    }

    /// Resolves `url` and pulls its files. Unknown services are reported to
    /// the channel here, before the error is returned.
    async fn fetch_code(&self, url: &str, host: &dyn ChatHost) -> PasteResult<FetchedFiles> {
        let (service, specs) = match self.resolver.resolve(url) {
            Ok(Resolution::Fiddle(url)) => return self.fiddle.fetch_fiddle(&url).await,
            Ok(Resolution::Raw { service, files }) => (service, files),
            Err(e) => {
                host.respond_with_mention(&format!(
                    "I don't know the paste service at \"{}\". {}, ping!",
                    url, self.maintainer
                ))
                .await;
                return Err(e);
            }
        };

        let urls: Vec<&str> = specs.iter().map(|spec| spec.url.as_str()).collect();
        host.vlog(&format!("Fetching {} paste: {}", service, urls.join(", ")));

        let vlog = |line: &str| host.vlog(line);
        FetchPipeline::new(self.transport.as_ref(), self.extractor.as_ref())
            .fetch(&specs, &vlog)
            .await
    }
}
