#![allow(dead_code)]

use async_trait::async_trait;
use repaste::chat::ChatHost;
use repaste::command::{Collaborators, CommandHandler};
use repaste::config::AppConfig;
use repaste::formatter::{CodeFormatter, FormatError, FormatStyle};
use repaste::http::{HttpError, HttpResponse, HttpTransport};
use repaste::paste::{
    FetchedFiles, FiddleFetcher, FileKind, PasteResult, PasteService, PasteSiteResolver,
    ScraperExtractor,
};
use repaste::snippet::{SnippetError, SnippetHost, SnippetRequest, SnippetResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct FakeHost {
    pub replies: Mutex<Vec<String>>,
    pub logs: Mutex<Vec<String>>,
    pub handled: Mutex<bool>,
}

impl FakeHost {
    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }

    pub fn single_reply(&self) -> String {
        let replies = self.replies();
        assert_eq!(replies.len(), 1, "expected one reply, got {:?}", replies);
        replies[0].clone()
    }

    pub fn was_handled(&self) -> bool {
        *self.handled.lock().unwrap()
    }
}

#[async_trait]
impl ChatHost for FakeHost {
    async fn respond_with_mention(&self, text: &str) {
        self.replies.lock().unwrap().push(text.to_string());
    }

    fn handling(&self) {
        *self.handled.lock().unwrap() = true;
    }

    fn vlog(&self, text: &str) {
        self.logs.lock().unwrap().push(text.to_string());
    }
}

#[derive(Default)]
pub struct FakeTransport {
    pub responses: HashMap<String, HttpResponse>,
    pub requested: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn respond(mut self, url: &str, content_type: &str, text: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            HttpResponse {
                content_type: Some(content_type.to_string()),
                text: text.to_string(),
            },
        );
        self
    }

    pub fn request_count(&self) -> usize {
        self.requested.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| HttpError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

pub enum FormatterBehavior {
    Prefix(&'static str),
    Fail,
}

pub struct FakeFormatter(pub FormatterBehavior);

#[async_trait]
impl CodeFormatter for FakeFormatter {
    async fn format(&self, code: &str, _style: &FormatStyle) -> Result<String, FormatError> {
        match self.0 {
            FormatterBehavior::Prefix(prefix) => Ok(format!("{}{}", prefix, code)),
            FormatterBehavior::Fail => Err(FormatError::Failed {
                message: "SyntaxError".to_string(),
            }),
        }
    }
}

pub enum SnippetBehavior {
    Succeed(&'static str),
    HostError,
    UnknownError,
}

pub struct FakeSnippets {
    pub behavior: SnippetBehavior,
    pub created: Mutex<Vec<SnippetRequest>>,
    pub deleted: Mutex<Vec<String>>,
}

impl FakeSnippets {
    pub fn new(behavior: SnippetBehavior) -> Self {
        Self {
            behavior,
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    fn fail(&self) -> Option<SnippetError> {
        match self.behavior {
            SnippetBehavior::Succeed(_) => None,
            SnippetBehavior::HostError => Some(SnippetError::Host {
                status: 403,
                message: "API rate limit exceeded".to_string(),
            }),
            SnippetBehavior::UnknownError => {
                Some(SnippetError::Unknown("connection reset".to_string()))
            }
        }
    }
}

#[async_trait]
impl SnippetHost for FakeSnippets {
    async fn create(&self, request: SnippetRequest) -> Result<SnippetResult, SnippetError> {
        self.created.lock().unwrap().push(request);
        if let Some(err) = self.fail() {
            return Err(err);
        }
        match self.behavior {
            SnippetBehavior::Succeed(url) => Ok(SnippetResult {
                url: url.to_string(),
            }),
            _ => unreachable!(),
        }
    }

    async fn delete(&self, id: &str, _token: &str) -> Result<(), SnippetError> {
        self.deleted.lock().unwrap().push(id.to_string());
        match self.fail() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct FakeFiddle {
    pub files: FetchedFiles,
    pub requested: Mutex<Vec<String>>,
}

#[async_trait]
impl FiddleFetcher for FakeFiddle {
    async fn fetch_fiddle(&self, url: &str) -> PasteResult<FetchedFiles> {
        self.requested.lock().unwrap().push(url.to_string());
        Ok(self.files.clone())
    }
}

pub struct Harness {
    pub transport: Arc<FakeTransport>,
    pub snippets: Arc<FakeSnippets>,
    pub fiddle: Arc<FakeFiddle>,
    pub handler: CommandHandler,
}

pub struct HarnessBuilder {
    config: AppConfig,
    transport: FakeTransport,
    formatter: FormatterBehavior,
    snippets: SnippetBehavior,
    fiddle: FakeFiddle,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            transport: FakeTransport::default(),
            formatter: FormatterBehavior::Prefix(""),
            snippets: SnippetBehavior::Succeed("https://gist.example/1"),
            fiddle: FakeFiddle::default(),
        }
    }

    pub fn token(mut self, token: &str) -> Self {
        self.config.github_token = Some(token.to_string());
        self
    }

    pub fn config(mut self, update: impl FnOnce(&mut AppConfig)) -> Self {
        update(&mut self.config);
        self
    }

    pub fn transport(mut self, transport: FakeTransport) -> Self {
        self.transport = transport;
        self
    }

    pub fn formatter(mut self, formatter: FormatterBehavior) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn snippets(mut self, snippets: SnippetBehavior) -> Self {
        self.snippets = snippets;
        self
    }

    pub fn fiddle(mut self, files: FetchedFiles) -> Self {
        self.fiddle.files = files;
        self
    }

    pub fn build(self) -> Harness {
        let transport = Arc::new(self.transport);
        let snippets = Arc::new(FakeSnippets::new(self.snippets));
        let fiddle = Arc::new(self.fiddle);

        let collaborators = Collaborators {
            transport: transport.clone(),
            extractor: Arc::new(ScraperExtractor),
            fiddle: fiddle.clone(),
            formatter: Arc::new(FakeFormatter(self.formatter)),
            snippets: snippets.clone(),
        };
        let handler = CommandHandler::new(&self.config, collaborators).with_resolver(test_resolver());

        Harness {
            transport,
            snippets,
            fiddle,
            handler,
        }
    }
}

/// The built-in services plus `pastebin.example`, whose raw files live
/// under `/raw/`.
pub fn test_resolver() -> PasteSiteResolver {
    let service = PasteService::new("example", r"^https?://pastebin\.example/(?P<id>\w+)")
        .unwrap()
        .file(FileKind::Js, "http://pastebin.example/raw/${id}");
    PasteSiteResolver::default().with_service(service)
}
