use super::FileKind;
use super::error::{PasteError, PasteResult};
use regex::Regex;

/// Per-file post-processing applied to the raw text before anything else.
pub type Transform = fn(&str) -> String;

pub fn identity(text: &str) -> String {
    text.to_string()
}

/// jsbin appends a `//# sourceURL=` marker to served scripts.
pub fn strip_source_url_trailer(text: &str) -> String {
    let trimmed = text.trim_end();
    match trimmed.rfind("//# sourceURL=") {
        Some(idx) if !trimmed[idx..].contains('\n') => trimmed[..idx].trim_end().to_string(),
        _ => text.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct RawFileSpec {
    pub kind: FileKind,
    pub url: String,
    pub transform: Transform,
}

impl RawFileSpec {
    pub fn apply(&self, text: &str) -> String {
        (self.transform)(text)
    }
}

#[derive(Debug, Clone)]
struct RawFileTemplate {
    kind: FileKind,
    /// Raw URL with `${name}` references to the service pattern's captures.
    template: String,
    transform: Transform,
}

/// One known paste site: which URLs it owns and where their raw files live.
#[derive(Debug, Clone)]
pub struct PasteService {
    name: String,
    pattern: Regex,
    files: Vec<RawFileTemplate>,
}

impl PasteService {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            files: Vec::new(),
        })
    }

    pub fn file(self, kind: FileKind, template: impl Into<String>) -> Self {
        self.file_with_transform(kind, template, identity)
    }

    pub fn file_with_transform(
        mut self,
        kind: FileKind,
        template: impl Into<String>,
        transform: Transform,
    ) -> Self {
        self.files.push(RawFileTemplate {
            kind,
            template: template.into(),
            transform,
        });
        self
    }

    fn resolve(&self, url: &str) -> Option<Resolution> {
        let captures = self.pattern.captures(url)?;
        let files = self
            .files
            .iter()
            .map(|file| {
                let mut raw_url = String::new();
                captures.expand(&file.template, &mut raw_url);
                RawFileSpec {
                    kind: file.kind,
                    url: raw_url,
                    transform: file.transform,
                }
            })
            .collect();
        Some(Resolution::Raw {
            service: self.name.clone(),
            files,
        })
    }
}

#[derive(Debug, Clone)]
pub enum Resolution {
    /// An interactive fiddle; the fiddle fetcher reads it whole.
    Fiddle(String),
    Raw {
        service: String,
        files: Vec<RawFileSpec>,
    },
}

/// Immutable, ordered registry of paste services. The first matching service
/// wins.
#[derive(Debug, Clone)]
pub struct PasteSiteResolver {
    fiddle: Regex,
    services: Vec<PasteService>,
}

impl Default for PasteSiteResolver {
    fn default() -> Self {
        Self::with_services(builtin_services())
    }
}

impl PasteSiteResolver {
    pub fn with_services(services: Vec<PasteService>) -> Self {
        Self {
            fiddle: Regex::new(r"jsfiddle\.net").expect("Failed to compile fiddle regex"),
            services,
        }
    }

    /// Registers `service` ahead of the existing table.
    pub fn with_service(mut self, service: PasteService) -> Self {
        self.services.insert(0, service);
        self
    }

    pub fn resolve(&self, url: &str) -> PasteResult<Resolution> {
        if self.fiddle.is_match(url) {
            return Ok(Resolution::Fiddle(url.to_string()));
        }

        self.services
            .iter()
            .find_map(|service| service.resolve(url))
            .ok_or_else(|| PasteError::UnknownService {
                url: url.to_string(),
            })
    }
}

fn builtin_services() -> Vec<PasteService> {
    let table: Vec<Result<PasteService, regex::Error>> = vec![
        PasteService::new(
            "pastebin",
            r"^https?://(?:www\.)?pastebin\.com/(?:raw/)?(?P<id>[A-Za-z0-9]+)",
        )
        .map(|s| s.file(FileKind::Js, "https://pastebin.com/raw/${id}")),
        PasteService::new(
            "hastebin",
            r"^https?://(?:www\.)?hastebin\.com/(?:raw/)?(?P<id>[A-Za-z0-9]+)",
        )
        .map(|s| s.file(FileKind::Js, "https://hastebin.com/raw/${id}")),
        PasteService::new(
            "dpaste",
            r"^https?://(?:www\.)?dpaste\.org/(?P<id>[A-Za-z0-9]+)",
        )
        .map(|s| s.file(FileKind::Js, "https://dpaste.org/${id}/raw")),
        PasteService::new("bpaste", r"^https?://bpa\.st/(?:raw/)?(?P<id>[A-Za-z0-9]+)")
            .map(|s| s.file(FileKind::Js, "https://bpa.st/raw/${id}")),
        PasteService::new(
            "gist",
            r"^https?://gist\.github\.com/(?P<user>[\w-]+)/(?P<id>[0-9a-f]+)",
        )
        .map(|s| {
            s.file(
                FileKind::Js,
                "https://gist.githubusercontent.com/${user}/${id}/raw",
            )
        }),
        PasteService::new(
            "codepen",
            r"^https?://codepen\.io/(?P<user>[\w-]+)/(?:pen|full|details)/(?P<id>[A-Za-z0-9]+)",
        )
        .map(|s| {
            s.file(FileKind::Js, "https://codepen.io/${user}/pen/${id}.js")
                .file(FileKind::Css, "https://codepen.io/${user}/pen/${id}.css")
                .file(FileKind::Html, "https://codepen.io/${user}/pen/${id}.html")
        }),
        PasteService::new(
            "jsbin",
            r"^https?://(?:www\.)?jsbin\.com/(?P<id>[A-Za-z0-9]+)(?P<rev>/\d+)?",
        )
        .map(|s| {
            s.file_with_transform(
                FileKind::Js,
                "https://jsbin.com/${id}${rev}.js",
                strip_source_url_trailer,
            )
            .file(FileKind::Css, "https://jsbin.com/${id}${rev}.css")
            .file(FileKind::Html, "https://jsbin.com/${id}${rev}.html")
        }),
        PasteService::new(
            "ideone",
            r"^https?://(?:www\.)?ideone\.com/(?:plain/)?(?P<id>[A-Za-z0-9]+)",
        )
        .map(|s| s.file(FileKind::Js, "https://ideone.com/plain/${id}")),
    ];

    table
        .into_iter()
        .map(|service| service.expect("Failed to compile built-in paste service pattern"))
        .collect()
}
