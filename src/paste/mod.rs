pub mod error;
pub mod fetch;
pub mod fiddle;
pub mod html;
pub mod log_scanner;
pub mod resolver;
pub mod url_matcher;

pub use error::{PasteError, PasteResult};
pub use fetch::FetchPipeline;
pub use fiddle::{FiddleFetcher, JsfiddleFetcher};
pub use html::{ScraperExtractor, TextExtractor};
pub use log_scanner::{ResolvedPaste, find_link_in_logs};
pub use resolver::{PasteService, PasteSiteResolver, RawFileSpec, Resolution};
pub use url_matcher::match_url;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Js,
    Css,
    Html,
}

impl FileKind {
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Js => "js",
            FileKind::Css => "css",
            FileKind::Html => "html",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// The code pulled from a paste, one slot per file kind. A slot is never
/// `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedFiles {
    pub js: Option<String>,
    pub css: Option<String>,
    pub html: Option<String>,
}

impl FetchedFiles {
    /// Stores `text` under `kind`, ignoring empty text.
    pub fn insert(&mut self, kind: FileKind, text: String) {
        if text.is_empty() {
            return;
        }
        let slot = match kind {
            FileKind::Js => &mut self.js,
            FileKind::Css => &mut self.css,
            FileKind::Html => &mut self.html,
        };
        *slot = Some(text);
    }

    pub fn get(&self, kind: FileKind) -> Option<&str> {
        match kind {
            FileKind::Js => self.js.as_deref(),
            FileKind::Css => self.css.as_deref(),
            FileKind::Html => self.html.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.js.is_none() && self.css.is_none() && self.html.is_none()
    }
}

impl FromIterator<(FileKind, String)> for FetchedFiles {
    fn from_iter<I: IntoIterator<Item = (FileKind, String)>>(iter: I) -> Self {
        let mut files = FetchedFiles::default();
        for (kind, text) in iter {
            files.insert(kind, text);
        }
        files
    }
}
