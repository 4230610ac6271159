use super::error::{PasteError, PasteResult};
use super::html::TextExtractor;
use super::{FetchedFiles, FileKind};
use crate::http::HttpTransport;
use async_trait::async_trait;
use std::sync::Arc;

/// Reads an interactive fiddle, whose panes cannot be reached through a
/// plain raw URL.
#[async_trait]
pub trait FiddleFetcher: Send + Sync {
    async fn fetch_fiddle(&self, url: &str) -> PasteResult<FetchedFiles>;
}

/// jsfiddle renders every pane into a textarea of its editor page.
pub struct JsfiddleFetcher {
    transport: Arc<dyn HttpTransport>,
    extractor: Arc<dyn TextExtractor>,
}

const PANES: [(FileKind, &str); 3] = [
    (FileKind::Js, "textarea#id_code_js"),
    (FileKind::Css, "textarea#id_code_css"),
    (FileKind::Html, "textarea#id_code_html"),
];

impl JsfiddleFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            transport,
            extractor,
        }
    }

    /// Strips `show/`, `embedded/` and similar view suffixes so the editor
    /// page is requested.
    fn editor_url(url: &str) -> String {
        let base = url.split(['?', '#']).next().unwrap_or(url);
        let segments: Vec<&str> = base
            .trim_end_matches('/')
            .split('/')
            .take_while(|segment| {
                !matches!(*segment, "show" | "embedded" | "light" | "embed" | "result")
            })
            .collect();
        format!("{}/", segments.join("/"))
    }
}

#[async_trait]
impl FiddleFetcher for JsfiddleFetcher {
    async fn fetch_fiddle(&self, url: &str) -> PasteResult<FetchedFiles> {
        let editor_url = Self::editor_url(url);
        let page = self.transport.get(&editor_url).await?;

        let files: FetchedFiles = PANES
            .iter()
            .filter_map(|(kind, selector)| {
                self.extractor
                    .select_text(&page.text, selector)
                    .map(|text| (*kind, text))
            })
            .collect();

        if files.is_empty() {
            return Err(PasteError::Fiddle {
                url: url.to_string(),
                message: "no code panes found on the fiddle page".to_string(),
            });
        }

        Ok(files)
    }
}
