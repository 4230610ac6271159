use super::{
    SnippetError, SnippetHost, SnippetHostResult, SnippetRequest, SnippetResult, is_gist_id,
};
use crate::formatter::{CodeFormatter, FormatStyle};
use crate::paste::{FetchedFiles, FileKind};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Turns fetched paste files into a published snippet, and deletes snippets
/// on request.
pub struct RepublishService {
    host: Arc<dyn SnippetHost>,
    formatter: Arc<dyn CodeFormatter>,
    token: Option<String>,
    jsx_channels: Vec<String>,
}

impl RepublishService {
    pub fn new(
        host: Arc<dyn SnippetHost>,
        formatter: Arc<dyn CodeFormatter>,
        token: Option<String>,
        jsx_channels: Vec<String>,
    ) -> Self {
        Self {
            host,
            formatter,
            token: token.filter(|t| !t.is_empty()),
            jsx_channels,
        }
    }

    pub fn script_suffix(&self, channel: &str) -> &'static str {
        if self.jsx_channels.iter().any(|c| c == channel) {
            ".jsx"
        } else {
            ".js"
        }
    }

    /// Formats the script (best effort) and builds the snippet's file set.
    pub async fn build_files(
        &self,
        files: &FetchedFiles,
        channel: &str,
        vlog: &(dyn Fn(&str) + Send + Sync),
    ) -> BTreeMap<String, String> {
        let mut snippet_files = BTreeMap::new();

        if let Some(script) = &files.js {
            let content = match self.formatter.format(script, &FormatStyle::default()).await {
                Ok(formatted) => formatted,
                Err(e) => {
                    vlog(&format!("Formatting failed, keeping original code: {}", e));
                    script.clone()
                }
            };
            snippet_files.insert(format!("code{}", self.script_suffix(channel)), content);
        }
        for kind in [FileKind::Html, FileKind::Css] {
            if let Some(text) = files.get(kind) {
                snippet_files.insert(format!("code.{}", kind), text.to_string());
            }
        }

        snippet_files
    }

    pub async fn republish(
        &self,
        files: &FetchedFiles,
        channel: &str,
        vlog: &(dyn Fn(&str) + Send + Sync),
    ) -> SnippetHostResult<SnippetResult> {
        let files = self.build_files(files, channel, vlog).await;

        self.host
            .create(SnippetRequest {
                files,
                try_short_url: true,
                token: self.token.clone(),
            })
            .await
    }

    pub async fn unpaste(&self, id: &str) -> SnippetHostResult<()> {
        if !is_gist_id(id) {
            return Err(SnippetError::InvalidId(id.to_string()));
        }
        let Some(token) = &self.token else {
            return Err(SnippetError::NotConfigured);
        };

        self.host.delete(id, token).await
    }
}
