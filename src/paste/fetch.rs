use super::error::PasteResult;
use super::html::TextExtractor;
use super::resolver::RawFileSpec;
use super::{FetchedFiles, FileKind};
use crate::http::HttpTransport;
use futures::future::try_join_all;

/// Downloads every raw file of a paste at once and turns the responses into
/// plain code. The first failed download fails the whole fetch.
pub struct FetchPipeline<'a> {
    transport: &'a dyn HttpTransport,
    extractor: &'a dyn TextExtractor,
}

impl<'a> FetchPipeline<'a> {
    pub fn new(transport: &'a dyn HttpTransport, extractor: &'a dyn TextExtractor) -> Self {
        Self {
            transport,
            extractor,
        }
    }

    pub async fn fetch(
        &self,
        specs: &[RawFileSpec],
        vlog: &(dyn Fn(&str) + Send + Sync),
    ) -> PasteResult<FetchedFiles> {
        let fetches = specs.iter().map(|spec| self.fetch_one(spec, vlog));
        let files = try_join_all(fetches).await?;

        Ok(files.into_iter().flatten().collect())
    }

    async fn fetch_one(
        &self,
        spec: &RawFileSpec,
        vlog: &(dyn Fn(&str) + Send + Sync),
    ) -> PasteResult<Option<(FileKind, String)>> {
        let response = self.transport.get(&spec.url).await?;

        let mut text = spec.apply(&response.text);
        if text.is_empty() {
            return Ok(None);
        }

        if response.is_html() {
            let from_html = self.extractor.body_text(&text);
            if !from_html.is_empty() {
                text = from_html;
            }
        }

        vlog(&format!(
            "Fetched {} with body length {}",
            spec.url,
            text.len()
        ));
        Ok(Some((spec.kind, text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpError, HttpResponse};
    use crate::paste::html::ScraperExtractor;
    use crate::paste::resolver::{identity, strip_source_url_trailer};
    use crate::paste::PasteError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubTransport {
        responses: HashMap<String, HttpResponse>,
        requested: Mutex<Vec<String>>,
    }

    impl StubTransport {
        fn respond(mut self, url: &str, content_type: &str, text: &str) -> Self {
            self.responses.insert(
                url.to_string(),
                HttpResponse {
                    content_type: Some(content_type.to_string()),
                    text: text.to_string(),
                },
            );
            self
        }
    }

    #[async_trait]
    impl HttpTransport for StubTransport {
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

    fn spec(kind: FileKind, url: &str) -> RawFileSpec {
        RawFileSpec {
            kind,
            url: url.to_string(),
            transform: identity,
        }
    }

    fn no_log(_: &str) {}

    #[tokio::test]
    async fn fetches_every_file() {
        let transport = StubTransport::default()
            .respond("http://p/a.js", "application/javascript", "var x = 1")
            .respond("http://p/a.css", "text/css", "p { color: red }");
        let pipeline = FetchPipeline::new(&transport, &ScraperExtractor);

        let files = pipeline
            .fetch(
                &[spec(FileKind::Js, "http://p/a.js"), spec(FileKind::Css, "http://p/a.css")],
                &no_log,
            )
            .await
            .unwrap();

        assert_eq!(files.js.as_deref(), Some("var x = 1"));
        assert_eq!(files.css.as_deref(), Some("p { color: red }"));
        assert_eq!(files.html, None);
        assert_eq!(transport.requested.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn drops_empty_files() {
        let transport = StubTransport::default()
            .respond("http://p/a.js", "text/plain", "var x = 1")
            .respond("http://p/a.html", "text/html", "");
        let pipeline = FetchPipeline::new(&transport, &ScraperExtractor);

        let files = pipeline
            .fetch(
                &[spec(FileKind::Js, "http://p/a.js"), spec(FileKind::Html, "http://p/a.html")],
                &no_log,
            )
            .await
            .unwrap();

        assert_eq!(files.html, None);
        assert!(files.js.is_some());
    }

    #[tokio::test]
    async fn html_responses_are_reduced_to_body_text() {
        let transport = StubTransport::default().respond(
            "http://p/raw",
            "text/html; charset=utf-8",
            "<html><body><pre>let y = 2;</pre></body></html>",
        );
        let pipeline = FetchPipeline::new(&transport, &ScraperExtractor);

        let files = pipeline
            .fetch(&[spec(FileKind::Js, "http://p/raw")], &no_log)
            .await
            .unwrap();

        assert_eq!(files.js.as_deref(), Some("let y = 2;"));
    }

    #[tokio::test]
    async fn html_without_body_text_keeps_raw_text() {
        let raw = "<html><body><img src=x></body></html>";
        let transport = StubTransport::default().respond("http://p/raw", "text/html", raw);
        let pipeline = FetchPipeline::new(&transport, &ScraperExtractor);

        let files = pipeline
            .fetch(&[spec(FileKind::Html, "http://p/raw")], &no_log)
            .await
            .unwrap();

        assert_eq!(files.html.as_deref(), Some(raw));
    }

    #[tokio::test]
    async fn non_html_markup_passes_through() {
        let raw = "<div>hello</div>";
        let transport = StubTransport::default().respond("http://p/a.html", "text/plain", raw);
        let pipeline = FetchPipeline::new(&transport, &ScraperExtractor);

        let files = pipeline
            .fetch(&[spec(FileKind::Html, "http://p/a.html")], &no_log)
            .await
            .unwrap();

        assert_eq!(files.html.as_deref(), Some(raw));
    }

    #[tokio::test]
    async fn transform_runs_before_empty_check() {
        let transport = StubTransport::default()
            .respond("http://p/a.js", "text/plain", "//# sourceURL=a.js");
        let pipeline = FetchPipeline::new(&transport, &ScraperExtractor);
        let script = RawFileSpec {
            kind: FileKind::Js,
            url: "http://p/a.js".to_string(),
            transform: strip_source_url_trailer,
        };

        let files = pipeline.fetch(&[script], &no_log).await.unwrap();

        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn one_failure_fails_everything() {
        let transport = StubTransport::default().respond("http://p/a.js", "text/plain", "ok");
        let pipeline = FetchPipeline::new(&transport, &ScraperExtractor);

        let err = pipeline
            .fetch(
                &[spec(FileKind::Js, "http://p/a.js"), spec(FileKind::Css, "http://p/missing.css")],
                &no_log,
            )
            .await
            .unwrap_err();

        match err {
            PasteError::Fetch(inner) => assert_eq!(inner.url(), "http://p/missing.css"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn logs_each_fetched_file() {
        let transport = StubTransport::default().respond("http://p/a.js", "text/plain", "abc");
        let pipeline = FetchPipeline::new(&transport, &ScraperExtractor);
        let lines = Mutex::new(Vec::new());
        let vlog = |line: &str| lines.lock().unwrap().push(line.to_string());

        pipeline
            .fetch(&[spec(FileKind::Js, "http://p/a.js")], &vlog)
            .await
            .unwrap();

        assert_eq!(
            *lines.lock().unwrap(),
            vec!["Fetched http://p/a.js with body length 3".to_string()]
        );
    }
}
