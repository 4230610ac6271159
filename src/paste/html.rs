use scraper::{Html, Selector};

/// Pulls readable text out of HTML documents.
pub trait TextExtractor: Send + Sync {
    /// Concatenated text of the document body.
    fn body_text(&self, html: &str) -> String;

    /// Text of the first element matching the CSS `selector`, if any.
    fn select_text(&self, html: &str, selector: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperExtractor;

impl TextExtractor for ScraperExtractor {
    fn body_text(&self, html: &str) -> String {
        self.select_text(html, "body").unwrap_or_default()
    }

    fn select_text(&self, html: &str, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        let document = Html::parse_document(html);
        document
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>())
    }
}
