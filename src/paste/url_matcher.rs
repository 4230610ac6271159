use regex::Regex;
use std::sync::OnceLock;

/// Returns the first absolute http(s) URL in `text`.
pub fn match_url(text: &str) -> Option<&str> {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = URL_REGEX.get_or_init(|| {
        Regex::new(
            r"(?-u:(http|https)://[\w-]+(\.[\w-]+)+([\w.,@?^=%&;:/~+#-]*[\w@?^=%&;/~+#-])?)",
        )
        .expect("Failed to compile URL regex")
    });
    regex.find(text).map(|m| m.as_str())
}
