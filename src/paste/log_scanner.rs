use super::url_matcher::match_url;
use crate::chat::LogEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaste {
    pub user: Option<String>,
    pub url: String,
}

/// Scans `logs` in the order given and returns the first link found,
/// optionally only considering lines written by `user`.
pub fn find_link_in_logs(logs: &[LogEntry], user: Option<&str>) -> Option<ResolvedPaste> {
    logs.iter()
        .filter(|log| user.is_none_or(|u| log.from == u))
        .find_map(|log| {
            match_url(&log.message).map(|url| ResolvedPaste {
                user: Some(log.from.clone()),
                url: url.to_string(),
            })
        })
}
