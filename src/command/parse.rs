#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepasteTarget {
    /// The most recent link from anyone.
    Latest,
    Url(String),
    /// The most recent link from this nick.
    Author(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Repaste(RepasteTarget),
    Unpaste { id: Option<String> },
}

impl Command {
    /// Parses whitespace-delimited command text. Anything that isn't
    /// `repaste` or `unpaste` belongs to some other plugin.
    pub fn parse(text: &str) -> Option<Self> {
        let mut words = text.split_whitespace();
        let name = words.next()?;
        let arg = words.next().map(str::to_string);

        match name {
            "unpaste" => Some(Command::Unpaste { id: arg }),
            "repaste" => {
                let target = match arg {
                    None => RepasteTarget::Latest,
                    Some(arg) if arg.starts_with("http:") || arg.starts_with("https:") => {
                        RepasteTarget::Url(arg)
                    }
                    Some(arg) => RepasteTarget::Author(arg),
                };
                Some(Command::Repaste(target))
            }
            _ => None,
        }
    }
}
