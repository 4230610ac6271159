pub mod chat;
pub mod cli;
pub mod command;
pub mod config;
pub mod console;
pub mod formatter;
pub mod http;
pub mod paste;
pub mod snippet;

pub use chat::{ChatHost, ChatMessage, ConsoleChatHost, LogEntry};
pub use command::{Collaborators, Command, CommandHandler, Outcome, RepasteTarget};
pub use config::AppConfig;
pub use console::{Console, VerbosityLevel, console, init_console};
pub use paste::{FetchedFiles, FileKind, PasteError, PasteSiteResolver};
pub use snippet::{SnippetError, SnippetHost, SnippetRequest, SnippetResult};
