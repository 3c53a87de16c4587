//! Log watching and parsing.

pub mod classifier;
pub mod file_watcher;
pub mod log_parser;
pub mod tail;

pub use classifier::{classify, LineEvent};
pub use file_watcher::WatchMode;
pub use log_parser::parse_line;
pub use tail::{LineHandler, TailLoop};
