//! Built-in handler kinds.
//!
//! | kind     | handler                        |
//! |----------|--------------------------------|
//! | `echo`   | [`EchoHandler`]                |
//! | `status` | [`StatusHandler`]              |
//! | `file`   | [`FileHandler`]                |

mod echo;
mod file;
mod status;

use std::collections::HashMap;

use crate::server::{factory, HandlerFactory};

pub use echo::EchoHandler;
pub use file::{FileHandler, PUBLIC_HTML};
pub use status::StatusHandler;

/// The constructor table every default registry starts with.
pub fn builtin_kinds() -> HashMap<String, HandlerFactory> {
    let mut kinds = HashMap::new();
    kinds.insert("echo".to_string(), factory(EchoHandler::build));
    kinds.insert("status".to_string(), factory(StatusHandler::build));
    kinds.insert("file".to_string(), factory(FileHandler::build));
    kinds
}
