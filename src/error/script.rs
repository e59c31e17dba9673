//! Command script error module.
//!
//! Errors produced while parsing the line-oriented command scripts accepted
//! by the `xuckoo run` command.

use thiserror::Error;

/// Errors that can occur while parsing a command script.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ScriptError {
    /// The command word is not recognised.
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand {
        /// 1-based line number
        line: usize,
        /// The unrecognised command word
        command: String,
    },

    /// A command that needs a key was given none.
    #[error("line {line}: '{command}' requires a key")]
    MissingKey {
        /// 1-based line number
        line: usize,
        /// The command missing its argument
        command: String,
    },

    /// The key is not an unsigned 64-bit integer.
    #[error("line {line}: invalid key '{value}'")]
    InvalidKey {
        /// 1-based line number
        line: usize,
        /// The text that failed to parse
        value: String,
    },

    /// Extra words follow a complete command.
    #[error("line {line}: unexpected trailing input '{rest}'")]
    TrailingInput {
        /// 1-based line number
        line: usize,
        /// The unexpected text
        rest: String,
    },
}
