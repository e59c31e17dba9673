//! Line-oriented command scripts for driving a Xuckoo table.
//!
//! Each non-empty line holds one command; `#` starts a comment.
//!
//! | Command              | Effect                          |
//! |----------------------|---------------------------------|
//! | `i <key>`, `insert`  | insert a key                    |
//! | `l <key>`, `lookup`  | look a key up                   |
//! | `p`, `print`         | dump both tables                |
//! | `s`, `stats`         | print the statistics report     |

use std::io::{BufRead, Write};
use std::str::FromStr;

use tracing::{debug, info};

use crate::data_structures::xuckoo_hash::{XuckooHashTable, XuckooHasher};
use crate::error::script::ScriptError;
use crate::error::XuckooResult;

/// A single script command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    /// Insert a key
    Insert(u64),
    /// Look a key up
    Lookup(u64),
    /// Dump both tables
    Print,
    /// Print the statistics report
    Stats,
}

impl ScriptCommand {
    /// Parses one script line. Blank and comment-only lines yield `None`.
    pub fn parse_line(line_number: usize, line: &str) -> Result<Option<Self>, ScriptError> {
        let content = line.split('#').next().unwrap_or_default();
        let mut words = content.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(None);
        };

        let command = match word {
            "i" | "insert" => ScriptCommand::Insert(parse_key(line_number, word, words.next())?),
            "l" | "lookup" => ScriptCommand::Lookup(parse_key(line_number, word, words.next())?),
            "p" | "print" => ScriptCommand::Print,
            "s" | "stats" => ScriptCommand::Stats,
            other => {
                return Err(ScriptError::UnknownCommand {
                    line: line_number,
                    command: other.to_string(),
                })
            }
        };

        let rest = words.collect::<Vec<_>>();
        if !rest.is_empty() {
            return Err(ScriptError::TrailingInput {
                line: line_number,
                rest: rest.join(" "),
            });
        }

        Ok(Some(command))
    }
}

fn parse_key(line: usize, command: &str, value: Option<&str>) -> Result<u64, ScriptError> {
    let value = value.ok_or_else(|| ScriptError::MissingKey {
        line,
        command: command.to_string(),
    })?;
    u64::from_str(value).map_err(|_| ScriptError::InvalidKey {
        line,
        value: value.to_string(),
    })
}

/// Tallies of a completed script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Commands executed
    pub commands: usize,
    /// Inserts that stored a new key
    pub inserted: usize,
    /// Inserts of keys already present
    pub duplicates: usize,
    /// Lookups that found their key
    pub found: usize,
    /// Lookups that did not
    pub missing: usize,
}

/// Executes a command script against `table`, writing results to `out`.
///
/// Stops at the first malformed line or refused insert.
pub fn run_script<H, R, W>(
    table: &mut XuckooHashTable<H>,
    input: R,
    out: &mut W,
) -> XuckooResult<ScriptSummary>
where
    H: XuckooHasher,
    R: BufRead,
    W: Write,
{
    let mut summary = ScriptSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let Some(command) = ScriptCommand::parse_line(index + 1, &line)? else {
            continue;
        };
        debug!(line = index + 1, ?command, "executing");

        match command {
            ScriptCommand::Insert(key) => {
                if table.try_insert(key)? {
                    summary.inserted += 1;
                    writeln!(out, "insert {key}: stored")?;
                } else {
                    summary.duplicates += 1;
                    writeln!(out, "insert {key}: already present")?;
                }
            }
            ScriptCommand::Lookup(key) => {
                if table.lookup(key) {
                    summary.found += 1;
                    writeln!(out, "lookup {key}: found")?;
                } else {
                    summary.missing += 1;
                    writeln!(out, "lookup {key}: not found")?;
                }
            }
            ScriptCommand::Print => write!(out, "{}", table.dump())?,
            ScriptCommand::Stats => write!(out, "{}", table.report())?,
        }
        summary.commands += 1;
    }

    info!(
        commands = summary.commands,
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        "script finished"
    );
    Ok(summary)
}
