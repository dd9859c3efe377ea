//! Plain-text register trace format.
//!
//! One command per line, `#` starts a comment:
//!
//! ```text
//! w $FF26 80     # register write
//! r 0xFF26       # register read
//! frame          # end of frame
//! frame 30       # thirty frames with no writes in between
//! ```
//!
//! Addresses and values are hexadecimal with an optional `$` or `0x`
//! prefix; frame counts are decimal.

use std::path::Path;
use std::str::SplitWhitespace;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Write { addr: u16, value: u8 },
    Read { addr: u16 },
    Frame { count: u32 },
}

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: missing {operand}")]
    MissingOperand { line: usize, operand: &'static str },

    #[error("line {line}: invalid {operand} '{text}'")]
    InvalidOperand {
        line: usize,
        operand: &'static str,
        text: String,
    },

    #[error("line {line}: unexpected '{text}'")]
    TrailingInput { line: usize, text: String },
}

impl TraceError {
    /// 1-based line the error was found on, if it came from parsing.
    pub fn line(&self) -> Option<usize> {
        match self {
            TraceError::Io { .. } => None,
            TraceError::UnknownCommand { line, .. }
            | TraceError::MissingOperand { line, .. }
            | TraceError::InvalidOperand { line, .. }
            | TraceError::TrailingInput { line, .. } => Some(*line),
        }
    }
}

fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix('$')
        .or_else(|| text.strip_prefix("0x"))
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

struct Operands<'a> {
    line: usize,
    words: SplitWhitespace<'a>,
}

impl<'a> Operands<'a> {
    fn next(&mut self, operand: &'static str) -> Result<&'a str, TraceError> {
        self.words.next().ok_or(TraceError::MissingOperand {
            line: self.line,
            operand,
        })
    }

    fn invalid(&self, operand: &'static str, text: &str) -> TraceError {
        TraceError::InvalidOperand {
            line: self.line,
            operand,
            text: text.to_string(),
        }
    }

    fn address(&mut self) -> Result<u16, TraceError> {
        let text = self.next("address")?;
        u16::from_str_radix(strip_hex_prefix(text), 16).map_err(|_| self.invalid("address", text))
    }

    fn value(&mut self) -> Result<u8, TraceError> {
        let text = self.next("value")?;
        u8::from_str_radix(strip_hex_prefix(text), 16).map_err(|_| self.invalid("value", text))
    }

    fn count(&mut self) -> Result<u32, TraceError> {
        match self.words.next() {
            None => Ok(1),
            Some(text) => text.parse().map_err(|_| self.invalid("frame count", text)),
        }
    }

    fn finish(mut self) -> Result<(), TraceError> {
        match self.words.next() {
            None => Ok(()),
            Some(text) => Err(TraceError::TrailingInput {
                line: self.line,
                text: text.to_string(),
            }),
        }
    }
}

fn parse_line(line: usize, text: &str) -> Result<Option<Command>, TraceError> {
    let text = text.split('#').next().unwrap_or_default();
    let mut words = text.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };

    let mut ops = Operands { line, words };
    let command = match keyword.to_ascii_lowercase().as_str() {
        "w" => Command::Write {
            addr: ops.address()?,
            value: ops.value()?,
        },
        "r" => Command::Read {
            addr: ops.address()?,
        },
        "frame" => Command::Frame { count: ops.count()? },
        _ => {
            return Err(TraceError::UnknownCommand {
                line,
                command: keyword.to_string(),
            });
        }
    };
    ops.finish()?;
    Ok(Some(command))
}

pub fn parse(text: &str) -> Result<Vec<Command>, TraceError> {
    let mut commands = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(command) = parse_line(idx + 1, line)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

pub fn load(path: &Path) -> Result<Vec<Command>, TraceError> {
    let text = std::fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text)
}
