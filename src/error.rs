//! Module containing the Error enum for errors that can occur in this crate.


use std::error::Error as StdError;
use std::fmt::Display;
use std::io;


/// Error enum for errors that can occur in this crate.
#[derive(Debug)]
pub enum Error {
    /// Unmatched open bracket at the given program index.
    UnmatchedOpenBr(usize),
    /// Unmatched close bracket at the given program index.
    UnmatchedCloseBr(usize),
    /// A byte outside the Brainfuck alphabet reached the translator.
    UnexpectedByte(u8, usize),
    /// The data pointer left the tape.
    PointerOutOfRange {
        /// Index of the operation that moved the pointer.
        pc: usize,
        /// The cell index the pointer tried to reach.
        target: isize,
    },
    /// An `InvalidOp` was executed at the given operation index.
    InvalidOp(usize),
    /// Reading the input or writing the output failed.
    Io(io::Error),
}
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::UnmatchedOpenBr(pc) => write!(f, "Unmatched '[' at index {}.", pc),
            Error::UnmatchedCloseBr(pc) => write!(f, "Unmatched ']' at index {}.", pc),
            Error::UnexpectedByte(byte, pc) => write!(f, "Unexpected byte 0x{:02x} at index {}.", byte, pc),
            Error::PointerOutOfRange { pc, target } => {
                write!(f, "Data pointer out of range (cell {}) at op {}.", target, pc)
            },
            Error::InvalidOp(pc) => write!(f, "Invalid op encountered at op {}.", pc),
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
