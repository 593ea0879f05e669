//! The program buffer and the parser filling it.


use std::io::{ErrorKind, Read};
use std::ops::Index;

use crate::error::Error;


/// The eight significant Brainfuck characters.
pub const ALPHABET: [u8; 8] = [b'>', b'<', b'+', b'-', b'.', b',', b'[', b']'];


/// Ordered sequence of Brainfuck instruction bytes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program {
    instructions: Vec<u8>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one instruction byte.
    ///
    /// The byte is stored as is; the translator rejects anything outside [ALPHABET].
    pub fn push(&mut self, instruction: u8) {
        self.instructions.push(instruction);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The instruction at index `i`, if any.
    pub fn get(&self, i: usize) -> Option<u8> {
        self.instructions.get(i).copied()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.instructions
    }
}

impl Index<usize> for Program {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.instructions[index]
    }
}

impl FromIterator<u8> for Program {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self { instructions: iter.into_iter().collect() }
    }
}


/// Whether `byte` is one of the eight Brainfuck instructions.
pub fn is_instruction(byte: u8) -> bool {
    ALPHABET.contains(&byte)
}

/// Build a [Program] from source text, dropping every byte that is not an instruction.
/// # Arguments
/// * `source` - The raw source bytes.
/// # Returns
/// * [Program] - The filtered program.
/// # Example
/// ```
/// use bfopt::parse;
///
/// let program = parse(b"+ add one\n[-] clear");
/// assert_eq!(program.as_bytes(), b"+[-]");
/// ```
pub fn parse(source: &[u8]) -> Program {
    source.iter().copied().filter(|&byte| is_instruction(byte)).collect()
}

/// Build a [Program] by reading `reader` to the end.
/// # Errors
/// * `Error::Io` - The reader failed.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Program, Error> {
    let mut program = Program::new();
    let mut buf = [0_u8; 4096];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        for &byte in &buf[..n] {
            if is_instruction(byte) {
                program.push(byte);
            }
        }
    }
    Ok(program)
}
