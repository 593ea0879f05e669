//! Byte-level input and output for the interpreter.


use std::io::{self, ErrorKind, Read, Write};
use std::slice;


/// Read a single byte from `input`.
///
/// Pending output is flushed first so prompts are visible before blocking.
/// # Returns
/// * `Some(byte)` - The byte read.
/// * `None` - The input is at end of stream.
pub fn getchar<R: Read, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<u8>> {
    output.flush()?;
    let mut read_char = 0;
    loop {
        match input.read(slice::from_mut(&mut read_char)) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(read_char)),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}

/// Write a single byte to `output`.
pub fn putchar<W: Write>(output: &mut W, byte: u8) -> io::Result<()> {
    output.write_all(slice::from_ref(&byte))
}
