//! Operations produced by the translator and consumed by the interpreter.


use std::fmt::{self, Display};
use std::io::Write;

use crate::error::Error;


/// One entry of the operation array.
///
/// Run lengths are always at least 1. Jump targets are absolute indices into the
/// operation array and always land on the matching bracket op.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Op {
    IncPtr(usize),             // >
    DecPtr(usize),             // <
    IncData(usize),            // +
    DecData(usize),            // -
    ReadStdin(usize),          // ,
    WriteStdout(usize),        // .
    JumpIfDataZero(usize),     // [ (index of the matching close)
    JumpIfDataNotZero(usize),  // ] (index of the matching open)
    LoopSetToZero,             // [-] or [+]
    LoopMovePtr(isize),        // [>>] or [<<]
    LoopMoveData(isize),       // [->+<] or [-<+>]
    InvalidOp,
}

pub type OpStream = Vec<Op>;

impl Op {
    /// The single-character symbol of this op's kind.
    pub fn symbol(&self) -> char {
        match self {
            Op::IncPtr(_) => '>',
            Op::DecPtr(_) => '<',
            Op::IncData(_) => '+',
            Op::DecData(_) => '-',
            Op::ReadStdin(_) => ',',
            Op::WriteStdout(_) => '.',
            Op::JumpIfDataZero(_) => '[',
            Op::JumpIfDataNotZero(_) => ']',
            Op::LoopSetToZero => 's',
            Op::LoopMovePtr(_) => 'm',
            Op::LoopMoveData(_) => 'd',
            Op::InvalidOp => 'x',
        }
    }

    /// Whether this op is a run-length op that the translator coalesces.
    pub fn is_repeatable(&self) -> bool {
        matches!(
            self,
            Op::IncPtr(_) | Op::DecPtr(_) | Op::IncData(_) | Op::DecData(_) | Op::ReadStdin(_) | Op::WriteStdout(_)
        )
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Op::IncPtr(n)
            | Op::DecPtr(n)
            | Op::IncData(n)
            | Op::DecData(n)
            | Op::ReadStdin(n)
            | Op::WriteStdout(n)
            | Op::JumpIfDataZero(n)
            | Op::JumpIfDataNotZero(n) => write!(f, "{} {}", self.symbol(), n),
            Op::LoopMovePtr(n) | Op::LoopMoveData(n) => write!(f, "{} {}", self.symbol(), n),
            Op::LoopSetToZero | Op::InvalidOp => write!(f, "{}", self.symbol()),
        }
    }
}


/// Write the operation array to `out`, one `index: op` line per operation.
/// # Example
/// ```
/// use bfopt::{dump, parse, translate};
///
/// let ops = translate(&parse(b"++[->+<]")).unwrap();
/// let mut out = Vec::new();
/// dump(&ops, &mut out).unwrap();
///
/// assert_eq!(out, b"0: + 2\n1: d 1\n");
/// ```
pub fn dump<W: Write>(ops: &[Op], mut out: W) -> Result<(), Error> {
    for (i, op) in ops.iter().enumerate() {
        writeln!(out, "{}: {}", i, op)?;
    }
    out.flush()?;
    Ok(())
}
