//! Translation of a program into the optimized operation array.


use tracing::{debug, info};

use crate::error::Error;
use crate::op::{Op, OpStream};
use crate::program::Program;



/// Translate a program into an operation array.
///
/// Runs of `>`, `<`, `+`, `-`, `,` and `.` are coalesced into a single op. Bracket pairs are
/// resolved into absolute jump targets, unless the loop body matches one of the recognized
/// idioms, in which case the whole loop becomes a single super-instruction.
/// # Arguments
/// * `program` - The [Program] to translate.
/// # Returns
/// * [OpStream] - The operation array, if [Ok].
/// * [Error] - The encountered error, if [Err].
/// # Errors
/// * `Error::UnmatchedCloseBr` - A `]` without a matching `[`.
/// * `Error::UnmatchedOpenBr` - A `[` still open at the end of the program.
/// * `Error::UnexpectedByte` - The program contains a byte that is not an instruction.
/// # Example
/// ```
/// use bfopt::{parse, translate, Op};
///
/// let ops = translate(&parse(b"+++[>+<-]>[-]")).unwrap();
/// assert_eq!(ops, vec![
///     Op::IncData(3),
///     Op::JumpIfDataZero(6),
///     Op::IncPtr(1),
///     Op::IncData(1),
///     Op::DecPtr(1),
///     Op::DecData(1),
///     Op::JumpIfDataNotZero(1),
///     Op::IncPtr(1),
///     Op::LoopSetToZero,
/// ]);
/// ```
pub fn translate(program: &Program) -> Result<OpStream, Error> {
    let code = program.as_bytes();
    let mut ops = Vec::new();
    // (offset of the placeholder in ops, index of the '[' in the program)
    let mut open_brackets: Vec<(usize, usize)> = Vec::new();
    let mut pc = 0;

    while pc < code.len() {
        let instruction = code[pc];
        match instruction {
            b'[' => {
                // the target is patched once the matching ']' is reached
                open_brackets.push((ops.len(), pc));
                ops.push(Op::JumpIfDataZero(0));
                pc += 1;
            },
            b']' => {
                let (open_offset, _) = open_brackets.pop().ok_or(Error::UnmatchedCloseBr(pc))?;

                match optimize_loop(&ops[open_offset..]) {
                    Some(op) => {
                        debug!(pc, open_offset, %op, "loop rewritten");
                        ops.truncate(open_offset);
                        ops.push(op);
                    },
                    None => {
                        let close_offset = ops.len();
                        ops[open_offset] = Op::JumpIfDataZero(close_offset);
                        ops.push(Op::JumpIfDataNotZero(open_offset));
                    },
                }
                pc += 1;
            },
            _ => {
                let start = pc;
                pc += 1;
                while pc < code.len() && code[pc] == instruction {
                    pc += 1;
                }
                let count = pc - start;

                ops.push(match instruction {
                    b'>' => Op::IncPtr(count),
                    b'<' => Op::DecPtr(count),
                    b'+' => Op::IncData(count),
                    b'-' => Op::DecData(count),
                    b',' => Op::ReadStdin(count),
                    b'.' => Op::WriteStdout(count),
                    _ => return Err(Error::UnexpectedByte(instruction, start)),
                });
            },
        }
    }

    if let Some(&(_, pc)) = open_brackets.last() {
        return Err(Error::UnmatchedOpenBr(pc));
    }

    info!(instructions = code.len(), ops = ops.len(), "program translated");
    Ok(ops)
}

/// Try to replace a loop by a single super-instruction.
///
/// `ops` starts at the loop's `JumpIfDataZero` placeholder and runs to the end of the body;
/// the closing jump is implied.
fn optimize_loop(ops: &[Op]) -> Option<Op> {
    match ops {
        [Op::JumpIfDataZero(_), Op::IncData(_) | Op::DecData(_)] => Some(Op::LoopSetToZero),
        [Op::JumpIfDataZero(_), Op::IncPtr(n)] => stride(*n).map(Op::LoopMovePtr),
        [Op::JumpIfDataZero(_), Op::DecPtr(n)] => stride(*n).map(|n| Op::LoopMovePtr(-n)),
        [Op::JumpIfDataZero(_), Op::DecData(1), Op::IncPtr(a), Op::IncData(1), Op::DecPtr(b)] if a == b => {
            stride(*a).map(Op::LoopMoveData)
        },
        [Op::JumpIfDataZero(_), Op::DecData(1), Op::DecPtr(a), Op::IncData(1), Op::IncPtr(b)] if a == b => {
            stride(*a).map(|n| Op::LoopMoveData(-n))
        },
        _ => None,
    }
}

fn stride(n: usize) -> Option<isize> {
    isize::try_from(n).ok()
}
