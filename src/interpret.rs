//! The Brainfuck interpreter.



use std::io::{Read, Write};

use tracing::trace;

use crate::error::Error;
use crate::io::{getchar, putchar};
use crate::op::Op;



/// Default number of cells on the tape.
pub const TAPE_SIZE: usize = 30_000;


/// Interpret given operation array, reading from `input` and writing to `output`.
/// # Arguments
/// * `ops` - The operation array to interpret.
/// * `input` - Source of the bytes read by `,`.
/// * `output` - Sink of the bytes written by `.`.
/// # Returns
/// * `()` - If [Ok].
/// * [Error] - The encountered error, if [Err].
/// # Example
/// ```
/// use bfopt::{interpret, parse, translate};
///
/// // brainfuck code that prints "Brainfuck"
/// let bf_code = "
/// >++++++[<+++++++++++>-]>++++++++[<++++++++++++>-]<+>>+++++++++[<+++++++
/// ++++>-]>++++++++++[<++++++++++>-]<++>>++++++++[<+++++++++++++>-]<+>>+++
/// ++++++[<++++++++++++>-]<->>++++++++++[<+++++++++++>-]>++++++++[<+++++++
/// +++++++>-]<++>>+++++++++[<+++++++++++++>-]<<<<<<<<<.>>>>>>>.<<<<<<.>>>.
/// >>.<<<.>>>>>.<<<<<<.>>>.
/// ";
///
/// let ops = translate(&parse(bf_code.as_bytes())).unwrap();
/// let mut out = Vec::new();
/// interpret(&ops, std::io::empty(), &mut out).unwrap();
///
/// assert_eq!(out, b"Brainfuck");
/// ```
pub fn interpret<R: Read, W: Write>(ops: &[Op], input: R, output: W) -> Result<(), Error> {
    Interpreter::new(ops, input, output).run()
}


/// Executes an operation array against a fixed-size tape.
pub struct Interpreter<'a, R, W> {
    ops: &'a [Op],
    tape: Vec<u8>,
    ins_ptr: usize,
    data_ptr: usize,
    steps: u64,
    input: R,
    output: W,
}

impl<'a, R: Read, W: Write> Interpreter<'a, R, W> {
    /// Create an interpreter with a tape of [TAPE_SIZE] cells.
    pub fn new(ops: &'a [Op], input: R, output: W) -> Self {
        Self::with_tape_size(ops, TAPE_SIZE, input, output)
    }

    /// Create an interpreter with a tape of `tape_size` zeroed cells.
    pub fn with_tape_size(ops: &'a [Op], tape_size: usize, input: R, output: W) -> Self {
        Self {
            ops,
            tape: vec![0; tape_size],
            ins_ptr: 0,
            data_ptr: 0,
            steps: 0,
            input,
            output,
        }
    }

    /// Run until the program ends.
    ///
    /// Output is flushed on success.
    pub fn run(&mut self) -> Result<(), Error> {
        while self.step()? {}
        self.output.flush()?;
        trace!(steps = self.steps, "program halted");
        Ok(())
    }

    /// Execute at most `limit` operations.
    /// # Returns
    /// * `true` - The program has ended.
    /// * `false` - The limit was reached first.
    pub fn run_for(&mut self, limit: u64) -> Result<bool, Error> {
        for _ in 0..limit {
            if !self.step()? {
                break;
            }
        }
        self.output.flush()?;
        trace!(steps = self.steps, halted = self.is_halted(), "step limit run finished");
        Ok(self.is_halted())
    }

    /// Execute one operation.
    /// # Returns
    /// * `true` - An operation was executed.
    /// * `false` - The program had already ended.
    pub fn step(&mut self) -> Result<bool, Error> {
        let Some(&op) = self.ops.get(self.ins_ptr) else {
            return Ok(false);
        };
        if self.data_ptr >= self.tape.len() {
            return Err(Error::PointerOutOfRange { pc: self.ins_ptr, target: stride(self.data_ptr) });
        }

        match op {
            Op::IncPtr(n) => self.data_ptr = self.seek(stride(n))?,
            Op::DecPtr(n) => self.data_ptr = self.seek(-stride(n))?,
            // truncating the run length is the same as reducing it mod 256
            Op::IncData(n) => self.tape[self.data_ptr] = self.tape[self.data_ptr].wrapping_add(n as u8),
            Op::DecData(n) => self.tape[self.data_ptr] = self.tape[self.data_ptr].wrapping_sub(n as u8),
            Op::ReadStdin(n) => {
                for _ in 0..n {
                    match getchar(&mut self.input, &mut self.output)? {
                        Some(byte) => self.tape[self.data_ptr] = byte,
                        None => break,  // EOF leaves the cell unchanged
                    }
                }
            },
            Op::WriteStdout(n) => {
                for _ in 0..n {
                    putchar(&mut self.output, self.tape[self.data_ptr])?;
                }
            },
            Op::LoopSetToZero => self.tape[self.data_ptr] = 0,
            Op::LoopMovePtr(n) => {
                while self.tape[self.data_ptr] != 0 {
                    self.data_ptr = self.seek(n)?;
                }
            },
            Op::LoopMoveData(n) => {
                let value = self.tape[self.data_ptr];
                if value != 0 {
                    let dst = self.seek(n)?;
                    self.tape[dst] = self.tape[dst].wrapping_add(value);
                    self.tape[self.data_ptr] = 0;
                }
            },
            Op::JumpIfDataZero(target) => {
                // skip the loop if the current cell is 0
                if self.tape[self.data_ptr] == 0 {
                    self.ins_ptr = target;
                }
            },
            Op::JumpIfDataNotZero(target) => {
                // return to the start of the loop if the current cell is not 0
                if self.tape[self.data_ptr] != 0 {
                    self.ins_ptr = target;
                }
            },
            Op::InvalidOp => return Err(Error::InvalidOp(self.ins_ptr)),
        }

        // a jump target past the end halts the program
        self.ins_ptr = self.ins_ptr.saturating_add(1);
        self.steps = self.steps.saturating_add(1);
        Ok(true)
    }

    /// The cell index `delta` away from the data pointer, if it is on the tape.
    fn seek(&self, delta: isize) -> Result<usize, Error> {
        match self.data_ptr.checked_add_signed(delta) {
            Some(cell) if cell < self.tape.len() => Ok(cell),
            _ => Err(Error::PointerOutOfRange {
                pc: self.ins_ptr,
                target: stride(self.data_ptr).saturating_add(delta),
            }),
        }
    }

    pub fn is_halted(&self) -> bool {
        self.ins_ptr >= self.ops.len()
    }

    pub fn tape(&self) -> &[u8] {
        &self.tape
    }

    pub fn data_ptr(&self) -> usize {
        self.data_ptr
    }

    pub fn ins_ptr(&self) -> usize {
        self.ins_ptr
    }

    /// Number of operations executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

fn stride(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}



#[cfg(test)]
mod tests {
    use std::io::{self, empty};

    use super::*;
    use crate::program::parse;
    use crate::translate::translate;

    fn run(code: &str, input: &[u8]) -> Result<Vec<u8>, Error> {
        let ops = translate(&parse(code.as_bytes()))?;
        let mut out = Vec::new();
        interpret(&ops, input, &mut out)?;
        Ok(out)
    }

    struct ClosedPipe;

    struct BrokenInput;

    impl Read for BrokenInput {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_print_bang() {
        assert_eq!(run(&"+".repeat(33), b"").unwrap(), b"");
        assert_eq!(run(&format!("{}.", "+".repeat(33)), b"").unwrap(), b"!");
    }

    #[test]
    fn test_add_and_print() {
        assert_eq!(run("++>+++++[<+>-]++++++++[<++++++>-]<.", b"").unwrap(), b"7");
    }

    #[test]
    fn test_echo() {
        assert_eq!(run(",.", b"A").unwrap(), b"A");
        assert_eq!(run(",,,.", b"xyz").unwrap(), b"z");
        assert_eq!(run(",[.[-],]", b"hello").unwrap(), b"hello");
    }

    #[test]
    fn test_eof_leaves_cell() {
        assert_eq!(run("+++,.", b"").unwrap(), [3]);
        assert_eq!(run(",,.", b"q").unwrap(), b"q");
    }

    #[test]
    fn test_repeated_write() {
        assert_eq!(run("+++...", b"").unwrap(), [3, 3, 3]);
    }

    #[test]
    fn test_wrapping() {
        assert_eq!(run(&format!("{}.", "+".repeat(256)), b"").unwrap(), [0]);
        assert_eq!(run("-.", b"").unwrap(), [255]);
        assert_eq!(run(&format!("{}.", "-".repeat(257)), b"").unwrap(), [255]);
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(run("", b"").unwrap(), b"");
    }

    #[test]
    fn test_infinite_loop_does_not_halt() {
        let ops = translate(&parse(b"+[]")).unwrap();
        let mut interpreter = Interpreter::new(&ops, empty(), Vec::new());
        assert!(!interpreter.run_for(10_000).unwrap());
        assert_eq!(interpreter.steps(), 10_000);
        assert!(!interpreter.is_halted());
    }

    #[test]
    fn test_run_for_halts() {
        let ops = translate(&parse(b"++.")).unwrap();
        let mut interpreter = Interpreter::new(&ops, empty(), Vec::new());
        assert!(interpreter.run_for(100).unwrap());
        assert_eq!(interpreter.steps(), 2);
        assert_eq!(interpreter.into_output(), [2]);
    }

    #[test]
    fn test_step() {
        let ops = translate(&parse(b"+>")).unwrap();
        let mut interpreter = Interpreter::new(&ops, empty(), Vec::new());
        assert!(interpreter.step().unwrap());
        assert_eq!(interpreter.tape()[0], 1);
        assert!(interpreter.step().unwrap());
        assert_eq!(interpreter.data_ptr(), 1);
        assert!(!interpreter.step().unwrap());
        assert_eq!(interpreter.ins_ptr(), 2);
    }

    #[test]
    fn test_pointer_underflow() {
        assert!(matches!(run("<", b""), Err(Error::PointerOutOfRange { pc: 0, target: -1 })));
        assert!(matches!(run("+>><<<", b""), Err(Error::PointerOutOfRange { pc: 2, target: -1 })));
    }

    #[test]
    fn test_pointer_overflow() {
        let ops = translate(&parse(b">>>>")).unwrap();
        let mut interpreter = Interpreter::with_tape_size(&ops, 4, empty(), Vec::new());
        assert!(matches!(interpreter.run(), Err(Error::PointerOutOfRange { pc: 0, target: 4 })));
        assert!(matches!(run(&">".repeat(TAPE_SIZE), b""), Err(Error::PointerOutOfRange { .. })));
        assert!(run(&">".repeat(TAPE_SIZE - 1), b"").is_ok());
    }

    #[test]
    fn test_loop_move_ptr() {
        let ops = translate(&parse(b"+>+>+>>+<<<<[>]")).unwrap();
        assert_eq!(ops.last(), Some(&Op::LoopMovePtr(1)));
        let mut interpreter = Interpreter::new(&ops, empty(), Vec::new());
        interpreter.run().unwrap();
        assert_eq!(interpreter.data_ptr(), 3);

        let ops = translate(&parse(b">>>+[<]")).unwrap();
        let mut interpreter = Interpreter::new(&ops, empty(), Vec::new());
        interpreter.run().unwrap();
        assert_eq!(interpreter.data_ptr(), 2);
    }

    #[test]
    fn test_loop_move_ptr_off_tape() {
        let ops = translate(&parse(b"+>+>+[>]")).unwrap();
        let mut interpreter = Interpreter::with_tape_size(&ops, 3, empty(), Vec::new());
        assert!(matches!(interpreter.run(), Err(Error::PointerOutOfRange { target: 3, .. })));
    }

    #[test]
    fn test_loop_move_data() {
        let ops = translate(&parse(b">>+++++[-<<+>>]")).unwrap();
        assert_eq!(ops.last(), Some(&Op::LoopMoveData(-2)));
        let mut interpreter = Interpreter::new(&ops, empty(), Vec::new());
        interpreter.run().unwrap();
        assert_eq!(&interpreter.tape()[..3], [5, 0, 0]);

        // adds onto the destination with wrap-around
        assert_eq!(run(&format!("{}>++[-<+>]<.", "+".repeat(255)), b"").unwrap(), [1]);
    }

    #[test]
    fn test_loop_move_data_zero_cell_stays_put() {
        let ops = translate(&parse(b"[->+<]")).unwrap();
        let mut interpreter = Interpreter::with_tape_size(&ops, 1, empty(), Vec::new());
        assert!(interpreter.run().is_ok());
    }

    #[test]
    fn test_set_to_zero() {
        assert_eq!(run("+++++[-].", b"").unwrap(), [0]);
        assert_eq!(run("+++++[+].", b"").unwrap(), [0]);
    }

    #[test]
    fn test_invalid_op() {
        let ops = [Op::IncData(1), Op::InvalidOp];
        let mut interpreter = Interpreter::new(&ops, empty(), Vec::new());
        assert!(matches!(interpreter.run(), Err(Error::InvalidOp(1))));
    }

    #[test]
    fn test_write_error() {
        let ops = translate(&parse(b"+.")).unwrap();
        assert!(matches!(interpret(&ops, empty(), ClosedPipe), Err(Error::Io(_))));
    }

    #[test]
    fn test_read_error() {
        let ops = translate(&parse(b",")).unwrap();
        assert!(matches!(interpret(&ops, BrokenInput, Vec::new()), Err(Error::Io(_))));
    }

    #[test]
    fn test_empty_tape() {
        let ops = [Op::IncData(1)];
        let mut interpreter = Interpreter::with_tape_size(&ops, 0, empty(), Vec::new());
        assert!(matches!(interpreter.run(), Err(Error::PointerOutOfRange { pc: 0, target: 0 })));
    }

    #[test]
    fn test_jump_past_end_halts() {
        let ops = [Op::JumpIfDataZero(usize::MAX)];
        let mut interpreter = Interpreter::new(&ops, empty(), Vec::new());
        assert!(interpreter.run().is_ok());
        assert!(interpreter.is_halted());
        assert_eq!(interpreter.ins_ptr(), usize::MAX);
    }
}
