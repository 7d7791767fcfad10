//! Hook output.
//!
//! GitLab relays stdout to the pusher; logs go to stderr.

use std::io::{self, Write};

use eca_gate_core::report::{hook_error, FATAL_MESSAGE};
use eca_gate_core::Evaluation;

/// Write the report and verdict for an evaluated push.
pub fn write_evaluation<W: Write>(out: &mut W, evaluation: &Evaluation) -> io::Result<()> {
    out.write_all(evaluation.render().as_bytes())?;
    out.flush()
}

/// Write the only line a fatal error shows the pusher.
pub fn write_fatal<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", hook_error(FATAL_MESSAGE))?;
    out.flush()
}

pub fn print_evaluation(evaluation: &Evaluation) {
    let _ = write_evaluation(&mut io::stdout().lock(), evaluation);
}

pub fn print_fatal() {
    let _ = write_fatal(&mut io::stdout().lock());
}

#[cfg(test)]
mod tests {
    use super::*;
    use eca_gate_core::{PushOutcome, SkipReason};

    #[test]
    fn test_fatal_line() {
        let mut buf = Vec::new();
        write_fatal(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "GL-HOOK-ERR: Internal server error, please contact administrator.\n"
        );
    }

    #[test]
    fn test_skip_output_is_not_an_error() {
        let evaluation = Evaluation {
            outcome: PushOutcome::Skipped(SkipReason::UntrackedProject),
            range: Vec::new(),
            classification: None,
            refused: false,
        };
        let mut buf = Vec::new();
        write_evaluation(&mut buf, &evaluation).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains("GL-HOOK-ERR"));
        assert!(text.contains("non-tracked"));
    }
}
