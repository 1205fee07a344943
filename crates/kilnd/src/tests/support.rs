//! Shared test doubles for kernel tests.

use std::cell::RefCell;
use std::io::Cursor;

use kiln_protocol::Envelope;
use kiln_runner::{ExecutionOutcome, SnippetRunner};

use crate::dispatch::Dispatcher;
use crate::transport::{Kernel, SessionSummary};

/// Snippet that [`ScriptedRunner`] treats as a build failure.
pub(crate) const BROKEN_SNIPPET: &str = "fmt.Println(";

/// Diagnostics reported for [`BROKEN_SNIPPET`].
pub(crate) const BUILD_DIAGNOSTICS: &str =
    "# command-line-arguments\n./main.go:7:1: syntax error: unexpected }\n";

/// Runner that echoes snippets back instead of spawning a toolchain.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    /// Returns the snippets run so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl SnippetRunner for ScriptedRunner {
    fn run(&self, snippet: &str) -> ExecutionOutcome {
        self.calls.borrow_mut().push(snippet.to_owned());
        if snippet == BROKEN_SNIPPET {
            ExecutionOutcome::failure(BUILD_DIAGNOSTICS, Some(1))
        } else {
            ExecutionOutcome::success(format!("ran: {snippet}\n"))
        }
    }
}

/// Output of one in-memory kernel session.
pub(crate) struct Session {
    pub(crate) summary: SessionSummary,
    pub(crate) lines: Vec<String>,
    pub(crate) calls: Vec<String>,
}

impl Session {
    /// Decodes every response line.
    pub(crate) fn envelopes(&self) -> Vec<Envelope> {
        self.lines
            .iter()
            .map(|line| Envelope::decode(line).expect("response line decodes"))
            .collect()
    }
}

/// Runs a kernel over `input` with a [`ScriptedRunner`].
pub(crate) fn run_session(input: impl Into<Vec<u8>>) -> Session {
    let kernel = Kernel::new(Dispatcher::new(ScriptedRunner::default()));
    let mut output = Vec::new();
    let summary = kernel.serve(Cursor::new(input.into()), &mut output);

    let text = String::from_utf8(output).expect("responses are utf8");
    assert!(
        text.is_empty() || text.ends_with('\n'),
        "responses must be newline terminated: {text:?}"
    );
    Session {
        summary,
        lines: text.lines().map(str::to_owned).collect(),
        calls: kernel.runner_calls(),
    }
}

impl Kernel<ScriptedRunner> {
    fn runner_calls(&self) -> Vec<String> {
        self.dispatcher().runner().calls()
    }
}
