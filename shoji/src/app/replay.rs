use shoji_proto::Command;

use super::App;
use crate::platform::HookService;
use crate::subclass::HookFailure;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("line {line}: malformed command: {source}")]
    Malformed {
        line: usize,
        source: serde_json::Error,
    },
}

/// A command read from a replay script, with its 1-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptCommand {
    pub line: usize,
    pub command: Command,
}

/// Parse a JSON-lines command script.
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_script(content: &str) -> Result<Vec<ScriptCommand>, ReplayError> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            Command::from_json(text)
                .map(|command| ScriptCommand { line, command })
                .map_err(|source| ReplayError::Malformed { line, source })
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub commands: usize,
    pub failures: usize,
}

impl<P: HookService> App<P> {
    /// Dispatch script commands in order until the end of the script or `quit`.
    /// `on_step` sees each command after its events were handled.
    pub fn replay(
        &mut self,
        script: &[ScriptCommand],
        mut on_step: impl FnMut(&ScriptCommand, &App<P>, &[HookFailure]),
    ) -> ReplaySummary {
        let mut summary = ReplaySummary::default();
        for step in script {
            if matches!(step.command, Command::Quit) {
                tracing::info!("Replay stopped by quit on line {}", step.line);
                break;
            }
            let failures = self.dispatch(&step.command);
            summary.commands += 1;
            summary.failures += failures.len();
            on_step(step, self, &failures);
        }
        summary
    }
}
