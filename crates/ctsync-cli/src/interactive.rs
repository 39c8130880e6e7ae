//! Interactive prompting for field overwrites

use std::io::Write;

use ctsync::merge::{FieldDiff, OverwriteApprover};
use ctsync::{Error, Field};
use dialoguer::console::Term;

/// User's choice for a conflicting field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserChoice {
    /// Overwrite this field
    Yes,
    /// Keep the existing field
    No,
    /// Overwrite this and all remaining conflicts
    All,
    /// Keep this and all remaining existing fields
    None,
    /// Show diff and re-prompt
    Diff,
    /// Quit before anything is written
    Quit,
}

impl UserChoice {
    /// Map a key press to a choice; Enter defaults to `No`
    #[must_use]
    pub const fn from_key(key: char) -> Option<Self> {
        match key {
            'y' | 'Y' => Some(Self::Yes),
            'n' | 'N' | '\n' | '\r' => Some(Self::No),
            'a' | 'A' => Some(Self::All),
            's' | 'S' => Some(Self::None),
            'd' | 'D' => Some(Self::Diff),
            // Raw-mode terminals deliver Ctrl+C as a key
            'q' | 'Q' | '\x03' => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Session state tracking for "all" or "none" choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionDecision {
    /// Ask for each conflict
    AskEach,
    /// Auto-approve all remaining
    ApproveAll,
    /// Auto-skip all remaining
    SkipAll,
}

/// Interactive prompter for field overwrites
pub struct InteractivePrompter {
    session_state: SessionDecision,
}

impl InteractivePrompter {
    /// Create a new interactive prompter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session_state: SessionDecision::AskEach,
        }
    }

    /// Ask whether `existing` may be replaced by `incoming`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aborted`] when the user quits and [`Error::Prompt`]
    /// when the terminal cannot be read.
    pub fn prompt(&mut self, existing: &Field, incoming: &Field) -> ctsync::Result<bool> {
        if let Some(decision) = self.session_answer() {
            return Ok(decision);
        }

        eprintln!(
            "\n⚠️  Field '{}' already exists\n  Existing: {} ({})\n  Incoming: {} ({})",
            existing.id,
            existing.name,
            existing.type_description(),
            incoming.name,
            incoming.type_description()
        );

        loop {
            match Self::show_prompt()? {
                UserChoice::Diff => {
                    eprintln!("\n{}", FieldDiff::render(existing, incoming, "existing", "incoming"));
                }
                choice => return self.apply(choice),
            }
        }
    }

    /// Answer given earlier with "all" or "skip-all"
    const fn session_answer(&self) -> Option<bool> {
        match self.session_state {
            SessionDecision::ApproveAll => Some(true),
            SessionDecision::SkipAll => Some(false),
            SessionDecision::AskEach => None,
        }
    }

    /// Turn a final choice into an answer, remembering session-wide ones
    fn apply(&mut self, choice: UserChoice) -> ctsync::Result<bool> {
        match choice {
            UserChoice::Yes => Ok(true),
            UserChoice::No | UserChoice::Diff => Ok(false),
            UserChoice::All => {
                self.session_state = SessionDecision::ApproveAll;
                Ok(true)
            }
            UserChoice::None => {
                self.session_state = SessionDecision::SkipAll;
                Ok(false)
            }
            UserChoice::Quit => Err(Error::Aborted),
        }
    }

    /// Show the selection prompt
    fn show_prompt() -> ctsync::Result<UserChoice> {
        let term = Term::stderr();

        Self::ask("Overwrite? [y/n/a/s/d/q] (yes/no/all/skip-all/diff/quit): ")?;

        loop {
            let key = term
                .read_char()
                .map_err(|e| Error::Prompt(format!("failed to read user input: {e}")))?;

            // Echo the character
            eprintln!("{key}");

            if let Some(choice) = UserChoice::from_key(key) {
                if matches!(key, '\n' | '\r') {
                    eprintln!("(defaulted to 'no')");
                }
                return Ok(choice);
            }

            eprintln!("Invalid key. Press y/n/a/s/d/q");
            Self::ask("Overwrite? [y/n/a/s/d/q]: ")?;
        }
    }

    fn ask(question: &str) -> ctsync::Result<()> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{question}")
            .and_then(|()| stderr.flush())
            .map_err(|e| Error::Prompt(format!("failed to write prompt: {e}")))
    }
}

impl Default for InteractivePrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl OverwriteApprover for InteractivePrompter {
    fn approve(&mut self, existing: &Field, incoming: &Field) -> ctsync::Result<bool> {
        self.prompt(existing, incoming)
    }
}
