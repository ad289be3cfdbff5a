//! User confirmation gate.
//!
//! Every action that would destroy existing backed-up or existing home data
//! passes through a [`Confirm`] implementation first.  The terminal
//! implementation defaults to *no*: on a non-interactive stdin (or when the
//! input stream ends) it declines rather than assume consent.
use std::io::IsTerminal as _;

/// Synchronous yes/no gate guarding destructive overwrites.
pub trait Confirm {
    /// Ask the user to confirm an action.
    ///
    /// Returns `true` only on an explicit affirmation.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Terminal-backed gate using a [`dialoguer`] prompt.
///
/// Declines automatically when stdin is not a TTY, so piped or scripted
/// invocations never overwrite anything without `--force`-style intent.
#[derive(Debug, Default, Clone, Copy)]
pub struct TermConfirm;

impl Confirm for TermConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if !std::io::stdin().is_terminal() {
            return false;
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Gate that confirms every prompt.  For tests and batch tooling.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Gate that declines every prompt.  For tests and batch tooling.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoDecline;

impl Confirm for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}
