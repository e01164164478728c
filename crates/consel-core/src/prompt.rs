//! Numbered-choice dialogs.
//!
//! A [`PromptSession`] collects a header and a list of unique option labels;
//! [`choose`] consumes it and returns the user's pick. The chooser never reads
//! input when there is nothing to decide (zero or one option) or when it cannot
//! ask (batch mode).

use tracing::debug;

use crate::collab::Signal;
use crate::console::Console;
use crate::error::SelectError;

/// Token that aborts any numeric prompt.
pub const ABORT_TOKEN: &str = ".";

/// Header plus deduplicated options, in first-added order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptSession {
    header: String,
    options: Vec<String>,
}

impl PromptSession {
    /// Fresh session with the given header and no options.
    pub fn start(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            options: Vec::new(),
        }
    }

    /// Append an option unless an identical label is already present.
    ///
    /// Returns true when the option was added.
    pub fn add(&mut self, option: impl Into<String>) -> bool {
        let option = option.into();
        if self.options.contains(&option) {
            return false;
        }
        self.options.push(option);
        true
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// Number of options, excluding the header.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }
}

/// The user's pick: 0-based index and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub index: usize,
    pub label: String,
}

/// Run the numbered-choice dialog over `prompts`.
///
/// `automsg` names what is being chosen in messages ("Storage", "Pool"),
/// `msg` is the input prompt shown before the valid range.
pub fn choose(
    console: &mut Console<'_>,
    prompts: PromptSession,
    automsg: &str,
    msg: &str,
) -> Result<Choice, SelectError> {
    let PromptSession { header, mut options } = prompts;
    let count = options.len();

    if count == 0 {
        console.error(&format!("Selection list for \"{automsg}\" is empty!"));
        return Err(SelectError::EmptyCandidateSet(automsg.to_owned()));
    }

    if console.mode.batch && count > 1 {
        console.send(&header);
        for (i, option) in options.iter().enumerate() {
            console.send(&format!("{:6}: {option}", i + 1));
        }
        console.error(&format!(
            "Your request has multiple choices for \"{automsg}\". Selection is not possible in batch mode."
        ));
        return Err(SelectError::AmbiguousInBatchMode(automsg.to_owned()));
    }

    if count == 1 {
        let label = options.swap_remove(0);
        if console.mode.api {
            console.session.signal(Signal::StartSelect);
            console.send(&header);
            console.send(&label);
            console.session.signal(Signal::EndSelect);
        } else {
            console.send(&format!("Automatically selected {automsg}: {label}"));
        }
        debug!(automsg, %label, "single candidate selected");
        return Ok(Choice { index: 0, label });
    }

    if console.mode.api {
        console.session.signal(Signal::StartSelect);
    }
    console.send(&header);
    for (i, option) in options.iter().enumerate() {
        if console.mode.api {
            console.send(option);
        } else {
            console.send(&format!("{:6}: {option}", i + 1));
        }
    }
    if console.mode.api {
        console.session.signal(Signal::EndSelect);
    }

    let prompt = format!("{msg} (1-{count}): ");
    loop {
        if console.mode.api {
            console.session.signal(Signal::SelectInput);
        }
        let Some(item) = get_pint(console, &prompt) else {
            return Err(console.aborted());
        };
        match usize::try_from(item) {
            Ok(n) if (1..=count).contains(&n) => {
                let label = options.swap_remove(n - 1);
                debug!(automsg, %label, "candidate chosen");
                return Ok(Choice { index: n - 1, label });
            },
            _ => console.warning(&format!("Please enter a number between 1 and {count}")),
        }
    }
}

/// Read a non-negative integer, re-prompting on empty or malformed input.
///
/// `None` when input ends or the user types the abort token.
pub fn get_pint(console: &mut Console<'_>, prompt: &str) -> Option<u64> {
    loop {
        let line = console.read_line(prompt)?;
        let answer = line.trim();
        if answer == ABORT_TOKEN {
            return None;
        }
        if answer.is_empty() {
            continue;
        }
        match answer.parse::<u64>() {
            Ok(value) => return Some(value),
            Err(_) => console.warning(&format!("Expected a positive integer, got: {answer}")),
        }
    }
}

/// Offer `keywords` as a menu and return the index of the chosen one.
pub fn do_keyword_prompt(
    console: &mut Console<'_>,
    msg: &str,
    keywords: &[&str],
) -> Result<usize, SelectError> {
    let mut prompts = PromptSession::start("You have the following choices:");
    for keyword in keywords {
        prompts.add(*keyword);
    }
    choose(console, prompts, "", msg).map(|choice| choice.index)
}
