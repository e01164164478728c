//! Yes/mod/no confirmation of a value before a command acts on it.

use std::time::Duration;

use crate::console::Console;

/// Parse a yes/no answer, ignoring case.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

/// Ask a yes/no question until answered. `None` when input ends.
pub fn get_yesno(console: &mut Console<'_>, prompt: &str) -> Option<bool> {
    loop {
        let line = console.read_line(prompt)?;
        match parse_yes_no(&line) {
            Some(answer) => return Some(answer),
            None => console.warning("Invalid response. You must answer yes or no."),
        }
    }
}

/// Show a value, then let the user accept, modify or reject it.
///
/// `display` renders the value, `parse` reads a replacement typed after
/// `mod`. A `yes` argument on the command line accepts without asking.
pub struct ConfirmDialog<'f, T> {
    label: String,
    reenter_prompt: String,
    display: Box<dyn Fn(&T) -> String + 'f>,
    parse: Box<dyn Fn(&str) -> Option<T> + 'f>,
}

impl<'f, T> ConfirmDialog<'f, T> {
    pub fn new(
        label: impl Into<String>,
        reenter_prompt: impl Into<String>,
        display: impl Fn(&T) -> String + 'f,
        parse: impl Fn(&str) -> Option<T> + 'f,
    ) -> Self {
        Self {
            label: label.into(),
            reenter_prompt: reenter_prompt.into(),
            display: Box::new(display),
            parse: Box::new(parse),
        }
    }

    /// Run the dialog. Returns true when the (possibly modified) value is
    /// accepted and false when rejected or input ends.
    pub fn run(&self, console: &mut Console<'_>, value: &mut T) -> bool {
        let preconfirmed = console.args.has_yes();
        loop {
            console.send(&format!("The current {} is: {}", self.label, (self.display)(&*value)));
            if preconfirmed {
                return true;
            }

            let Some(answer) = console.read_line("Continue? (yes/mod/no): ") else {
                return false;
            };
            if answer.trim().eq_ignore_ascii_case("mod") {
                let Some(input) = console.read_line(&self.reenter_prompt) else {
                    return false;
                };
                match (self.parse)(input.trim()) {
                    Some(new_value) => *value = new_value,
                    None => console.error(&format!("Invalid {}.", self.label)),
                }
                continue;
            }
            if let Some(accepted) = parse_yes_no(&answer) {
                return accepted;
            }
        }
    }
}

impl<T> std::fmt::Debug for ConfirmDialog<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmDialog")
            .field("label", &self.label)
            .field("reenter_prompt", &self.reenter_prompt)
            .finish_non_exhaustive()
    }
}

/// Confirm a retention period, e.g. `msg = "Job"` shows
/// "The current Job retention period is: 30days".
pub fn confirm_retention(console: &mut Console<'_>, retention: &mut Duration, msg: &str) -> bool {
    ConfirmDialog::new(
        format!("{msg} retention period"),
        "Enter new retention period: ",
        |d: &Duration| humantime::format_duration(*d).to_string(),
        |s: &str| humantime::parse_duration(s).ok(),
    )
    .run(console, retention)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::console::ConsoleMode;
    use crate::test_support::Harness;

    const DAY: u64 = 24 * 60 * 60;

    #[test]
    fn test_yes_on_command_line_skips_input() {
        let mut h = Harness::new("prune jobs yes").input(&["no"]);
        let mut retention = Duration::from_secs(30 * DAY);

        assert!(confirm_retention(&mut h.console(), &mut retention, "Job"));
        assert_eq!(h.session.reads, 0);
        assert_eq!(h.session.output(), "The current Job retention period is: 30days");
    }

    #[test]
    fn test_mod_replaces_value_then_yes_accepts() {
        let mut h = Harness::new("prune jobs").input(&["mod", "14days", "yes"]);
        let mut retention = Duration::from_secs(30 * DAY);

        assert!(confirm_retention(&mut h.console(), &mut retention, "Job"));
        assert_eq!(retention, Duration::from_secs(14 * DAY));
        assert!(h.session.output().ends_with("The current Job retention period is: 14days"));
    }

    #[test]
    fn test_invalid_modification_keeps_old_value() {
        let mut h = Harness::new("prune").input(&["mod", "soon", "no"]);
        let mut retention = Duration::from_secs(DAY);

        assert!(!confirm_retention(&mut h.console(), &mut retention, "File"));
        assert_eq!(retention, Duration::from_secs(DAY));
        assert_eq!(h.session.errors(), vec!["Invalid File retention period."]);
    }

    #[test]
    fn test_unrecognized_answers_loop_and_eof_rejects() {
        let mut h = Harness::new("prune").input(&["maybe"]);
        let mut retention = Duration::from_secs(DAY);

        assert!(!confirm_retention(&mut h.console(), &mut retention, "Volume"));
        assert_eq!(h.session.reads, 2);
    }

    #[test]
    fn test_generic_dialog_over_integers() {
        let mut h = Harness::new("update").input(&["mod", "12", "y"]);
        let dialog = ConfirmDialog::new(
            "maximum volume jobs",
            "Enter new maximum volume jobs: ",
            u32::to_string,
            |s: &str| s.parse().ok(),
        );
        let mut value = 1_u32;

        assert!(dialog.run(&mut h.console(), &mut value));
        assert_eq!(value, 12);
    }

    #[test]
    fn test_get_yesno_warns_until_answered() {
        let mut h = Harness::new("cancel").input(&["perhaps", "N"]);

        assert_eq!(get_yesno(&mut h.console(), "Confirm cancel (yes/no): "), Some(false));
        assert_eq!(h.session.warnings(), vec!["Invalid response. You must answer yes or no."]);
    }

    #[test]
    fn test_batch_dialog_shows_value_and_rejects() {
        let mut h = Harness::new("prune jobs").mode(ConsoleMode::batch()).input(&["yes"]);
        let mut retention = Duration::from_secs(30 * DAY);

        assert!(!confirm_retention(&mut h.console(), &mut retention, "Job"));
        assert_eq!(h.session.reads, 0);
        assert!(h.session.output().starts_with("The current Job retention period is: 30days"));
        assert_eq!(
            h.session.errors(),
            vec!["Input for \"Continue? (yes/mod/no)\" is not possible in batch mode."]
        );
    }

    #[test]
    fn test_batch_yes_no_question_is_unanswered() {
        let mut h = Harness::new("cancel").mode(ConsoleMode::batch()).input(&["yes"]);

        assert_eq!(get_yesno(&mut h.console(), "Confirm cancel (yes/no): "), None);
        assert_eq!(h.session.reads, 0);
    }
}
