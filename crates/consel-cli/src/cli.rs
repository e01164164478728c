//! # CLI Structure and Argument Parsing
//!
//! `consel` is a console for a backup director. Process flags configure the
//! console; everything after them is a console command line in the director's
//! own `keyword=value` syntax, which clap does not interpret.
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Interactive session (reads commands from stdin)
//! consel --config director.toml
//!
//! # One command, then exit
//! consel mount storage=Tape drive=1 slot=4
//! consel --batch cancel jobid=12 jobid=14 yes
//!
//! # Machine clients
//! consel --api pool
//! consel --output json mediatype
//! ```
//!
//! ## Exit Codes
//!
//! One-shot commands exit with the semantic codes in [`crate::error`], so
//! scripts can tell "not found" from "needs interaction" without parsing text.

use std::path::PathBuf;

use clap::Parser;

use crate::output::OutputFormat;

/// Main CLI structure for the `consel` command.
///
/// # Examples
///
/// ```bash
/// consel -v status director
/// consel --no-color --batch slots storage=Tape slots=1-5,9
/// ```
#[derive(Parser, Clone, Debug)]
#[command(name = "consel")]
#[command(version)]
#[command(about = "consel - backup director console", long_about = None)]
#[command(override_usage = "consel [OPTIONS] [COMMAND] [ARGS]...")]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Console command and its keyword[=value] arguments. Omit for a session.
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Path to the director description. Also via `CONSEL_CONFIG`.
    #[arg(long, value_name = "FILE", env = "CONSEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Never prompt; commands that need a choice fail instead
    #[arg(long)]
    pub batch: bool,

    /// Frame selection lists with @@ markers for machine clients
    #[arg(long)]
    pub api: bool,

    /// Output format for command results
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Log every resolution decision
    #[arg(long)]
    pub debug: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    /// The trailing command as one console line, quoting words with blanks.
    pub fn command_line(&self) -> Option<String> {
        if self.command.is_empty() {
            return None;
        }
        let words: Vec<String> = self.command.iter().map(|word| quote_word(word)).collect();
        Some(words.join(" "))
    }
}

/// `pool=Full Pool` becomes `pool="Full Pool"` so the console tokenizer sees one token.
fn quote_word(word: &str) -> String {
    if !word.contains(char::is_whitespace) {
        return word.to_owned();
    }
    match word.split_once('=') {
        Some((keyword, value)) => format!("{keyword}=\"{value}\""),
        None => format!("\"{word}\""),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_words_form_the_command_line() {
        let cli = Cli::try_parse_from(["consel", "--batch", "cancel", "jobid=3", "yes"]).unwrap();

        assert!(cli.batch);
        assert_eq!(cli.command_line().as_deref(), Some("cancel jobid=3 yes"));
    }

    #[test]
    fn test_no_command_means_session() {
        let cli = Cli::try_parse_from(["consel", "--api"]).unwrap();
        assert!(cli.api);
        assert_eq!(cli.command_line(), None);
    }

    #[test]
    fn test_words_with_blanks_are_quoted() {
        let cli = Cli::try_parse_from(["consel", "label", "pool=Full Pool", "Odd Name"]).unwrap();
        assert_eq!(
            cli.command_line().as_deref(),
            Some("label pool=\"Full Pool\" \"Odd Name\"")
        );
    }

    #[test]
    fn test_output_format_flag() {
        let cli = Cli::try_parse_from(["consel", "-o", "json", "pool"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
    }
}
