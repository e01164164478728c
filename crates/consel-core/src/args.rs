//! # Command Argument Vector
//!
//! A console command line is a command word followed by `keyword` or
//! `keyword=value` tokens:
//!
//! ```text
//! cancel jobid=12 jobid=14 yes
//! label storage="Tape Loader" pool=Full slots=1-5,9
//! ```
//!
//! [`ArgumentVector`] keeps the tokens in order. Index 0 is the command word,
//! arguments start at index 1, and every keyword comparison ignores ASCII case.
//! An empty value (`storage=`) is stored as "no value".

use thiserror::Error;

/// Tokenizer failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    /// A double quote was opened but never closed.
    #[error("unterminated quote in command line")]
    UnterminatedQuote,
}

/// One `keyword[=value]` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// Token text before the first `=`.
    pub keyword: String,
    /// Token text after the first `=`, `None` when absent or empty.
    pub value: Option<String>,
}

impl Argument {
    /// Build an argument from a keyword and optional value.
    pub fn new(keyword: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            keyword: keyword.into(),
            value: value.filter(|v| !v.is_empty()).map(str::to_owned),
        }
    }
}

/// Ordered keyword/value pairs of one console command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentVector {
    entries: Vec<Argument>,
}

impl ArgumentVector {
    /// Build a vector from a command word and its arguments.
    pub fn new(command: impl Into<String>, args: impl IntoIterator<Item = Argument>) -> Self {
        let mut entries = vec![Argument::new(command, None)];
        entries.extend(args);
        Self { entries }
    }

    /// Tokenize a command line.
    ///
    /// Whitespace separates tokens except inside double quotes; quotes are
    /// removed, so `pool="Full Pool"` yields keyword `pool` and value `Full Pool`.
    ///
    /// ```rust
    /// use consel_core::args::ArgumentVector;
    ///
    /// let args = ArgumentVector::parse(r#"update pool="Full Pool" yes"#)?;
    /// assert_eq!(args.command(), "update");
    /// assert_eq!(args.value(1), Some("Full Pool"));
    /// assert_eq!(args.find_arg("YES"), Some(2));
    /// # Ok::<(), consel_core::args::ArgsError>(())
    /// ```
    pub fn parse(line: &str) -> Result<Self, ArgsError> {
        let tokens = tokenize(line)?;
        let mut tokens = tokens.into_iter();
        let command = tokens.next().unwrap_or_default();
        let args = tokens.map(|token| match token.split_once('=') {
            Some((keyword, value)) => Argument::new(keyword, Some(value)),
            None => Argument::new(token, None),
        });
        Ok(Self::new(command, args))
    }

    /// The command word (index 0).
    pub fn command(&self) -> &str {
        self.entries.first().map_or("", |a| a.keyword.as_str())
    }

    /// Number of entries including the command word.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there is not even a command word.
    pub fn is_empty(&self) -> bool {
        self.command().is_empty() && self.entries.len() <= 1
    }

    /// Keyword at `index`, empty when out of range.
    pub fn keyword(&self, index: usize) -> &str {
        self.entries.get(index).map_or("", |a| a.keyword.as_str())
    }

    /// Value at `index`, `None` when absent or out of range.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.entries.get(index).and_then(|a| a.value.as_deref())
    }

    /// Arguments after the command word, with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Argument)> {
        self.entries.iter().enumerate().skip(1)
    }

    /// Index of the first argument whose keyword is `keyword`.
    pub fn find_arg(&self, keyword: &str) -> Option<usize> {
        self.iter()
            .find(|(_, a)| a.keyword.eq_ignore_ascii_case(keyword))
            .map(|(i, _)| i)
    }

    /// Index of the first `keyword` argument, provided that occurrence has a value.
    ///
    /// Only the first occurrence counts: `pool pool=Full` has no pool value.
    pub fn find_arg_with_value(&self, keyword: &str) -> Option<usize> {
        let index = self.find_arg(keyword)?;
        self.value(index).map(|_| index)
    }

    /// Position within `keywords` of the first keyword present on the line.
    pub fn find_arg_keyword(&self, keywords: &[&str]) -> Option<usize> {
        self.iter().find_map(|(_, a)| {
            keywords
                .iter()
                .position(|k| k.eq_ignore_ascii_case(&a.keyword))
        })
    }

    /// Index of the first argument matching any of `keywords` that carries a value.
    pub fn find_any_with_value(&self, keywords: &[&str]) -> Option<usize> {
        self.iter()
            .find(|(_, a)| {
                a.value.is_some() && keywords.iter().any(|k| k.eq_ignore_ascii_case(&a.keyword))
            })
            .map(|(i, _)| i)
    }

    /// True when the `yes` flag is on the line.
    pub fn has_yes(&self) -> bool {
        self.find_arg("yes").is_some()
    }
}

fn tokenize(line: &str) -> Result<Vec<String>, ArgsError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            },
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            },
            c => {
                current.push(c);
                in_token = true;
            },
        }
    }

    if in_quotes {
        return Err(ArgsError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
