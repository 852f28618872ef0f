//! Terminal output abstractions and implementations for user-facing messages and prompts.
//!
//! - [`Terminal`]: a color-capable terminal renderer
//! - [`Quiet`]: a silent implementation that suppresses output (useful for tests)

use std::{
    char,
    collections::HashSet,
    io::{self, Write},
    result::Result as StdResult,
    time::Duration,
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};
use indicatif::{ProgressBar, ProgressStyle};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use thiserror::Error;

/// Indentation level (in spaces) used for nested output sections.
const INDENT: usize = 4;

/// Width assumed when the terminal size cannot be queried.
const FALLBACK_WIDTH: usize = 80;

/// Narrowest width text is ever wrapped to.
const MIN_WRAP_WIDTH: usize = 20;

/// ASCII control representation of `Ctrl+C`.
const CTRL_C: char = '\u{3}';
/// ASCII control representation of `Ctrl+D`.
const CTRL_D: char = '\u{4}';

/// Determine whether the combination of `code` and `modifiers` represents an
/// interactive cancellation such as `Ctrl+C`, `Ctrl+D`, or `Esc`.
fn is_cancel_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char(ch) => {
            if modifiers.contains(KeyModifiers::CONTROL)
                && matches!(ch.to_lowercase().next().unwrap_or(ch), 'c' | 'd')
            {
                return true;
            }

            matches!(ch, CTRL_C | CTRL_D)
        }
        KeyCode::Esc => true,
        _ => false,
    }
}

/// Wrap `msg` to `width` columns, prefixing every line with `indent` spaces.
fn wrap_indented(msg: &str, indent: usize, width: usize) -> Vec<String> {
    let prefix = " ".repeat(indent);
    let available = width.saturating_sub(indent).max(MIN_WRAP_WIDTH);
    let options = textwrap::Options::new(available)
        .initial_indent(&prefix)
        .subsequent_indent(&prefix);
    msg.lines()
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, &options)
                    .into_iter()
                    .map(|l| l.into_owned())
                    .collect()
            }
        })
        .collect()
}

/// Current terminal width in columns.
fn terminal_width() -> usize {
    terminal::size()
        .map(|(cols, _)| usize::from(cols))
        .unwrap_or(FALLBACK_WIDTH)
}

/// Errors produced by [`Output`] implementations when interacting with the user
/// or the terminal.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The requested operation is not supported by this output backend.
    #[error("{0}")]
    Unsupported(&'static str),

    /// The caller supplied invalid input (e.g. empty options for a selector).
    #[error("{0}")]
    InvalidInput(&'static str),

    /// A terminal/TTY related failure occurred.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Underlying I/O error while writing/reading to the terminal.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The user cancelled an interactive prompt.
    #[error("Selection cancelled")]
    Cancelled,
}

/// Convenience alias for output-related fallible operations.
pub type Result<T> = StdResult<T, OutputError>;

/// Progress indicator for slow operations such as pushes.
///
/// A spinner created by [`Quiet`] is inert.
pub struct Spinner {
    /// The live progress bar, absent in quiet mode.
    bar: Option<ProgressBar>,
    /// Renderer used for the final status line.
    color_choice: ColorChoice,
    /// Indentation of the final status line.
    indent: usize,
}

impl Spinner {
    /// A spinner that never draws anything.
    fn hidden() -> Self {
        Self {
            bar: None,
            color_choice: ColorChoice::Never,
            indent: 0,
        }
    }

    /// Stop the spinner and print `msg` in `color`.
    fn finish_with(self, msg: &str, color: Color) {
        let Some(bar) = &self.bar else {
            return;
        };
        bar.finish_and_clear();
        if let Err(err) = self.write_status(msg, color) {
            eprintln!("Failed to write spinner status: {err}");
        }
    }

    /// Print the final status line.
    fn write_status(&self, msg: &str, color: Color) -> io::Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);
        stdout.set_color(ColorSpec::new().set_fg(Some(color)))?;
        writeln!(stdout, "{}{msg}", " ".repeat(self.indent))?;
        stdout.reset()?;
        stdout.flush()
    }

    /// Stop the spinner and report success.
    pub fn finish_success(self, msg: &str) {
        self.finish_with(msg, Color::Green);
    }

    /// Stop the spinner and report failure.
    pub fn finish_fail(self, msg: &str) {
        self.finish_with(msg, Color::Red);
    }

    /// Stop the spinner without printing anything.
    pub fn finish_clear(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Abstraction over how user-facing messages and prompts are produced.
pub trait Output: Send + Sync {
    /// Print an informational message.
    fn message(&self, msg: &str) -> Result<()>;
    /// Print a success message.
    fn success(&self, msg: &str) -> Result<()>;
    /// Print a warning message.
    fn warn(&self, msg: &str) -> Result<()>;
    /// Print an error/failure message.
    fn fail(&self, msg: &str) -> Result<()>;
    /// Print a `label: value` pair.
    fn item(&self, label: &str, value: &str) -> Result<()>;
    /// Ask the user to confirm an action; returns `true` if confirmed.
    fn confirm(&self, prompt: &str) -> Result<bool>;
    /// Present a list of `options` and return the chosen index.
    fn select(&self, prompt: &str, options: Vec<String>) -> Result<usize>;
    /// Start a spinner labelled `msg`.
    fn spinner(&self, msg: &str) -> Spinner;
    /// Flush any buffered output.
    fn finish(&self) -> Result<()>;
    /// Create a nested output section that indents subsequent messages.
    fn section(&self, header: &str) -> Box<dyn Output>;
}

/// Output implementation that suppresses all messages and rejects interactive
/// prompts. Useful for non-interactive or test environments.
pub struct Quiet;

impl Output for Quiet {
    fn message(&self, _msg: &str) -> Result<()> {
        Ok(())
    }

    fn success(&self, _msg: &str) -> Result<()> {
        Ok(())
    }

    fn warn(&self, _msg: &str) -> Result<()> {
        Ok(())
    }

    fn fail(&self, _msg: &str) -> Result<()> {
        Ok(())
    }

    fn item(&self, _label: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Err(OutputError::Unsupported(
            "Cannot prompt for confirmation in quiet mode",
        ))
    }

    fn select(&self, _prompt: &str, _options: Vec<String>) -> Result<usize> {
        Err(OutputError::Unsupported(
            "Cannot prompt for selection in quiet mode",
        ))
    }

    fn spinner(&self, _msg: &str) -> Spinner {
        Spinner::hidden()
    }

    fn finish(&self) -> Result<()> {
        Ok(())
    }

    fn section(&self, _header: &str) -> Box<dyn Output> {
        Box::new(Self)
    }
}

/// Color-capable terminal renderer for user messages and prompts.
pub struct Terminal {
    /// Whether to emit ANSI color sequences when writing to stdout.
    color_choice: ColorChoice,
    /// Current indentation depth in spaces.
    indent: usize,
}

impl Terminal {
    /// Create a new terminal output.
    ///
    /// - `color`: when `true`, always render colored output; when `false`,
    ///   disable ANSI colors.
    pub fn new(color: bool) -> Self {
        let color_choice = if color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self {
            color_choice,
            indent: 0,
        }
    }

    /// Write `msg` using `color`, wrapped to the terminal width at the current indentation.
    fn write_colored(&self, msg: &str, color: Color) -> Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);
        stdout.set_color(ColorSpec::new().set_fg(Some(color)))?;
        for line in wrap_indented(msg, self.indent, terminal_width()) {
            writeln!(stdout, "{line}")?;
        }
        stdout.reset()?;
        stdout.flush()?;
        Ok(())
    }

    /// Generate mnemonic shortcuts for the provided `options` list.
    fn generate_shortcuts(&self, options: &[String]) -> Vec<char> {
        let mut shortcuts = Vec::new();
        let mut used_chars = HashSet::new();

        for option in options {
            // First unused letter of the option, then a digit, then any letter
            let shortcut = option
                .chars()
                .filter(|ch| ch.is_alphabetic())
                .map(|ch| ch.to_lowercase().next().unwrap_or(ch))
                .find(|ch| !used_chars.contains(ch))
                .or_else(|| {
                    (1..=9)
                        .filter_map(|i| char::from_digit(i, 10))
                        .find(|ch| !used_chars.contains(ch))
                })
                .or_else(|| ('a'..='z').find(|ch| !used_chars.contains(ch)));

            if let Some(ch) = shortcut {
                used_chars.insert(ch);
            }
            shortcuts.push(shortcut.unwrap_or('?'));
        }

        shortcuts
    }

    /// Render `option` while highlighting `shortcut` within the label when possible.
    fn print_option_with_shortcut(&self, option: &str, shortcut: char) -> Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);

        let matched = option
            .char_indices()
            .find(|(_, ch)| ch.to_lowercase().next().unwrap_or(*ch) == shortcut);

        if let Some((idx, ch)) = matched {
            write!(stdout, "{}", &option[..idx])?;
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(stdout, "{ch}")?;
            stdout.reset()?;
            write!(stdout, "{}", &option[idx + ch.len_utf8()..])?;
        } else {
            // Shortcut not in option text, print shortcut in brackets
            write!(stdout, "[{shortcut}] {option}")?;
        }

        writeln!(stdout)?;
        stdout.flush()?;
        Ok(())
    }
}

impl Output for Terminal {
    fn message(&self, msg: &str) -> Result<()> {
        self.write_colored(msg, Color::Cyan)
    }

    fn success(&self, msg: &str) -> Result<()> {
        self.write_colored(msg, Color::Green)
    }

    fn warn(&self, msg: &str) -> Result<()> {
        self.write_colored(msg, Color::Rgb(255, 165, 0)) // Orange
    }

    fn fail(&self, msg: &str) -> Result<()> {
        self.write_colored(msg, Color::Red)
    }

    fn item(&self, label: &str, value: &str) -> Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);
        write!(stdout, "{}", " ".repeat(self.indent))?;
        stdout.set_color(ColorSpec::new().set_bold(true))?;
        write!(stdout, "{label}:")?;
        stdout.reset()?;
        writeln!(stdout, " {value}")?;
        stdout.flush()?;
        Ok(())
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        let options = vec!["Yes".to_string(), "No".to_string()];
        let selection = self.select(prompt, options)?;
        Ok(selection == 0)
    }

    fn select(&self, prompt: &str, options: Vec<String>) -> Result<usize> {
        if options.is_empty() {
            return Err(OutputError::InvalidInput(
                "No options provided for selection",
            ));
        }

        let shortcuts = self.generate_shortcuts(&options);

        println!("{}{prompt}", " ".repeat(self.indent));
        for (option, shortcut) in options.iter().zip(shortcuts.iter()) {
            print!("{}  ", " ".repeat(self.indent));
            self.print_option_with_shortcut(option, *shortcut)?;
        }

        print!("{} > ", " ".repeat(self.indent));
        io::stdout().flush()?;

        terminal::enable_raw_mode().map_err(|e| OutputError::Terminal(e.to_string()))?;

        let result = (|| -> Result<(usize, char)> {
            loop {
                if let Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind,
                    ..
                }) = event::read().map_err(|e| OutputError::Terminal(e.to_string()))?
                {
                    if kind != KeyEventKind::Press {
                        continue;
                    }

                    if is_cancel_key(code, modifiers) {
                        return Err(OutputError::Cancelled);
                    }

                    if let KeyCode::Char(ch) = code {
                        let ch_lower = ch.to_lowercase().next().unwrap_or(ch);
                        if let Some(index) = shortcuts.iter().position(|&s| s == ch_lower) {
                            return Ok((index, ch_lower));
                        }
                    }
                }
            }
        })();

        // Always restore terminal mode
        terminal::disable_raw_mode().map_err(|e| OutputError::Terminal(e.to_string()))?;

        match result {
            Ok((index, ch)) => {
                println!("{ch}");
                Ok(index)
            }
            Err(e) => {
                println!();
                Err(e)
            }
        }
    }

    fn spinner(&self, msg: &str) -> Spinner {
        let bar = ProgressBar::new_spinner();
        let template = format!("{}{{spinner}} {{msg}}", " ".repeat(self.indent));
        if let Ok(style) = ProgressStyle::with_template(&template) {
            bar.set_style(style);
        }
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Spinner {
            bar: Some(bar),
            color_choice: self.color_choice,
            indent: self.indent,
        }
    }

    fn finish(&self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn section(&self, header: &str) -> Box<dyn Output> {
        if let Err(err) = self.message(header) {
            eprintln!("Failed to write section header: {err}");
        }

        Box::new(Self {
            color_choice: self.color_choice,
            indent: self.indent + INDENT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_confirm_returns_error() {
        let quiet = Quiet;
        let result = quiet.confirm("Test prompt?");
        assert!(result.is_err());

        if let Err(e) = result {
            assert!(matches!(e, OutputError::Unsupported(_)));
            assert_eq!(
                e.to_string(),
                "Cannot prompt for confirmation in quiet mode"
            );
        }
    }

    #[test]
    fn test_quiet_select_returns_error() {
        let quiet = Quiet;
        let options = vec!["Local".to_string(), "GitHub".to_string()];
        let result = quiet.select("Where should the notes live?", options);
        assert!(result.is_err());

        if let Err(e) = result {
            assert!(matches!(e, OutputError::Unsupported(_)));
            assert_eq!(e.to_string(), "Cannot prompt for selection in quiet mode");
        }
    }

    #[test]
    fn test_quiet_spinner_is_inert() {
        let quiet = Quiet;
        quiet.spinner("Pushing...").finish_success("Pushed");
        quiet.spinner("Pushing...").finish_fail("Push failed");
        quiet.spinner("Pushing...").finish_clear();
        assert!(quiet.item("branch", "main").is_ok());
    }

    #[test]
    fn test_terminal_generate_shortcuts() {
        let terminal = Terminal::new(false);

        let options = vec![
            "Local".to_string(),
            "GitHub".to_string(),
            "URL".to_string(),
        ];
        assert_eq!(terminal.generate_shortcuts(&options), vec!['l', 'g', 'u']);

        // Conflicting first letters fall through to later letters
        let options = vec![
            "Apple".to_string(),
            "Apricot".to_string(),
            "Avocado".to_string(),
        ];
        let shortcuts = terminal.generate_shortcuts(&options);
        assert_eq!(shortcuts[0], 'a');
        assert!(shortcuts[1] != 'a');
        assert!(shortcuts[2] != 'a' && shortcuts[2] != shortcuts[1]);

        // Options without letters get digits
        let options = vec!["A".to_string(), "--".to_string()];
        assert_eq!(terminal.generate_shortcuts(&options), vec!['a', '1']);
    }

    #[test]
    fn test_select_empty_options_error() {
        let terminal = Terminal::new(false);
        let result = terminal.select("Choose:", vec![]);
        assert!(result.is_err());

        if let Err(e) = result {
            assert!(matches!(e, OutputError::InvalidInput(_)));
            assert_eq!(e.to_string(), "No options provided for selection");
        }
    }

    #[test]
    fn test_is_cancel_key_variants() {
        assert!(is_cancel_key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(is_cancel_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(is_cancel_key(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert!(is_cancel_key(KeyCode::Char(CTRL_C), KeyModifiers::NONE));
        assert!(is_cancel_key(KeyCode::Char(CTRL_D), KeyModifiers::NONE));

        assert!(!is_cancel_key(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!is_cancel_key(KeyCode::Char('x'), KeyModifiers::CONTROL));
    }

    #[test]
    fn test_wrap_indented() {
        let lines = wrap_indented("one two three four five six", 4, 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| line.starts_with("    ")));
        assert!(lines.iter().all(|line| line.len() <= 20));

        // Blank lines survive wrapping
        assert_eq!(wrap_indented("a\n\nb", 0, 80), vec!["a", "", "b"]);
    }

    #[test]
    fn test_section_creates_indented_output() {
        let terminal = Terminal::new(false);
        assert_eq!(terminal.indent, 0);

        let section1 = terminal.section("Section 1");
        section1
            .message("Test message")
            .expect("section message succeeds");

        let section2 = section1.section("Section 2");
        section2
            .message("Nested message")
            .expect("nested section message succeeds");
    }
}
