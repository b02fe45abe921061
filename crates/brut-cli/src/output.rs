//! Colored terminal output for commands.
//!
//! Status lines and badges go to stdout, diagnostics to stderr. `NO_COLOR`
//! overrides `--color`.

use std::io::Write;

use clap::ValueEnum;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Width of the right-aligned verb column in status lines.
const STATUS_WIDTH: usize = 12;

/// Value of the `--color` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorWhen {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorWhen {
    /// Map to a `termcolor` choice, honouring `NO_COLOR`.
    pub fn choice(self) -> ColorChoice {
        if std::env::var_os("NO_COLOR").is_some() {
            return ColorChoice::Never;
        }
        match self {
            ColorWhen::Auto => ColorChoice::Auto,
            ColorWhen::Always => ColorChoice::Always,
            ColorWhen::Never => ColorChoice::Never,
        }
    }
}

pub struct StyledOutput {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl StyledOutput {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
            stderr: StandardStream::stderr(choice),
        }
    }

    /// Cargo-style status line: `   Verb message`.
    pub fn status(&mut self, verb: &str, message: &str) {
        let verb = format!("{:>width$}", verb, width = STATUS_WIDTH);
        paint(&mut self.stdout, fg(Color::Green).set_bold(true), &verb);
        let _ = writeln!(self.stdout, " {}", message);
    }

    pub fn warning(&mut self, message: &str) {
        paint(&mut self.stderr, fg(Color::Yellow).set_bold(true), "warning:");
        let _ = writeln!(self.stderr, " {}", message);
    }

    pub fn error(&mut self, message: &str) {
        paint(&mut self.stderr, fg(Color::Red).set_bold(true), "error:");
        let _ = writeln!(self.stderr, " {}", message);
    }

    /// Dimmed text indented under the status column.
    pub fn detail(&mut self, text: &str) {
        let line = format!("{:width$} {}\n", "", text, width = STATUS_WIDTH);
        paint(&mut self.stdout, fg(Color::White).set_dimmed(true), &line);
    }

    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.stdout, "{}", text);
    }

    pub fn pass(&mut self, text: &str) {
        self.badge(" PASS ", Color::Green, text);
    }

    pub fn fail(&mut self, text: &str) {
        self.badge(" FAIL ", Color::Red, text);
    }

    fn badge(&mut self, label: &str, bg: Color, text: &str) {
        let mut spec = fg(Color::White);
        spec.set_bg(Some(bg)).set_bold(true);
        paint(&mut self.stdout, &spec, label);
        let _ = writeln!(self.stdout, " {}", text);
    }

    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
        let _ = self.stderr.flush();
    }
}

fn fg(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));
    spec
}

// Terminal write failures are ignored; there is nowhere left to report them.
fn paint(stream: &mut StandardStream, spec: &ColorSpec, text: &str) {
    let _ = stream.set_color(spec);
    let _ = write!(stream, "{}", text);
    let _ = stream.reset();
}
