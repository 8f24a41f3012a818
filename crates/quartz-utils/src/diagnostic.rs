//! Fatal diagnostics.
//!
//! Every phase of the toolchain reports unrecoverable problems through this
//! module, whether it is a malformed input file or a broken compiler
//! invariant. A fatal diagnostic is written to stderr and the process exits
//! with [`FATAL_EXIT_CODE`]; there is no way back to the caller.
//!
//! Most code uses the [`fail!`](crate::fail) and [`fail_at!`](crate::fail_at)
//! macros. Drivers that hold a [`SourceMap`] build a [`Fatal`] directly so the
//! offending line is shown under the message.

use std::fmt::{self, Write as _};
use std::io;

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, LabeledSpan, SourceCode};
use once_cell::sync::OnceCell;
use quartz_source::{Location, Snippet, SourceMap};
use thiserror::Error;

/// Exit status of a process stopped by a fatal diagnostic.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Corner glyph that opens the source frame in miette's unicode themes.
const SNIPPET_OPENER: char = '╭';

/// Call site inside the toolchain that raised a diagnostic.
///
/// This points at compiler code, never at the user's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub file: &'static str,
    pub line: u32,
}

impl Origin {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// How a fatal diagnostic is turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Use ANSI colors in snippet rendering.
    pub color: bool,
    /// Append a `note:` line naming the [`Origin`].
    pub show_origin: bool,
}

static RENDER_OPTIONS: OnceCell<RenderOptions> = OnceCell::new();

/// Sets the options [`Fatal::raise`], [`fail!`](crate::fail),
/// [`fail_at!`](crate::fail_at) and the syscall translators render with.
///
/// Drivers call this once after reading their configuration. The first call
/// wins; later calls return `false` and change nothing.
pub fn set_render_options(options: RenderOptions) -> bool {
    let set = RENDER_OPTIONS.set(options).is_ok();
    if !set {
        log::warn!("render options already set, ignoring {:?}", options);
    }
    set
}

/// The process-wide render options, or the defaults if none were set.
pub fn render_options() -> RenderOptions {
    RENDER_OPTIONS.get().copied().unwrap_or_default()
}

/// An unrecoverable error, ready to be rendered.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct Fatal {
    message: String,
    location: Option<Location>,
    origin: Origin,
    snippet: Option<Snippet>,
}

impl Fatal {
    pub fn new(origin: Origin, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            origin,
            snippet: None,
        }
    }

    pub fn at(origin: Origin, location: &Location, message: impl Into<String>) -> Self {
        Self {
            location: Some(location.clone()),
            ..Self::new(origin, message)
        }
    }

    /// Attaches the source line of this diagnostic's location, if `sources`
    /// knows the file.
    pub fn with_snippet(mut self, sources: &SourceMap) -> Self {
        self.snippet = self.location.as_ref().and_then(|loc| sources.snippet(loc));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The one-line form: `file:line:column: error: message`.
    pub fn headline(&self) -> String {
        match &self.location {
            Some(location) => format!("{}: error: {}", location, self.message),
            None => format!("error: {}", self.message),
        }
    }

    /// Renders the headline, then the source snippet if one is attached,
    /// then the origin note if asked for.
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut out = self
            .render_snippet(options)
            .unwrap_or_else(|| format!("{}\n", self.headline()));

        if options.show_origin {
            let _ = writeln!(out, "note: raised from {}", self.origin);
        }
        out
    }

    /// miette's graphical report minus its leading `× message` block, which
    /// would repeat the headline.
    fn render_snippet(&self, options: &RenderOptions) -> Option<String> {
        self.snippet.as_ref()?;
        let theme = if options.color {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };

        let mut report = String::new();
        if GraphicalReportHandler::new_themed(theme).render_report(&mut report, self).is_err() {
            log::warn!("could not render source snippet for {}", self.headline());
            return None;
        }

        let mut out = self.headline();
        out.push('\n');
        for line in report.lines().skip_while(|line| !line.contains(SNIPPET_OPENER)) {
            out.push_str(line);
            out.push('\n');
        }
        Some(out)
    }

    pub fn emit(&self, out: &mut impl io::Write, options: &RenderOptions) -> io::Result<()> {
        out.write_all(self.render(options).as_bytes())?;
        out.flush()
    }

    /// Writes the diagnostic to stderr with the process-wide
    /// [`render_options`] and exits.
    pub fn raise(self) -> ! {
        self.raise_with(&render_options())
    }

    pub fn raise_with(self, options: &RenderOptions) -> ! {
        log::debug!("fatal diagnostic raised at {}", self.origin);

        let stderr = io::stderr();
        let mut handle = stderr.lock();
        // The process is exiting either way; a failed write has nowhere to go.
        let _ = self.emit(&mut handle, options);
        std::process::exit(FATAL_EXIT_CODE)
    }
}

impl Diagnostic for Fatal {
    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.snippet.as_ref().map(|snippet| &snippet.source as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let snippet = self.snippet.as_ref()?;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some("here".to_string()),
            snippet.span,
        ))))
    }
}

/// Reports `args` and exits. Prefer the [`fail!`](crate::fail) macro.
pub fn fail(origin: Origin, args: fmt::Arguments<'_>) -> ! {
    Fatal::new(origin, args.to_string()).raise()
}

/// Reports `args` against `location` and exits. Prefer
/// [`fail_at!`](crate::fail_at).
pub fn fail_at(origin: Origin, location: &Location, args: fmt::Arguments<'_>) -> ! {
    Fatal::at(origin, location, args.to_string()).raise()
}

/// Formats a message, writes it to stderr and terminates the process.
///
/// ```ignore
/// quartz_utils::fail!("register {} is not encodable here", reg);
/// ```
#[macro_export]
macro_rules! fail {
    ($($arg:tt)+) => {
        $crate::diagnostic::fail(
            $crate::diagnostic::Origin::new(file!(), line!()),
            format_args!($($arg)+),
        )
    };
}

/// Like [`fail!`], attributing the message to a source [`Location`].
///
/// ```ignore
/// quartz_utils::fail_at!(token.location, "unexpected `{}`", token.text);
/// ```
#[macro_export]
macro_rules! fail_at {
    ($location:expr, $($arg:tt)+) => {
        $crate::diagnostic::fail_at(
            $crate::diagnostic::Origin::new(file!(), line!()),
            &$location,
            format_args!($($arg)+),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    const ORIGIN: Origin = Origin::new("src/parse.rs", 42);

    #[test]
    fn test_headline_without_location() {
        let fatal = Fatal::new(ORIGIN, "out of registers");
        assert_eq!(fatal.headline(), "error: out of registers");
        assert_eq!(fatal.to_string(), "out of registers");
        assert!(fatal.location().is_none());
    }

    #[test]
    fn test_render_with_location() {
        let fatal = Fatal::at(ORIGIN, &Location::new("a.s", 3, 5), "bad token");
        let rendered = fatal.render(&RenderOptions::default());
        for needle in ["a.s", "3", "5", "bad token"] {
            assert!(rendered.contains(needle), "{:?} missing from {:?}", needle, rendered);
        }
        expect!["a.s:3:5: error: bad token\n"].assert_eq(&rendered);
    }

    #[test]
    fn test_render_origin_note() {
        let fatal = Fatal::new(ORIGIN, "unmapped syscall 9999");
        let options = RenderOptions { show_origin: true, ..RenderOptions::default() };
        expect![[r#"
            error: unmapped syscall 9999
            note: raised from src/parse.rs:42
        "#]]
        .assert_eq(&fatal.render(&options));
    }

    #[test]
    fn test_render_with_snippet() {
        let mut sources = SourceMap::new();
        sources.add("a.s", "_start:\n    mov rax, 60\n    sycall\n");

        let fatal = Fatal::at(ORIGIN, &Location::new("a.s", 3, 5), "unknown mnemonic `sycall`")
            .with_snippet(&sources);
        let rendered = fatal.render(&RenderOptions::default());

        assert!(rendered.starts_with("a.s:3:5: error: unknown mnemonic `sycall`\n"), "{}", rendered);
        assert!(rendered.contains("    sycall"), "{}", rendered);
        assert!(rendered.contains("here"), "{}", rendered);
        // The headline is the only place the message appears.
        assert_eq!(rendered.matches("unknown mnemonic").count(), 1, "{}", rendered);
        assert!(!rendered.contains('×'), "{}", rendered);
        assert!(!rendered.contains("quartz::fatal"), "{}", rendered);
        assert_eq!(rendered.lines().nth(1).map(|line| line.contains(SNIPPET_OPENER)), Some(true), "{}", rendered);
    }

    #[test]
    fn test_render_snippet_with_origin_note() {
        let mut sources = SourceMap::new();
        sources.add("a.s", "    sycall\n");

        let fatal = Fatal::at(ORIGIN, &Location::new("a.s", 1, 5), "unknown mnemonic").with_snippet(&sources);
        let options = RenderOptions { show_origin: true, ..RenderOptions::default() };
        let rendered = fatal.render(&options);

        assert!(rendered.starts_with("a.s:1:5: error: unknown mnemonic\n"), "{}", rendered);
        assert!(rendered.ends_with("note: raised from src/parse.rs:42\n"), "{}", rendered);
        assert_eq!(rendered.matches("unknown mnemonic").count(), 1, "{}", rendered);
    }

    #[test]
    fn test_render_options_default_until_set() {
        // Nothing in this binary sets them.
        assert_eq!(render_options(), RenderOptions::default());
    }

    #[test]
    fn test_snippet_skipped_for_unknown_file() {
        let sources = SourceMap::new();
        let fatal = Fatal::at(ORIGIN, &Location::new("a.s", 1, 1), "bad token").with_snippet(&sources);
        expect!["a.s:1:1: error: bad token\n"].assert_eq(&fatal.render(&RenderOptions::default()));
    }

    #[test]
    fn test_emit_writes_rendering() {
        let fatal = Fatal::new(ORIGIN, "boom");
        let mut buf = Vec::new();
        fatal.emit(&mut buf, &RenderOptions::default()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "error: boom\n");
    }

    #[test]
    fn test_diagnostic_labels() {
        let mut sources = SourceMap::new();
        sources.add("a.s", "nop\n");
        let fatal = Fatal::at(ORIGIN, &Location::new("a.s", 1, 2), "bad").with_snippet(&sources);

        let labels: Vec<_> = fatal.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 1);
        assert_eq!(labels[0].label(), Some("here"));
        assert!(fatal.source_code().is_some());

        let plain = Fatal::new(ORIGIN, "bad");
        assert!(plain.labels().is_none());
        assert!(plain.source_code().is_none());
    }
}
