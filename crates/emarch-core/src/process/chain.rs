//! Descriptions of external tool pipelines.

use std::ffi::OsStr;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

/// One external program with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    program: String,
    args: Vec<OsString>,
}

impl Stage {
    /// Creates a stage running `program` without arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Program name, looked up on `PATH` when the stage is spawned.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed verbatim to the program.
    #[must_use]
    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote_arg(OsStr::new(&self.program)))?;
        for arg in &self.args {
            write!(f, " {}", quote_arg(arg))?;
        }
        Ok(())
    }
}

/// A pipeline of stages with optional file redirections.
///
/// Rendered for messages in shell notation, e.g.
/// `gzip -d -c < a.tgz | tar xvf -`. No shell is involved when running it.
///
/// # Examples
///
/// ```
/// use emarch_core::process::Stage;
/// use emarch_core::process::ToolChain;
///
/// let chain = ToolChain::new(Stage::new("gzip").args(["-d", "-c"]))
///     .read_from("a.tgz")
///     .pipe(Stage::new("tar").args(["xvf", "-"]));
/// assert_eq!(chain.to_string(), "gzip -d -c < a.tgz | tar xvf -");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolChain {
    stages: Vec<Stage>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    work_dir: Option<PathBuf>,
}

impl ToolChain {
    /// Creates a chain with a single stage.
    #[must_use]
    pub fn new(first: Stage) -> Self {
        Self {
            stages: vec![first],
            input: None,
            output: None,
            work_dir: None,
        }
    }

    /// Appends a stage reading the previous stage's standard output.
    #[must_use]
    pub fn pipe(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Feeds the first stage's standard input from a file.
    #[must_use]
    pub fn read_from(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = Some(path.into());
        self
    }

    /// Writes the last stage's standard output into a file.
    #[must_use]
    pub fn write_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Runs every stage in the given directory.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Stages in pipe order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// File feeding the first stage, if any.
    #[must_use]
    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    /// File receiving the last stage's output, if any.
    #[must_use]
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Working directory of the stages, if not inherited.
    #[must_use]
    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }
}

impl fmt::Display for ToolChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{stage}")?;
            if i == 0
                && let Some(input) = &self.input
            {
                write!(f, " < {}", quote_arg(input.as_os_str()))?;
            }
        }
        if let Some(output) = &self.output {
            write!(f, " > {}", quote_arg(output.as_os_str()))?;
        }
        Ok(())
    }
}

/// Quotes an argument for display.
///
/// Arguments made only of ASCII alphanumerics and `\ / . : -` are shown
/// bare. Anything else is wrapped in double quotes, escaping embedded quotes
/// and the backslashes that precede them.
///
/// # Examples
///
/// ```
/// use emarch_core::process::quote_arg;
/// use std::ffi::OsStr;
///
/// assert_eq!(quote_arg(OsStr::new("a.tar.gz")), "a.tar.gz");
/// assert_eq!(quote_arg(OsStr::new("my file")), "\"my file\"");
/// assert_eq!(quote_arg(OsStr::new("")), "\"\"");
/// ```
#[must_use]
pub fn quote_arg(arg: &OsStr) -> String {
    let s = arg.to_string_lossy();
    let plain = !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '\\' | '/' | '.' | ':' | '-' | '=' | ',')
        });
    if plain {
        return s.into_owned();
    }

    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    let mut backslashes = 0usize;
    for c in s.chars() {
        match c {
            '"' => {
                quoted.extend(std::iter::repeat_n('\\', backslashes + 1));
                backslashes = 0;
            }
            '\\' => backslashes += 1,
            _ => backslashes = 0,
        }
        quoted.push(c);
    }
    quoted.extend(std::iter::repeat_n('\\', backslashes));
    quoted.push('"');
    quoted
}
