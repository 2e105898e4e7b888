use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Outcome of a single check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Data is usable but something is off
    Warning(String),
    /// Data violates an invariant
    Failed(String),
}

impl CheckStatus {
    fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "✓",
            CheckStatus::Warning(_) => "⚠",
            CheckStatus::Failed(_) => "✗",
        }
    }

    fn detail(&self) -> Option<(&'static str, &str)> {
        match self {
            CheckStatus::Ok => None,
            CheckStatus::Warning(msg) => Some(("WARNING", msg)),
            CheckStatus::Failed(msg) => Some(("FAILED", msg)),
        }
    }
}

/// Named check result
#[derive(Debug, Clone)]
pub struct ValidationCheck {
    /// What was checked
    pub name: String,
    /// Outcome
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }
}

/// All check results for one measurement file
#[derive(Debug)]
pub struct ValidationReport {
    /// Individual results in the order they ran
    pub checks: Vec<ValidationCheck>,
    /// File the report describes
    pub file_path: String,
}

impl ValidationReport {
    /// Empty report for `file_path`
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            file_path: file_path.into(),
        }
    }

    /// Append a check result
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Whether any check failed
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Whether any check produced a warning
    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// Checks that did not pass cleanly
    pub fn issues(&self) -> impl Iterator<Item = &ValidationCheck> {
        self.checks.iter().filter(|c| c.status != CheckStatus::Ok)
    }

    /// Passed checks
    pub fn success_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Ok))
    }

    /// Checks with warnings
    pub fn warning_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Warning(_)))
    }

    /// Failed checks
    pub fn failure_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&CheckStatus) -> bool) -> usize {
        self.checks.iter().filter(|c| pred(&c.status)).count()
    }

    fn verdict(&self) -> &'static str {
        if self.has_failures() {
            "Validation FAILED"
        } else if self.has_warnings() {
            "Validation PASSED with warnings"
        } else {
            "Validation PASSED"
        }
    }

    /// Render with terminal colours when the `colorized_output` feature is on
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut out = String::new();
            out.push_str(&format!("{}\n", style(TITLE).bold().cyan()));
            out.push_str(&format!("{}\n", style("=".repeat(TITLE.len())).cyan()));
            out.push_str(&format!("{}: {}\n\n", style("File").bold(), self.file_path));

            for check in &self.checks {
                let name = match check.status {
                    CheckStatus::Ok => style(check.name.as_str()).green(),
                    CheckStatus::Warning(_) => style(check.name.as_str()).yellow(),
                    CheckStatus::Failed(_) => style(check.name.as_str()).red(),
                };
                out.push_str(&format!("[{}] {}", check.status.symbol(), name));
                match check.status.detail() {
                    None => out.push('\n'),
                    Some((tag, msg)) => {
                        let tag = if tag == "FAILED" {
                            style(tag).red().bold()
                        } else {
                            style(tag).yellow().bold()
                        };
                        out.push_str(&format!(" - {}: {}\n", tag, msg));
                    }
                }
            }

            out.push_str(&format!(
                "\n{}: {} passed, {} warnings, {} failed\n\n",
                style("Summary").bold(),
                style(self.success_count()).green(),
                style(self.warning_count()).yellow(),
                style(self.failure_count()).red()
            ));
            let verdict = if self.has_failures() {
                style(self.verdict()).red().bold()
            } else if self.has_warnings() {
                style(self.verdict()).yellow().bold()
            } else {
                style(self.verdict()).green().bold()
            };
            out.push_str(&format!("{}\n", verdict));
            out
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

const TITLE: &str = "Measurement File Validation Report";

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", TITLE)?;
        writeln!(f, "{}", "=".repeat(TITLE.len()))?;
        writeln!(f, "File: {}", self.file_path)?;
        writeln!(f)?;

        for check in &self.checks {
            write!(f, "[{}] {}", check.status.symbol(), check.name)?;
            match check.status.detail() {
                None => writeln!(f)?,
                Some((tag, msg)) => writeln!(f, " - {}: {}", tag, msg)?,
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} passed, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.verdict())
    }
}
