//! Run tallies and the process exit code derived from them.

use std::fmt;

/// How a single dependency request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The dependency was written to the server.
    Added,
    /// The dependency was already configured; nothing was written.
    AlreadyPresent,
    /// A mutating call would have been made but dry-run suppressed it.
    DryRun,
}

impl LinkOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            LinkOutcome::Added => "added",
            LinkOutcome::AlreadyPresent => "already present",
            LinkOutcome::DryRun => "dry run",
        }
    }
}

/// Tallies for linking one host's triggers to a parent trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub success: usize,
    pub prototype_success: usize,
    pub skipped: usize,
    pub errors: usize,
    pub prototype_errors: usize,
    /// Links a dry run left unwritten, triggers and prototypes alike.
    pub dry_run: usize,
}

/// Overall result of a run, as reported at the end of the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    AllConfigured,
    CompletedWithErrors(usize),
    /// Nothing was written because of dry-run; the count is what would have been.
    DryRun(usize),
    NothingAdded,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Tally the outcome of a normal trigger link.
    pub fn record_trigger(&mut self, outcome: LinkOutcome) {
        match outcome {
            LinkOutcome::DryRun => self.dry_run += 1,
            LinkOutcome::Added | LinkOutcome::AlreadyPresent => self.success += 1,
        }
    }

    /// Tally the outcome of a prototype link.
    pub fn record_prototype(&mut self, outcome: LinkOutcome) {
        match outcome {
            LinkOutcome::DryRun => self.dry_run += 1,
            LinkOutcome::Added | LinkOutcome::AlreadyPresent => self.prototype_success += 1,
        }
    }

    pub fn total_success(&self) -> usize {
        self.success + self.prototype_success
    }

    pub fn total_errors(&self) -> usize {
        self.errors + self.prototype_errors
    }

    pub fn verdict(&self) -> Verdict {
        let errors = self.total_errors();
        if errors > 0 {
            Verdict::CompletedWithErrors(errors)
        } else if self.dry_run > 0 {
            Verdict::DryRun(self.dry_run)
        } else if self.total_success() > 0 {
            Verdict::AllConfigured
        } else {
            Verdict::NothingAdded
        }
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(self.total_errors() > 0)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Total triggers found: {}", self.total)?;
        writeln!(f, "Normal trigger dependencies added: {}", self.success)?;
        writeln!(f, "Prototype dependencies added: {}", self.prototype_success)?;
        writeln!(f, "Skipped (parent trigger): {}", self.skipped)?;
        writeln!(f, "Normal trigger errors: {}", self.errors)?;
        writeln!(f, "Prototype update errors: {}", self.prototype_errors)?;
        if self.dry_run > 0 {
            writeln!(f, "Dependencies not written (dry run): {}", self.dry_run)?;
        }

        if self.prototype_success > 0 {
            writeln!(f)?;
            writeln!(
                f,
                "Note: {} trigger prototypes were updated; future discovered triggers inherit the dependency",
                self.prototype_success
            )?;
        }

        if self.total_success() > 0 {
            writeln!(f)?;
            writeln!(
                f,
                "Successfully processed {} triggers/prototypes",
                self.total_success()
            )?;
        }

        match self.verdict() {
            Verdict::AllConfigured => write!(f, "All triggers now have dependencies configured"),
            Verdict::CompletedWithErrors(n) => write!(f, "\nCompleted with {n} error(s)"),
            Verdict::DryRun(n) => write!(f, "\nDry run: {n} dependencies would be added"),
            Verdict::NothingAdded => {
                write!(f, "\nNo dependencies were added (all triggers were skipped)")
            }
        }
    }
}

/// Tallies for the per-site bulk linking run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteSummary {
    pub dependent_sites: usize,
    pub upstream_sites: usize,
    pub sites_linked: usize,
    pub sites_skipped: usize,
    pub added: usize,
    pub already_present: usize,
    pub dry_run: usize,
    pub errors: usize,
}

impl SiteSummary {
    pub fn record(&mut self, outcome: LinkOutcome) {
        match outcome {
            LinkOutcome::Added => self.added += 1,
            LinkOutcome::AlreadyPresent => self.already_present += 1,
            LinkOutcome::DryRun => self.dry_run += 1,
        }
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(self.errors > 0)
    }
}

impl fmt::Display for SiteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "SITE SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Dependent sites: {}", self.dependent_sites)?;
        writeln!(f, "Upstream sites: {}", self.upstream_sites)?;
        writeln!(f, "Sites linked: {}", self.sites_linked)?;
        writeln!(f, "Sites skipped: {}", self.sites_skipped)?;
        writeln!(f, "Dependencies added: {}", self.added)?;
        writeln!(f, "Dependencies already present: {}", self.already_present)?;
        if self.dry_run > 0 {
            writeln!(f, "Dependencies not written (dry run): {}", self.dry_run)?;
        }
        write!(f, "Errors: {}", self.errors)
    }
}
