use crate::logger;
use crossterm::event::{DisableFocusChange, EnableFocusChange};
use crossterm::execute;
use std::io::Write;

pub const DEFAULT_MAX_VIOLATIONS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    ForceFinish,
}

/// Counts terminal focus losses during an active attempt.
///
/// A lightweight anti-distraction signal, not a security boundary: a learner
/// can trivially sidestep it and nothing here pretends otherwise. The monitor
/// only counts while armed, caps the count at the configured maximum, and
/// reports the force-finish verdict exactly once.
#[derive(Debug)]
pub struct FocusMonitor {
    focused: bool,
    armed: bool,
    violations: u32,
    max_violations: u32,
    tripped: bool,
}

impl FocusMonitor {
    pub fn new(max_violations: u32) -> Self {
        Self {
            focused: true,
            armed: false,
            violations: 0,
            max_violations,
            tripped: false,
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn violations(&self) -> u32 {
        self.violations
    }

    pub fn max_violations(&self) -> u32 {
        self.max_violations
    }

    /// Start counting. Called when an attempt enters InProgress.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Stop counting. Called when the attempt leaves InProgress.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn focus_gained(&mut self) {
        self.focused = true;
    }

    /// Register a focus-loss event. Returns `ForceFinish` exactly once, on
    /// the event that reaches the maximum; everything after is absorbed.
    pub fn focus_lost(&mut self) -> Verdict {
        self.focused = false;
        if !self.armed || self.tripped {
            return Verdict::Continue;
        }
        self.violations = (self.violations + 1).min(self.max_violations);
        logger::log(&format!(
            "Focus lost: violation {}/{}",
            self.violations, self.max_violations
        ));
        if self.violations >= self.max_violations {
            self.tripped = true;
            return Verdict::ForceFinish;
        }
        Verdict::Continue
    }

    /// Zero the count for a retake.
    pub fn reset(&mut self) {
        self.violations = 0;
        self.tripped = false;
        self.focused = true;
    }
}

impl Default for FocusMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VIOLATIONS)
    }
}

/// Ask the terminal to report focus changes. Terminals without support simply
/// never deliver the events, so the monitor stays quiet.
pub fn enable_focus_tracking<W: Write>(out: &mut W) {
    let _ = execute!(out, EnableFocusChange);
}

pub fn disable_focus_tracking<W: Write>(out: &mut W) {
    let _ = execute!(out, DisableFocusChange);
}
