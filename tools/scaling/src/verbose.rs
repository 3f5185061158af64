//! Output levels for progress lines, warnings and step timings.
//!
//! `-q` keeps stdout silent and drops warnings, the default prints the two
//! progress lines and warnings, and `-v` adds row counts and timings.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

const QUIET: u8 = 0;
const DEFAULT: u8 = 1;
const VERBOSE: u8 = 2;

static LEVEL: AtomicU8 = AtomicU8::new(DEFAULT);

/// Set the output level from the CLI flags. Quiet wins over verbose.
pub fn init(quiet: bool, verbose: bool) {
    let level = match (quiet, verbose) {
        (true, _) => QUIET,
        (false, true) => VERBOSE,
        (false, false) => DEFAULT,
    };
    LEVEL.store(level, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    LEVEL.load(Ordering::Relaxed) == VERBOSE
}

pub fn is_quiet() -> bool {
    LEVEL.load(Ordering::Relaxed) == QUIET
}

/// `println!` in verbose mode only.
macro_rules! vprintln {
    ($($arg:tt)*) => {
        if $crate::verbose::is_verbose() {
            println!($($arg)*);
        }
    };
}

pub(crate) use vprintln;

/// `println!` unless quiet.
macro_rules! dprintln {
    ($($arg:tt)*) => {
        if !$crate::verbose::is_quiet() {
            println!($($arg)*);
        }
    };
}

pub(crate) use dprintln;

/// `warning: ...` on stderr unless quiet.
macro_rules! warnln {
    ($($arg:tt)*) => {
        if !$crate::verbose::is_quiet() {
            eprintln!("warning: {}", format_args!($($arg)*));
        }
    };
}

pub(crate) use warnln;

/// Prints `  <step>: <elapsed>` when dropped in verbose mode.
pub struct Timer {
    step: &'static str,
    start: Instant,
}

impl Timer {
    pub fn start(step: &'static str) -> Self {
        Self {
            step,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if is_verbose() {
            println!("  {}: {:.1?}", self.step, self.start.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_takes_precedence() {
        init(true, true);
        assert!(is_quiet());
        assert!(!is_verbose());

        init(false, true);
        assert!(is_verbose());
        assert!(!is_quiet());

        init(false, false);
        assert!(!is_verbose());
        assert!(!is_quiet());
    }
}
