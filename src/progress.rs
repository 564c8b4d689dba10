//! Progress decorator
//!
//! Renders a fixed-length textual progress bar and only then runs the
//! wrapped operation. The bar is cosmetic: it does not track the wrapped
//! operation, and it blocks the calling thread for its whole duration.

use crate::error::{InventoryError, Result};
use std::io::Write;
use std::thread;
use std::time::Duration;

/// Number of frames drawn, from 0% to 100% inclusive.
pub const STEPS: usize = 21;

/// Width of the bar between the brackets.
const WIDTH: usize = STEPS - 1;

/// Delay before each frame unless configured otherwise.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressBar {
    step_delay: Duration,
}

impl ProgressBar {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }

    /// A bar that renders every frame without pausing.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Draw the bar to completion on `out`, followed by `Done`.
    pub fn render(&self, out: &mut dyn Write) -> Result<()> {
        for step in 0..STEPS {
            if !self.step_delay.is_zero() {
                thread::sleep(self.step_delay);
            }
            write!(out, "\r[{:<width$}] {}%", "=".repeat(step), step * 5, width = WIDTH)
                .map_err(InventoryError::output)?;
            out.flush().map_err(InventoryError::output)?;
        }
        writeln!(out, "\nDone").map_err(InventoryError::output)?;
        Ok(())
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DELAY)
    }
}

/// Wrap `op` so that `bar` is rendered to completion before it runs.
///
/// The returned operation has the same signature as `op` and returns its
/// result untouched.
pub fn with_progress<S, T>(
    bar: ProgressBar,
    op: impl FnOnce(S, &mut dyn Write) -> Result<T>,
) -> impl FnOnce(S, &mut dyn Write) -> Result<T> {
    move |state: S, out: &mut dyn Write| {
        bar.render(&mut *out)?;
        op(state, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_render_draws_all_frames() {
        let mut out = Vec::<u8>::new();
        ProgressBar::instant().render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let frames: Vec<&str> = text.split('\r').skip(1).collect();
        assert_eq!(frames.len(), STEPS);
        assert_eq!(frames[0], "[                    ] 0%");
        assert_eq!(frames[10], "[==========          ] 50%");
        assert_eq!(frames[20], "[====================] 100%\nDone\n");
    }

    #[test]
    fn test_render_blocks_for_configured_delay() {
        let bar = ProgressBar::new(Duration::from_millis(2));
        let started = Instant::now();
        bar.render(&mut Vec::<u8>::new()).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2) * STEPS as u32);
    }

    #[test]
    fn test_with_progress_runs_op_after_bar() {
        let op = with_progress(
            ProgressBar::instant(),
            |value: u32, out: &mut dyn Write| {
                write!(out, "op").map_err(InventoryError::output)?;
                Ok(value * 2)
            },
        );

        let mut buf = Vec::<u8>::new();
        let out: &mut dyn Write = &mut buf;
        assert_eq!(op(21, out).unwrap(), 42);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("100%\nDone\nop"));
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(ProgressBar::default(), ProgressBar::new(Duration::from_millis(100)));
    }
}
