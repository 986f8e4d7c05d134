//! Busy-line synchronization
//!
//! The controller raises (or lowers, depending on the panel) its BUSY line
//! while it processes power and refresh commands. [`wait_ready`] polls that
//! line every [`POLL_INTERVAL_MS`] until it reports ready or the timeout
//! expires.
//!
//! A timeout is not an error at this level; it is reported as
//! [`SyncResult::TimedOut`] so the caller can attach the command that was
//! being waited for.

use embedded_hal::delay::DelayNs;

use crate::interface::DisplayInterface;

/// Busy-line poll interval in milliseconds
pub const POLL_INTERVAL_MS: u32 = 10;

/// Polls between progress log lines (one second at the default interval)
const LOG_EVERY_POLLS: u32 = 100;

/// Line level that means the controller is ready
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusyPolarity {
    /// BUSY high means ready (GDEP073E01 family)
    ReadyHigh,
    /// BUSY low means ready
    ReadyLow,
}

impl BusyPolarity {
    /// Whether a raw line level means ready
    pub const fn is_ready(self, line_high: bool) -> bool {
        match self {
            Self::ReadyHigh => line_high,
            Self::ReadyLow => !line_high,
        }
    }
}

/// Outcome of a busy wait
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncResult {
    /// The line reported ready
    Ready {
        /// Time spent waiting
        elapsed_ms: u32,
    },
    /// The timeout expired with the line still busy
    TimedOut {
        /// Time spent waiting
        elapsed_ms: u32,
    },
}

impl SyncResult {
    /// Whether the line reported ready
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Time spent waiting
    pub const fn elapsed_ms(&self) -> u32 {
        match self {
            Self::Ready { elapsed_ms } | Self::TimedOut { elapsed_ms } => *elapsed_ms,
        }
    }
}

/// Poll the busy line until it reads ready or `timeout_ms` has elapsed
///
/// The line is read before any delay, so an idle controller returns
/// `Ready { elapsed_ms: 0 }` without sleeping. Elapsed time counts the
/// poll delays, so `TimedOut` is never reported before `timeout_ms` and
/// at most one interval after it.
///
/// # Errors
///
/// Returns the interface error if the busy line cannot be read.
pub fn wait_ready<I, D>(
    interface: &mut I,
    polarity: BusyPolarity,
    timeout_ms: u32,
    delay: &mut D,
) -> Result<SyncResult, I::Error>
where
    I: DisplayInterface,
    D: DelayNs,
{
    let mut elapsed_ms = 0u32;
    let mut polls = 0u32;

    loop {
        if polarity.is_ready(interface.busy_is_high()?) {
            if elapsed_ms > 0 {
                log::debug!("busy released after {} ms", elapsed_ms);
            }
            return Ok(SyncResult::Ready { elapsed_ms });
        }

        if elapsed_ms >= timeout_ms {
            log::error!(
                "busy timeout: still busy after {} ms (limit {} ms)",
                elapsed_ms,
                timeout_ms
            );
            return Ok(SyncResult::TimedOut { elapsed_ms });
        }

        delay.delay_ms(POLL_INTERVAL_MS);
        elapsed_ms = elapsed_ms.saturating_add(POLL_INTERVAL_MS);
        polls += 1;
        if polls % LOG_EVERY_POLLS == 0 {
            log::debug!("waiting for busy: {} ms", elapsed_ms);
        }
    }
}
