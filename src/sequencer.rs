//! Panel register sequencing
//!
//! Runs a [`Profile`](crate::profile::Profile)'s reset pulses and
//! initialization steps against a [`DisplayInterface`], and provides the
//! command and busy-wait primitives the display state machine builds on.
//!
//! Every step is written strictly in order: opcode, payload (if any), then
//! the step's busy wait (if any). The first transport error or busy timeout
//! aborts the sequence.

use embedded_hal::delay::DelayNs;

use crate::busy::{self, SyncResult};
use crate::command;
use crate::config::Config;
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::profile::{InitStep, StepData, resolution_payload};

/// Write one opcode followed by its payload
///
/// The payload is skipped when empty.
pub fn send<I: DisplayInterface>(
    interface: &mut I,
    command: u8,
    data: &[u8],
) -> Result<(), Error<I>> {
    interface
        .send_command(command)
        .map_err(|source| Error::Interface {
            command: Some(command),
            source,
        })?;
    if !data.is_empty() {
        interface
            .send_data(data)
            .map_err(|source| Error::Interface {
                command: Some(command),
                source,
            })?;
    }
    Ok(())
}

/// Wait for BUSY to report ready after `command`
///
/// Returns the time spent waiting. A timeout becomes [`Error::Timeout`]
/// carrying the command and the configured busy GPIO.
pub fn wait<I, D>(
    interface: &mut I,
    config: &Config,
    command: Option<u8>,
    timeout_ms: u32,
    delay: &mut D,
) -> Result<u32, Error<I>>
where
    I: DisplayInterface,
    D: DelayNs,
{
    let result = busy::wait_ready(interface, config.profile.busy_polarity, timeout_ms, delay)
        .map_err(|source| Error::Interface { command, source })?;
    match result {
        SyncResult::Ready { elapsed_ms } => Ok(elapsed_ms),
        SyncResult::TimedOut { elapsed_ms } => Err(Error::Timeout {
            command,
            busy_gpio: config.pins.busy,
            timeout_ms,
            elapsed_ms,
        }),
    }
}

/// Write a single initialization step, including its busy wait
pub fn run_step<I, D>(
    interface: &mut I,
    config: &Config,
    step: &InitStep,
    delay: &mut D,
) -> Result<(), Error<I>>
where
    I: DisplayInterface,
    D: DelayNs,
{
    let resolution;
    let data = match step.data {
        StepData::Bytes(bytes) => bytes,
        StepData::Resolution => {
            resolution = resolution_payload(config.dimensions.width, config.dimensions.height);
            &resolution[..]
        }
    };

    log::debug!("cmd 0x{:02X} ({} data bytes)", step.command, data.len());
    send(interface, step.command, data)?;

    if let Some(timeout_ms) = step.wait_ms {
        wait(interface, config, Some(step.command), timeout_ms, delay)?;
    }
    Ok(())
}

/// Reset the controller (when the profile asks for it) and write the full
/// initialization sequence
///
/// Returns `true` when the sequence left the charge pumps on (the last
/// power command written was power on).
///
/// # Errors
///
/// The first transport error or busy timeout aborts the sequence and is
/// returned unchanged; the panel must be treated as uninitialized.
pub fn run_init_sequence<I, D>(
    interface: &mut I,
    config: &Config,
    delay: &mut D,
) -> Result<bool, Error<I>>
where
    I: DisplayInterface,
    D: DelayNs,
{
    let profile = &config.profile;
    log::debug!(
        "init sequence '{}': {} reset pulse(s), {} commands",
        profile.name,
        profile.reset_pulses,
        profile.command_count()
    );

    for _ in 0..profile.reset_pulses {
        reset(interface, config, delay)?;
    }

    let mut powered = false;
    for step in profile.init_sequence {
        run_step(interface, config, step, delay)?;
        match step.command {
            command::POWER_ON => powered = true,
            command::POWER_OFF => powered = false,
            _ => {}
        }
    }

    if profile.timing.settle_after_init_ms > 0 {
        delay.delay_ms(profile.timing.settle_after_init_ms);
    }
    Ok(powered)
}

/// One hardware reset pulse followed by the profile's post-reset busy wait
pub fn reset<I, D>(interface: &mut I, config: &Config, delay: &mut D) -> Result<(), Error<I>>
where
    I: DisplayInterface,
    D: DelayNs,
{
    let timing = &config.profile.timing;
    interface
        .reset(delay, timing.reset_pulse_ms)
        .map_err(|source| Error::Interface {
            command: None,
            source,
        })?;
    wait(interface, config, None, timing.reset_wait_ms, delay)?;
    Ok(())
}
