//! Recording interface and delay used by the unit tests

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use embedded_hal::delay::DelayNs;

use crate::interface::{DEFAULT_MAX_TRANSFER, DisplayInterface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MockError;

/// Records every write; BUSY follows a script, then `busy_level`
#[derive(Debug)]
pub(crate) struct MockInterface {
    pub(crate) commands: Vec<u8>,
    pub(crate) data: Vec<Vec<u8>>,
    pub(crate) command_data: Vec<(u8, Vec<u8>)>,
    pub(crate) resets: u32,
    pub(crate) idle_calls: u32,
    /// Levels returned by the next busy reads
    pub(crate) busy_script: VecDeque<bool>,
    /// Level returned once the script is exhausted (high = ready for the shipped profiles)
    pub(crate) busy_level: bool,
    /// Fail the n-th recorded data chunk (0-based)
    pub(crate) fail_data_call: Option<usize>,
    /// Chunk size applied by `send_data`, set through `set_max_transfer`
    pub(crate) max_transfer: usize,
    last_command: Option<u8>,
}

impl MockInterface {
    pub(crate) fn new() -> Self {
        Self {
            commands: Vec::new(),
            data: Vec::new(),
            command_data: Vec::new(),
            resets: 0,
            idle_calls: 0,
            busy_script: VecDeque::new(),
            busy_level: true,
            fail_data_call: None,
            max_transfer: DEFAULT_MAX_TRANSFER,
            last_command: None,
        }
    }

    /// Number of register and data writes seen so far
    pub(crate) fn writes(&self) -> usize {
        self.commands.len() + self.data.len()
    }

    pub(crate) fn clear_log(&mut self) {
        self.commands.clear();
        self.data.clear();
        self.command_data.clear();
        self.last_command = None;
    }

    /// Payloads written after `command`, in order
    pub(crate) fn data_for(&self, command: u8) -> Vec<&[u8]> {
        self.command_data
            .iter()
            .filter(|(cmd, _)| *cmd == command)
            .map(|(_, data)| data.as_slice())
            .collect()
    }
}

impl DisplayInterface for MockInterface {
    type Error = MockError;

    fn send_command(&mut self, command: u8) -> Result<(), MockError> {
        self.commands.push(command);
        self.last_command = Some(command);
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), MockError> {
        for chunk in data.chunks(self.max_transfer) {
            if self.fail_data_call == Some(self.data.len()) {
                return Err(MockError);
            }
            self.data.push(chunk.to_vec());
            if let Some(cmd) = self.last_command {
                self.command_data.push((cmd, chunk.to_vec()));
            }
        }
        Ok(())
    }

    fn set_max_transfer(&mut self, bytes: usize) {
        self.max_transfer = bytes.max(1);
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D, pulse_ms: u32) -> Result<(), MockError> {
        self.resets += 1;
        delay.delay_ms(pulse_ms);
        delay.delay_ms(pulse_ms);
        Ok(())
    }

    fn set_idle_levels(&mut self) -> Result<(), MockError> {
        self.idle_calls += 1;
        Ok(())
    }

    fn busy_is_high(&mut self) -> Result<bool, MockError> {
        Ok(self.busy_script.pop_front().unwrap_or(self.busy_level))
    }
}

/// Delay that accumulates requested time instead of sleeping
#[derive(Debug, Default)]
pub(crate) struct MockDelay {
    pub(crate) total_ms: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ms += u64::from(ns) / 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }
}
