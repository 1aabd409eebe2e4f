//! Gemeinsame Mocks für die Integration Tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use pca_core::pca9685::{frequency_for, prescale_for};
use pca_core::{BusConnector, BusError, DriverConfig, LedError, NUM_CHANNELS, PwmBus};

// ============================================================================
// Mock Bus
// ============================================================================

/// Gemeinsamer Zustand von MockConnector und MockBus
#[derive(Default)]
pub struct BusState {
    pub opened: usize,
    pub closed: usize,
    pub last_config: Option<DriverConfig>,
    pub restarts: usize,
    pub frequency_hz: u16,
    pub writes: Vec<(u8, u16)>,
    pub duties: [Option<u16>; NUM_CHANNELS as usize],
    pub fail_open: bool,
    pub fail_restart: bool,
    pub fail_next_write: bool,
}

pub struct MockBus {
    state: Rc<RefCell<BusState>>,
}

impl PwmBus for MockBus {
    fn restart(&mut self) -> Result<(), BusError> {
        let mut state = self.state.borrow_mut();
        if state.fail_restart {
            return Err(BusError::NoAcknowledge);
        }
        state.restarts += 1;
        Ok(())
    }

    fn set_pwm_frequency(&mut self, freq_hz: u16) -> Result<(), BusError> {
        // Hardware rundet über den Prescaler
        self.state.borrow_mut().frequency_hz = frequency_for(prescale_for(freq_hz));
        Ok(())
    }

    fn pwm_frequency(&mut self) -> Result<u16, BusError> {
        Ok(self.state.borrow().frequency_hz)
    }

    fn write_channel_duty(&mut self, channel: u8, raw: u16) -> Result<(), BusError> {
        let mut state = self.state.borrow_mut();
        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(BusError::Bus);
        }

        state.writes.push((channel, raw));
        state.duties[channel as usize] = Some(raw);
        Ok(())
    }
}

pub struct MockConnector {
    state: Rc<RefCell<BusState>>,
}

impl MockConnector {
    /// Erstellt Connector und Zugriff auf den gemeinsamen Zustand
    pub fn new() -> (Self, Rc<RefCell<BusState>>) {
        let state = Rc::new(RefCell::new(BusState::default()));
        (
            Self {
                state: Rc::clone(&state),
            },
            state,
        )
    }
}

impl BusConnector for MockConnector {
    type Bus = MockBus;

    fn open(&mut self, config: &DriverConfig) -> Result<Self::Bus, LedError> {
        let mut state = self.state.borrow_mut();
        if state.fail_open {
            return Err(LedError::Transport(BusError::NoAcknowledge));
        }

        state.opened += 1;
        state.last_config = Some(*config);
        Ok(MockBus {
            state: Rc::clone(&self.state),
        })
    }

    fn close(&mut self, _bus: Self::Bus) {
        self.state.borrow_mut().closed += 1;
    }
}

// ============================================================================
// Callback Recorder
// ============================================================================

thread_local! {
    // Jeder Test läuft in einem eigenen Thread → eigene Aufzeichnung
    static CALLS: RefCell<Vec<(char, u8, f32)>> = const { RefCell::new(Vec::new()) };
}

fn record(tag: char, channel: u8, brightness: f32) -> Result<(), LedError> {
    CALLS.with(|calls| calls.borrow_mut().push((tag, channel, brightness)));
    Ok(())
}

/// Alle bisherigen Callback-Aufrufe als `(tag, kanal, helligkeit)`
pub fn calls() -> Vec<(char, u8, f32)> {
    CALLS.with(|calls| calls.borrow().clone())
}

/// Nur die Tags der bisherigen Aufrufe, in Aufruf-Reihenfolge
pub fn call_tags() -> String {
    CALLS.with(|calls| calls.borrow().iter().map(|&(tag, _, _)| tag).collect())
}

pub fn clear_calls() {
    CALLS.with(|calls| calls.borrow_mut().clear());
}

pub fn cb_a(channel: u8, brightness: f32) -> Result<(), LedError> {
    record('a', channel, brightness)
}

pub fn cb_b(channel: u8, brightness: f32) -> Result<(), LedError> {
    record('b', channel, brightness)
}

pub fn cb_c(channel: u8, brightness: f32) -> Result<(), LedError> {
    record('c', channel, brightness)
}

pub fn cb_d(channel: u8, brightness: f32) -> Result<(), LedError> {
    record('d', channel, brightness)
}

pub fn cb_e(channel: u8, brightness: f32) -> Result<(), LedError> {
    record('e', channel, brightness)
}

pub fn cb_f(channel: u8, brightness: f32) -> Result<(), LedError> {
    record('f', channel, brightness)
}

/// Zeichnet den Aufruf auf und meldet dann einen Fehler
pub fn cb_failing(channel: u8, brightness: f32) -> Result<(), LedError> {
    record('x', channel, brightness)?;
    Err(LedError::InvalidArgument)
}
