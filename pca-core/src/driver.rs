//! PCA9685 PWM-Treiber
//!
//! Unterste Schicht: besitzt den Bus-Handle, rechnet Prozent in Roh-Duty
//! um und berücksichtigt dabei die Polarität (Common-Anode/-Cathode).

use crate::error::{BusError, LedError};
use crate::logic::{brightness_to_duty, clamp_brightness};
use crate::pca9685::{MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};
use crate::traits::{BusConnector, ChannelDuty, PwmBus};
use crate::types::DriverConfig;
use crate::NUM_CHANNELS;

/// Zustand nach erfolgreichem `init()`
struct DriverState<B> {
    bus: B,
    common_anode: bool,
    requested_frequency_hz: u16,
    frequency_hz: u16,
}

/// Treiber für einen PCA9685 hinter einem [`BusConnector`]
///
/// Der Bus-Handle gehört exklusiv dem Treiber; andere Komponenten
/// sprechen den Baustein nur über [`Pca9685Driver::set_channel_duty`] an.
pub struct Pca9685Driver<C: BusConnector> {
    connector: C,
    state: Option<DriverState<C::Bus>>,
}

impl<C: BusConnector> Pca9685Driver<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            state: None,
        }
    }

    /// Öffnet den Bus, programmiert die Frequenz und schaltet alle Kanäle aus
    ///
    /// Ein zweiter Aufruf ist ein No-Op. Bei einem Busfehler bleibt der
    /// Treiber uninitialisiert und `init()` kann erneut versucht werden.
    pub fn init(&mut self, config: DriverConfig) -> Result<(), LedError> {
        match self.bring_up(&config) {
            Err(LedError::AlreadyInitialized) => {
                warn!("PCA9685 driver already initialized");
                Ok(())
            }
            result => result,
        }
    }

    fn bring_up(&mut self, config: &DriverConfig) -> Result<(), LedError> {
        if self.state.is_some() {
            return Err(LedError::AlreadyInitialized);
        }

        if !(MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&config.frequency_hz) {
            error!("Unsupported PWM frequency: {} Hz", config.frequency_hz);
            return Err(LedError::InvalidArgument);
        }

        let mut bus = self.connector.open(config).inspect_err(|e| {
            error!("Failed to open PCA9685 at {=u8:#x}: {}", config.address, e);
        })?;

        let frequency_hz = match program(&mut bus, config) {
            Ok(frequency_hz) => frequency_hz,
            Err(e) => {
                // Bus zurückgeben, damit ein neues init() ihn wieder öffnen kann
                self.connector.close(bus);
                return Err(e);
            }
        };

        self.state = Some(DriverState {
            bus,
            common_anode: config.common_anode,
            requested_frequency_hz: config.frequency_hz,
            frequency_hz,
        });
        Ok(())
    }

    /// Setzt die Helligkeit eines Kanals in Prozent
    pub fn set_channel_duty(&mut self, channel: u8, brightness: f32) -> Result<(), LedError> {
        let state = self.state.as_mut().ok_or_else(|| {
            error!("PCA9685 driver not initialized");
            LedError::NotInitialized
        })?;

        if channel >= NUM_CHANNELS {
            error!("Invalid channel number: {}", channel);
            return Err(LedError::InvalidChannel);
        }

        let brightness = clamp_brightness(brightness);
        let raw = brightness_to_duty(brightness, state.common_anode);

        state.bus.write_channel_duty(channel, raw).inspect_err(|e| {
            error!("Failed to set brightness for channel {}: {}", channel, e);
        })?;

        debug!(
            "Set channel {} brightness to {}% (PWM value: {})",
            channel,
            brightness,
            raw
        );
        Ok(())
    }

    /// Tatsächlich programmierte Frequenz (beim `init()` zurückgelesen)
    pub fn get_frequency(&self) -> Result<u16, LedError> {
        self.state
            .as_ref()
            .map(|state| state.frequency_hz)
            .ok_or(LedError::NotInitialized)
    }

    /// Beim `init()` angeforderte Frequenz
    pub fn requested_frequency(&self) -> Result<u16, LedError> {
        self.state
            .as_ref()
            .map(|state| state.requested_frequency_hz)
            .ok_or(LedError::NotInitialized)
    }

    pub fn common_anode(&self) -> Result<bool, LedError> {
        self.state
            .as_ref()
            .map(|state| state.common_anode)
            .ok_or(LedError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }
}

impl<C: BusConnector> ChannelDuty for Pca9685Driver<C> {
    fn set_channel_duty(&mut self, channel: u8, brightness: f32) -> Result<(), LedError> {
        Pca9685Driver::set_channel_duty(self, channel, brightness)
    }
}

/// Restart, Frequenz programmieren und zurücklesen, alle Kanäle aus
fn program<B: PwmBus>(bus: &mut B, config: &DriverConfig) -> Result<u16, LedError> {
    logged(bus.restart(), "restart PCA9685")?;
    logged(bus.set_pwm_frequency(config.frequency_hz), "set PWM frequency")?;
    let frequency_hz = logged(bus.pwm_frequency(), "get PWM frequency")?;

    info!(
        "PCA9685 initialized. Requested freq: {} Hz, actual freq: {} Hz",
        config.frequency_hz,
        frequency_hz
    );

    // Alle Kanäle aus (bei Common-Anode ist "aus" der maximale Roh-Wert)
    let off = brightness_to_duty(0.0, config.common_anode);
    for channel in 0..NUM_CHANNELS {
        logged(bus.write_channel_duty(channel, off), "switch channel off")?;
    }

    Ok(frequency_hz)
}

fn logged<T>(result: Result<T, BusError>, action: &'static str) -> Result<T, LedError> {
    result.map_err(|e| {
        error!("Failed to {}: {}", action, e);
        LedError::Transport(e)
    })
}

// ============================================================================
// Tests
// ============================================================================
