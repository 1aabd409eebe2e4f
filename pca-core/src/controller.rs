//! Helligkeits-Controller
//!
//! Validiert Eingaben, hält den Zustand der Kanäle und verteilt
//! Helligkeits-Änderungen an registrierte Callbacks.
//!
//! Der Controller ist nicht synchronisiert. Wird er aus mehreren Tasks
//! benutzt, muss er hinter einem Mutex liegen (z.B. `embassy_sync::blocking_mutex`).

use core::ptr::fn_addr_eq;

use rgb::RGB8;

use crate::error::LedError;
use crate::logic::{clamp_brightness, color_component_to_brightness};
use crate::traits::{BrightnessCallback, ChannelDuty};
use crate::types::RgbChannels;
use crate::{MAX_CALLBACKS, NUM_CHANNELS};

/// Platzhalter, wenn kein Treiber angeschlossen ist
///
/// Jeder Schreibzugriff gelingt; der Controller führt dann nur den
/// In-Memory-Zustand und benachrichtigt die Callbacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHardware;

impl ChannelDuty for NoHardware {
    fn set_channel_duty(&mut self, _channel: u8, _brightness: f32) -> Result<(), LedError> {
        Ok(())
    }
}

/// Controller über einem [`ChannelDuty`]-Ziel
pub struct BrightnessController<D: ChannelDuty = NoHardware> {
    driver: D,
    initialized: bool,
    callbacks: heapless::Vec<BrightnessCallback, MAX_CALLBACKS>,
    levels: [f32; NUM_CHANNELS as usize],
}

impl BrightnessController<NoHardware> {
    /// Controller ohne Hardware
    pub const fn new() -> Self {
        Self::with_driver(NoHardware)
    }
}

impl Default for BrightnessController<NoHardware> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ChannelDuty> BrightnessController<D> {
    pub const fn with_driver(driver: D) -> Self {
        Self {
            driver,
            initialized: false,
            callbacks: heapless::Vec::new(),
            levels: [0.0; NUM_CHANNELS as usize],
        }
    }

    /// Initialisiert den Controller
    ///
    /// Idempotent: ein zweiter Aufruf lässt registrierte Callbacks unverändert.
    pub fn init(&mut self) -> Result<(), LedError> {
        if self.initialized {
            warn!("LED controller already initialized");
            return Ok(());
        }

        self.callbacks.clear();
        self.initialized = true;
        info!("LED controller initialized");
        Ok(())
    }

    /// Setzt die Helligkeit eines Kanals und benachrichtigt alle Callbacks
    ///
    /// Die Helligkeit wird auf 0..=100 % geklemmt. Nach bestandener Prüfung
    /// ist das Ergebnis immer `Ok(())`: ein Fehler des Treibers wird nur
    /// geloggt, die Callbacks laufen trotzdem. Fehler einzelner Callbacks
    /// werden ebenfalls nur geloggt.
    pub fn set_brightness(&mut self, channel: u8, brightness: f32) -> Result<(), LedError> {
        if !self.initialized {
            error!("LED controller not initialized");
            return Err(LedError::NotInitialized);
        }

        if channel >= NUM_CHANNELS {
            error!("Invalid channel number: {}", channel);
            return Err(LedError::InvalidChannel);
        }

        let brightness = clamp_brightness(brightness);

        if let Err(e) = self.driver.set_channel_duty(channel, brightness) {
            error!("Failed to set brightness for channel {}: {}", channel, e);
        }

        self.levels[channel as usize] = brightness;
        debug!("Set channel {} brightness to {}%", channel, brightness);

        self.notify(channel, brightness);
        Ok(())
    }

    /// Setzt eine RGB-LED über drei Kanäle (0..=255 je Komponente)
    ///
    /// Die Zuordnung wird vorab geprüft, damit bei einem ungültigen Kanal
    /// keiner der drei Kanäle geschrieben wird. Reihenfolge: Rot, Grün, Blau.
    pub fn set_color(&mut self, channels: &RgbChannels, color: RGB8) -> Result<(), LedError> {
        if !self.initialized {
            error!("LED controller not initialized");
            return Err(LedError::NotInitialized);
        }
        channels.validate()?;

        for (channel, component) in [
            (channels.red, color.r),
            (channels.green, color.g),
            (channels.blue, color.b),
        ] {
            self.set_brightness(channel, color_component_to_brightness(component))?;
        }
        Ok(())
    }

    fn notify(&self, channel: u8, brightness: f32) {
        for (index, callback) in self.callbacks.iter().enumerate() {
            if let Err(e) = callback(channel, brightness) {
                // Weiter mit den übrigen Callbacks
                warn!("Callback {} returned error: {}", index, e);
            }
        }
    }

    /// Registriert einen Callback (höchstens [`MAX_CALLBACKS`])
    ///
    /// `None` entspricht einem leeren Callback und wird abgelehnt.
    /// Ein bereits registrierter Callback wird nicht doppelt eingetragen.
    pub fn register_callback(&mut self, callback: Option<BrightnessCallback>) -> Result<(), LedError> {
        let Some(callback) = callback else {
            error!("Cannot register empty callback");
            return Err(LedError::InvalidArgument);
        };

        if self.callbacks.is_full() {
            error!("Maximum number of callbacks reached");
            return Err(LedError::CallbackLimitReached);
        }

        if self.position(callback).is_some() {
            warn!("Callback already registered");
            return Ok(());
        }

        self.callbacks
            .push(callback)
            .map_err(|_| LedError::CallbackLimitReached)?;

        info!("Callback registered. Total callbacks: {}", self.callbacks.len());
        Ok(())
    }

    /// Entfernt einen Callback, die Reihenfolge der übrigen bleibt erhalten
    pub fn unregister_callback(
        &mut self,
        callback: Option<BrightnessCallback>,
    ) -> Result<(), LedError> {
        let Some(callback) = callback else {
            error!("Cannot unregister empty callback");
            return Err(LedError::InvalidArgument);
        };

        let Some(index) = self.position(callback) else {
            warn!("Callback not found");
            return Err(LedError::NotFound);
        };

        self.callbacks.remove(index);

        info!("Callback unregistered. Total callbacks: {}", self.callbacks.len());
        Ok(())
    }

    fn position(&self, callback: BrightnessCallback) -> Option<usize> {
        self.callbacks
            .iter()
            .position(|&registered| fn_addr_eq(registered, callback))
    }

    /// Zuletzt gesetzte (geklemmte) Helligkeit eines Kanals
    pub fn brightness(&self, channel: u8) -> Result<f32, LedError> {
        self.levels
            .get(channel as usize)
            .copied()
            .ok_or(LedError::InvalidChannel)
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

// ============================================================================
// Tests
// ============================================================================
