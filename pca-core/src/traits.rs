//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für den Bus-Zugriff
//! ohne konkrete Implementierung.

use crate::error::{BusError, LedError};
use crate::types::DriverConfig;

/// Callback für Helligkeits-Änderungen
///
/// Wird mit `(kanal, helligkeit_prozent)` aufgerufen. Ein Fehler wird vom
/// Controller geloggt, stoppt aber die übrigen Callbacks nicht.
pub type BrightnessCallback = fn(u8, f32) -> Result<(), LedError>;

/// Geöffnetes PCA9685-Gerät auf dem Bus
///
/// # Implementierungen
/// - **Production:** [`Pca9685Bus`](crate::Pca9685Bus) über `embedded-hal` I2C
/// - **Testing:** Mock-Bus (in-memory, zeichnet Schreibzugriffe auf)
pub trait PwmBus {
    /// Startet den Oszillator neu und aktiviert Auto-Increment
    fn restart(&mut self) -> Result<(), BusError>;

    /// Programmiert die PWM-Frequenz (Hardware rundet über den Prescaler)
    fn set_pwm_frequency(&mut self, freq_hz: u16) -> Result<(), BusError>;

    /// Liest die tatsächlich programmierte PWM-Frequenz zurück
    fn pwm_frequency(&mut self) -> Result<u16, BusError>;

    /// Schreibt einen Roh-Duty-Wert (0..=4095) auf einen Kanal
    fn write_channel_duty(&mut self, channel: u8, raw: u16) -> Result<(), BusError>;
}

/// Öffnet die Bus-Verbindung zum PCA9685
///
/// Pins, Port und Adresse kommen aus der [`DriverConfig`].
pub trait BusConnector {
    type Bus: PwmBus;

    fn open(&mut self, config: &DriverConfig) -> Result<Self::Bus, LedError>;

    /// Nimmt einen Bus nach fehlgeschlagener Inbetriebnahme zurück
    ///
    /// Danach muss ein erneutes `open()` möglich sein.
    fn close(&mut self, bus: Self::Bus) {
        let _ = bus;
    }
}

/// Hardware-Ziel des Controllers
///
/// Der Controller kennt nur Prozentwerte, die Umrechnung auf Roh-Duty
/// passiert im Treiber.
pub trait ChannelDuty {
    fn set_channel_duty(&mut self, channel: u8, brightness: f32) -> Result<(), LedError>;
}
