//! Fehler-Typen für Treiber und Controller

use core::fmt;

/// Bus-Fehler der I2C-Übertragung
///
/// Abgeleitet aus [`embedded_hal::i2c::ErrorKind`], damit der Core
/// unabhängig vom konkreten HAL-Fehlertyp bleibt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Allgemeiner Bus-Fehler (z.B. Start/Stop-Bedingung verletzt)
    Bus,
    /// Arbitrierung an anderen Master verloren
    ArbitrationLoss,
    /// Kein ACK vom Gerät (Adresse oder Daten)
    NoAcknowledge,
    /// Empfangspuffer übergelaufen
    Overrun,
    /// Sonstiger Fehler der Transport-Schicht
    Other,
}

impl BusError {
    /// Übersetzt einen beliebigen `embedded-hal` I2C-Fehler
    pub fn from_i2c<E: embedded_hal::i2c::Error>(err: &E) -> Self {
        use embedded_hal::i2c::ErrorKind;

        match err.kind() {
            ErrorKind::Bus => Self::Bus,
            ErrorKind::ArbitrationLoss => Self::ArbitrationLoss,
            ErrorKind::NoAcknowledge(_) => Self::NoAcknowledge,
            ErrorKind::Overrun => Self::Overrun,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Bus => "bus error",
            Self::ArbitrationLoss => "arbitration lost",
            Self::NoAcknowledge => "no acknowledge",
            Self::Overrun => "receive overrun",
            Self::Other => "transport failure",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for BusError {}

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    /// Operation vor erfolgreichem `init()` aufgerufen
    NotInitialized,
    /// Komponente ist bereits initialisiert (gutartig, wird als Erfolg behandelt)
    AlreadyInitialized,
    /// Kanal-Index >= [`NUM_CHANNELS`](crate::NUM_CHANNELS)
    InvalidChannel,
    /// Ungültiges Argument (leerer Callback, ungültige Konfiguration)
    InvalidArgument,
    /// Callback-Registry ist voll
    CallbackLimitReached,
    /// Callback ist nicht registriert
    NotFound,
    /// Fehler auf dem I2C-Bus
    Transport(BusError),
}

impl LedError {
    /// `true` für Fehler, die Aufrufer als Erfolg behandeln dürfen
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::AlreadyInitialized)
    }
}

impl From<BusError> for LedError {
    fn from(err: BusError) -> Self {
        Self::Transport(err)
    }
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => f.write_str("not initialized"),
            Self::AlreadyInitialized => f.write_str("already initialized"),
            Self::InvalidChannel => f.write_str("invalid channel"),
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::CallbackLimitReached => f.write_str("callback limit reached"),
            Self::NotFound => f.write_str("callback not found"),
            Self::Transport(err) => write!(f, "transport error: {err}"),
        }
    }
}

impl core::error::Error for LedError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}
