//! Core Types für die PCA9685 LED-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use crate::error::LedError;
use crate::{NUM_CHANNELS, PCA9685_ADDR_BASE};

/// Konfiguration für [`Pca9685Driver::init`](crate::Pca9685Driver::init)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverConfig {
    /// I2C-Port des Controllers
    pub i2c_port: u8,
    /// SDA GPIO-Pin
    pub sda_pin: u8,
    /// SCL GPIO-Pin
    pub scl_pin: u8,
    /// I2C-Adresse des PCA9685
    pub address: u8,
    /// Gewünschte PWM-Frequenz in Hz (24..=1526)
    pub frequency_hz: u16,
    /// `true` für Common-Anode LEDs (invertierte Logik)
    pub common_anode: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            i2c_port: 0,
            sda_pin: 21,
            scl_pin: 22,
            address: PCA9685_ADDR_BASE,
            frequency_hz: 1000,
            common_anode: false,
        }
    }
}

/// Helligkeits-Änderung für Observer
///
/// Wird vom Firmware-Callback in den PubSub-Channel gelegt.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrightnessChange {
    pub channel: u8,
    pub brightness: f32,
}

/// Zuordnung einer RGB-LED auf drei PWM-Kanäle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RgbChannels {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RgbChannels {
    /// Prüft, dass alle drei Kanäle existieren
    pub fn validate(&self) -> Result<(), LedError> {
        if [self.red, self.green, self.blue]
            .iter()
            .all(|&channel| channel < NUM_CHANNELS)
        {
            Ok(())
        } else {
            Err(LedError::InvalidChannel)
        }
    }
}

impl Default for RgbChannels {
    /// Verdrahtung des Referenz-Boards: Blau auf 0, Grün auf 1, Rot auf 2
    fn default() -> Self {
        Self {
            red: 2,
            green: 1,
            blue: 0,
        }
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for BrightnessChange {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "channel {} -> {}%",
            self.channel,
            self.brightness
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference_board() {
        let config = DriverConfig::default();
        assert_eq!(config.address, 0x40);
        assert_eq!(config.frequency_hz, 1000);
        assert_eq!((config.sda_pin, config.scl_pin), (21, 22));
        assert!(!config.common_anode);
    }

    #[test]
    fn test_rgb_channels_validate() {
        assert_eq!(RgbChannels::default().validate(), Ok(()));

        let out_of_range = RgbChannels {
            red: 0,
            green: 1,
            blue: 16,
        };
        assert_eq!(out_of_range.validate(), Err(LedError::InvalidChannel));
    }
}
