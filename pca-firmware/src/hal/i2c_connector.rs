// I2C Connector für den PCA9685
//
// Implementiert BusConnector aus pca-core: hält den I2C0-Master und
// leiht ihn als Pca9685Bus an den Treiber aus.

use defmt::error;
use esp_hal::Blocking;
use esp_hal::delay::Delay;
use esp_hal::gpio::{AnyPin, Pin};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::peripherals::I2C0;
use esp_hal::time::Rate;
use pca_core::{BusConnector, DriverConfig, LedError, Pca9685Bus};

use crate::config::I2C_FREQUENCY_KHZ;

/// PCA9685 auf dem blockierenden ESP32 I2C-Master
pub type EspPca9685Bus<'d> = Pca9685Bus<I2c<'d, Blocking>, Delay>;

/// Real Hardware Connector
///
/// Der I2C-Master gehört dem Connector, solange kein Treiber ihn hält.
/// Schlägt die Inbetriebnahme fehl, gibt der Treiber den Bus über
/// `close()` zurück und ein neues `open()` ist möglich.
pub struct EspI2cConnector<'d> {
    i2c: Option<I2c<'d, Blocking>>,
    sda_pin: u8,
    scl_pin: u8,
}

impl<'d> EspI2cConnector<'d> {
    /// Erstellt den I2C0-Master auf den übergebenen Pins
    ///
    /// # Parameter
    /// - `i2c0`: I2C0 Peripheral
    /// - `sda`: Pin für die Datenleitung (muss `DriverConfig::sda_pin` entsprechen)
    /// - `scl`: Pin für die Taktleitung (muss `DriverConfig::scl_pin` entsprechen)
    pub fn new(i2c0: I2C0<'d>, sda: AnyPin<'d>, scl: AnyPin<'d>) -> Result<Self, LedError> {
        let sda_pin = sda.number();
        let scl_pin = scl.number();

        let i2c_config = I2cConfig::default().with_frequency(Rate::from_khz(I2C_FREQUENCY_KHZ));
        let i2c = I2c::new(i2c0, i2c_config)
            .map_err(|_| {
                error!("Invalid I2C configuration");
                LedError::InvalidArgument
            })?
            .with_sda(sda)
            .with_scl(scl);

        Ok(Self {
            i2c: Some(i2c),
            sda_pin,
            scl_pin,
        })
    }
}

impl<'d> BusConnector for EspI2cConnector<'d> {
    type Bus = EspPca9685Bus<'d>;

    fn open(&mut self, config: &DriverConfig) -> Result<Self::Bus, LedError> {
        if config.i2c_port != 0 {
            error!("I2C port {} not available (only I2C0)", config.i2c_port);
            return Err(LedError::InvalidArgument);
        }

        if self.sda_pin != config.sda_pin || self.scl_pin != config.scl_pin {
            error!(
                "Pin mismatch: config SDA/SCL {}/{}, wired {}/{}",
                config.sda_pin, config.scl_pin, self.sda_pin, self.scl_pin
            );
            return Err(LedError::InvalidArgument);
        }

        let Some(i2c) = self.i2c.take() else {
            error!("I2C0 already handed to a driver");
            return Err(LedError::InvalidArgument);
        };

        let mut bus = Pca9685Bus::new(i2c, Delay::new(), config.address);
        if let Err(e) = bus.configure() {
            error!("Failed to configure PCA9685 at {=u8:#x}: {}", config.address, e);
            self.i2c = Some(bus.release());
            return Err(e.into());
        }

        Ok(bus)
    }

    fn close(&mut self, bus: Self::Bus) {
        self.i2c = Some(bus.release());
    }
}
