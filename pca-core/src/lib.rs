//! PCA Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, das PCA9685-Registerprotokoll (über `embedded-hal`),
//! den Treiber und den Helligkeits-Controller.

#![no_std]

// Log-Makros müssen vor allen anderen Modulen stehen
#[macro_use]
mod fmt;

pub mod controller;
pub mod driver;
pub mod error;
pub mod logic;
pub mod pca9685;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use controller::{BrightnessController, NoHardware};
pub use driver::Pca9685Driver;
pub use error::{BusError, LedError};
pub use logic::{brightness_to_duty, clamp_brightness, color_component_to_brightness};
pub use pca9685::Pca9685Bus;
pub use traits::{BrightnessCallback, BusConnector, ChannelDuty, PwmBus};
pub use types::{BrightnessChange, DriverConfig, RgbChannels};

/// Anzahl der PWM-Kanäle des PCA9685
pub const NUM_CHANNELS: u8 = 16;

/// Maximale Anzahl gleichzeitig registrierter Callbacks
pub const MAX_CALLBACKS: usize = 5;

/// Maximaler Roh-Duty-Wert (12 Bit PWM)
pub const MAX_RAW_DUTY: u16 = 4095;

/// Basis-I2C-Adresse des PCA9685 (alle Adress-Pins auf GND)
pub const PCA9685_ADDR_BASE: u8 = 0x40;
