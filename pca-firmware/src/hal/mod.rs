// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul verbindet die Bus-Traits aus pca-core
// mit dem I2C-Peripheral des ESP32-C6.

pub mod i2c_connector;

pub use i2c_connector::{EspI2cConnector, EspPca9685Bus};
