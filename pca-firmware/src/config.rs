// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

use pca_core::{DriverConfig, PCA9685_ADDR_BASE};
use rgb::RGB8;

// ============================================================================
// I2C Konfiguration
// ============================================================================

/// I2C-Port (ESP32-C6 hat nur I2C0 als Master)
pub const I2C_PORT: u8 = 0;

/// GPIO-Pin für SDA
pub const I2C_SDA_GPIO: u8 = 21;

/// GPIO-Pin für SCL
pub const I2C_SCL_GPIO: u8 = 22;

/// I2C Taktfrequenz in kHz
/// Der PCA9685 kann bis 1 MHz, 100 kHz ist robust bei langen Leitungen
pub const I2C_FREQUENCY_KHZ: u32 = 100;

// ============================================================================
// PCA9685 Konfiguration
// ============================================================================

/// Default PWM-Frequenz in Hz (überschreibbar via PWM_FREQ_HZ in .env)
pub const DEFAULT_PWM_FREQ_HZ: u16 = 1000;

/// I2C-Adresse (überschreibbar via PCA9685_ADDRESS, dezimal oder 0x..)
const PCA9685_ADDRESS: Option<&str> = option_env!("PCA9685_ADDRESS");

/// PWM-Frequenz aus der Build-Umgebung
const PWM_FREQ_HZ: Option<&str> = option_env!("PWM_FREQ_HZ");

/// Polarität aus der Build-Umgebung ("true"/"1" = Common-Anode)
const LED_COMMON_ANODE: Option<&str> = option_env!("LED_COMMON_ANODE");

/// Versuche für `Pca9685Driver::init` bei Busfehlern
pub const DRIVER_INIT_ATTEMPTS: u8 = 3;

/// Pause zwischen zwei Init-Versuchen in Millisekunden
pub const DRIVER_INIT_RETRY_MS: u64 = 500;

// ============================================================================
// Demo-Muster
// ============================================================================

/// Helligkeit je Farbkomponente im Demo-Muster (0-255)
pub const LED_BRIGHTNESS: u8 = 64;

/// Farbfolge des Demo-Musters: Rot, Grün, Blau
pub const DEMO_COLORS: [RGB8; 3] = [
    RGB8 {
        r: LED_BRIGHTNESS,
        g: 0,
        b: 0,
    },
    RGB8 {
        r: 0,
        g: LED_BRIGHTNESS,
        b: 0,
    },
    RGB8 {
        r: 0,
        g: 0,
        b: LED_BRIGHTNESS,
    },
];

/// Wechsel-Intervall des Demo-Musters in Sekunden
pub const PATTERN_INTERVAL_SECS: u64 = 5;

/// Treiber-Konfiguration aus Konstanten und Build-Umgebung
pub fn driver_config() -> DriverConfig {
    DriverConfig {
        i2c_port: I2C_PORT,
        sda_pin: I2C_SDA_GPIO,
        scl_pin: I2C_SCL_GPIO,
        address: PCA9685_ADDRESS
            .and_then(parse_address)
            .unwrap_or(PCA9685_ADDR_BASE),
        frequency_hz: PWM_FREQ_HZ
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PWM_FREQ_HZ),
        common_anode: LED_COMMON_ANODE.is_some_and(|v| matches!(v.trim(), "1" | "true")),
    }
}

fn parse_address(value: &str) -> Option<u8> {
    let value = value.trim();
    match value.strip_prefix("0x") {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}
