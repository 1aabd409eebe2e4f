// LED Pattern Task - Steuert eine RGB-LED über den PCA9685
use defmt::{error, info, warn};
use embassy_time::{Duration, Timer};
use esp_hal::gpio::AnyPin;
use esp_hal::peripherals::I2C0;
use pca_core::{BrightnessController, ChannelDuty, LedError, Pca9685Driver, RgbChannels};

use crate::config::{
    DEMO_COLORS, DRIVER_INIT_ATTEMPTS, DRIVER_INIT_RETRY_MS, PATTERN_INTERVAL_SECS, driver_config,
};
use crate::hal::EspI2cConnector;
use crate::publish_brightness_change;

/// LED Pattern Logic - Testbare Logik ohne Hardware-Abhängigkeit
///
/// Zeigt die Farben aus [`DEMO_COLORS`] der Reihe nach im festen Intervall.
/// Jede Farbe geht über den Controller, d.h. alle registrierten Callbacks
/// sehen die drei Kanal-Änderungen.
///
/// # Parameter
/// - `controller`: initialisierter Controller (Hardware oder Mock)
/// - `channels`: Kanal-Zuordnung der RGB-LED
pub async fn led_pattern_logic<D: ChannelDuty>(
    controller: &mut BrightnessController<D>,
    channels: RgbChannels,
) -> ! {
    let mut index = 0;

    loop {
        let color = DEMO_COLORS[index];
        match controller.set_color(&channels, color) {
            Ok(()) => info!("Color: ({}, {}, {})", color.r, color.g, color.b),
            Err(e) => error!("Failed to set color: {}", e),
        }

        index = (index + 1) % DEMO_COLORS.len();
        Timer::after(Duration::from_secs(PATTERN_INTERVAL_SECS)).await;
    }
}

/// Initialisiert den Treiber, bei Busfehlern mit mehreren Versuchen
///
/// Ungültige Konfiguration wird nicht wiederholt.
async fn init_driver(driver: &mut Pca9685Driver<EspI2cConnector<'static>>) -> Result<(), LedError> {
    let mut attempt = 1;
    loop {
        match driver.init(driver_config()) {
            Err(LedError::Transport(e)) if attempt < DRIVER_INIT_ATTEMPTS => {
                warn!(
                    "PCA9685 init attempt {}/{} failed: {}",
                    attempt, DRIVER_INIT_ATTEMPTS, e
                );
                attempt += 1;
                Timer::after(Duration::from_millis(DRIVER_INIT_RETRY_MS)).await;
            }
            result => return result,
        }
    }
}

/// Baut Treiber und Controller auf und registriert den Firmware-Callback
async fn setup(
    i2c0: I2C0<'static>,
    sda: AnyPin<'static>,
    scl: AnyPin<'static>,
) -> Result<BrightnessController<Pca9685Driver<EspI2cConnector<'static>>>, LedError> {
    let connector = EspI2cConnector::new(i2c0, sda, scl)?;
    let mut driver = Pca9685Driver::new(connector);
    init_driver(&mut driver).await?;

    let mut controller = BrightnessController::with_driver(driver);
    controller.init()?;
    controller.register_callback(Some(publish_brightness_change))?;

    Ok(controller)
}

/// LED Pattern Task - Embassy Task für parallele Ausführung
///
/// Übernimmt die Hardware-Initialisierung und ruft dann
/// die testbare `led_pattern_logic()` Funktion auf.
///
/// # Parameter
/// - `i2c0`: I2C0 Peripheral
/// - `sda`: SDA Pin
/// - `scl`: SCL Pin
#[embassy_executor::task]
pub async fn led_pattern_task(i2c0: I2C0<'static>, sda: AnyPin<'static>, scl: AnyPin<'static>) {
    let mut controller = match setup(i2c0, sda, scl).await {
        Ok(controller) => controller,
        Err(e) => {
            error!("LED setup failed: {}", e);
            return;
        }
    };

    if let Ok(freq) = controller.driver().get_frequency() {
        info!("PCA9685 running at {} Hz", freq);
    }

    led_pattern_logic(&mut controller, RgbChannels::default()).await;
}
