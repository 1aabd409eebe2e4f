// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von pca-core
pub use pca_core::{BrightnessChange, BrightnessController, LedError, Pca9685Driver};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pubsub::{PubSubChannel, Subscriber};

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================

/// PubSubChannel für Helligkeits-Broadcasts
/// - 4: Nachrichten-Kapazität (eine RGB-Farbe erzeugt 3 Änderungen)
/// - 2: Maximale Anzahl Subscribers
/// - 1: Publisher (Callbacks nutzen den Immediate-Publisher)
pub type BrightnessChannel = PubSubChannel<CriticalSectionRawMutex, BrightnessChange, 4, 2, 1>;

/// Subscriber für Helligkeits-Broadcasts
pub type BrightnessSubscriber =
    Subscriber<'static, CriticalSectionRawMutex, BrightnessChange, 4, 2, 1>;

/// Globaler Channel: Callbacks sind Funktionszeiger ohne eigenen Zustand
pub static BRIGHTNESS_CHANNEL: BrightnessChannel = PubSubChannel::new();

// ============================================================================
// Firmware-Callback für den BrightnessController
// ============================================================================

/// Legt jede Änderung in den PubSubChannel (ältestes Element wird verdrängt)
///
/// Geloggt wird erst im `brightness_log_task`, nicht im Controller-Kontext.
pub fn publish_brightness_change(channel: u8, brightness: f32) -> Result<(), LedError> {
    BRIGHTNESS_CHANNEL
        .immediate_publisher()
        .publish_immediate(BrightnessChange {
            channel,
            brightness,
        });
    Ok(())
}
