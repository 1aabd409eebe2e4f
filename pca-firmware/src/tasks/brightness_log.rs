// Brightness Log Task - Empfängt Helligkeits-Änderungen vom PubSubChannel
use defmt::{debug, info, warn};
use embassy_sync::pubsub::WaitResult;
use pca_core::{BrightnessChange, NUM_CHANNELS};

use crate::BrightnessSubscriber;

/// Letzter bekannter Stand aller Kanäle aus Sicht des Subscribers
struct ChannelLevels([f32; NUM_CHANNELS as usize]);

impl ChannelLevels {
    /// Übernimmt eine Änderung, liefert den alten Wert falls er sich geändert hat
    fn apply(&mut self, change: &BrightnessChange) -> Option<f32> {
        let level = self.0.get_mut(change.channel as usize)?;
        let previous = *level;
        if previous == change.brightness {
            return None;
        }
        *level = change.brightness;
        Some(previous)
    }
}

/// Loggt Helligkeits-Übergänge, die der Controller veröffentlicht
///
/// Wiederholte Werte werden nur auf Debug-Level gemeldet. Verpasst der
/// Subscriber Nachrichten, wird das als Warnung geloggt.
#[embassy_executor::task]
pub async fn brightness_log_task(mut subscriber: BrightnessSubscriber) {
    let mut levels = ChannelLevels([0.0; NUM_CHANNELS as usize]);

    loop {
        match subscriber.next_message().await {
            WaitResult::Lagged(missed) => {
                warn!("Brightness log lagged, {} changes missed", missed);
            }
            WaitResult::Message(change) => match levels.apply(&change) {
                Some(previous) => info!(
                    "Channel {}: {}% -> {}%",
                    change.channel, previous, change.brightness
                ),
                None => debug!("Unchanged {}", change),
            },
        }
    }
}
