//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use crate::MAX_RAW_DUTY;

/// Begrenzt einen Helligkeitswert auf 0.0..=100.0 %
///
/// Werte außerhalb werden geklemmt, nie abgelehnt. `NaN` wird als 0 % behandelt.
pub fn clamp_brightness(brightness: f32) -> f32 {
    if brightness.is_nan() {
        return 0.0;
    }
    brightness.clamp(0.0, 100.0)
}

/// Rechnet Helligkeit in Prozent auf einen 12-Bit Roh-Duty-Wert um
///
/// Bei Common-Anode LEDs ist die Logik invertiert: 0 % entspricht dem
/// maximalen Roh-Wert.
///
/// # Beispiele
///
/// ```
/// # use pca_core::brightness_to_duty;
/// assert_eq!(brightness_to_duty(100.0, false), 4095);
/// assert_eq!(brightness_to_duty(100.0, true), 0);
/// ```
pub fn brightness_to_duty(brightness: f32, common_anode: bool) -> u16 {
    let brightness = clamp_brightness(brightness);
    let raw = libm::roundf(brightness / 100.0 * f32::from(MAX_RAW_DUTY)) as u16;

    if common_anode { MAX_RAW_DUTY - raw } else { raw }
}

/// Rechnet eine 8-Bit Farbkomponente (0..=255) in Prozent um
pub fn color_component_to_brightness(component: u8) -> f32 {
    f32::from(component) * 100.0 / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_brightness_range() {
        assert_eq!(clamp_brightness(-50.0), 0.0);
        assert_eq!(clamp_brightness(42.5), 42.5);
        assert_eq!(clamp_brightness(150.0), 100.0);
        assert_eq!(clamp_brightness(f32::NAN), 0.0);
    }

    #[test]
    fn test_duty_common_cathode() {
        assert_eq!(brightness_to_duty(0.0, false), 0);
        assert_eq!(brightness_to_duty(100.0, false), MAX_RAW_DUTY);
        // 50 % → 2047.5 → gerundet 2048
        assert_eq!(brightness_to_duty(50.0, false), 2048);
    }

    #[test]
    fn test_duty_common_anode_is_inverted() {
        assert_eq!(brightness_to_duty(0.0, true), MAX_RAW_DUTY);
        assert_eq!(brightness_to_duty(100.0, true), 0);
        assert_eq!(brightness_to_duty(50.0, true), MAX_RAW_DUTY - 2048);
    }

    #[test]
    fn test_duty_clamps_input() {
        assert_eq!(brightness_to_duty(-10.0, false), 0);
        assert_eq!(brightness_to_duty(250.0, false), MAX_RAW_DUTY);
    }

    #[test]
    fn test_color_component_to_brightness() {
        assert_eq!(color_component_to_brightness(0), 0.0);
        assert_eq!(color_component_to_brightness(255), 100.0);
    }
}
