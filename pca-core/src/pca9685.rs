//! PCA9685 Registerprotokoll über `embedded-hal` I2C
//!
//! Implementiert [`PwmBus`] für jeden I2C-Bus, der
//! [`embedded_hal::i2c::I2c`] implementiert. Damit bleibt der Core
//! hardware-unabhängig und ist auf dem Host mit einem Mock-Bus testbar.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::NUM_CHANNELS;
use crate::error::BusError;
use crate::traits::PwmBus;

// Register
const MODE1: u8 = 0x00;
const MODE2: u8 = 0x01;
const LED0_ON_L: u8 = 0x06;
const PRE_SCALE: u8 = 0xFE;

// MODE1 Bits
const MODE1_RESTART: u8 = 0x80;
const MODE1_AI: u8 = 0x20;
const MODE1_SLEEP: u8 = 0x10;
const MODE1_ALLCALL: u8 = 0x01;

// MODE2: Totem-Pole Ausgänge
const MODE2_OUTDRV: u8 = 0x04;

/// Bit 4 im ON_H/OFF_H Register: Kanal voll an bzw. voll aus
const FULL_BIT: u16 = 0x1000;

/// Interner Oszillator
const OSC_CLOCK_HZ: f32 = 25_000_000.0;

/// Oszillator braucht 500 µs nach dem Aufwachen aus SLEEP
const WAKEUP_DELAY_US: u32 = 500;

/// Kleinste unterstützte PWM-Frequenz
pub const MIN_FREQUENCY_HZ: u16 = 24;

/// Größte unterstützte PWM-Frequenz (Prescale 3)
pub const MAX_FREQUENCY_HZ: u16 = 1526;

/// Berechnet den Prescale-Wert für eine Frequenz
pub fn prescale_for(freq_hz: u16) -> u8 {
    let prescale = libm::roundf(OSC_CLOCK_HZ / (4096.0 * f32::from(freq_hz.max(1)))) - 1.0;
    prescale.clamp(3.0, 255.0) as u8
}

/// Berechnet die tatsächliche Frequenz für einen Prescale-Wert
pub fn frequency_for(prescale: u8) -> u16 {
    (OSC_CLOCK_HZ / (4096.0 * (f32::from(prescale) + 1.0))) as u16
}

/// PCA9685 auf einem I2C-Bus
pub struct Pca9685Bus<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Pca9685Bus<I2C, D> {
    /// Erstellt den Bus-Handle ohne Buszugriff
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Setzt MODE1/MODE2 auf Grundwerte (Auto-Increment, Totem-Pole)
    pub fn configure(&mut self) -> Result<(), BusError> {
        self.write_reg(MODE1, MODE1_ALLCALL | MODE1_AI)?;
        self.write_reg(MODE2, MODE2_OUTDRV)
    }

    /// Gibt den I2C-Bus zurück
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, BusError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|e| BusError::from_i2c(&e))?;
        Ok(buf[0])
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), BusError> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(|e| BusError::from_i2c(&e))
    }
}

impl<I2C: I2c, D: DelayNs> PwmBus for Pca9685Bus<I2C, D> {
    fn restart(&mut self) -> Result<(), BusError> {
        let mode = self.read_reg(MODE1)?;

        if mode & MODE1_RESTART != 0 {
            self.write_reg(MODE1, mode & !MODE1_SLEEP)?;
            self.delay.delay_us(WAKEUP_DELAY_US);
        }

        self.write_reg(MODE1, (mode & !MODE1_SLEEP) | MODE1_RESTART | MODE1_AI)
    }

    fn set_pwm_frequency(&mut self, freq_hz: u16) -> Result<(), BusError> {
        let prescale = prescale_for(freq_hz);
        let mode = self.read_reg(MODE1)? & !MODE1_RESTART;

        // PRE_SCALE ist nur im SLEEP-Modus beschreibbar
        self.write_reg(MODE1, mode | MODE1_SLEEP)?;
        self.write_reg(PRE_SCALE, prescale)?;
        self.write_reg(MODE1, mode & !MODE1_SLEEP)?;
        self.delay.delay_us(WAKEUP_DELAY_US);

        self.restart()
    }

    fn pwm_frequency(&mut self) -> Result<u16, BusError> {
        let prescale = self.read_reg(PRE_SCALE)?;
        Ok(frequency_for(prescale))
    }

    fn write_channel_duty(&mut self, channel: u8, raw: u16) -> Result<(), BusError> {
        if channel >= NUM_CHANNELS {
            return Err(BusError::Other);
        }

        let (on, off) = match raw {
            0 => (0, FULL_BIT),
            r if r >= FULL_BIT => (FULL_BIT, 0),
            r => (0, r),
        };

        let [on_l, on_h] = on.to_le_bytes();
        let [off_l, off_h] = off.to_le_bytes();
        let reg = LED0_ON_L + 4 * channel;

        self.i2c
            .write(self.address, &[reg, on_l, on_h, off_l, off_h])
            .map_err(|e| BusError::from_i2c(&e))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    #[derive(Debug)]
    struct MockI2cError;

    impl embedded_hal::i2c::Error for MockI2cError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
        }
    }

    /// Simuliert das Registerfeld eines PCA9685
    struct MockI2c {
        regs: [u8; 256],
        pointer: u8,
        fail: bool,
        last_address: Option<u8>,
    }

    impl MockI2c {
        fn new() -> Self {
            let mut regs = [0u8; 256];
            // Power-On-Reset: SLEEP + ALLCALL, Prescale 30 (200 Hz)
            regs[MODE1 as usize] = MODE1_SLEEP | MODE1_ALLCALL;
            regs[PRE_SCALE as usize] = 30;
            Self {
                regs,
                pointer: 0,
                fail: false,
                last_address: None,
            }
        }

        fn store(&mut self, reg: u8, value: u8) {
            let mode = self.regs[MODE1 as usize];
            match reg {
                // Prescaler ignoriert Schreibzugriffe außerhalb von SLEEP
                PRE_SCALE if mode & MODE1_SLEEP == 0 => {}
                // Restart löscht das RESTART-Bit sofort wieder
                MODE1 if value & MODE1_RESTART != 0 && value & MODE1_SLEEP == 0 => {
                    self.regs[MODE1 as usize] = value & !MODE1_RESTART;
                }
                _ => self.regs[reg as usize] = value,
            }
        }

        fn channel_regs(&self, channel: u8) -> [u8; 4] {
            let base = (LED0_ON_L + 4 * channel) as usize;
            [
                self.regs[base],
                self.regs[base + 1],
                self.regs[base + 2],
                self.regs[base + 3],
            ]
        }
    }

    impl ErrorType for MockI2c {
        type Error = MockI2cError;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(MockI2cError);
            }
            self.last_address = Some(address);

            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        if let Some((&reg, data)) = bytes.split_first() {
                            self.pointer = reg;
                            for &value in data {
                                self.store(self.pointer, value);
                                self.pointer = self.pointer.wrapping_add(1);
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for byte in buf.iter_mut() {
                            *byte = self.regs[self.pointer as usize];
                            self.pointer = self.pointer.wrapping_add(1);
                        }
                    }
                }
            }
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn bus() -> Pca9685Bus<MockI2c, NoDelay> {
        Pca9685Bus::new(MockI2c::new(), NoDelay, 0x40)
    }

    #[test]
    fn test_prescale_and_frequency() {
        assert_eq!(prescale_for(1000), 5);
        assert_eq!(frequency_for(5), 1017);
        assert_eq!(prescale_for(200), 30);
        assert_eq!(prescale_for(MIN_FREQUENCY_HZ), 253);
        assert_eq!(prescale_for(MAX_FREQUENCY_HZ), 3);
        assert_eq!(prescale_for(10_000), 3);
    }

    #[test]
    fn test_set_frequency_goes_through_sleep() {
        let mut bus = bus();
        bus.configure().unwrap();
        bus.set_pwm_frequency(1000).unwrap();

        assert_eq!(bus.pwm_frequency().unwrap(), 1017);

        let i2c = bus.release();
        let mode = i2c.regs[MODE1 as usize];
        assert_eq!(i2c.regs[PRE_SCALE as usize], 5);
        assert_eq!(mode & MODE1_SLEEP, 0);
        assert_ne!(mode & MODE1_AI, 0);
        assert_eq!(i2c.last_address, Some(0x40));
    }

    #[test]
    fn test_restart_wakes_device() {
        let mut bus = bus();
        bus.restart().unwrap();

        let i2c = bus.release();
        assert_eq!(i2c.regs[MODE1 as usize] & MODE1_SLEEP, 0);
        assert_ne!(i2c.regs[MODE1 as usize] & MODE1_AI, 0);
    }

    #[test]
    fn test_write_channel_duty_registers() {
        let mut bus = bus();
        bus.write_channel_duty(0, 0).unwrap();
        bus.write_channel_duty(3, 2048).unwrap();
        bus.write_channel_duty(15, 4096).unwrap();

        let i2c = bus.release();
        assert_eq!(i2c.channel_regs(0), [0x00, 0x00, 0x00, 0x10]);
        assert_eq!(i2c.channel_regs(3), [0x00, 0x00, 0x00, 0x08]);
        assert_eq!(i2c.channel_regs(15), [0x00, 0x10, 0x00, 0x00]);
    }

    #[test]
    fn test_write_invalid_channel() {
        let mut bus = bus();
        assert_eq!(bus.write_channel_duty(16, 100), Err(BusError::Other));
    }

    #[test]
    fn test_bus_failure_is_mapped() {
        let mut i2c = MockI2c::new();
        i2c.fail = true;
        let mut bus = Pca9685Bus::new(i2c, NoDelay, 0x40);

        assert_eq!(bus.restart(), Err(BusError::NoAcknowledge));
        assert_eq!(bus.pwm_frequency(), Err(BusError::NoAcknowledge));
    }
}
