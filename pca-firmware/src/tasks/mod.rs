// Task-Modul: Enthält alle Embassy Tasks
//
// Der Pattern-Task besitzt Treiber und Controller.
// Helligkeits-Änderungen laufen über den PubSubChannel zum Log-Task.

pub mod brightness_log;
pub mod led_pattern;

// Re-export Tasks für einfachen Import
pub use brightness_log::brightness_log_task;
pub use led_pattern::led_pattern_task;
