//! Manage button's state.

const DEBOUNCE_MS: u32 = 50;
const LONG_PRESS_MS: u32 = 800;
const VERY_LONG_PRESS_MS: u32 = 2000;

/// Classification of one completed press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Press {
    Short,
    Long,
    VeryLong,
}

/// Use this to hold a button's state over time.
///
/// Debounces the raw level and classifies presses by hold duration
/// without ever blocking the poll loop: Short and Long are emitted on
/// release, VeryLong fires the moment the threshold is crossed while the
/// button is still held. Each physical press yields at most one event.
#[derive(Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Button {
    raw: bool,
    debounced: bool,
    last_edge_at: u32,
    pressed_at: u32,
    very_long_fired: bool,
}

impl Button {
    pub fn update(&mut self, level: bool, now_ms: u32) -> Option<Press> {
        if level != self.raw {
            self.raw = level;
            self.last_edge_at = now_ms;
        }

        let stable_for = now_ms.wrapping_sub(self.last_edge_at);
        if self.raw != self.debounced && stable_for >= DEBOUNCE_MS {
            self.debounced = self.raw;
            if self.debounced {
                // Duration counts from the raw edge, not its confirmation.
                self.pressed_at = self.last_edge_at;
                self.very_long_fired = false;
                return None;
            }
            if self.very_long_fired {
                return None;
            }
            let held = self.last_edge_at.wrapping_sub(self.pressed_at);
            return Some(if held >= LONG_PRESS_MS {
                Press::Long
            } else {
                Press::Short
            });
        }

        if self.debounced && !self.very_long_fired {
            let held = now_ms.wrapping_sub(self.pressed_at);
            if held >= VERY_LONG_PRESS_MS {
                self.very_long_fired = true;
                return Some(Press::VeryLong);
            }
        }

        None
    }
}
