//! Process all button peripherals over time.

use super::button::{Button, Press};
use super::snapshot::Snapshot;

/// Stateful store of the three logical buttons.
#[derive(Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Store {
    pub toggle: Button,
    pub string: Button,
    pub mode: Button,
}

/// Button events derived from one snapshot, consumed once.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Events {
    pub toggle: Option<Press>,
    pub string: Option<Press>,
    pub mode: Option<Press>,
}

impl Store {
    pub fn update(&mut self, snapshot: Snapshot) -> Events {
        Events {
            toggle: self.toggle.update(snapshot.toggle, snapshot.now_ms),
            string: self.string.update(snapshot.string, snapshot.now_ms),
            mode: self.mode.update(snapshot.mode, snapshot.now_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_are_tracked_independently() {
        let mut store = Store::default();
        for now in 0..100 {
            let events = store.update(Snapshot {
                toggle: true,
                string: false,
                mode: false,
                now_ms: now,
            });
            // No event until release.
            assert!(events.toggle.is_none());
            assert!(events.string.is_none());
        }
        let mut released = None;
        for now in 100..200 {
            let events = store.update(Snapshot {
                toggle: false,
                string: false,
                mode: false,
                now_ms: now,
            });
            released = released.or(events.toggle);
        }
        assert_eq!(released, Some(Press::Short));
    }
}
