//! Closed-loop regulator turning cent deviation into actuator positions.

/// Valid actuator positions, degrees of the servo horn.
pub const POSITION_RANGE: (u8, u8) = (0, 180);

/// Rest position the actuator is centered to before detaching.
pub const CENTER: u8 = 90;

// One commanded move takes this long to physically complete; no new
// command may be issued before it has.
const MOVE_DURATION_MS: u32 = 120;

/// Runtime-adjustable regulator parameters.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attributes {
    /// Absolute cent deviation considered in tune.
    pub tolerance: i32,
    /// Consecutive in-tolerance samples required to declare success.
    pub stable_samples: u32,
    /// Minimum period between two issued moves.
    pub move_period_ms: u32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            tolerance: 5,
            stable_samples: 5,
            move_period_ms: 150,
        }
    }
}

/// Controller decision for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// Nothing to do: gated, rate limited, or already at the target.
    Idle,
    /// Command the actuator to the contained position.
    Move(u8),
    /// The stability gate fired; the string is in tune.
    InTune,
}

/// Per-tick regulator state. Owned by the session store and reset
/// whenever a tuning state or string is entered or left.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Controller {
    position: u8,
    stable: u32,
    moving_since: Option<u32>,
    last_move_at: Option<u32>,
    attributes: Attributes,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            position: CENTER,
            stable: 0,
            moving_since: None,
            last_move_at: None,
            attributes: Attributes::default(),
        }
    }
}

impl Controller {
    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }

    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    #[must_use]
    pub fn position(&self) -> u8 {
        self.position
    }

    /// Clears the stability counter and motion timers. The position is
    /// kept; a freshly tuned string must not be disturbed.
    pub fn reset(&mut self) {
        self.stable = 0;
        self.moving_since = None;
        self.last_move_at = None;
    }

    /// Re-centers, for the rest-and-detach sequence.
    pub fn rest(&mut self) {
        self.position = CENTER;
        self.reset();
    }

    pub fn update(&mut self, cents: i32, now_ms: u32) -> Verdict {
        if cents.unsigned_abs() as i32 <= self.attributes.tolerance {
            self.stable += 1;
            if self.stable >= self.attributes.stable_samples {
                return Verdict::InTune;
            }
        } else {
            self.stable = 0;
        }

        if let Some(since) = self.moving_since {
            if now_ms.wrapping_sub(since) < MOVE_DURATION_MS {
                return Verdict::Idle;
            }
            self.moving_since = None;
        }

        if let Some(last) = self.last_move_at {
            if now_ms.wrapping_sub(last) < self.attributes.move_period_ms {
                return Verdict::Idle;
            }
        }

        let step = step_size(cents.abs());
        // Flat means the peg must wind up, sharp down.
        let target = if cents < 0 {
            i16::from(self.position) + step
        } else {
            i16::from(self.position) - step
        }
        .clamp(i16::from(POSITION_RANGE.0), i16::from(POSITION_RANGE.1)) as u8;

        if target == self.position {
            return Verdict::Idle;
        }

        self.position = target;
        self.moving_since = Some(now_ms);
        self.last_move_at = Some(now_ms);
        Verdict::Move(target)
    }
}

fn step_size(abs_cents: i32) -> i16 {
    if abs_cents > 30 {
        5
    } else if abs_cents > 20 {
        3
    } else if abs_cents > 10 {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detached_timing() -> Controller {
        // Wide spacing so rate limiting never interferes.
        Controller::default()
    }

    #[test]
    fn stability_gate_fires_exactly_on_the_configured_sample() {
        let mut controller = detached_timing();
        let mut now = 0;
        for _ in 0..4 {
            assert_ne!(controller.update(3, now), Verdict::InTune);
            now += 1000;
        }
        assert_eq!(controller.update(3, now), Verdict::InTune);
    }

    #[test]
    fn out_of_tolerance_sample_resets_the_streak() {
        let mut controller = detached_timing();
        let mut now = 0;
        for _ in 0..4 {
            controller.update(3, now);
            now += 1000;
        }
        controller.update(6, now);
        now += 1000;
        // The streak restarted; four more in-tolerance samples are not
        // enough, the fifth is.
        for _ in 0..4 {
            assert_ne!(controller.update(3, now), Verdict::InTune);
            now += 1000;
        }
        assert_eq!(controller.update(3, now), Verdict::InTune);
    }

    #[test]
    fn flat_string_raises_the_position_sharp_lowers_it() {
        let mut controller = detached_timing();
        assert_eq!(controller.update(-15, 0), Verdict::Move(92));

        let mut controller = detached_timing();
        assert_eq!(controller.update(15, 0), Verdict::Move(88));
    }

    #[test]
    fn step_grows_with_the_deviation() {
        assert_eq!(step_size(5), 1);
        assert_eq!(step_size(10), 1);
        assert_eq!(step_size(11), 2);
        assert_eq!(step_size(21), 3);
        assert_eq!(step_size(31), 5);
    }

    #[test]
    fn no_new_move_while_one_is_in_progress() {
        let mut controller = detached_timing();
        assert_eq!(controller.update(-15, 0), Verdict::Move(92));
        assert_eq!(controller.update(-15, 60), Verdict::Idle);
    }

    #[test]
    fn moves_are_rate_limited_after_completion() {
        let mut controller = detached_timing();
        assert_eq!(controller.update(-15, 0), Verdict::Move(92));
        // Move finished at 120 ms, but the 150 ms period has not passed.
        assert_eq!(controller.update(-15, 130), Verdict::Idle);
        assert_eq!(controller.update(-15, 200), Verdict::Move(94));
    }

    #[test]
    fn position_is_clamped_to_the_actuator_range() {
        let mut controller = detached_timing();
        let mut now = 0;
        for _ in 0..50 {
            controller.update(-90, now);
            now += 1000;
        }
        assert_eq!(controller.position(), POSITION_RANGE.1);
        // Fully wound; no move can be issued any more.
        assert_eq!(controller.update(-90, now), Verdict::Idle);
    }

    #[test]
    fn reset_keeps_the_position_rest_recenters() {
        let mut controller = detached_timing();
        controller.update(-35, 0);
        assert_eq!(controller.position(), 95);
        controller.reset();
        assert_eq!(controller.position(), 95);
        controller.rest();
        assert_eq!(controller.position(), CENTER);
    }
}
