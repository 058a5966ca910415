//! Temporal smoothing of consecutive pitch detections.

const WINDOW: usize = 3;

/// Averages the most recent non-zero detections.
///
/// A zero detection is never inserted and does not dilute the average;
/// the output is always the mean of whatever history is populated, or
/// zero when nothing is.
#[derive(Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Smoother {
    history: [f32; WINDOW],
    index: usize,
}

impl Smoother {
    pub fn smooth(&mut self, frequency: f32) -> f32 {
        if frequency > 0.0 {
            self.history[self.index] = frequency;
            self.index = (self.index + 1) % WINDOW;
        }

        let mut sum = 0.0;
        let mut populated = 0;
        for entry in &self.history {
            if *entry > 0.0 {
                sum += entry;
                populated += 1;
            }
        }
        if populated == 0 {
            0.0
        } else {
            sum / populated as f32
        }
    }

    pub fn reset(&mut self) {
        self.history = [0.0; WINDOW];
        self.index = 0;
    }
}
