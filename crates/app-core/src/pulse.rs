use crate::constants::{MARKER_SCALE_MAX, MARKER_SCALE_MIN, MARKER_SCALE_STEP};

/// Bounded triangle-wave scale animation for the surface marker.
///
/// One step per frame; the scale oscillates between the min and max bounds,
/// reversing direction at each. Independent of the camera flight.
#[derive(Clone, Debug)]
pub struct MarkerPulse {
    scale: f32,
    growing: bool,
}

impl Default for MarkerPulse {
    fn default() -> Self {
        Self {
            scale: MARKER_SCALE_MIN,
            growing: true,
        }
    }
}

impl MarkerPulse {
    /// Advance one frame and return the new scale.
    pub fn step(&mut self) -> f32 {
        if self.growing {
            self.scale += MARKER_SCALE_STEP;
            if self.scale >= MARKER_SCALE_MAX {
                self.scale = MARKER_SCALE_MAX;
                self.growing = false;
            }
        } else {
            self.scale -= MARKER_SCALE_STEP;
            if self.scale <= MARKER_SCALE_MIN {
                self.scale = MARKER_SCALE_MIN;
                self.growing = true;
            }
        }
        self.scale
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}
