//! Linear range mapping

/// Affine rescale of one integer range onto another, with clamping.
///
/// Inputs above `fault_ceiling` are treated as sensor glitches and coerce
/// to the minimum output rather than surfacing an error; a live instrument
/// must never hang or emit garbage on a bad reading.
#[derive(Debug, Clone, Copy)]
pub struct RangeMap {
    in_min: i32,
    in_max: i32,
    out_min: i32,
    out_max: i32,
    fault_ceiling: Option<i32>,
}

impl RangeMap {
    /// Create a new range map.
    pub fn new(in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> Self {
        Self {
            in_min,
            in_max,
            out_min,
            out_max,
            fault_ceiling: None,
        }
    }

    /// Treat inputs above `ceiling` as faults that map to the minimum output.
    pub fn with_fault_ceiling(mut self, ceiling: i32) -> Self {
        self.fault_ceiling = Some(ceiling);
        self
    }

    /// Map an input value into the output range.
    pub fn map(&self, input: i32) -> i32 {
        if let Some(ceiling) = self.fault_ceiling {
            if input > ceiling {
                return self.out_min;
            }
        }

        let in_span = (self.in_max - self.in_min) as i64;
        if in_span == 0 {
            return self.out_min;
        }

        let out_span = (self.out_max - self.out_min) as i64;
        let scaled =
            (input as i64 - self.in_min as i64) * out_span / in_span + self.out_min as i64;

        let (lo, hi) = if self.out_min <= self.out_max {
            (self.out_min as i64, self.out_max as i64)
        } else {
            (self.out_max as i64, self.out_min as i64)
        };
        scaled.clamp(lo, hi) as i32
    }
}
