use crate::error::InvalidArgument;

/// Graph500 R-MAT parameters.
pub const DEFAULT_RMAT_PROBABILITIES: [f64; 4] = [0.57, 0.19, 0.19, 0.05];

const SUM_TOLERANCE: f64 = 1e-9;

/// Quadrant of the adjacency matrix selected at one recursion level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    LowLow,
    LowHigh,
    HighLow,
    HighHigh,
}

impl Quadrant {
    /// Whether the source and destination move into their upper halves.
    pub fn upper_halves(self) -> (bool, bool) {
        match self {
            Quadrant::LowLow => (false, false),
            Quadrant::LowHigh => (false, true),
            Quadrant::HighLow => (true, false),
            Quadrant::HighHigh => (true, true),
        }
    }
}

/// The four R-MAT quadrant probabilities `(a, b, c, d)`.
///
/// `a` is low-low, `b` low-high (destination in upper half), `c` high-low
/// (source in upper half) and `d` high-high. Values are validated once and
/// never renormalized: construction fails unless every value is finite and
/// non-negative and they sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadrantProbabilities {
    values: [f64; 4],
    cumulative: [f64; 3],
}

impl QuadrantProbabilities {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Result<Self, InvalidArgument> {
        let values = [a, b, c, d];
        for (index, value) in values.iter().enumerate() {
            if !value.is_finite() || *value < 0.0 {
                return Err(InvalidArgument::InvalidProbability {
                    index,
                    value: *value,
                });
            }
        }
        let sum = values.iter().sum::<f64>();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(InvalidArgument::ProbabilitySum { sum });
        }

        Ok(Self {
            values,
            cumulative: [a, a + b, a + b + c],
        })
    }

    pub fn quadrant_probabilities(&self) -> (f64, f64, f64, f64) {
        let [a, b, c, d] = self.values;
        (a, b, c, d)
    }

    /// Maps a uniform draw in `[0, 1)` to the quadrant whose cumulative
    /// interval contains it. Anything at or past `a + b + c` lands in `d`.
    pub fn select(&self, draw: f64) -> Quadrant {
        if draw < self.cumulative[0] {
            Quadrant::LowLow
        } else if draw < self.cumulative[1] {
            Quadrant::LowHigh
        } else if draw < self.cumulative[2] {
            Quadrant::HighLow
        } else {
            Quadrant::HighHigh
        }
    }
}

impl Default for QuadrantProbabilities {
    fn default() -> Self {
        let [a, b, c, _] = DEFAULT_RMAT_PROBABILITIES;
        Self {
            values: DEFAULT_RMAT_PROBABILITIES,
            cumulative: [a, a + b, a + b + c],
        }
    }
}

impl TryFrom<&[f64]> for QuadrantProbabilities {
    type Error = InvalidArgument;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        match values {
            [a, b, c, d] => Self::new(*a, *b, *c, *d),
            _ => Err(InvalidArgument::ProbabilityCount {
                count: values.len(),
            }),
        }
    }
}
