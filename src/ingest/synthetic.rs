use crate::core::element::{EdgeCandidate, GraphElement};
use crate::core::ids::{MAX_ENTITIES, NodeId, SeenEntities};
use crate::error::InvalidArgument;
use crate::ingest::probabilities::QuadrantProbabilities;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Validated input for one R-MAT run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationRequest {
    entity_count: u64,
    edge_count: u64,
    probabilities: QuadrantProbabilities,
}

impl GenerationRequest {
    /// `entity_count` must be a power of two no larger than [`MAX_ENTITIES`]
    /// so every level of the recursion splits the id range exactly in half.
    pub fn new(
        entity_count: u64,
        edge_count: u64,
        probabilities: QuadrantProbabilities,
    ) -> Result<Self, InvalidArgument> {
        if entity_count == 0 {
            return Err(InvalidArgument::ZeroEntities);
        }
        if edge_count == 0 {
            return Err(InvalidArgument::ZeroEdges);
        }
        if !entity_count.is_power_of_two() {
            return Err(InvalidArgument::EntitiesNotPowerOfTwo {
                entities: entity_count,
            });
        }
        if entity_count > MAX_ENTITIES {
            return Err(InvalidArgument::TooManyEntities {
                entities: entity_count,
                max: MAX_ENTITIES,
            });
        }

        Ok(Self {
            entity_count,
            edge_count,
            probabilities,
        })
    }

    pub fn entity_count(&self) -> u64 {
        self.entity_count
    }

    pub fn edge_count(&self) -> u64 {
        self.edge_count
    }

    pub fn probabilities(&self) -> &QuadrantProbabilities {
        &self.probabilities
    }

    /// Number of quadrant selections per edge.
    pub fn depth(&self) -> u32 {
        self.entity_count.trailing_zeros()
    }
}

/// Lazy R-MAT element stream. Yields exactly `edge_count` edges.
pub struct RmatGenerator<R> {
    rng: R,
    probabilities: QuadrantProbabilities,
    depth: u32,
    remaining: u64,
    declared: Option<SeenEntities>,
    pending: VecDeque<GraphElement>,
}

impl<R: Rng> RmatGenerator<R> {
    fn new(request: &GenerationRequest, rng: R) -> Self {
        Self {
            rng,
            probabilities: request.probabilities,
            depth: request.depth(),
            remaining: request.edge_count,
            declared: None,
            pending: VecDeque::with_capacity(3),
        }
    }

    /// Emits `GraphElement::Entity(id)` once per distinct id, right before the
    /// first edge that references it.
    pub fn declaring_entities(mut self) -> Self {
        self.declared = Some(SeenEntities::new());
        self
    }

    fn sample_edge(&mut self) -> EdgeCandidate {
        let mut src: NodeId = 0;
        let mut dst: NodeId = 0;
        for level in (0..self.depth).rev() {
            let half = 1 << level;
            let draw = self.rng.random::<f64>();
            let (src_high, dst_high) = self.probabilities.select(draw).upper_halves();
            if src_high {
                src += half;
            }
            if dst_high {
                dst += half;
            }
        }
        EdgeCandidate::new(src, dst)
    }
}

impl<R: Rng> Iterator for RmatGenerator<R> {
    type Item = GraphElement;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(element) = self.pending.pop_front() {
            return Some(element);
        }
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let edge = self.sample_edge();
        if let Some(seen) = self.declared.as_mut() {
            for id in [edge.src, edge.dst] {
                if seen.first_sighting(id) {
                    self.pending.push_back(GraphElement::Entity(id));
                }
            }
        }
        self.pending.push_back(GraphElement::Edge(edge));
        self.pending.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower = usize::try_from(self.remaining)
            .unwrap_or(usize::MAX)
            .saturating_add(self.pending.len());
        let upper = if self.declared.is_some() {
            lower.checked_mul(3)
        } else {
            Some(lower)
        };
        (lower, upper)
    }
}

pub fn generate<R: Rng>(request: &GenerationRequest, rng: R) -> RmatGenerator<R> {
    RmatGenerator::new(request, rng)
}

/// Seeds from `seed` when given, otherwise from OS entropy.
pub fn generate_seeded(request: &GenerationRequest, seed: Option<u64>) -> RmatGenerator<StdRng> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    generate(request, rng)
}
