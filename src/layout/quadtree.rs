use eframe::egui::{Vec2, vec2};

const QUADTREE_LEAF_CAPACITY: usize = 8;
const QUADTREE_MAX_DEPTH: usize = 12;

/// Axis-aligned square cell, `origin` being its top-left corner.
#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
    origin: Vec2,
    size: f32,
}

impl QuadBounds {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), point| (min.min(*point), max.max(*point)));
        if !(min.is_finite() && max.is_finite()) {
            return None;
        }

        let size = (max - min).max_elem().max(1.0) + 2.0;
        Some(Self {
            origin: min - vec2(1.0, 1.0),
            size,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let offset = point - self.origin;
        (0.0..=self.size).contains(&offset.x) && (0.0..=self.size).contains(&offset.y)
    }

    fn quadrant_for(self, point: Vec2) -> usize {
        let half = self.size * 0.5;
        let offset = point - self.origin;
        usize::from(offset.x >= half) | (usize::from(offset.y >= half) << 1)
    }

    fn child(self, quadrant: usize) -> Self {
        let half = self.size * 0.5;
        let step = vec2((quadrant & 1) as f32, (quadrant >> 1) as f32) * half;
        Self {
            origin: self.origin + step,
            size: half,
        }
    }

    fn middle(self) -> Vec2 {
        self.origin + Vec2::splat(self.size * 0.5)
    }

    pub(super) fn side_length(self) -> f32 {
        self.size
    }
}

/// Barnes–Hut cell. `strength` is the summed charge of every node below it,
/// `center` the charge-magnitude-weighted centre.
pub(super) struct QuadNode {
    pub(super) bounds: QuadBounds,
    pub(super) center: Vec2,
    pub(super) strength: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2], strengths: &[f32]) -> Option<Self> {
        let bounds = QuadBounds::enclosing(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(bounds, indices, positions, strengths, 0))
    }

    fn build_node(
        bounds: QuadBounds,
        indices: Vec<usize>,
        positions: &[Vec2],
        strengths: &[f32],
        depth: usize,
    ) -> Self {
        let mut weighted = Vec2::ZERO;
        let mut weight = 0.0;
        let mut strength = 0.0;
        for &index in &indices {
            let charge = strengths[index];
            weighted += positions[index] * charge.abs();
            weight += charge.abs();
            strength += charge;
        }

        let center = if weight > 0.0 {
            weighted / weight
        } else {
            bounds.middle()
        };

        let mut node = Self {
            bounds,
            center,
            strength,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            let quadrant = bounds.quadrant_for(positions[index]);
            buckets[quadrant].push(index);
        }

        let non_empty = buckets.iter().filter(|bucket| !bucket.is_empty()).count();
        if non_empty <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }

            let child_bounds = bounds.child(quadrant);
            node.children[quadrant] = Some(Box::new(Self::build_node(
                child_bounds,
                bucket,
                positions,
                strengths,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_aggregates_every_charge() {
        let positions = (0..40)
            .map(|index| vec2((index % 7) as f32 * 13.0, (index / 7) as f32 * 11.0))
            .collect::<Vec<_>>();
        let strengths = (0..40)
            .map(|index| if index % 2 == 0 { -50.0 } else { -600.0 })
            .collect::<Vec<_>>();

        let root = QuadNode::build(&positions, &strengths).unwrap();
        assert!(!root.is_leaf());
        assert!((root.strength - strengths.iter().sum::<f32>()).abs() < 1e-2);
        for position in &positions {
            assert!(root.bounds.contains(*position));
        }
    }

    #[test]
    fn empty_input_builds_nothing() {
        assert!(QuadNode::build(&[], &[]).is_none());
    }
}
