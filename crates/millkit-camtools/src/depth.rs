//! Depth stepping shared by pocket and profile generators.

/// Quotients within this distance above an integer do not add a pass.
const PASS_TOLERANCE: f64 = 1e-9;

/// Upper bound on the number of depth layers for one operation.
///
/// Operation validation rejects steps that would need more; the iterator
/// widens the step to stay within it.
pub const MAX_DEPTH_PASSES: u32 = 10_000;

/// Number of layers needed to cut `total_depth` in steps of `step_depth`,
/// before any cap is applied. Non-positive steps count as one pass.
pub fn required_passes(total_depth: f64, step_depth: f64) -> f64 {
    if !(step_depth > 0.0 && step_depth.is_finite()) {
        return 1.0;
    }
    ((total_depth / step_depth) - PASS_TOLERANCE).ceil().max(1.0)
}

/// One depth layer: the tool enters at `current_z` and cuts down to `next_z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthPass {
    /// 1-based pass number.
    pub number: u32,
    pub current_z: f64,
    pub next_z: f64,
    pub is_last: bool,
}

/// Iterator over the depth layers from `contour_height` down to
/// `contour_height - total_depth`.
///
/// The final layer always lands exactly on the final depth. A non-positive
/// step cuts the whole depth in one pass; a non-positive total depth yields
/// no passes. Never more than [`MAX_DEPTH_PASSES`] layers are produced.
#[derive(Debug, Clone)]
pub struct DepthLayers {
    top: f64,
    step: f64,
    final_z: f64,
    count: u32,
    index: u32,
}

impl DepthLayers {
    pub fn new(contour_height: f64, total_depth: f64, step_depth: f64) -> Self {
        let final_z = contour_height - total_depth;
        if !(total_depth > 0.0 && total_depth.is_finite()) {
            return Self {
                top: contour_height,
                step: 0.0,
                final_z,
                count: 0,
                index: 0,
            };
        }
        let required = required_passes(total_depth, step_depth);
        let (step, count) = if required > MAX_DEPTH_PASSES as f64 {
            (total_depth / MAX_DEPTH_PASSES as f64, MAX_DEPTH_PASSES)
        } else if required > 1.0 {
            (step_depth, required as u32)
        } else {
            (total_depth, 1)
        };
        Self {
            top: contour_height,
            step,
            final_z,
            count,
            index: 0,
        }
    }

    pub fn pass_count(&self) -> u32 {
        self.count
    }

    pub fn final_z(&self) -> f64 {
        self.final_z
    }

    fn z_after(&self, passes: u32) -> f64 {
        if passes >= self.count {
            self.final_z
        } else {
            (self.top - self.step * passes as f64).max(self.final_z)
        }
    }
}

impl Iterator for DepthLayers {
    type Item = DepthPass;

    fn next(&mut self) -> Option<DepthPass> {
        if self.index >= self.count {
            return None;
        }
        let pass = DepthPass {
            number: self.index + 1,
            current_z: self.z_after(self.index),
            next_z: self.z_after(self.index + 1),
            is_last: self.index + 1 == self.count,
        };
        self.index += 1;
        Some(pass)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DepthLayers {}
