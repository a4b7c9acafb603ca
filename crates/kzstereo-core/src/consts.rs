/// Upper bound on the per-pixel data penalty, before scaling by the denominator.
pub const DATA_COST_CUTOFF: i64 = 30;

/// Ratio between the occlusion cost and the automatically derived lambda.
pub const OCCLUSION_TO_LAMBDA: i64 = 5;

/// Default multiplier of lambda for `lambda1` (smoothness not across an edge).
pub const LAMBDA1_FACTOR: i64 = 3;

/// Default multiplier of lambda for `lambda2` (smoothness across an edge).
pub const LAMBDA2_FACTOR: i64 = 1;

/// Minimum scaled lambda before rounding to an integer when deriving it.
/// The denominator keeps doubling until `K/5 * denom` reaches this value.
pub const MIN_SCALED_LAMBDA: f32 = 3.0;

/// Smallest rank used when estimating the occlusion cost from data penalties.
pub const MIN_OCCLUSION_RANK: usize = 3;

/// Default intensity difference above which two neighbours lie across an edge.
pub const DEFAULT_EDGE_THRESHOLD: i32 = 8;

/// Default cap on the number of optimization iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 4;

/// Color of occluded pixels in the scaled disparity output (cyan).
pub const OCCLUDED_RGB: [u8; 3] = [0, 255, 255];
