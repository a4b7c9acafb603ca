use crate::consts::{DATA_COST_CUTOFF, MIN_OCCLUSION_RANK};
use crate::error::{KzError, Result};
use crate::io::image_io::StereoPair;
use crate::params::DataCost;

/// Column of the right image matched by `col` at disparity `d`, if inside.
pub(super) fn matched_column(width: usize, col: usize, d: i32) -> Option<usize> {
    let x = col as i64 + d as i64;
    (0..width as i64).contains(&x).then_some(x as usize)
}

/// Part of `[min, max]` whose disparities can land inside an image of
/// `width` columns, `None` when no disparity can.
pub(super) fn reachable_range(width: usize, min: i32, max: i32) -> Option<(i32, i32)> {
    let limit = (width as i64 - 1).min(i32::MAX as i64);
    let lo = (min as i64).max(-limit);
    let hi = (max as i64).min(limit);
    (lo <= hi).then_some((lo as i32, hi as i32))
}

/// Unscaled penalty for matching left `(row, col)` with right `(row, col_right)`.
pub(super) fn data_penalty(
    pair: &StereoPair,
    data_cost: DataCost,
    row: usize,
    col: usize,
    col_right: usize,
) -> i64 {
    let channels = pair.left.channels();
    let mut total: i64 = 0;
    for c in 0..channels {
        let diff = pair.left.data[[row, col, c]] as i64 - pair.right.data[[row, col_right, c]] as i64;
        total += match data_cost {
            DataCost::L1 => diff.abs(),
            DataCost::L2 => diff * diff,
        };
    }
    total.min(DATA_COST_CUTOFF)
}

/// Average over left pixels of the k-th smallest data penalty, with
/// `k = max((labels + 2) / 4, 3)`.
pub(super) fn estimate_occlusion_cost(
    pair: &StereoPair,
    data_cost: DataCost,
    min: i32,
    max: i32,
) -> Result<f32> {
    if max < min {
        return Err(KzError::Solver(format!(
            "empty disparity range [{min}, {max}]"
        )));
    }
    // The rank follows the requested range, even where it exceeds the image.
    let labels = max as i64 - min as i64 + 1;
    let rank = usize::try_from((labels + 2) / 4)
        .unwrap_or(usize::MAX)
        .max(MIN_OCCLUSION_RANK);

    let (height, width) = (pair.left.height(), pair.left.width());
    let Some((min, max)) = reachable_range(width, min, max) else {
        return Err(KzError::Solver(
            "no pixel has a disparity inside the image".into(),
        ));
    };
    let mut costs = Vec::with_capacity((max as i64 - min as i64 + 1) as usize);
    let mut sum: i64 = 0;
    let mut count: i64 = 0;

    for row in 0..height {
        for col in 0..width {
            costs.clear();
            for d in min..=max {
                if let Some(col_right) = matched_column(width, col, d) {
                    costs.push(data_penalty(pair, data_cost, row, col, col_right));
                }
            }
            if costs.is_empty() {
                continue;
            }
            let idx = rank.min(costs.len()) - 1;
            let (_, kth, _) = costs.select_nth_unstable(idx);
            sum += *kth;
            count += 1;
        }
    }

    if count == 0 {
        return Err(KzError::Solver(
            "no pixel has a disparity inside the image".into(),
        ));
    }
    Ok(sum as f32 / count as f32)
}
