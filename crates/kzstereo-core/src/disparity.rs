use ndarray::Array2;

/// Disparity assigned to each pixel of the left image.
/// `None` marks an occluded pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisparityMap {
    /// Row-major labels, shape = (height, width)
    pub data: Array2<Option<i32>>,
    /// Smallest disparity that may appear in the map
    pub min: i32,
    /// Largest disparity that may appear in the map
    pub max: i32,
}

impl DisparityMap {
    /// A map with every pixel occluded.
    pub fn occluded(height: usize, width: usize, min: i32, max: i32) -> Self {
        Self {
            data: Array2::from_elem((height, width), None),
            min,
            max,
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn occluded_count(&self) -> usize {
        self.data.iter().filter(|d| d.is_none()).count()
    }
}
