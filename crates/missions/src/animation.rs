use hubcore::Matrix;

/// Frame interval for the busy animation (ms)
pub const RUNNING_INTERVAL_MS: u64 = 30;

/// Busy animation: a gap chasing round the edge of the matrix
pub const RUNNING: [Matrix; 8] = [
    Matrix::new([
        [0, 0, 100, 100, 100],
        [100, 0, 0, 0, 100],
        [100, 0, 0, 0, 100],
        [100, 0, 0, 0, 100],
        [100, 100, 100, 0, 0],
    ]),
    Matrix::new([
        [100, 0, 0, 100, 100],
        [100, 0, 0, 0, 100],
        [100, 0, 0, 0, 100],
        [100, 0, 0, 0, 100],
        [100, 100, 0, 0, 100],
    ]),
    Matrix::new([
        [100, 100, 0, 0, 100],
        [100, 0, 0, 0, 100],
        [100, 0, 0, 0, 100],
        [100, 0, 0, 0, 100],
        [100, 0, 0, 100, 100],
    ]),
    Matrix::new([
        [100, 100, 100, 0, 0],
        [100, 0, 0, 0, 100],
        [100, 0, 0, 0, 100],
        [100, 0, 0, 0, 100],
        [0, 0, 100, 100, 100],
    ]),
    Matrix::new([
        [100, 100, 100, 100, 0],
        [100, 0, 0, 0, 0],
        [100, 0, 0, 0, 100],
        [0, 0, 0, 0, 100],
        [0, 100, 100, 100, 100],
    ]),
    Matrix::new([
        [100, 100, 100, 100, 100],
        [100, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 100],
        [100, 100, 100, 100, 100],
    ]),
    Matrix::new([
        [100, 100, 100, 100, 100],
        [0, 0, 0, 0, 100],
        [0, 0, 0, 0, 0],
        [100, 0, 0, 0, 0],
        [100, 100, 100, 100, 100],
    ]),
    Matrix::new([
        [0, 100, 100, 100, 100],
        [0, 0, 0, 0, 100],
        [100, 0, 0, 0, 100],
        [100, 0, 0, 0, 0],
        [100, 100, 100, 100, 0],
    ]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_share_brightness() {
        // every frame lights the same number of pixels
        let lit = RUNNING[0].lit();
        assert!(RUNNING.iter().all(|frame| frame.lit() == lit));
    }
}
