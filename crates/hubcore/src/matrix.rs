/// Side length of the hub light matrix
pub const MATRIX_SIZE: usize = 5;

/// One frame for the 5x5 light matrix, brightness 0..=100 per pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matrix {
    pixels: [[u8; MATRIX_SIZE]; MATRIX_SIZE],
}

impl Matrix {
    /// Build a frame, clamping every pixel to 100
    pub const fn new(rows: [[u8; MATRIX_SIZE]; MATRIX_SIZE]) -> Self {
        let mut pixels = rows;
        let mut r = 0;
        while r < MATRIX_SIZE {
            let mut c = 0;
            while c < MATRIX_SIZE {
                if pixels[r][c] > 100 {
                    pixels[r][c] = 100;
                }
                c += 1;
            }
            r += 1;
        }
        Self { pixels }
    }

    pub fn pixel(&self, row: usize, col: usize) -> u8 {
        self.pixels[row][col]
    }

    /// Number of pixels that are not fully off
    pub fn lit(&self) -> usize {
        self.pixels.iter().flatten().filter(|&&p| p > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_clamped() {
        let frame = Matrix::new([[255; 5]; 5]);
        assert_eq!(frame.pixel(2, 2), 100);
        assert_eq!(frame.lit(), 25);
    }
}
