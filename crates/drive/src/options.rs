use hubcore::Stop;

/// Optional parameters shared by drive and implement moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOptions {
    /// Override speed for this move only (mm/s or deg/s)
    pub speed: Option<f64>,
    pub then: Stop,
    /// Block until the move completes
    pub wait: bool,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            speed: None,
            then: Stop::Hold,
            wait: true,
        }
    }
}

impl MoveOptions {
    /// Blocking move at `speed`
    pub fn at(speed: f64) -> Self {
        Self {
            speed: Some(speed),
            ..Default::default()
        }
    }

    pub fn then(mut self, then: Stop) -> Self {
        self.then = then;
        self
    }

    /// Return as soon as the move is started
    pub fn no_wait(mut self) -> Self {
        self.wait = false;
        self
    }
}

/// Optional parameters for an in-place turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnOptions {
    /// Override turn rate (deg/s)
    pub speed: Option<f64>,
    pub then: Stop,
    pub wait: bool,
    /// Hold heading with the gyro during the turn
    pub gyro: bool,
    /// Follow the turn with bounded corrective turns
    pub auto_align: bool,
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            speed: None,
            then: Stop::Hold,
            wait: true,
            gyro: true,
            auto_align: false,
        }
    }
}

impl TurnOptions {
    pub fn at(rate: f64) -> Self {
        Self {
            speed: Some(rate),
            ..Default::default()
        }
    }

    pub fn then(mut self, then: Stop) -> Self {
        self.then = then;
        self
    }

    pub fn no_wait(mut self) -> Self {
        self.wait = false;
        self
    }

    pub fn without_gyro(mut self) -> Self {
        self.gyro = false;
        self
    }

    pub fn aligned(mut self) -> Self {
        self.auto_align = true;
        self
    }
}
