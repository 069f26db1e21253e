//! Board geometry and zone classification for the casting board.

use contracts::{BoardConfig, House, Zone};

pub const SECTOR_COUNT: usize = 12;
pub const SECTOR_DEGREES: f64 = 360.0 / SECTOR_COUNT as f64;

/// Direction in which sector indices grow, as seen on screen (y pointing down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Geometry of one circular board. Each circular UI gets its own instance;
/// the angle convention is part of the geometry, not shared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    pub width: f64,
    pub height: f64,
    /// Void radius as a fraction of the board width.
    pub void_ratio: f64,
    /// Outer radius as a fraction of the board width; beyond it is the ether.
    pub ether_ratio: f64,
    /// Screen angle (degrees, 0 = 3 o'clock) where sector 0 starts.
    pub origin_degrees: f64,
    pub rotation: Rotation,
}

impl BoardGeometry {
    /// Charm board: sector 0 (House I) starts at 3 o'clock and houses advance
    /// clockwise on screen.
    pub fn charm_board(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            void_ratio: 0.10,
            ether_ratio: 0.48,
            origin_degrees: 0.0,
            rotation: Rotation::Clockwise,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn void_radius(&self) -> f64 {
        self.width * self.void_ratio
    }

    pub fn outer_radius(&self) -> f64 {
        self.width * self.ether_ratio
    }

    /// Angle of a point around the center in `[0, 360)`, measured from the
    /// origin in this board's rotation direction.
    pub fn angle_of(&self, x: f64, y: f64) -> f64 {
        let (cx, cy) = self.center();
        let dx = x - cx;
        let dy = match self.rotation {
            Rotation::Clockwise => y - cy,
            Rotation::CounterClockwise => cy - y,
        };
        normalize_degrees(dy.atan2(dx).to_degrees() - self.origin_degrees)
    }

    pub fn classify(&self, x: f64, y: f64) -> Zone {
        let (cx, cy) = self.center();
        let distance = (x - cx).hypot(y - cy);

        if !distance.is_finite() {
            return Zone::Ether;
        }
        if distance < self.void_radius() {
            return Zone::Void;
        }
        if distance > self.outer_radius() {
            return Zone::Ether;
        }

        Zone::House {
            house: House::from_sector(sector_for_angle(self.angle_of(x, y))),
        }
    }
}

impl From<BoardConfig> for BoardGeometry {
    fn from(config: BoardConfig) -> Self {
        Self::charm_board(config.width, config.height)
    }
}

/// Sector index for an angle already normalised to `[0, 360)`.
/// Sectors are half-open: `[30k, 30k + 30)`.
pub fn sector_for_angle(angle_degrees: f64) -> usize {
    let index = (normalize_degrees(angle_degrees) / SECTOR_DEGREES).floor() as usize;
    index.min(SECTOR_COUNT - 1)
}

fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

pub fn classify_zone(x: f64, y: f64, board_width: f64, board_height: f64) -> Zone {
    BoardGeometry::charm_board(board_width, board_height).classify(x, y)
}
