//! Skid-steer wheel mapping for a four-wheeled rover.
//!
//! Each maneuver resolves to one [`Direction`] per wheel. The left pair and the
//! right pair are driven as units: same direction for straight travel,
//! opposite directions for a pivot in place.
//!
//! # Example
//! ```rust
//! use rover_core::utils::controllers::motors::Direction;
//! use rover_core::utils::math::kinematics::Maneuver;
//! let w = Maneuver::PivotLeft.wheel_directions();
//! assert_eq!(w.front_left, Direction::Backward);
//! assert_eq!(w.front_right, Direction::Forward);
//! ```

use crate::utils::controllers::motors::Direction;

/// Wheel positions on the chassis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wheel {
    FrontLeft,
    RearLeft,
    RearRight,
    FrontRight,
}

impl Wheel {
    pub const ALL: [Wheel; 4] = [
        Wheel::FrontLeft,
        Wheel::RearLeft,
        Wheel::RearRight,
        Wheel::FrontRight,
    ];

    /// Wheel in the same position on the other side of the chassis.
    pub const fn opposite_side(self) -> Wheel {
        match self {
            Wheel::FrontLeft => Wheel::FrontRight,
            Wheel::RearLeft => Wheel::RearRight,
            Wheel::RearRight => Wheel::RearLeft,
            Wheel::FrontRight => Wheel::FrontLeft,
        }
    }

    pub const fn is_left(self) -> bool {
        matches!(self, Wheel::FrontLeft | Wheel::RearLeft)
    }
}

/// Direction for every wheel of the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelDirections {
    pub front_left: Direction,
    pub rear_left: Direction,
    pub rear_right: Direction,
    pub front_right: Direction,
}

impl WheelDirections {
    /// Left pair one way, right pair the other.
    pub const fn sides(
        left: Direction,
        right: Direction,
    ) -> Self {
        Self {
            front_left: left,
            rear_left: left,
            rear_right: right,
            front_right: right,
        }
    }

    pub const fn uniform(direction: Direction) -> Self {
        Self::sides(direction, direction)
    }

    pub const fn get(
        &self,
        wheel: Wheel,
    ) -> Direction {
        match wheel {
            Wheel::FrontLeft => self.front_left,
            Wheel::RearLeft => self.rear_left,
            Wheel::RearRight => self.rear_right,
            Wheel::FrontRight => self.front_right,
        }
    }

    /// `(wheel, direction)` pairs in [`Wheel::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Wheel, Direction)> + '_ {
        Wheel::ALL.into_iter().map(move |w| (w, self.get(w)))
    }
}

/// Timed drive maneuvers available to the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    Forward,
    Backward,
    /// Counter-clockwise pivot: left wheels back, right wheels forward.
    PivotLeft,
    /// Clockwise pivot: left wheels forward, right wheels back.
    PivotRight,
}

impl Maneuver {
    pub const fn wheel_directions(self) -> WheelDirections {
        match self {
            Maneuver::Forward => WheelDirections::uniform(Direction::Forward),
            Maneuver::Backward => WheelDirections::uniform(Direction::Backward),
            Maneuver::PivotLeft => WheelDirections::sides(Direction::Backward, Direction::Forward),
            Maneuver::PivotRight => WheelDirections::sides(Direction::Forward, Direction::Backward),
        }
    }
}
