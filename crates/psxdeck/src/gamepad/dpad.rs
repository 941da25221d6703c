use super::button::VirtualButton;
use strum::EnumIter;

/// Eight way direction of a touch on the d-pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    Up,
    UpRight,
}

impl Direction {
    /// Offset of the touch from the middle of the pad in screen coordinates, y grows downwards
    ///
    /// Each direction owns the 45 degree sector centred on it, the exact middle counts as right
    pub fn from_offset(x: f32, y: f32) -> Self {
        let angle = y.atan2(x).to_degrees();
        let sector = (angle / 45.0).round() as i32;

        match sector.rem_euclid(8) {
            0 => Direction::Right,
            1 => Direction::DownRight,
            2 => Direction::Down,
            3 => Direction::DownLeft,
            4 => Direction::Left,
            5 => Direction::UpLeft,
            6 => Direction::Up,
            _ => Direction::UpRight,
        }
    }

    /// Buttons held down for this direction, diagonals hold two
    pub const fn buttons(&self) -> &'static [VirtualButton] {
        match self {
            Direction::Right => &[VirtualButton::Right],
            Direction::DownRight => &[VirtualButton::Down, VirtualButton::Right],
            Direction::Down => &[VirtualButton::Down],
            Direction::DownLeft => &[VirtualButton::Down, VirtualButton::Left],
            Direction::Left => &[VirtualButton::Left],
            Direction::UpLeft => &[VirtualButton::Up, VirtualButton::Left],
            Direction::Up => &[VirtualButton::Up],
            Direction::UpRight => &[VirtualButton::Up, VirtualButton::Right],
        }
    }
}
