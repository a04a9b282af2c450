use crate::device::Pin;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    Down,
    Stop,
    Up,
}

impl Direction {
    pub fn winding_pin(self) -> Pin {
        match self {
            Direction::Down => Pin::WindingDown,
            Direction::Stop => Pin::WindingStop,
            Direction::Up => Pin::WindingUp,
        }
    }

    pub fn as_string(self) -> String {
        match self {
            Direction::Down => String::from("down"),
            Direction::Stop => String::from("stopped"),
            Direction::Up => String::from("up"),
        }
    }
}
