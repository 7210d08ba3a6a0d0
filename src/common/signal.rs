use std::ops::Not;

use strum_macros::{Display, EnumIter};

/// Tri-state value carried by every pin.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Signal {
    Zero,
    One,
    // not yet driven
    #[default]
    Unknown,
}

impl Signal {
    pub fn is_one(&self) -> bool {
        matches!(self, Signal::One)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Signal::Zero)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Signal::Zero => Some(false),
            Signal::One => Some(true),
            Signal::Unknown => None,
        }
    }

    pub fn color(&self) -> WireColor {
        match self {
            Signal::Zero => WireColor::Black,
            Signal::One => WireColor::Red,
            Signal::Unknown => WireColor::Gray,
        }
    }
}

impl From<bool> for Signal {
    fn from(value: bool) -> Self {
        if value {
            Signal::One
        } else {
            Signal::Zero
        }
    }
}

impl Not for Signal {
    type Output = Signal;

    fn not(self) -> Self::Output {
        match self {
            Signal::Zero => Signal::One,
            Signal::One => Signal::Zero,
            Signal::Unknown => Signal::Unknown,
        }
    }
}

/// Colour a renderer should use for a wire or pin carrying a signal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum WireColor {
    Black,
    Red,
    Gray,
}
