use crate::common::{Point, Signal};

use super::ItemId;

/// Diameter of a drawn pin; also the radius of its hit zone.
pub const PIN_SIZE: f64 = 10.;

/// Length of the stub wire between a gate body and its pin.
pub const DEFAULT_LINE_LENGTH: f64 = 20.;

/// How far a pin sits beyond the edge of its owner's body.
pub const PIN_STANDOFF: f64 = DEFAULT_LINE_LENGTH + PIN_SIZE / 2.;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Deref)]
pub struct InputPinId(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Deref)]
pub struct OutputPinId(pub usize);

// anchor가 None이면 offset 자체가 절대 위치
#[derive(Debug, Clone)]
pub struct InputPin {
    pub id: InputPinId,
    pub owner: ItemId,
    pub(super) anchor: Option<Point>,
    pub(super) offset: Point,
    pub(super) state: Signal,
    // the output pin currently driving this one
    pub(super) line: Option<OutputPinId>,
}

impl InputPin {
    pub fn state(&self) -> Signal {
        self.state
    }

    pub fn line(&self) -> Option<OutputPinId> {
        self.line
    }

    pub fn absolute_location(&self) -> Point {
        match self.anchor {
            Some(anchor) => anchor + self.offset - Point(PIN_STANDOFF, 0.),
            None => self.offset,
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.absolute_location().distance_squared(&point) < PIN_SIZE * PIN_SIZE
    }
}

#[derive(Debug, Clone)]
pub struct OutputPin {
    pub id: OutputPinId,
    pub owner: ItemId,
    pub(super) anchor: Option<Point>,
    pub(super) offset: Point,
    pub(super) state: Signal,
    // fan-out, insertion ordered and duplicate free
    pub(super) connected: Vec<InputPinId>,
}

impl OutputPin {
    pub fn state(&self) -> Signal {
        self.state
    }

    pub fn connected(&self) -> &[InputPinId] {
        &self.connected
    }

    pub fn absolute_location(&self) -> Point {
        match self.anchor {
            Some(anchor) => anchor + self.offset + Point(PIN_STANDOFF, 0.),
            None => self.offset,
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.absolute_location().distance_squared(&point) < PIN_SIZE * PIN_SIZE
    }
}
