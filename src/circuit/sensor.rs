use strum_macros::{Display, EnumIter, EnumString};

use crate::common::{BoundingBox, Point, Signal, Size};
use crate::graph::{ItemId, OutputPinId, PinGraph, SensorId};

/// Vertical distance from the sensor camera to the top of its panel
pub const PANEL_OFFSET_Y: f64 = 87.;

/// Size of a single property row on the panel
pub const PROPERTY_SIZE: Size = Size(100., 40.);

/// Gap between the panel's right edge and the property pins
pub const OUTPUT_PIN_OFFSET: f64 = 1.;

/// Product properties a sensor can be told to look for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Property {
    Red,
    Green,
    Blue,
    White,
    Square,
    Circle,
    Diamond,
    Izzo,
    Smith,
    Football,
    Basketball,
}

impl Property {
    pub fn is_color(&self) -> bool {
        matches!(
            self,
            Property::Red | Property::Green | Property::Blue | Property::White
        )
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, Property::Square | Property::Circle | Property::Diamond)
    }
}

/// A sensor panel: one output pin per watched property, stacked top to bottom.
#[derive(Debug, Clone)]
pub struct Sensor {
    pub id: SensorId,
    position: Point,
    properties: Vec<Property>,
    outputs: Vec<OutputPinId>,
}

impl Sensor {
    pub fn new(
        id: SensorId,
        position: Point,
        properties: Vec<Property>,
        pins: &mut PinGraph,
    ) -> Self {
        let owner = ItemId::Sensor(id);

        let outputs = (0..properties.len())
            .map(|row| pins.new_output(owner, Some(position), Self::pin_offset(row), Signal::Unknown))
            .collect();

        Self {
            id,
            position,
            properties,
            outputs,
        }
    }

    fn pin_offset(row: usize) -> Point {
        Point(
            PROPERTY_SIZE.width() + OUTPUT_PIN_OFFSET,
            PANEL_OFFSET_Y + PROPERTY_SIZE.height() * (row as f64 + 0.5),
        )
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn outputs(&self) -> &[OutputPinId] {
        &self.outputs
    }

    pub fn output(&self, index: usize) -> Option<OutputPinId> {
        self.outputs.get(index).copied()
    }

    pub fn property_pin(&self, property: Property) -> Option<OutputPinId> {
        self.properties
            .iter()
            .position(|p| *p == property)
            .map(|row| self.outputs[row])
    }

    pub fn panel_bounds(&self) -> BoundingBox {
        let height = PROPERTY_SIZE.height() * self.properties.len() as f64;

        BoundingBox::new(
            self.position + Point(PROPERTY_SIZE.width() / 2., PANEL_OFFSET_Y + height / 2.),
            Size(PROPERTY_SIZE.width(), height),
        )
    }

    /// Drives every property pin: One when the property was detected, Zero
    /// otherwise. Wires pick the new states up on the next propagation.
    pub fn sense(&self, pins: &mut PinGraph, detected: &[Property]) {
        for (property, id) in self.properties.iter().zip(&self.outputs) {
            pins.set_output_state(*id, Signal::from(detected.contains(property)));
        }
    }

    pub fn propagate(&self, pins: &mut PinGraph) {
        for id in &self.outputs {
            pins.propagate(*id);
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        !self.properties.is_empty() && self.panel_bounds().contains(point)
    }

    pub fn hit_draggable(&self, pins: &PinGraph, point: Point) -> Option<OutputPinId> {
        self.outputs
            .iter()
            .copied()
            .find(|id| pins.output(*id).map_or(false, |pin| pin.hit_test(point)))
    }

    pub fn detach(&self, pins: &mut PinGraph) {
        for id in &self.outputs {
            pins.remove_output(*id);
        }
    }
}
