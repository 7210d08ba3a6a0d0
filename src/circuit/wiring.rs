use crate::common::{Point, Signal};
use crate::graph::{GateId, InputPinId, ItemId, OutputPinId, SensorId};

use super::Circuit;

/// What a pointer gesture is currently holding.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    // pending wire from an output pin; no end until the pointer moves
    Line {
        source: OutputPinId,
        line_end: Option<Point>,
    },
    Gate {
        gate: GateId,
    },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Hit {
    OutputPin(OutputPinId),
    Gate(GateId),
    Sensor(SensorId),
}

impl Circuit {
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Topmost thing under `point`. Items added later sit on top, and an
    /// output pin wins over the body it belongs to.
    pub fn hit_test(&self, point: Point) -> Option<Hit> {
        self.items.iter().rev().find_map(|item| match item {
            ItemId::Gate(id) => {
                let gate = self.gates.get(id)?;

                if let Some(pin) = gate.hit_draggable(&self.pins, point) {
                    Some(Hit::OutputPin(pin))
                } else {
                    gate.hit_test(point).then_some(Hit::Gate(*id))
                }
            }
            ItemId::Sensor(id) => {
                let sensor = self.sensors.get(id)?;

                if let Some(pin) = sensor.hit_draggable(&self.pins, point) {
                    Some(Hit::OutputPin(pin))
                } else {
                    sensor.hit_test(point).then_some(Hit::Sensor(*id))
                }
            }
            ItemId::Actuator(_) => None,
        })
    }

    /// Starts a gesture at `point`: output pins start a wire, gate bodies start
    /// a move. Anything else leaves the circuit idle.
    pub fn grab(&mut self, point: Point) -> Option<Hit> {
        let hit = self.hit_test(point);

        self.drag = match hit {
            Some(Hit::OutputPin(source)) => DragState::Line {
                source,
                line_end: None,
            },
            Some(Hit::Gate(gate)) => DragState::Gate { gate },
            _ => DragState::Idle,
        };

        hit
    }

    pub fn drag_to(&mut self, point: Point) {
        match self.drag {
            DragState::Idle => (),
            DragState::Line { source, .. } => {
                self.drag = DragState::Line {
                    source,
                    line_end: Some(point),
                }
            }
            DragState::Gate { gate } => self.move_gate(gate, point),
        }
    }

    /// Ends the gesture. A wire whose end was moved is offered to every input
    /// pin; returns the input that caught it.
    pub fn release(&mut self) -> Option<InputPinId> {
        match std::mem::take(&mut self.drag) {
            DragState::Line {
                source,
                line_end: Some(line_end),
            } => self.try_to_connect(source, line_end),
            _ => None,
        }
    }

    /// Offers `line_end` to the items from most recently added to oldest. The
    /// first input pin whose hit zone contains it catches the wire.
    pub fn try_to_connect(&mut self, source: OutputPinId, line_end: Point) -> Option<InputPinId> {
        let caught = self.items.iter().rev().find_map(|item| match item {
            ItemId::Gate(id) => self
                .gates
                .get(id)?
                .connect(&mut self.pins, source, line_end),
            ItemId::Actuator(id) => self
                .actuators
                .get(id)?
                .connect(&mut self.pins, source, line_end),
            ItemId::Sensor(_) => None,
        });

        match caught {
            Some(input) => {
                tracing::info!("wire {:?} caught by {:?}", source, input);
                self.warn_feedback_loop();
            }
            None => tracing::info!("wire {:?} dropped at {:?}", source, line_end),
        }

        caught
    }

    /// Start and end of the wire being dragged, if any, for drawing.
    pub fn pending_line(&self) -> Option<(Point, Point, Signal)> {
        let DragState::Line {
            source,
            line_end: Some(line_end),
        } = self.drag
        else {
            return None;
        };

        let pin = self.pins.output(source)?;
        Some((pin.absolute_location(), line_end, pin.state()))
    }

    /// A click on a gate body recomputes that gate immediately.
    pub fn click(&mut self, point: Point) -> Option<Hit> {
        let hit = self.hit_test(point);

        if let Some(Hit::Gate(id)) = hit {
            if let Some(gate) = self.gates.get_mut(&id) {
                gate.compute_output(&mut self.pins);
            }
        }

        hit
    }

    pub(super) fn cancel_drag_from_removed(&mut self) {
        let stale = match self.drag {
            DragState::Idle => false,
            DragState::Line { source, .. } => self.pins.output(source).is_none(),
            DragState::Gate { gate } => !self.gates.contains_key(&gate),
        };

        if stale {
            self.drag = DragState::Idle;
        }
    }
}
