use crate::common::{Point, Signal};
use crate::graph::{ActuatorId, InputPinId, ItemId, OutputPinId, PinGraph};

/// The kicker at the end of the line. It owns a single input pin placed at an
/// absolute location and fires whenever that pin rises to One.
#[derive(Debug, Clone)]
pub struct Actuator {
    pub id: ActuatorId,
    position: Point,
    input: InputPinId,
    last_state: Signal,
    kicks: usize,
}

impl Actuator {
    pub fn new(id: ActuatorId, position: Point, pin_location: Point, pins: &mut PinGraph) -> Self {
        let input = pins.new_input(ItemId::Actuator(id), None, pin_location);

        Self {
            id,
            position,
            input,
            last_state: Signal::Unknown,
            kicks: 0,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn input(&self) -> InputPinId {
        self.input
    }

    pub fn state(&self, pins: &PinGraph) -> Signal {
        pins.input_state(self.input)
    }

    pub fn kicks(&self) -> usize {
        self.kicks
    }

    /// Samples the pin. Returns true on a rising edge.
    pub fn observe(&mut self, pins: &PinGraph) -> bool {
        let state = self.state(pins);
        let triggered = state.is_one() && !self.last_state.is_one();

        self.last_state = state;

        if triggered {
            self.kicks += 1;
            tracing::debug!("kick trigger on {:?}", self.id);
        }

        triggered
    }

    pub fn connect(
        &self,
        pins: &mut PinGraph,
        candidate: OutputPinId,
        line_end: Point,
    ) -> Option<InputPinId> {
        pins.catch(self.input, candidate, line_end).then_some(self.input)
    }

    pub fn detach(&self, pins: &mut PinGraph) {
        pins.remove_input(self.input);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::GateId;

    #[test]
    fn unittest_actuator_rising_edge() {
        let mut pins = PinGraph::new();
        let mut actuator = Actuator::new(ActuatorId(0), Point(900., 300.), Point(850., 500.), &mut pins);

        assert!(!actuator.observe(&pins));

        pins.set_input_state(actuator.input(), Signal::One);
        assert!(actuator.observe(&pins));
        assert!(!actuator.observe(&pins));

        pins.set_input_state(actuator.input(), Signal::Zero);
        assert!(!actuator.observe(&pins));

        pins.set_input_state(actuator.input(), Signal::One);
        assert!(actuator.observe(&pins));
        assert_eq!(actuator.kicks(), 2);

        // Unknown -> One counts as well
        pins.set_input_state(actuator.input(), Signal::Unknown);
        actuator.observe(&pins);
        pins.set_input_state(actuator.input(), Signal::One);
        assert!(actuator.observe(&pins));
    }

    #[test]
    fn unittest_actuator_connect_without_standoff() {
        let mut pins = PinGraph::new();
        let actuator = Actuator::new(ActuatorId(0), Point(900., 300.), Point(850., 500.), &mut pins);
        let source = pins.new_output(ItemId::Gate(GateId(1)), None, Point(0., 0.), Signal::One);

        assert_eq!(actuator.connect(&mut pins, source, Point(840., 500.)), None);
        assert_eq!(
            actuator.connect(&mut pins, source, Point(848., 497.)),
            Some(actuator.input())
        );
        assert_eq!(pins.input(actuator.input()).unwrap().line(), Some(source));
    }
}
