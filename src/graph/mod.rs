use std::collections::BTreeMap;

use crate::common::{Point, Signal};
use crate::utils::Verify;

pub mod pin;

pub use pin::{InputPin, InputPinId, OutputPin, OutputPinId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Deref)]
pub struct GateId(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Deref)]
pub struct SensorId(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Deref)]
pub struct ActuatorId(pub usize);

/// Anything placed in a circuit that can own pins.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemId {
    Gate(GateId),
    Sensor(SensorId),
    Actuator(ActuatorId),
}

impl ItemId {
    pub fn as_gate(&self) -> Option<GateId> {
        match self {
            ItemId::Gate(id) => Some(*id),
            _ => None,
        }
    }
}

/// Arena of every pin in a circuit. Gates, sensors and actuators keep pin ids,
/// connections are ids in both directions: fan-out on the output side, `line`
/// on the input side.
#[derive(Debug, Default, Clone)]
pub struct PinGraph {
    inputs: BTreeMap<InputPinId, InputPin>,
    outputs: BTreeMap<OutputPinId, OutputPin>,
    next_id: usize,
}

impl PinGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn new_input(&mut self, owner: ItemId, anchor: Option<Point>, offset: Point) -> InputPinId {
        let id = InputPinId(self.next_id());

        self.inputs.insert(
            id,
            InputPin {
                id,
                owner,
                anchor,
                offset,
                state: Signal::Unknown,
                line: None,
            },
        );

        id
    }

    pub fn new_output(
        &mut self,
        owner: ItemId,
        anchor: Option<Point>,
        offset: Point,
        state: Signal,
    ) -> OutputPinId {
        let id = OutputPinId(self.next_id());

        self.outputs.insert(
            id,
            OutputPin {
                id,
                owner,
                anchor,
                offset,
                state,
                connected: Vec::new(),
            },
        );

        id
    }

    pub fn input(&self, id: InputPinId) -> Option<&InputPin> {
        self.inputs.get(&id)
    }

    pub fn output(&self, id: OutputPinId) -> Option<&OutputPin> {
        self.outputs.get(&id)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &InputPin> {
        self.inputs.values()
    }

    pub fn outputs(&self) -> impl Iterator<Item = &OutputPin> {
        self.outputs.values()
    }

    // missing pins read as undriven
    pub fn input_state(&self, id: InputPinId) -> Signal {
        self.inputs.get(&id).map_or(Signal::Unknown, |pin| pin.state)
    }

    pub fn output_state(&self, id: OutputPinId) -> Signal {
        self.outputs.get(&id).map_or(Signal::Unknown, |pin| pin.state)
    }

    pub fn set_input_state(&mut self, id: InputPinId, state: Signal) {
        if let Some(pin) = self.inputs.get_mut(&id) {
            pin.state = state;
        }
    }

    pub fn set_output_state(&mut self, id: OutputPinId, state: Signal) {
        if let Some(pin) = self.outputs.get_mut(&id) {
            pin.state = state;
        }
    }

    pub fn set_input_anchor(&mut self, id: InputPinId, anchor: Point) {
        if let Some(pin) = self.inputs.get_mut(&id) {
            pin.anchor = Some(anchor);
        }
    }

    pub fn set_output_anchor(&mut self, id: OutputPinId, anchor: Point) {
        if let Some(pin) = self.outputs.get_mut(&id) {
            pin.anchor = Some(anchor);
        }
    }

    /// Pushes the output's current state onto every pin in its fan-out.
    pub fn propagate(&mut self, id: OutputPinId) {
        let Some(pin) = self.outputs.get(&id) else {
            return;
        };

        let state = pin.state;

        for input in &pin.connected {
            if let Some(target) = self.inputs.get_mut(input) {
                target.state = state;
            }
        }
    }

    /// Adds `input` to the fan-out of `output` unless it is already there. The
    /// input's previous driver, if any, loses it.
    pub fn set_connection(&mut self, output: OutputPinId, input: InputPinId) {
        if !self.inputs.contains_key(&input) {
            return;
        }

        let Some(pin) = self.outputs.get_mut(&output) else {
            return;
        };

        if pin.connected.contains(&input) {
            return;
        }

        pin.connected.push(input);
        self.set_line(input, output);

        tracing::debug!("connect {:?} -> {:?}", output, input);
    }

    fn set_line(&mut self, input: InputPinId, line: OutputPinId) {
        let old = self.inputs.get(&input).and_then(|pin| pin.line);

        if let Some(old) = old.filter(|old| *old != line) {
            tracing::debug!("evict {:?} from {:?}", input, old);
            self.release(old, input);
        }

        if let Some(pin) = self.inputs.get_mut(&input) {
            pin.line = Some(line);
        }
    }

    /// Removes `input` from the fan-out of `output`. Idempotent.
    pub fn release(&mut self, output: OutputPinId, input: InputPinId) {
        if let Some(pin) = self.outputs.get_mut(&output) {
            pin.connected.retain(|id| *id != input);
        }

        if let Some(pin) = self.inputs.get_mut(&input) {
            if pin.line == Some(output) {
                pin.line = None;
            }
        }
    }

    /// Connects `candidate` to `input` when `line_end` lands in the input's hit
    /// zone. Returns whether it did.
    pub fn catch(&mut self, input: InputPinId, candidate: OutputPinId, line_end: Point) -> bool {
        let Some(pin) = self.inputs.get(&input) else {
            return false;
        };

        if !pin.hit_test(line_end) {
            return false;
        }

        self.set_connection(candidate, input);

        true
    }

    /// Drops an input pin, detaching it from its driver.
    pub fn remove_input(&mut self, id: InputPinId) {
        if let Some(line) = self.inputs.get(&id).and_then(|pin| pin.line) {
            self.release(line, id);
        }

        self.inputs.remove(&id);
    }

    /// Drops an output pin. Inputs it was driving keep their last state but no
    /// longer have a line.
    pub fn remove_output(&mut self, id: OutputPinId) {
        let Some(pin) = self.outputs.remove(&id) else {
            return;
        };

        for input in pin.connected {
            if let Some(target) = self.inputs.get_mut(&input) {
                if target.line == Some(id) {
                    target.line = None;
                }
            }
        }
    }

    /// Every (driver, driven) edge, ordered by driver then fan-out order.
    pub fn connections(&self) -> Vec<(OutputPinId, InputPinId)> {
        self.outputs
            .values()
            .flat_map(|pin| pin.connected.iter().map(move |input| (pin.id, *input)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
        self.outputs.clear();
    }
}

impl Verify for PinGraph {
    fn verify(&self) -> eyre::Result<()> {
        for pin in self.outputs.values() {
            for input in &pin.connected {
                let Some(target) = self.inputs.get(input) else {
                    eyre::bail!("{:?} drives missing pin {:?}", pin.id, input);
                };

                eyre::ensure!(
                    target.line == Some(pin.id),
                    "{:?} is in the fan-out of {:?} but its line is {:?}",
                    input,
                    pin.id,
                    target.line
                );
            }

            eyre::ensure!(
                pin.connected.iter().collect::<std::collections::HashSet<_>>().len()
                    == pin.connected.len(),
                "duplicate fan-out entries on {:?}",
                pin.id
            );
        }

        for pin in self.inputs.values() {
            let Some(line) = pin.line else {
                continue;
            };

            let Some(driver) = self.outputs.get(&line) else {
                eyre::bail!("{:?} has missing line {:?}", pin.id, line);
            };

            eyre::ensure!(
                driver.connected.contains(&pin.id),
                "{:?} names {:?} as line but is not in its fan-out",
                pin.id,
                line
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn gate_item(id: usize) -> ItemId {
        ItemId::Gate(GateId(id))
    }

    #[test]
    fn unittest_pin_graph_connect_and_evict() {
        let mut pins = PinGraph::new();

        let out1 = pins.new_output(gate_item(0), Some(Point(0., 0.)), Point(0., 0.), Signal::Zero);
        let out2 = pins.new_output(gate_item(1), Some(Point(0., 0.)), Point(0., 0.), Signal::One);
        let input = pins.new_input(gate_item(2), Some(Point(0., 0.)), Point(0., 0.));

        pins.set_connection(out1, input);
        pins.set_connection(out1, input);
        assert_eq!(pins.output(out1).unwrap().connected(), &[input]);
        assert_eq!(pins.input(input).unwrap().line(), Some(out1));

        pins.set_connection(out2, input);
        assert!(pins.output(out1).unwrap().connected().is_empty());
        assert_eq!(pins.output(out2).unwrap().connected(), &[input]);
        assert_eq!(pins.input(input).unwrap().line(), Some(out2));

        pins.verify().unwrap();
    }

    #[test]
    fn unittest_pin_graph_propagate() {
        let mut pins = PinGraph::new();

        let out = pins.new_output(gate_item(0), None, Point(0., 0.), Signal::One);
        let a = pins.new_input(gate_item(1), None, Point(100., 0.));
        let b = pins.new_input(gate_item(2), None, Point(200., 0.));

        pins.set_connection(out, a);
        pins.set_connection(out, b);

        assert_eq!(pins.input_state(a), Signal::Unknown);

        pins.propagate(out);
        assert_eq!(pins.input_state(a), Signal::One);
        assert_eq!(pins.input_state(b), Signal::One);

        pins.set_output_state(out, Signal::Zero);
        pins.propagate(out);
        assert_eq!(pins.input_state(a), Signal::Zero);
        assert_eq!(pins.input_state(b), Signal::Zero);
    }

    #[test]
    fn unittest_pin_graph_release() {
        let mut pins = PinGraph::new();

        let out = pins.new_output(gate_item(0), None, Point(0., 0.), Signal::One);
        let input = pins.new_input(gate_item(1), None, Point(100., 0.));

        pins.set_connection(out, input);
        pins.release(out, input);
        pins.release(out, input);

        assert!(pins.output(out).unwrap().connected().is_empty());
        assert_eq!(pins.input(input).unwrap().line(), None);

        // released pins keep the last state they were driven with
        pins.set_connection(out, input);
        pins.propagate(out);
        pins.release(out, input);
        assert_eq!(pins.input_state(input), Signal::One);

        pins.verify().unwrap();
    }

    #[test]
    fn unittest_pin_graph_catch() {
        let mut pins = PinGraph::new();

        let out = pins.new_output(gate_item(0), None, Point(0., 0.), Signal::Zero);
        // anchored at (100, 100), offset (-25, 0) => absolute (50, 100)
        let input = pins.new_input(gate_item(1), Some(Point(100., 100.)), Point(-25., 0.));

        assert_eq!(pins.input(input).unwrap().absolute_location(), Point(50., 100.));

        assert!(!pins.catch(input, out, Point(60., 100.)));
        assert!(pins.input(input).unwrap().line().is_none());

        assert!(pins.catch(input, out, Point(55., 103.)));
        assert_eq!(pins.input(input).unwrap().line(), Some(out));
    }

    #[test]
    fn unittest_pin_hit_zone_boundary() {
        let mut pins = PinGraph::new();

        // absolute (50, 100) and (175, 100) after stand-off
        let input = pins.new_input(gate_item(0), Some(Point(100., 100.)), Point(-25., 0.));
        let output = pins.new_output(gate_item(1), Some(Point(100., 100.)), Point(50., 0.), Signal::Zero);

        let input = pins.input(input).unwrap();
        assert!(input.hit_test(Point(50. + pin::PIN_SIZE - 1., 100.)));
        assert!(input.hit_test(Point(50., 100. - pin::PIN_SIZE + 1.)));
        assert!(!input.hit_test(Point(50. + pin::PIN_SIZE, 100.)));
        assert!(!input.hit_test(Point(50., 100. - pin::PIN_SIZE)));

        let output = pins.output(output).unwrap();
        assert_eq!(output.absolute_location(), Point(175., 100.));
        assert!(output.hit_test(Point(175. - pin::PIN_SIZE + 1., 100.)));
        assert!(!output.hit_test(Point(175. - pin::PIN_SIZE, 100.)));
        assert!(!output.hit_test(Point(175., 100. + pin::PIN_SIZE)));
    }

    #[test]
    fn unittest_pin_graph_remove() {
        let mut pins = PinGraph::new();

        let out = pins.new_output(gate_item(0), None, Point(0., 0.), Signal::Zero);
        let a = pins.new_input(gate_item(1), None, Point(100., 0.));
        let b = pins.new_input(gate_item(1), None, Point(100., 50.));

        pins.set_connection(out, a);
        pins.set_connection(out, b);

        pins.remove_input(a);
        assert_eq!(pins.output(out).unwrap().connected(), &[b]);

        pins.remove_output(out);
        assert_eq!(pins.input(b).unwrap().line(), None);
        assert!(pins.connections().is_empty());

        pins.verify().unwrap();
    }
}
