use itertools::Itertools;

use crate::common::{BoundingBox, Point, Signal, Size};
use crate::graph::{GateId, InputPinId, ItemId, OutputPinId, PinGraph};
use crate::logic::{GateKind, Logic};

pub mod geometry;

/// A placed gate. Pins live in the circuit's [`PinGraph`], the gate keeps ids in
/// the order of its kind's pin layout.
#[derive(Debug, Clone)]
pub struct Gate {
    pub id: GateId,
    logic: Logic,
    position: Point,
    inputs: Vec<InputPinId>,
    outputs: Vec<OutputPinId>,
}

impl Gate {
    pub fn new(id: GateId, kind: GateKind, position: Point, pins: &mut PinGraph) -> Self {
        let owner = ItemId::Gate(id);

        let inputs = kind
            .input_offsets()
            .into_iter()
            .map(|offset| pins.new_input(owner, Some(position), offset))
            .collect();

        let outputs = kind
            .output_offsets()
            .into_iter()
            .zip(kind.reset_outputs())
            .map(|(offset, state)| pins.new_output(owner, Some(position), offset, *state))
            .collect();

        Self {
            id,
            logic: Logic::new(kind),
            position,
            inputs,
            outputs,
        }
    }

    pub fn kind(&self) -> GateKind {
        self.logic.kind()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.kind().size()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.position, self.size())
    }

    pub fn inputs(&self) -> &[InputPinId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputPinId] {
        &self.outputs
    }

    pub fn input(&self, index: usize) -> Option<InputPinId> {
        self.inputs.get(index).copied()
    }

    pub fn output(&self, index: usize) -> Option<OutputPinId> {
        self.outputs.get(index).copied()
    }

    pub fn output_states(&self, pins: &PinGraph) -> Vec<Signal> {
        self.outputs.iter().map(|id| pins.output_state(*id)).collect()
    }

    /// Moves the gate; its pins follow.
    pub fn set_location(&mut self, position: Point, pins: &mut PinGraph) {
        self.position = position;

        for id in &self.inputs {
            pins.set_input_anchor(*id, position);
        }

        for id in &self.outputs {
            pins.set_output_anchor(*id, position);
        }
    }

    /// Pushes the current output states to everything they drive.
    pub fn propagate(&self, pins: &mut PinGraph) {
        for id in &self.outputs {
            pins.propagate(*id);
        }
    }

    /// Recomputes the outputs from the current input states.
    pub fn compute_output(&mut self, pins: &mut PinGraph) {
        let inputs = self
            .inputs
            .iter()
            .map(|id| pins.input_state(*id))
            .collect_vec();
        let mut outputs = self.output_states(pins);

        self.logic.evaluate(&inputs, &mut outputs);

        for (id, state) in self.outputs.iter().zip(outputs) {
            pins.set_output_state(*id, state);
        }
    }

    /// One frame for this gate alone: old outputs out first, then recompute.
    pub fn update(&mut self, pins: &mut PinGraph, elapsed: f64) {
        tracing::trace!("update {:?} ({}) after {elapsed}s", self.id, self.kind());

        self.propagate(pins);
        self.compute_output(pins);
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.bounding_box().contains(point)
    }

    /// Output pin under `point`, if any. Output pins are the only draggable
    /// part of a gate.
    pub fn hit_draggable(&self, pins: &PinGraph, point: Point) -> Option<OutputPinId> {
        self.outputs
            .iter()
            .copied()
            .find(|id| pins.output(*id).map_or(false, |pin| pin.hit_test(point)))
    }

    /// Offers a dragged line end to each input in order; the first catch wins.
    pub fn connect(
        &self,
        pins: &mut PinGraph,
        candidate: OutputPinId,
        line_end: Point,
    ) -> Option<InputPinId> {
        self.inputs
            .iter()
            .copied()
            .find(|input| pins.catch(*input, candidate, line_end))
    }

    /// Removes this gate's pins from the graph, cutting every wire touching them.
    pub fn detach(&self, pins: &mut PinGraph) {
        for id in &self.inputs {
            pins.remove_input(*id);
        }

        for id in &self.outputs {
            pins.remove_output(*id);
        }
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;

    fn new_gate(kind: GateKind, position: Point) -> (Gate, PinGraph) {
        let mut pins = PinGraph::new();
        let gate = Gate::new(GateId(0), kind, position, &mut pins);
        (gate, pins)
    }

    fn set_inputs(gate: &Gate, pins: &mut PinGraph, states: &[Signal]) {
        for (id, state) in gate.inputs().iter().zip(states) {
            pins.set_input_state(*id, *state);
        }
    }

    #[test]
    fn unittest_gate_initial_states() {
        for kind in GateKind::iter() {
            let (gate, pins) = new_gate(kind, Point(600., 400.));

            assert!(gate
                .inputs()
                .iter()
                .all(|id| pins.input_state(*id) == Signal::Unknown));
            assert_eq!(gate.output_states(&pins), kind.reset_outputs());
        }
    }

    #[test]
    fn unittest_gate_and_update() {
        let (mut gate, mut pins) = new_gate(GateKind::And, Point(600., 400.));

        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), vec![Signal::Unknown]);

        set_inputs(&gate, &mut pins, &[Signal::One, Signal::One]);
        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), vec![Signal::One]);

        set_inputs(&gate, &mut pins, &[Signal::One, Signal::Zero]);
        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), vec![Signal::Zero]);

        set_inputs(&gate, &mut pins, &[Signal::Unknown, Signal::Zero]);
        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), vec![Signal::Unknown]);
    }

    #[test]
    fn unittest_gate_not_update() {
        let (mut gate, mut pins) = new_gate(GateKind::Not, Point(600., 400.));

        set_inputs(&gate, &mut pins, &[Signal::One]);
        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), vec![Signal::Zero]);

        set_inputs(&gate, &mut pins, &[Signal::Zero]);
        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), vec![Signal::One]);
    }

    #[test]
    fn unittest_gate_sr_flip_flop() {
        let (mut gate, mut pins) = new_gate(GateKind::SrFlipFlop, Point(600., 400.));

        set_inputs(&gate, &mut pins, &[Signal::One, Signal::Zero]);
        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), vec![Signal::One, Signal::Zero]);

        set_inputs(&gate, &mut pins, &[Signal::Zero, Signal::Zero]);
        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), vec![Signal::One, Signal::Zero]);

        set_inputs(&gate, &mut pins, &[Signal::Zero, Signal::One]);
        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), vec![Signal::Zero, Signal::One]);

        // invalid on every tick it is held
        set_inputs(&gate, &mut pins, &[Signal::One, Signal::One]);
        gate.update(&mut pins, 0.1);
        gate.update(&mut pins, 0.1);
        assert_eq!(
            gate.output_states(&pins),
            vec![Signal::Unknown, Signal::Unknown]
        );
    }

    #[test]
    fn unittest_gate_d_flip_flop_rising_edge() {
        for data in [Signal::One, Signal::Zero] {
            let (mut gate, mut pins) = new_gate(GateKind::DFlipFlop, Point(600., 400.));

            set_inputs(&gate, &mut pins, &[data, Signal::One]);
            gate.update(&mut pins, 0.1);

            assert_eq!(gate.output_states(&pins), vec![data, !data]);
        }
    }

    #[test]
    fn unittest_gate_d_flip_flop_falling_edge() {
        let (mut gate, mut pins) = new_gate(GateKind::DFlipFlop, Point(600., 400.));

        set_inputs(&gate, &mut pins, &[Signal::Zero, Signal::One]);
        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), vec![Signal::Zero, Signal::One]);

        set_inputs(&gate, &mut pins, &[Signal::One, Signal::Zero]);
        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), vec![Signal::Zero, Signal::One]);
    }

    #[test]
    fn unittest_gate_d_flip_flop_sustained_clock() {
        let (mut gate, mut pins) = new_gate(GateKind::DFlipFlop, Point(600., 400.));

        set_inputs(&gate, &mut pins, &[Signal::One, Signal::One]);
        gate.update(&mut pins, 0.1);
        let latched = gate.output_states(&pins);
        assert_eq!(latched, vec![Signal::One, Signal::Zero]);

        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), latched);

        set_inputs(&gate, &mut pins, &[Signal::Zero, Signal::One]);
        gate.update(&mut pins, 0.1);
        assert_eq!(gate.output_states(&pins), latched);
    }

    #[test]
    fn unittest_gate_hit_test_edges() {
        for kind in GateKind::iter() {
            let (gate, _) = new_gate(kind, Point(100., 200.));
            let Size(w, h) = kind.size();

            assert!(gate.hit_test(Point(100., 200.)));

            assert!(gate.hit_test(Point(100. - w / 2., 200.)));
            assert!(gate.hit_test(Point(100. + w / 2., 200.)));
            assert!(gate.hit_test(Point(100., 200. - h / 2.)));
            assert!(gate.hit_test(Point(100., 200. + h / 2.)));

            assert!(!gate.hit_test(Point(100. - w / 2. - 1., 200.)));
            assert!(!gate.hit_test(Point(100. + w / 2. + 1., 200.)));
            assert!(!gate.hit_test(Point(100., 200. - h / 2. - 1.)));
            assert!(!gate.hit_test(Point(100., 200. + h / 2. + 1.)));
        }
    }

    #[test]
    fn unittest_gate_pins_follow_location() {
        let (mut gate, mut pins) = new_gate(GateKind::Not, Point(100., 100.));

        let output = gate.output(0).unwrap();
        // 25 (half width) + 25 (stand-off)
        assert_eq!(pins.output(output).unwrap().absolute_location(), Point(150., 100.));
        assert_eq!(gate.hit_draggable(&pins, Point(150., 100.)), Some(output));
        assert_eq!(gate.hit_draggable(&pins, Point(100., 100.)), None);

        gate.set_location(Point(300., 50.), &mut pins);
        assert_eq!(pins.output(output).unwrap().absolute_location(), Point(350., 50.));

        let input = gate.input(0).unwrap();
        assert_eq!(pins.input(input).unwrap().absolute_location(), Point(250., 50.));
    }

    #[test]
    fn unittest_gate_connect_first_input_wins() {
        let mut pins = PinGraph::new();
        let source = Gate::new(GateId(0), GateKind::Not, Point(0., 0.), &mut pins);
        let target = Gate::new(GateId(1), GateKind::And, Point(300., 300.), &mut pins);
        let candidate = source.output(0).unwrap();

        let a = pins.input(target.input(0).unwrap()).unwrap().absolute_location();
        let b = pins.input(target.input(1).unwrap()).unwrap().absolute_location();

        assert_eq!(target.connect(&mut pins, candidate, b), target.input(1));
        assert_eq!(pins.input(target.input(1).unwrap()).unwrap().line(), Some(candidate));
        assert_eq!(pins.input(target.input(0).unwrap()).unwrap().line(), None);

        assert_eq!(target.connect(&mut pins, candidate, a), target.input(0));
        assert_eq!(
            pins.output(candidate).unwrap().connected(),
            &[target.input(1).unwrap(), target.input(0).unwrap()]
        );

        assert_eq!(target.connect(&mut pins, candidate, Point(0., 0.)), None);
    }
}
