use std::collections::BTreeMap;

use petgraph::{graph::NodeIndex, visit::EdgeRef};

use crate::common::{Point, Signal};
use crate::gate::Gate;
use crate::graph::{
    ActuatorId, GateId, InputPinId, ItemId, OutputPinId, PinGraph, SensorId,
};
use crate::logic::GateKind;
use crate::utils::Verify;

pub mod actuator;
pub mod config;
pub mod sensor;
pub mod wiring;

pub use actuator::Actuator;
pub use config::CircuitConfig;
pub use sensor::{Property, Sensor};
pub use wiring::{DragState, Hit};

/// A wire as a renderer sees it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Wire {
    pub from: OutputPinId,
    pub to: InputPinId,
    pub start: Point,
    pub end: Point,
    pub state: Signal,
}

/// Every placed item plus the pin graph connecting them, advanced one frame at
/// a time by [`Circuit::update`].
#[derive(Debug, Default, Clone)]
pub struct Circuit {
    config: CircuitConfig,
    pins: PinGraph,
    gates: BTreeMap<GateId, Gate>,
    sensors: BTreeMap<SensorId, Sensor>,
    actuators: BTreeMap<ActuatorId, Actuator>,
    // placement order, also the update order
    items: Vec<ItemId>,
    drag: DragState,
    next_id: usize,
    tick: usize,
    elapsed: f64,
}

impl Circuit {
    pub fn new(config: CircuitConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    pub fn pins(&self) -> &PinGraph {
        &self.pins
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn tick(&self) -> usize {
        self.tick
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(&id)
    }

    pub fn sensor(&self, id: SensorId) -> Option<&Sensor> {
        self.sensors.get(&id)
    }

    pub fn actuator(&self, id: ActuatorId) -> Option<&Actuator> {
        self.actuators.get(&id)
    }

    /// Gates in placement order.
    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.items
            .iter()
            .filter_map(|item| item.as_gate())
            .filter_map(|id| self.gates.get(&id))
    }

    pub fn sensors(&self) -> impl Iterator<Item = &Sensor> {
        self.sensors.values()
    }

    pub fn actuators(&self) -> impl Iterator<Item = &Actuator> {
        self.actuators.values()
    }

    pub fn add_gate(&mut self, kind: GateKind, position: Point) -> GateId {
        let id = GateId(self.next_id());
        let gate = Gate::new(id, kind, position, &mut self.pins);

        tracing::debug!("add {kind} gate {:?} at {:?}", id, position);

        self.gates.insert(id, gate);
        self.items.push(ItemId::Gate(id));
        id
    }

    /// Adds a gate at the playfield center, stepping diagonally by the overlap
    /// distance until it no longer lands on an existing item.
    pub fn place_gate(&mut self, kind: GateKind) -> GateId {
        let position = self.free_position(self.config.playfield.center());
        self.add_gate(kind, position)
    }

    fn free_position(&self, mut position: Point) -> Point {
        let step = self.config.placement_step();
        let step = Point(step, step);

        while self.gates.values().any(|gate| gate.hit_test(position))
            || self.sensors.values().any(|sensor| sensor.hit_test(position))
        {
            position = position + step;
        }

        position
    }

    pub fn add_sensor(&mut self, position: Point, properties: Vec<Property>) -> SensorId {
        let id = SensorId(self.next_id());
        let sensor = Sensor::new(id, position, properties, &mut self.pins);

        self.sensors.insert(id, sensor);
        self.items.push(ItemId::Sensor(id));
        id
    }

    pub fn add_actuator(&mut self, position: Point, pin_location: Point) -> ActuatorId {
        let id = ActuatorId(self.next_id());
        let actuator = Actuator::new(id, position, pin_location, &mut self.pins);

        self.actuators.insert(id, actuator);
        self.items.push(ItemId::Actuator(id));
        id
    }

    /// Removes an item and every wire touching its pins.
    pub fn remove(&mut self, item: ItemId) -> bool {
        let removed = match item {
            ItemId::Gate(id) => self.gates.remove(&id).map(|gate| gate.detach(&mut self.pins)),
            ItemId::Sensor(id) => self
                .sensors
                .remove(&id)
                .map(|sensor| sensor.detach(&mut self.pins)),
            ItemId::Actuator(id) => self
                .actuators
                .remove(&id)
                .map(|actuator| actuator.detach(&mut self.pins)),
        }
        .is_some();

        if removed {
            self.items.retain(|other| *other != item);
            self.cancel_drag_from_removed();
        }

        removed
    }

    pub fn clear(&mut self) {
        self.pins.clear();
        self.gates.clear();
        self.sensors.clear();
        self.actuators.clear();
        self.items.clear();
        self.drag = DragState::Idle;
    }

    pub fn move_gate(&mut self, id: GateId, position: Point) {
        if let Some(gate) = self.gates.get_mut(&id) {
            gate.set_location(position, &mut self.pins);
        }
    }

    /// Overwrites an input pin's state. A driven input gets its driver's state
    /// back on the next propagation.
    pub fn set_input(&mut self, id: InputPinId, state: Signal) {
        self.pins.set_input_state(id, state);
    }

    pub fn sense(&mut self, id: SensorId, detected: &[Property]) {
        if let Some(sensor) = self.sensors.get(&id) {
            sensor.sense(&mut self.pins, detected);
        }
    }

    /// Wires `output` to `input` directly, evicting the input's old driver.
    pub fn connect(&mut self, output: OutputPinId, input: InputPinId) -> eyre::Result<()> {
        eyre::ensure!(self.pins.output(output).is_some(), "No output pin {:?}", output);
        eyre::ensure!(self.pins.input(input).is_some(), "No input pin {:?}", input);

        self.pins.set_connection(output, input);
        self.warn_feedback_loop();

        Ok(())
    }

    pub fn disconnect(&mut self, input: InputPinId) {
        if let Some(line) = self.pins.input(input).and_then(|pin| pin.line()) {
            self.pins.release(line, input);
        }
    }

    /// Advances one frame. Every output first pushes the state it computed last
    /// frame, then every gate recomputes, so a signal crosses one gate per frame.
    /// Returns the actuators that saw a rising edge.
    pub fn update(&mut self, elapsed: f64) -> Vec<ActuatorId> {
        self.tick += 1;
        self.elapsed += elapsed;

        for item in &self.items {
            match item {
                ItemId::Gate(id) => {
                    if let Some(gate) = self.gates.get(id) {
                        gate.propagate(&mut self.pins);
                    }
                }
                ItemId::Sensor(id) => {
                    if let Some(sensor) = self.sensors.get(id) {
                        sensor.propagate(&mut self.pins);
                    }
                }
                ItemId::Actuator(_) => (),
            }
        }

        let mut triggered = Vec::new();

        for item in &self.items {
            match item {
                ItemId::Gate(id) => {
                    if let Some(gate) = self.gates.get_mut(id) {
                        gate.compute_output(&mut self.pins);
                    }
                }
                ItemId::Actuator(id) => {
                    if let Some(actuator) = self.actuators.get_mut(id) {
                        if actuator.observe(&self.pins) {
                            triggered.push(*id);
                        }
                    }
                }
                ItemId::Sensor(_) => (),
            }
        }

        tracing::trace!("tick {} done, {} kick(s)", self.tick, triggered.len());

        triggered
    }

    /// Whether some gate's output reaches back into its own inputs. Such loops
    /// are legal, they just evolve one frame at a time.
    pub fn has_feedback_loop(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.gate_dependencies())
    }

    fn gate_dependencies(&self) -> petgraph::Graph<(), ()> {
        let gate_of_output = |id: OutputPinId| {
            self.pins
                .output(id)
                .and_then(|pin| pin.owner.as_gate())
        };
        let gate_of_input = |id: InputPinId| {
            self.pins
                .input(id)
                .and_then(|pin| pin.owner.as_gate())
        };

        let mut graph = petgraph::Graph::<(), ()>::new();
        let nodes = self
            .gates
            .keys()
            .map(|id| (*id, graph.add_node(())))
            .collect::<BTreeMap<GateId, NodeIndex>>();

        for (output, input) in self.pins.connections() {
            let (Some(from), Some(to)) = (gate_of_output(output), gate_of_input(input)) else {
                continue;
            };

            if let (Some(from), Some(to)) = (nodes.get(&from), nodes.get(&to)) {
                graph.add_edge(*from, *to, ());
            }
        }

        graph
    }

    /// Fewest frames between a sensor seeing something and `actuator` kicking
    /// on it, i.e. the number of gates on the shortest sensor path. `None` when
    /// no sensor reaches the actuator.
    pub fn latency(&self, actuator: ActuatorId) -> Option<usize> {
        let mut graph = petgraph::Graph::<ItemId, usize>::new();
        let nodes = self
            .items
            .iter()
            .map(|item| (*item, graph.add_node(*item)))
            .collect::<BTreeMap<ItemId, NodeIndex>>();

        for (output, input) in self.pins.connections() {
            let (Some(from), Some(to)) = (self.pins.output(output), self.pins.input(input)) else {
                continue;
            };

            if let (Some(a), Some(b)) = (nodes.get(&from.owner), nodes.get(&to.owner)) {
                // leaving a gate costs the frame it took to compute
                let cost = usize::from(from.owner.as_gate().is_some());
                graph.add_edge(*a, *b, cost);
            }
        }

        let target = *nodes.get(&ItemId::Actuator(actuator))?;

        self.sensors
            .keys()
            .filter_map(|id| nodes.get(&ItemId::Sensor(*id)))
            .filter_map(|start| {
                petgraph::algo::dijkstra(&graph, *start, Some(target), |edge| *edge.weight())
                    .get(&target)
                    .copied()
            })
            .min()
    }

    fn warn_feedback_loop(&self) {
        if self.has_feedback_loop() {
            tracing::warn!("circuit contains a feedback loop, outputs may oscillate");
        }
    }

    pub fn wires(&self) -> Vec<Wire> {
        self.pins
            .connections()
            .into_iter()
            .filter_map(|(from, to)| {
                let output = self.pins.output(from)?;
                let input = self.pins.input(to)?;

                Some(Wire {
                    from,
                    to,
                    start: output.absolute_location(),
                    end: input.absolute_location(),
                    state: output.state(),
                })
            })
            .collect()
    }
}

impl Verify for Circuit {
    fn verify(&self) -> eyre::Result<()> {
        self.pins.verify()?;

        for gate in self.gates.values() {
            let owned = gate
                .inputs()
                .iter()
                .map(|id| self.pins.input(*id).map(|pin| pin.owner))
                .chain(
                    gate.outputs()
                        .iter()
                        .map(|id| self.pins.output(*id).map(|pin| pin.owner)),
                );

            for owner in owned {
                eyre::ensure!(
                    owner == Some(ItemId::Gate(gate.id)),
                    "{:?} has a pin owned by {:?}",
                    gate.id,
                    owner
                );
            }
        }

        eyre::ensure!(
            self.items.len() == self.gates.len() + self.sensors.len() + self.actuators.len(),
            "placement order is out of sync with the registries"
        );

        Ok(())
    }
}
