use std::{path::Path, str::FromStr};

use serde::Deserialize;

use crate::circuit::{Circuit, CircuitConfig, Property};
use crate::common::Point;
use crate::graph::{ActuatorId, GateId, InputPinId, OutputPinId, SensorId};
use crate::logic::GateKind;
use crate::utils::Verify;

/// A level: what is placed on the playfield and how it is wired.
#[derive(Debug, Default, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub config: CircuitConfig,
    #[serde(default)]
    pub gates: Vec<GateEntry>,
    #[serde(default)]
    pub sensors: Vec<SensorEntry>,
    #[serde(default)]
    pub actuators: Vec<ActuatorEntry>,
    #[serde(default)]
    pub wires: Vec<WireEntry>,
}

#[derive(Debug, Deserialize)]
pub struct GateEntry {
    pub kind: String,
    // auto placed when missing
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SensorEntry {
    pub x: f64,
    pub y: f64,
    pub properties: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActuatorEntry {
    pub x: f64,
    pub y: f64,
    pub pin: Point,
}

#[derive(Debug, Deserialize)]
pub struct WireEntry {
    pub from: OutputRef,
    pub to: InputRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputRef {
    Gate { index: usize, pin: usize },
    Sensor { index: usize, pin: usize },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputRef {
    Gate { index: usize, pin: usize },
    Actuator { index: usize },
}

// ids handed out while building, indexed like the layout's lists
#[derive(Default)]
struct Placed {
    gates: Vec<GateId>,
    sensors: Vec<SensorId>,
    actuators: Vec<ActuatorId>,
}

impl Layout {
    pub fn from_json(json: &str) -> eyre::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;

        tracing::info!("load layout {}", path.as_ref().display());

        Self::from_json(&json)
    }

    pub fn build(&self) -> eyre::Result<Circuit> {
        self.config.verify()?;

        let mut circuit = Circuit::new(self.config.clone());
        let mut placed = Placed::default();

        for entry in &self.sensors {
            let properties = entry
                .properties
                .iter()
                .map(|tag| {
                    Property::from_str(tag)
                        .map_err(|_| eyre::eyre!("unknown sensor property {:?}", tag))
                })
                .collect::<eyre::Result<Vec<_>>>()?;

            placed
                .sensors
                .push(circuit.add_sensor(Point(entry.x, entry.y), properties));
        }

        for entry in &self.actuators {
            placed
                .actuators
                .push(circuit.add_actuator(Point(entry.x, entry.y), entry.pin));
        }

        // gates last, so auto placement steps around sensor panels
        for entry in &self.gates {
            let Ok(kind) = GateKind::from_str(&entry.kind) else {
                eyre::bail!("unknown gate kind {:?}", entry.kind);
            };

            let id = match (entry.x, entry.y) {
                (Some(x), Some(y)) => circuit.add_gate(kind, Point(x, y)),
                (None, None) => circuit.place_gate(kind),
                _ => eyre::bail!("gate {:?} needs both x and y or neither", entry.kind),
            };

            placed.gates.push(id);
        }

        for wire in &self.wires {
            let output = placed.output(&circuit, &wire.from)?;
            let input = placed.input(&circuit, &wire.to)?;

            circuit.connect(output, input)?;
        }

        circuit.verify()?;

        tracing::info!(
            "layout built: {} gates, {} sensors, {} actuators, {} wires",
            placed.gates.len(),
            placed.sensors.len(),
            placed.actuators.len(),
            self.wires.len()
        );

        Ok(circuit)
    }
}

impl Placed {
    fn output(&self, circuit: &Circuit, at: &OutputRef) -> eyre::Result<OutputPinId> {
        let pin = match at {
            OutputRef::Gate { index, pin } => self
                .gates
                .get(*index)
                .and_then(|id| circuit.gate(*id))
                .and_then(|gate| gate.output(*pin)),
            OutputRef::Sensor { index, pin } => self
                .sensors
                .get(*index)
                .and_then(|id| circuit.sensor(*id))
                .and_then(|sensor| sensor.output(*pin)),
        };

        let Some(pin) = pin else {
            eyre::bail!("wire source {:?} does not exist", at);
        };

        Ok(pin)
    }

    fn input(&self, circuit: &Circuit, at: &InputRef) -> eyre::Result<InputPinId> {
        let pin = match at {
            InputRef::Gate { index, pin } => self
                .gates
                .get(*index)
                .and_then(|id| circuit.gate(*id))
                .and_then(|gate| gate.input(*pin)),
            InputRef::Actuator { index } => self
                .actuators
                .get(*index)
                .and_then(|id| circuit.actuator(*id))
                .map(|actuator| actuator.input()),
        };

        let Some(pin) = pin else {
            eyre::bail!("wire target {:?} does not exist", at);
        };

        Ok(pin)
    }
}
