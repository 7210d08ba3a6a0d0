use std::collections::BTreeMap;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::circuit::{Circuit, Property};
use crate::graph::ActuatorId;

const COLORS: [Property; 4] = [Property::Red, Property::Green, Property::Blue, Property::White];
const SHAPES: [Property; 3] = [Property::Square, Property::Circle, Property::Diamond];
const CONTENTS: [Property; 4] = [
    Property::Izzo,
    Property::Smith,
    Property::Football,
    Property::Basketball,
];

/// A product riding the conveyor past the sensors.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub properties: Vec<Property>,
    // frame it reached the sensors
    pub entered: usize,
    pub kicked: bool,
}

impl Product {
    fn random(rng: &mut StdRng, entered: usize) -> Self {
        let mut properties = Vec::with_capacity(3);

        properties.extend(COLORS.choose(rng).copied());
        properties.extend(SHAPES.choose(rng).copied());

        if rng.gen_bool(0.5) {
            properties.extend(CONTENTS.choose(rng).copied());
        }

        Self {
            properties,
            entered,
            kicked: false,
        }
    }

    pub fn has(&self, property: Property) -> bool {
        self.properties.contains(&property)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub frames: usize,
    pub products: Vec<Product>,
    pub kicks: usize,
}

impl Report {
    pub fn kicked(&self) -> usize {
        self.products.iter().filter(|product| product.kicked).count()
    }
}

/// Feeds products to a circuit's sensors and ticks it frame by frame.
#[derive(Debug, Clone)]
pub struct Simulator {
    circuit: Circuit,
    rng: StdRng,
    // a new product every this many frames
    product_every: usize,
    // frames a product stays in front of the sensors, always below product_every
    dwell: usize,
    // frames from sensing to kicking, per actuator
    latency: BTreeMap<ActuatorId, usize>,
    frame: usize,
    products: Vec<Product>,
    kicks: usize,
}

impl Simulator {
    pub fn new(circuit: Circuit, seed: u64, product_every: usize) -> eyre::Result<Self> {
        // one frame showing the product, at least one showing nothing, so
        // back-to-back matches still rise
        eyre::ensure!(product_every >= 2, "product interval must be at least two frames");

        let latency = circuit
            .actuators()
            .map(|actuator| (actuator.id, circuit.latency(actuator.id).unwrap_or(0)))
            .collect();

        Ok(Self {
            circuit,
            latency,
            rng: StdRng::seed_from_u64(seed),
            product_every,
            dwell: (product_every + 1) / 2,
            frame: 0,
            products: Vec::new(),
            kicks: 0,
        })
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    fn show(&mut self, properties: &[Property]) {
        let sensors = self.circuit.sensors().map(|sensor| sensor.id).collect::<Vec<_>>();

        for id in sensors {
            self.circuit.sense(id, properties);
        }
    }

    /// Runs one frame. Returns the actuators that kicked.
    pub fn step(&mut self) -> Vec<ActuatorId> {
        if self.frame % self.product_every == 0 {
            let product = Product::random(&mut self.rng, self.frame);
            tracing::debug!("frame {}: product {:?}", self.frame, product.properties);

            self.show(&product.properties);
            self.products.push(product);
        } else if self.frame % self.product_every == self.dwell {
            self.show(&[]);
        }

        let elapsed = self.circuit.config().frame_elapsed();
        let kicked = self.circuit.update(elapsed);

        if !kicked.is_empty() {
            tracing::info!("frame {}: kick from {:?}", self.frame, kicked);

            self.kicks += kicked.len();

            for id in &kicked {
                self.credit_kick(*id);
            }
        }

        self.frame += 1;
        kicked
    }

    // a kick belongs to the last product shown before its signal set off
    fn credit_kick(&mut self, id: ActuatorId) {
        let latency = self.latency.get(&id).copied().unwrap_or(0);
        let Some(shown) = self.frame.checked_sub(latency) else {
            return;
        };

        if let Some(product) = self
            .products
            .iter_mut()
            .rev()
            .find(|product| product.entered <= shown)
        {
            product.kicked = true;
        }
    }

    pub fn run(&mut self, frames: usize) -> Report {
        for local_frame in 0..frames {
            self.step();
            tracing::trace!("simulator frame: {local_frame}/{frames}");
        }

        tracing::info!(
            "simulated {frames} frames, {} products, {} kicks",
            self.products.len(),
            self.kicks
        );

        self.report()
    }

    pub fn report(&self) -> Report {
        Report {
            frames: self.frame,
            products: self.products.clone(),
            kicks: self.kicks,
        }
    }
}
