use strum_macros::{Display, EnumIter, EnumString};

use crate::common::Signal;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum GateKind {
    #[strum(serialize = "andgate", to_string = "and")]
    And,
    #[strum(serialize = "orgate", to_string = "or")]
    Or,
    #[strum(serialize = "notgate", to_string = "not")]
    Not,
    #[strum(serialize = "srflipflop", to_string = "sr")]
    SrFlipFlop,
    #[strum(serialize = "dflipflop", to_string = "d")]
    DFlipFlop,
}

impl GateKind {
    pub fn input_count(&self) -> usize {
        match self {
            GateKind::Not => 1,
            _ => 2,
        }
    }

    pub fn output_count(&self) -> usize {
        match self {
            GateKind::SrFlipFlop | GateKind::DFlipFlop => 2,
            _ => 1,
        }
    }

    // flip-flops come up in a defined reset state, combinational outputs don't
    pub fn reset_outputs(&self) -> &'static [Signal] {
        match self {
            GateKind::SrFlipFlop | GateKind::DFlipFlop => &[Signal::Zero, Signal::One],
            _ => &[Signal::Unknown],
        }
    }
}

/// Gate behaviour together with whatever memory it needs between ticks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
    Not,
    SrFlipFlop,
    DFlipFlop { previous_clock: Signal },
}

impl Logic {
    pub fn new(kind: GateKind) -> Self {
        match kind {
            GateKind::And => Logic::And,
            GateKind::Or => Logic::Or,
            GateKind::Not => Logic::Not,
            GateKind::SrFlipFlop => Logic::SrFlipFlop,
            GateKind::DFlipFlop => Logic::DFlipFlop {
                previous_clock: Signal::Zero,
            },
        }
    }

    pub fn kind(&self) -> GateKind {
        match self {
            Logic::And => GateKind::And,
            Logic::Or => GateKind::Or,
            Logic::Not => GateKind::Not,
            Logic::SrFlipFlop => GateKind::SrFlipFlop,
            Logic::DFlipFlop { .. } => GateKind::DFlipFlop,
        }
    }

    /// Computes new output states from `inputs`, overwriting `outputs` in place.
    /// `outputs` holds the states of the previous tick so sequential gates can
    /// hold them.
    pub fn evaluate(&mut self, inputs: &[Signal], outputs: &mut [Signal]) {
        match self {
            Logic::And => outputs[0] = and(inputs[0], inputs[1]),
            Logic::Or => outputs[0] = or(inputs[0], inputs[1]),
            Logic::Not => outputs[0] = not(inputs[0]),
            Logic::SrFlipFlop => {
                (outputs[0], outputs[1]) = sr_flip_flop(inputs[0], inputs[1], (outputs[0], outputs[1]));
            }
            Logic::DFlipFlop { previous_clock } => {
                (outputs[0], outputs[1]) = d_flip_flop(
                    inputs[0],
                    inputs[1],
                    *previous_clock,
                    (outputs[0], outputs[1]),
                );
                *previous_clock = inputs[1];
            }
        }
    }
}

pub fn and(a: Signal, b: Signal) -> Signal {
    match (a.as_bool(), b.as_bool()) {
        (Some(a), Some(b)) => Signal::from(a && b),
        _ => Signal::Unknown,
    }
}

pub fn or(a: Signal, b: Signal) -> Signal {
    match (a.as_bool(), b.as_bool()) {
        (Some(a), Some(b)) => Signal::from(a || b),
        _ => Signal::Unknown,
    }
}

pub fn not(a: Signal) -> Signal {
    !a
}

// (S, R) levels => (Q, Q')
pub fn sr_flip_flop(set: Signal, reset: Signal, held: (Signal, Signal)) -> (Signal, Signal) {
    match (set, reset) {
        (Signal::One, Signal::One) => (Signal::Unknown, Signal::Unknown),
        (Signal::One, _) => (Signal::One, Signal::Zero),
        (_, Signal::One) => (Signal::Zero, Signal::One),
        _ => held,
    }
}

// only a Zero -> One clock transition latches; an Unknown D latches (Unknown, Unknown)
pub fn d_flip_flop(
    data: Signal,
    clock: Signal,
    previous_clock: Signal,
    held: (Signal, Signal),
) -> (Signal, Signal) {
    if previous_clock.is_zero() && clock.is_one() {
        (data, !data)
    } else {
        held
    }
}
