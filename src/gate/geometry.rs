use crate::common::{Point, Size};
use crate::logic::GateKind;

pub const AND_GATE_SIZE: Size = Size(75., 50.);
pub const OR_GATE_SIZE: Size = Size(75., 50.);
pub const NOT_GATE_SIZE: Size = Size(50., 50.);
pub const SR_FLIP_FLOP_SIZE: Size = Size(50., 75.);
pub const D_FLIP_FLOP_SIZE: Size = Size(50., 75.);

// pin offsets are relative to the gate center
impl GateKind {
    pub fn size(&self) -> Size {
        match self {
            GateKind::And => AND_GATE_SIZE,
            GateKind::Or => OR_GATE_SIZE,
            GateKind::Not => NOT_GATE_SIZE,
            GateKind::SrFlipFlop => SR_FLIP_FLOP_SIZE,
            GateKind::DFlipFlop => D_FLIP_FLOP_SIZE,
        }
    }

    pub fn input_offsets(&self) -> Vec<Point> {
        let Size(w, h) = self.size();

        match self {
            GateKind::And | GateKind::SrFlipFlop | GateKind::DFlipFlop => {
                vec![Point(-w / 2., -h / 4.), Point(-w / 2., h / 4.)]
            }
            // the curved back of an OR gate sits further in
            GateKind::Or => vec![Point(-w / 3., -h / 4.), Point(-w / 3., h / 4.)],
            GateKind::Not => vec![Point(-w / 2., 0.)],
        }
    }

    pub fn output_offsets(&self) -> Vec<Point> {
        let Size(w, h) = self.size();

        match self {
            GateKind::And | GateKind::Or | GateKind::Not => vec![Point(w / 2., 0.)],
            GateKind::SrFlipFlop | GateKind::DFlipFlop => {
                vec![Point(w / 2., -h / 4.), Point(w / 2., h / 4.)]
            }
        }
    }

    pub fn input_labels(&self) -> &'static [&'static str] {
        match self {
            GateKind::And | GateKind::Or => &["A", "B"],
            GateKind::Not => &["A"],
            GateKind::SrFlipFlop => &["S", "R"],
            GateKind::DFlipFlop => &["D", "CLK"],
        }
    }

    pub fn output_labels(&self) -> &'static [&'static str] {
        match self {
            GateKind::SrFlipFlop | GateKind::DFlipFlop => &["Q", "Q'"],
            _ => &["Q"],
        }
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn unittest_geometry_pin_counts() {
        for kind in GateKind::iter() {
            assert_eq!(kind.input_offsets().len(), kind.input_count());
            assert_eq!(kind.output_offsets().len(), kind.output_count());
            assert_eq!(kind.input_labels().len(), kind.input_count());
            assert_eq!(kind.output_labels().len(), kind.output_count());
        }
    }

    #[test]
    fn unittest_geometry_pins_on_edges() {
        for kind in GateKind::iter() {
            let Size(w, _) = kind.size();

            assert!(kind.input_offsets().iter().all(|offset| offset.x() < 0.));
            assert!(kind.output_offsets().iter().all(|offset| offset.x() == w / 2.));
        }
    }
}
