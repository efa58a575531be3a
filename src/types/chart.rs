use serde::Serialize;

use super::{Type, TYPE_COUNT};

/// Damage multiplier of one attacking type against one defending type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Multiplier {
    Immune,
    Resisted,
    Neutral,
    Super,
}

impl Multiplier {
    pub fn value(self) -> f64 {
        match self {
            Self::Immune => 0.0,
            Self::Resisted => 0.5,
            Self::Neutral => 1.0,
            Self::Super => 2.0,
        }
    }
}

const O: Multiplier = Multiplier::Immune;
const H: Multiplier = Multiplier::Resisted;
const N: Multiplier = Multiplier::Neutral;
const S: Multiplier = Multiplier::Super;

/// Attacker rows, defender columns, both in [Type::ALL] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeChart {
    cells: [[Multiplier; TYPE_COUNT]; TYPE_COUNT],
}

#[rustfmt::skip]
pub static STANDARD_CHART: TypeChart = TypeChart {
    cells: [
        //  nor fir wat ele gra ice fig poi gro fly psy bug roc gho dra dar ste fai
        [N, N, N, N, N, N, N, N, N, N, N, N, H, O, N, N, H, N], // normal
        [N, H, H, N, S, S, N, N, N, N, N, S, H, N, H, N, S, N], // fire
        [N, S, H, N, H, N, N, N, S, N, N, N, S, N, H, N, N, N], // water
        [N, N, S, H, H, N, N, N, O, S, N, N, N, N, H, N, N, N], // electric
        [N, H, S, N, H, N, N, H, S, H, N, H, S, N, H, N, H, N], // grass
        [N, H, H, N, S, H, N, N, S, S, N, N, N, N, S, N, H, N], // ice
        [S, N, N, N, N, S, N, H, N, H, H, H, S, O, N, S, S, H], // fighting
        [N, N, N, N, S, N, N, H, H, N, N, N, H, H, N, N, O, S], // poison
        [N, S, N, S, H, N, N, S, N, O, N, H, S, N, N, N, S, N], // ground
        [N, N, N, H, S, N, S, N, N, N, N, S, H, N, N, N, H, N], // flying
        [N, N, N, N, N, N, S, S, N, N, H, N, N, N, N, O, H, N], // psychic
        [N, H, N, N, S, N, H, H, N, H, S, N, N, H, N, S, H, H], // bug
        [N, S, N, N, N, S, H, N, H, S, N, S, N, N, N, N, H, N], // rock
        [O, N, N, N, N, N, N, N, N, N, S, N, N, S, N, H, N, N], // ghost
        [N, N, N, N, N, N, N, N, N, N, N, N, N, N, S, N, H, O], // dragon
        [N, N, N, N, N, N, H, N, N, N, S, N, N, S, N, H, N, H], // dark
        [N, H, H, H, N, S, N, N, N, N, N, N, S, N, H, N, H, S], // steel
        [N, H, N, N, N, N, S, H, N, N, N, N, N, N, S, S, H, N], // fairy
    ],
};

impl TypeChart {
    pub fn standard() -> &'static TypeChart {
        &STANDARD_CHART
    }

    pub fn affinity(&self, attacker: Type, defender: Type) -> Multiplier {
        self.cells[attacker.index()][defender.index()]
    }
}

impl Default for TypeChart {
    fn default() -> Self {
        STANDARD_CHART.clone()
    }
}
