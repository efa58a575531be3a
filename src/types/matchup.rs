//! Effectiveness between type sets and the normalized superiority ratio.

use serde::Serialize;

use super::{Type, TypeChart, TypeSet};

/// Best product over the attacker's types: an attacker picks whichever of its
/// types deals more, and each defending type applies multiplicatively.
pub fn dual_affinity(chart: &TypeChart, attacker: &TypeSet, defender: &TypeSet) -> f64 {
    attacker
        .types()
        .map(|attacking| {
            defender
                .types()
                .map(|defending| chart.affinity(attacking, defending).value())
                .product::<f64>()
        })
        .fold(0.0, f64::max)
}

/// `forward / (forward + reverse)`, or 0.5 when neither side affects the other.
pub fn matchup_ratio(chart: &TypeChart, a: &TypeSet, b: &TypeSet) -> f64 {
    let forward = dual_affinity(chart, a, b);
    let reverse = dual_affinity(chart, b, a);
    let denominator = forward + reverse;
    if denominator == 0.0 {
        0.5
    } else {
        forward / denominator
    }
}

pub fn type_ratio(chart: &TypeChart, a: Type, b: Type) -> f64 {
    matchup_ratio(chart, &TypeSet::mono(a), &TypeSet::mono(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Matchup {
    pub attacker: TypeSet,
    pub defender: TypeSet,
    pub forward: f64,
    pub reverse: f64,
    pub ratio: f64,
}

impl Matchup {
    pub fn between(chart: &TypeChart, attacker: TypeSet, defender: TypeSet) -> Self {
        Self {
            attacker,
            defender,
            forward: dual_affinity(chart, &attacker, &defender),
            reverse: dual_affinity(chart, &defender, &attacker),
            ratio: matchup_ratio(chart, &attacker, &defender),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(raw: &str) -> TypeSet {
        raw.parse().expect("valid type set")
    }

    #[test]
    fn water_over_fire_ratio() {
        let chart = TypeChart::standard();
        assert_eq!(type_ratio(chart, Type::Water, Type::Fire), 0.8);
        assert_eq!(type_ratio(chart, Type::Fire, Type::Water), 0.2);
    }

    #[test]
    fn dual_defender_multiplies() {
        let chart = TypeChart::standard();
        // ice vs grass/flying: 2 * 2
        assert_eq!(dual_affinity(chart, &set("ice"), &set("grass/flying")), 4.0);
        // electric vs water/ground: 2 * 0
        assert_eq!(dual_affinity(chart, &set("electric"), &set("water/ground")), 0.0);
    }

    #[test]
    fn dual_attacker_takes_best_type() {
        let chart = TypeChart::standard();
        // normal does 0 to ghost, fighting does 0 to ghost, but ground does 1
        assert_eq!(dual_affinity(chart, &set("normal/ground"), &set("ghost")), 1.0);
        assert_eq!(dual_affinity(chart, &set("fire/water"), &set("rock")), 2.0);
    }

    #[test]
    fn mutual_immunity_is_neutral() {
        let chart = TypeChart::standard();
        assert_eq!(dual_affinity(chart, &set("normal"), &set("ghost")), 0.0);
        assert_eq!(dual_affinity(chart, &set("ghost"), &set("normal")), 0.0);
        assert_eq!(matchup_ratio(chart, &set("normal"), &set("ghost")), 0.5);
    }

    #[test]
    fn matchup_summary_is_consistent() {
        let chart = TypeChart::standard();
        let summary = Matchup::between(chart, set("water"), set("fire"));
        assert_eq!(summary.forward, 2.0);
        assert_eq!(summary.reverse, 0.5);
        assert_eq!(summary.ratio, 0.8);
    }
}
