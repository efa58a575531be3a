//! Property tests for the effectiveness model over every type and type set.

use proptest::prelude::*;

use soulbox::types::{dual_affinity, matchup_ratio, type_ratio, Type, TypeChart, TypeSet};

fn type_strategy() -> impl Strategy<Value = Type> {
    prop::sample::select(Type::ALL.to_vec())
}

fn type_set_strategy() -> impl Strategy<Value = TypeSet> {
    prop::sample::select(TypeSet::all().collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn mono_sets_reduce_to_base_affinity(a in type_strategy(), b in type_strategy()) {
        let chart = TypeChart::standard();
        let dual = dual_affinity(chart, &TypeSet::mono(a), &TypeSet::mono(b));
        prop_assert_eq!(dual, chart.affinity(a, b).value());
    }

    #[test]
    fn ratios_are_complementary(a in type_set_strategy(), b in type_set_strategy()) {
        let chart = TypeChart::standard();
        let forward = matchup_ratio(chart, &a, &b);
        let reverse = matchup_ratio(chart, &b, &a);
        prop_assert!((forward + reverse - 1.0).abs() < 1e-12, "{a} vs {b}: {forward} + {reverse}");
        prop_assert!((0.0..=1.0).contains(&forward));
    }

    #[test]
    fn mutual_immunity_is_neutral(a in type_set_strategy(), b in type_set_strategy()) {
        let chart = TypeChart::standard();
        if dual_affinity(chart, &a, &b) == 0.0 && dual_affinity(chart, &b, &a) == 0.0 {
            prop_assert_eq!(matchup_ratio(chart, &a, &b), 0.5);
        }
    }

    #[test]
    fn set_order_does_not_matter(a in type_strategy(), b in type_strategy(), d in type_set_strategy()) {
        let chart = TypeChart::standard();
        prop_assert_eq!(TypeSet::dual(a, b), TypeSet::dual(b, a));
        prop_assert_eq!(
            dual_affinity(chart, &TypeSet::dual(a, b), &d),
            dual_affinity(chart, &TypeSet::dual(b, a), &d)
        );
    }
}

#[test]
fn water_beats_fire() {
    let chart = TypeChart::standard();
    assert_eq!(chart.affinity(Type::Water, Type::Fire).value(), 2.0);
    assert_eq!(chart.affinity(Type::Fire, Type::Water).value(), 0.5);
    assert!((type_ratio(chart, Type::Water, Type::Fire) - 0.8).abs() < 1e-12);
}

#[test]
fn normal_and_ghost_are_mutually_immune() {
    let chart = TypeChart::standard();
    let normal = TypeSet::mono(Type::Normal);
    let ghost = TypeSet::mono(Type::Ghost);
    assert_eq!(dual_affinity(chart, &normal, &ghost), 0.0);
    assert_eq!(dual_affinity(chart, &ghost, &normal), 0.0);
    assert_eq!(matchup_ratio(chart, &normal, &ghost), 0.5);
}

#[test]
fn dual_attacker_picks_its_better_type() {
    let chart = TypeChart::standard();
    // electric cannot touch ground; water hits ground/rock for 4x
    let attacker = TypeSet::dual(Type::Electric, Type::Water);
    let defender = TypeSet::dual(Type::Ground, Type::Rock);
    assert_eq!(dual_affinity(chart, &attacker, &defender), 4.0);
}

#[test]
fn there_are_171_distinct_type_sets() {
    let sets: Vec<TypeSet> = TypeSet::all().collect();
    assert_eq!(sets.len(), 171);
    let unique: std::collections::HashSet<TypeSet> = sets.iter().copied().collect();
    assert_eq!(unique.len(), 171);
}
