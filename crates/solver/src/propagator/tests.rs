use super::*;
use crate::{
    tests::{
        example_dataset,
        itemset_cover,
    },
    CoverStrategy,
};
use bounded::Index as _;

/// Every fresh cover strategy followed by the incremental propagator.
fn variants(base: MinerConfig) -> Vec<MinerConfig> {
    let mut variants = [CoverStrategy::Direct, CoverStrategy::Stacked, CoverStrategy::Full]
        .map(|strategy| {
            base.clone()
                .with_propagation(Propagation::Fresh)
                .with_cover_strategy(strategy)
        })
        .to_vec();
    variants.push(base.with_propagation(Propagation::Incremental));
    variants
}

/// Propagates the node reached by the given decisions.
fn propagate_after(
    dataset: &Dataset,
    history: &History,
    config: &MinerConfig,
    decisions: &[(usize, Value)],
) -> (Result<Extensions, Fail>, Assignment) {
    let mut assignment = Assignment::new(dataset.len_items());
    let mut propagator = build(config, dataset, &mut assignment);
    assignment.bump_decision_level();
    for &(index, value) in decisions {
        assignment.assign(Item::from_index(index), value).unwrap();
    }
    let context = Context { dataset, history };
    let result = propagator.propagate(&context, &mut assignment);
    (result, assignment)
}

fn value_of(assignment: &Assignment, index: usize) -> Value {
    assignment.get(Item::from_index(index))
}

fn free_indices(extensions: &Extensions) -> Vec<usize> {
    extensions
        .free_items()
        .map(|item| item.into_index())
        .collect()
}

fn fail_reason(result: Result<Extensions, Fail>) -> FailReason {
    result.unwrap_err().reason()
}

#[test]
fn full_extensions_are_forced_in() {
    let dataset = Dataset::parse("1 2\n1 2\n1 3\n").unwrap();
    let history = History::default();
    for config in variants(MinerConfig::closed_patterns(1)) {
        let (result, assignment) = propagate_after(&dataset, &history, &config, &[(1, Value::In)]);
        let extensions = result.unwrap();
        assert!(extensions.is_leaf());
        assert_eq!(extensions.cover().count_ones(), 2);
        assert_eq!(value_of(&assignment, 0), Value::In);
        assert_eq!(value_of(&assignment, 2), Value::Out);
        assert_eq!(
            assignment
                .included()
                .iter_ones()
                .map(Item::one_based)
                .collect::<Vec<_>>(),
            [1, 2]
        );
    }
}

#[test]
fn root_reports_projections_of_free_items() {
    let dataset = example_dataset();
    let history = History::default();
    for config in variants(MinerConfig::closed_patterns(2)) {
        let (result, _) = propagate_after(&dataset, &history, &config, &[]);
        let extensions = result.unwrap();
        assert_eq!(extensions.cover(), dataset.all_transactions());
        assert_eq!(free_indices(&extensions), [0, 1, 2, 3]);
        for item in dataset.items() {
            assert_eq!(extensions.projection(item), dataset.vertical(item));
        }
    }
}

#[test]
fn infrequent_covers_fail() {
    let dataset = example_dataset();
    let history = History::default();
    let decisions = [(0, Value::In), (2, Value::In)];
    for config in variants(MinerConfig::closed_patterns(2)) {
        let (result, _) = propagate_after(&dataset, &history, &config, &decisions);
        assert_eq!(fail_reason(result), FailReason::Infrequent);
    }
}

#[test]
fn excluded_full_extensions_fail() {
    let dataset = Dataset::parse("1 2\n1 3\n1\n").unwrap();
    let history = History::default();
    for config in variants(MinerConfig::closed_patterns(1)) {
        let (result, _) = propagate_after(&dataset, &history, &config, &[(0, Value::Out)]);
        assert_eq!(fail_reason(result), FailReason::ExcludedExtension);
    }
}

#[test]
fn empty_itemsets_fail() {
    let dataset = Dataset::parse("1\n2\n").unwrap();
    let history = History::default();
    let decisions = [(0, Value::Out), (1, Value::Out)];
    for config in variants(MinerConfig::closed_patterns(1)) {
        let (result, _) = propagate_after(&dataset, &history, &config, &decisions);
        assert_eq!(fail_reason(result), FailReason::EmptyItemset);
    }
}

#[test]
fn strong_consistency_forces_out_dominated_items() {
    let dataset = Dataset::parse("1 2\n1 2\n1\n3\n").unwrap();
    let history = History::default();
    let decisions = [(0, Value::Out)];
    for config in variants(MinerConfig::closed_patterns(1)) {
        let (result, assignment) = propagate_after(&dataset, &history, &config, &decisions);
        assert_eq!(free_indices(&result.unwrap()), [2]);
        assert_eq!(value_of(&assignment, 1), Value::Out);
    }
    let weak = MinerConfig::closed_patterns(1).with_consistency(Consistency::Weak);
    for config in variants(weak) {
        let (result, assignment) = propagate_after(&dataset, &history, &config, &decisions);
        assert_eq!(free_indices(&result.unwrap()), [1, 2]);
        assert_eq!(value_of(&assignment, 1), Value::Free);
    }
}

#[test]
fn similar_projections_are_forced_out() {
    let dataset = example_dataset();
    let history = [itemset_cover(&dataset, &[0])].into_iter().collect::<History>();
    for config in variants(MinerConfig::closed_diversity(2, 0.3)) {
        let (result, assignment) = propagate_after(&dataset, &history, &config, &[]);
        let extensions = result.unwrap();
        assert_eq!(free_indices(&extensions), [1, 2, 3]);
        assert_eq!(value_of(&assignment, 0), Value::Out);
    }
}

#[test]
fn zero_bound_rejects_every_node_once_the_history_is_not_empty() {
    let dataset = example_dataset();
    let history = [itemset_cover(&dataset, &[0])].into_iter().collect::<History>();
    for config in variants(MinerConfig::closed_diversity(2, 0.0)) {
        let (result, _) = propagate_after(&dataset, &history, &config, &[]);
        assert_eq!(fail_reason(result), FailReason::Similarity);
    }
}

#[test]
fn exact_similarity_is_checked_at_leaves_on_request() {
    let dataset = example_dataset();
    let history = [itemset_cover(&dataset, &[2])].into_iter().collect::<History>();
    let decisions = [(3, Value::In)];
    let base = MinerConfig::closed_diversity(2, 0.1);
    for config in variants(base.clone().with_check_exact(true)) {
        let (result, _) = propagate_after(&dataset, &history, &config, &decisions);
        assert_eq!(fail_reason(result), FailReason::ExactSimilarity);
    }
    for config in variants(base) {
        let (result, _) = propagate_after(&dataset, &history, &config, &decisions);
        let extensions = result.unwrap();
        assert!(extensions.is_leaf());
        assert_eq!(extensions.cover(), itemset_cover(&dataset, &[3]).cover());
    }
}

#[test]
fn incremental_state_is_restored_on_backtrack() {
    let dataset = example_dataset();
    let history = History::default();
    let config = MinerConfig::closed_patterns(2);
    let mut assignment = Assignment::new(dataset.len_items());
    let mut propagator = build(&config, &dataset, &mut assignment);
    let context = Context {
        dataset: &dataset,
        history: &history,
    };
    let root = assignment.bump_decision_level();
    let before = propagator.propagate(&context, &mut assignment).unwrap();
    let level = assignment.bump_decision_level();
    assignment.assign(Item::from_index(2), Value::In).unwrap();
    let inner = propagator.propagate(&context, &mut assignment).unwrap();
    assert_eq!(inner.cover(), dataset.vertical(Item::from_index(2)));
    assignment.pop_to_level(level);
    let after = propagator.propagate(&context, &mut assignment).unwrap();
    assert_eq!(after.cover(), before.cover());
    assert_eq!(free_indices(&after), free_indices(&before));
    assignment.pop_to_level(root);
    assert_eq!(assignment.values().len_assigned(), 0);
}
