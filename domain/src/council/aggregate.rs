//! Rank aggregation over Stage 2 results.

use super::label::LabelToModel;
use super::value_objects::{AggregateEntry, StageTwoResult};
use crate::core::model::ModelId;

/// Average each model's position across all parsed rankings.
///
/// Positions are 1-indexed. Labels missing from `label_to_model` are
/// dropped, and models that never received a valid position get no entry.
/// The result is sorted by ascending average (lower is better); ties keep
/// the order in which models were first seen.
pub fn calculate_aggregate_rankings(
    stage2_results: &[StageTwoResult],
    label_to_model: &LabelToModel,
) -> Vec<AggregateEntry> {
    let mut positions: Vec<(ModelId, Vec<usize>)> = Vec::new();

    for ranking in stage2_results {
        for (index, label) in ranking.parsed_ranking.iter().enumerate() {
            let Some(model) = label_to_model.get(label) else {
                continue;
            };
            let position = index + 1;
            match positions.iter_mut().find(|(m, _)| m == model) {
                Some((_, list)) => list.push(position),
                None => positions.push((model.clone(), vec![position])),
            }
        }
    }

    let mut aggregate: Vec<AggregateEntry> = positions
        .into_iter()
        .filter(|(_, list)| !list.is_empty())
        .map(|(model, list)| {
            let sum: usize = list.iter().sum();
            let average = sum as f64 / list.len() as f64;
            AggregateEntry {
                model,
                average_rank: round2(average),
                rankings_count: list.len(),
            }
        })
        .collect();

    // `sort_by` is stable, which preserves first-seen order on ties.
    aggregate.sort_by(|a, b| a.average_rank.total_cmp(&b.average_rank));
    aggregate
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
