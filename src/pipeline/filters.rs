// src/pipeline/filters.rs

//! Filter engine.
//!
//! Two passes in a fixed order: a batch-level pass that drops whole batches,
//! then a record-level pass over the survivors. Rules evaluate in insertion
//! order. At batch level the first matching rule drops the batch and stops
//! evaluation; at record level `date before` stops immediately while
//! `date after` marks the record and keeps scanning the remaining rules.
//! That asymmetry is inherited behavior and is preserved deliberately.
//!
//! `activity` rules are a documented no-op at both levels: the naive mode
//! comparison removed every single activity, so they are skipped until the
//! mode semantics are settled.

use log::info;

use crate::error::Result;
use crate::models::{ActivityBatch, ActivityRecord, DateOperator, Filter};
use crate::utils::time::parse_period;

/// Apply batch-level then record-level rules, flattening the survivors into
/// one sequence. Batch boundaries are discarded.
pub fn filter_activities(
    batches: Vec<ActivityBatch>,
    filters: &[Filter],
) -> Result<Vec<ActivityRecord>> {
    info!("Applying filters to batches...");
    let surviving: Vec<ActivityBatch> = batches
        .into_iter()
        .filter(|batch| !batch_removed(batch, filters))
        .collect();

    info!("Applying filters to single activities...");
    let mut results = Vec::new();
    for batch in surviving {
        for record in batch.data {
            if !record_removed(&record, filters)? {
                results.push(record);
            }
        }
    }

    info!("Done applying filters.");
    Ok(results)
}

/// Sort records ascending by their normalized timestamp.
pub fn sort_by_period(records: Vec<ActivityRecord>) -> Result<Vec<ActivityRecord>> {
    let mut keyed = records
        .into_iter()
        .map(|record| Ok((parse_period(&record.period)?, record)))
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by_key(|(timestamp, _)| *timestamp);
    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

fn batch_removed(batch: &ActivityBatch, filters: &[Filter]) -> bool {
    for filter in filters {
        match filter {
            Filter::Character { operator, value } => {
                if operator.removes_on_membership(value.contains(batch.character)) {
                    return true;
                }
            }
            Filter::Date { operator, value } => match operator {
                // batch starts after the cutoff
                DateOperator::Before => {
                    if batch.from > *value {
                        return true;
                    }
                }
                // batch ends before the cutoff
                DateOperator::After => {
                    if batch.to < *value {
                        return true;
                    }
                }
            },
            // activity rules never apply at batch level
            Filter::Activity { .. } => {}
        }
    }
    false
}

fn record_removed(record: &ActivityRecord, filters: &[Filter]) -> Result<bool> {
    let mut removed = false;

    for filter in filters {
        match filter {
            Filter::Date { operator, value } => {
                let timestamp = parse_period(&record.period)?;
                match operator {
                    DateOperator::Before => {
                        if timestamp > *value {
                            // stops rule evaluation for this record
                            return Ok(true);
                        }
                    }
                    DateOperator::After => {
                        if timestamp < *value {
                            // marks the record but keeps scanning
                            removed = true;
                        }
                    }
                }
            }
            // disabled, see module docs
            Filter::Activity { .. } => {}
            // character rules only apply at batch level
            Filter::Character { .. } => {}
        }
    }

    Ok(removed)
}
