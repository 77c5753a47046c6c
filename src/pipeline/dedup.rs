//! Identity-based deduplication of raw alert batches.

use std::collections::HashSet;

use crate::models::{Alert, AlertIdentity};

/// Returns the alerts from `batch` whose identity is not in `known`,
/// preserving the batch's original order.
///
/// Two alerts are the same event iff their `(timestamp, subject)` pair is
/// equal; timestamp alone is not sufficient when concurrent detections
/// share a truncated timestamp value. Duplicate identities within the
/// batch itself are collapsed to the first occurrence.
pub fn filter_new(batch: &[Alert], known: &HashSet<AlertIdentity>) -> Vec<Alert> {
    let mut seen_in_batch: HashSet<AlertIdentity> = HashSet::new();
    batch
        .iter()
        .filter(|alert| {
            let identity = alert.identity();
            !known.contains(&identity) && seen_in_batch.insert(identity)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::AlertBuilder;

    #[test]
    fn test_filter_new_excludes_known_identities() {
        let a = AlertBuilder::new().subject("A").timestamp_secs(1).build();
        let b = AlertBuilder::new().subject("B").timestamp_secs(2).build();
        let known: HashSet<_> = [a.identity()].into();

        let new = filter_new(&[b.clone(), a], &known);
        assert_eq!(new, vec![b]);
    }

    #[test]
    fn test_filter_new_preserves_batch_order() {
        let batch = vec![
            AlertBuilder::new().subject("C").timestamp_secs(3).build(),
            AlertBuilder::new().subject("A").timestamp_secs(1).build(),
            AlertBuilder::new().subject("B").timestamp_secs(2).build(),
        ];
        let new = filter_new(&batch, &HashSet::new());
        assert_eq!(new, batch);
    }

    #[test]
    fn test_filter_new_keeps_same_timestamp_different_subject() {
        let a = AlertBuilder::new().subject("alice").timestamp_secs(7).build();
        let b = AlertBuilder::new().subject("bob").timestamp_secs(7).build();
        let known: HashSet<_> = [a.identity()].into();

        let new = filter_new(&[a, b.clone()], &known);
        assert_eq!(new, vec![b]);
    }

    #[test]
    fn test_filter_new_collapses_in_batch_duplicates() {
        let a = AlertBuilder::new().subject("A").timestamp_secs(1).build();
        let new = filter_new(&[a.clone(), a.clone()], &HashSet::new());
        assert_eq!(new, vec![a]);
    }
}
