//! Lineage traversal.
//!
//! Breadth-first, level-by-level expansion of the dependency graph from a
//! focal report, in both directions. The traversal is an explicit fold
//! over (visited, frontier, levels) so concurrent traversals share no
//! mutable state, and the visited set doubles as cycle protection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use vigia_core::{
    Direction, EntityType, FocalReport, LineageOptions, NeighborSummary, ReportId, ReportSummary,
    StoreError, VigiaError, VigiaResult,
};
use vigia_storage::ReportStore;

/// Full lineage view of a focal report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageTree {
    pub focal: FocalReport,
    /// Upstream levels ordered farthest-first: the last entry is the
    /// focal report's direct origins.
    pub upstream_levels: Vec<Vec<NeighborSummary>>,
    /// Downstream levels in discovery order: direct dependents first.
    pub downstream_levels: Vec<Vec<NeighborSummary>>,
    pub total_upstream: usize,
    pub total_downstream: usize,
}

/// Read-only traversal engine over a report store.
pub struct LineageEngine<'a> {
    store: &'a dyn ReportStore,
}

impl<'a> LineageEngine<'a> {
    pub fn new(store: &'a dyn ReportStore) -> Self {
        Self { store }
    }

    /// Build the two-direction lineage view for a focal report.
    ///
    /// Fails `NotFound` when the focal report is absent. Any store
    /// failure aborts the whole traversal; partial trees are never
    /// returned.
    pub fn build_lineage(
        &self,
        focal_id: ReportId,
        options: &LineageOptions,
    ) -> VigiaResult<LineageTree> {
        let report = self.store.report_get(focal_id)?.ok_or(VigiaError::Store(
            StoreError::NotFound {
                entity_type: EntityType::Report,
                id: focal_id,
            },
        ))?;

        let frequency = self.store.schedule_get(focal_id)?.map(|s| s.frequency);
        let dependency_count = self.store.edge_count(focal_id, Direction::Upstream)?;
        let dependent_count = self.store.edge_count(focal_id, Direction::Downstream)?;

        let mut upstream_levels = self.levels(focal_id, Direction::Upstream, options.max_levels)?;
        // Present origins farthest-first so the focal report reads as the
        // end of its production chain.
        upstream_levels.reverse();
        let downstream_levels =
            self.levels(focal_id, Direction::Downstream, options.max_levels)?;

        let total_upstream = upstream_levels.iter().map(Vec::len).sum();
        let total_downstream = downstream_levels.iter().map(Vec::len).sum();

        tracing::debug!(
            focal = %report.code,
            upstream_levels = upstream_levels.len(),
            downstream_levels = downstream_levels.len(),
            total_upstream,
            total_downstream,
            "lineage built"
        );

        Ok(LineageTree {
            focal: FocalReport {
                external_recipient: report.external_recipient.clone(),
                report: ReportSummary::of(&report),
                frequency,
                dependency_count,
                dependent_count,
            },
            upstream_levels,
            downstream_levels,
            total_upstream,
            total_downstream,
        })
    }

    /// Expand one direction level by level, up to `max_levels`.
    ///
    /// The focal report is seeded into the visited set, so it can never
    /// appear in any level even when the edge set contains a cycle back
    /// to it.
    pub fn levels(
        &self,
        focal_id: ReportId,
        direction: Direction,
        max_levels: usize,
    ) -> VigiaResult<Vec<Vec<NeighborSummary>>> {
        let mut visited: BTreeSet<ReportId> = BTreeSet::from([focal_id]);
        let mut frontier: BTreeSet<ReportId> = BTreeSet::from([focal_id]);
        let mut levels: Vec<Vec<NeighborSummary>> = Vec::new();

        for _ in 0..max_levels {
            let rows = self.store.neighbors_of(&frontier, direction, &visited)?;
            if rows.is_empty() {
                break;
            }
            frontier = rows.iter().map(NeighborSummary::report_id).collect();
            visited.extend(frontier.iter().copied());
            levels.push(rows);
        }

        Ok(levels)
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use vigia_core::{
        DependencyCriticality, DependencyEdge, DependencyKind, Report, ReportCriticality,
        ReportState,
    };
    use vigia_storage::MemoryStore;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Over random edge sets the traversal terminates within the level
        /// bound and never places an id in two levels.
        #[test]
        fn prop_no_duplicates_across_levels(
            n in 2usize..10,
            edges in proptest::collection::vec((0usize..10, 0usize..10), 0..40),
            max_levels in 1usize..12,
        ) {
            let store = MemoryStore::new();
            let reports: Vec<Report> = (0..n)
                .map(|i| {
                    let mut r = Report::new(
                        format!("R{i}"),
                        format!("Report {i}"),
                        "Type",
                        ReportCriticality::Medium,
                        "gen",
                    );
                    r.state = ReportState::Approved;
                    r
                })
                .collect();
            for r in &reports {
                store.report_insert(r).unwrap();
            }
            for (from, to) in edges {
                let (from, to) = (from % n, to % n);
                if from == to {
                    continue;
                }
                let edge = DependencyEdge::new(
                    reports[from].report_id,
                    reports[to].report_id,
                    DependencyKind::Data,
                    DependencyCriticality::Medium,
                    "gen",
                );
                // duplicates of the same pair are expected here
                let _ = store.edge_insert(&edge);
            }

            let engine = LineageEngine::new(&store);
            let levels = engine
                .levels(reports[0].report_id, Direction::Upstream, max_levels)
                .unwrap();

            prop_assert!(levels.len() <= max_levels);

            let mut seen = std::collections::BTreeSet::new();
            seen.insert(reports[0].report_id);
            for level in &levels {
                for row in level {
                    prop_assert!(seen.insert(row.report_id()));
                }
            }
        }
    }
}
