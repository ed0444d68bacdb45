//! A* branch-and-bound over partial mappings.
//!
//! Best-first search in the style of AStar-BMao (Chang et al.,
//! "Accelerating Graph Similarity Search via Efficient GED Computation"),
//! adapted to directed graphs. Each search node commits the image of one
//! more source vertex, in a fixed source order; a Hungarian assignment over
//! the remaining vertices yields both an admissible bound for the node and
//! a full completion to probe against the incumbent. The next-best
//! assignments become the node's siblings, produced eagerly into a stream
//! but consumed one at a time to keep the queue small.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::rc::Rc;

use gred_common::{
    DiffError, EditOperation, Mapping, OptimalEdit, PossibleMappings, RunningCheck, SchemaGraph,
    VertexId,
};
use tracing::{debug, info, trace};

use crate::assignment::{Assignment, FORBIDDEN};
use crate::editorial::editorial_cost_for_mapping;
use crate::estimator::{IsolatedCostCache, LowerBoundEstimator};

/// FIFO of pending siblings, shared by every entry of one parent expansion.
/// A `None` element marks the end of the stream.
type SiblingStream = Rc<RefCell<VecDeque<Option<MappingEntry>>>>;

/// One node of the search tree: a partial mapping plus the bookkeeping
/// needed to lazily hand out its next-best siblings.
struct MappingEntry {
    partial_mapping: Mapping,
    /// Equals `partial_mapping.size()`.
    level: usize,
    lower_bound_cost: f64,
    siblings_finished: bool,
    siblings: Option<SiblingStream>,
    /// Hungarian result that produced this entry; row 0 decided this
    /// entry's own pair, the rest reconstruct the probed completion.
    assignments: Vec<usize>,
    /// Snapshot of the candidate targets at the parent expansion.
    available_targets: Rc<Vec<VertexId>>,
}

/// Priority wrapper: lowest bound first, deeper level on ties. Reaching
/// goal states earlier tightens the incumbent and prunes more.
struct QueuedEntry(MappingEntry);

impl PartialEq for QueuedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedEntry {}

impl PartialOrd for QueuedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .lower_bound_cost
            .total_cmp(&self.0.lower_bound_cost)
            .then_with(|| self.0.level.cmp(&other.0.level))
    }
}

/// The search engine. Graphs, oracle and running check are borrowed
/// read-only; all mutable state lives in the queue and the streams.
pub struct DiffSearch<'g> {
    source: &'g SchemaGraph,
    target: &'g SchemaGraph,
    possible: &'g PossibleMappings,
    check: &'g RunningCheck,
}

impl<'g> DiffSearch<'g> {
    pub fn new(
        source: &'g SchemaGraph,
        target: &'g SchemaGraph,
        possible: &'g PossibleMappings,
        check: &'g RunningCheck,
    ) -> Self {
        DiffSearch {
            source,
            target,
            possible,
            check,
        }
    }

    /// Finds the minimum-cost total mapping extending `start_mapping`.
    ///
    /// `start_mapping` fixes a prefix of `all_sources`; the remaining
    /// source vertices are decided in `all_sources` order. Both orders must
    /// have the padded graph size.
    pub fn diff_impl(
        &self,
        start_mapping: Mapping,
        all_sources: &[VertexId],
        all_targets: &[VertexId],
    ) -> Result<OptimalEdit, DiffError> {
        let graph_size = all_sources.len();
        if all_targets.len() != graph_size {
            return Err(DiffError::invariant(
                "source and target orders differ in length",
            ));
        }

        let level = start_mapping.size();
        let mut start_edits = Vec::new();
        let mapping_cost =
            editorial_cost_for_mapping(&start_mapping, self.source, self.target, &mut start_edits);

        info!(
            "starting diff search: {} vertices, start level {}",
            graph_size, level
        );

        let mut optimal = OptimalEdit::new();
        if level == graph_size {
            // the start mapping is already total
            optimal.ged = mapping_cost;
            optimal.edits = start_edits;
            optimal.mapping = start_mapping;
            return Ok(optimal);
        }

        let mut all_non_fixed_targets: Vec<VertexId> = all_targets.to_vec();
        {
            let mut fixed: HashSet<VertexId> = HashSet::new();
            start_mapping.for_each_target(|t| {
                fixed.insert(t);
            });
            all_non_fixed_targets.retain(|t| !fixed.contains(t));
        }

        let mut queue: BinaryHeap<QueuedEntry> = BinaryHeap::new();
        queue.push(QueuedEntry(MappingEntry {
            partial_mapping: start_mapping,
            level,
            lower_bound_cost: mapping_cost as f64,
            siblings_finished: true,
            siblings: None,
            assignments: Vec::new(),
            available_targets: Rc::new(Vec::new()),
        }));

        let mut expanded = 0usize;
        while let Some(QueuedEntry(mut entry)) = queue.pop() {
            expanded += 1;
            trace!(
                "expanding entry at level {} with bound {}",
                entry.level,
                entry.lower_bound_cost
            );
            if entry.lower_bound_cost >= optimal.ged as f64 {
                continue;
            }
            if entry.level > 0 && !entry.siblings_finished {
                self.add_sibling_to_queue(
                    &mut entry,
                    &mut queue,
                    &mut optimal,
                    all_sources,
                    graph_size,
                )?;
            }
            if entry.level < graph_size {
                self.add_child_to_queue(
                    &entry,
                    &mut queue,
                    &mut optimal,
                    all_sources,
                    all_targets,
                    &all_non_fixed_targets,
                )?;
            }
            self.check.check()?;
        }

        info!(
            "diff search complete: ged {}, {} entries expanded",
            optimal.ged, expanded
        );
        Ok(optimal)
    }

    /// Expands `parent` one level down: computes the cost matrix over the
    /// unmapped vertices, queues the best child, probes its full completion
    /// and fills the sibling stream with the surviving next-best children.
    fn add_child_to_queue(
        &self,
        parent: &MappingEntry,
        queue: &mut BinaryHeap<QueuedEntry>,
        optimal: &mut OptimalEdit,
        all_sources: &[VertexId],
        all_targets: &[VertexId],
        all_non_fixed_targets: &[VertexId],
    ) -> Result<(), DiffError> {
        let partial = &parent.partial_mapping;
        let level = parent.level;
        if level != partial.size() {
            return Err(DiffError::invariant(
                "entry level out of sync with its mapping",
            ));
        }

        let mut committed: HashSet<VertexId> = HashSet::new();
        partial.for_each_non_fixed_target(|t| {
            committed.insert(t);
        });
        let available_targets: Vec<VertexId> = all_non_fixed_targets
            .iter()
            .copied()
            .filter(|t| !committed.contains(t))
            .collect();
        if available_targets.len() + partial.size() != all_targets.len() {
            return Err(DiffError::invariant("available target count out of sync"));
        }

        let v_i = all_sources[level];
        let matrix_size = all_sources.len() - level;
        debug_assert_eq!(matrix_size, available_targets.len());

        // the Hungarian driver mutates its copy; this one stays pristine
        // for computing true assignment sums
        let estimator = LowerBoundEstimator::new(self.source, self.target, self.possible);
        let mut cache = IsolatedCostCache::default();
        let mut cost_matrix = vec![vec![0.0; matrix_size]; matrix_size];
        for i in level..all_sources.len() {
            let v = all_sources[i];
            for (j, &u) in available_targets.iter().enumerate() {
                cost_matrix[i - level][j] = estimator.mapping_cost(v, u, partial, &mut cache);
            }
            self.check.check()?;
        }

        let mut hungarian = Assignment::new(cost_matrix.clone());
        let assignments = hungarian.execute();
        let editorial_cost =
            editorial_cost_for_mapping(partial, self.source, self.target, &mut Vec::new());
        let lower_bound = editorial_cost as f64 + matrix_sum(&cost_matrix, &assignments);
        if lower_bound >= optimal.ged as f64 {
            return Ok(());
        }

        let available_targets = Rc::new(available_targets);
        let best_extension_target = available_targets[assignments[0]];
        let siblings: SiblingStream = Rc::new(RefCell::new(VecDeque::new()));
        trace!(
            "pushing child {} -> {} at level {} with bound {}",
            v_i,
            best_extension_target,
            level + 1,
            lower_bound
        );
        queue.push(QueuedEntry(MappingEntry {
            partial_mapping: partial.extend(v_i, best_extension_target),
            level: level + 1,
            lower_bound_cost: lower_bound,
            siblings_finished: false,
            siblings: Some(Rc::clone(&siblings)),
            assignments: assignments.clone(),
            available_targets: Rc::clone(&available_targets),
        }));

        // the assignment also suggests a full completion; probe it
        let mut full_mapping = partial.clone();
        for (i, &assigned) in assignments.iter().enumerate() {
            full_mapping.add(all_sources[level + i], available_targets[assigned]);
        }
        let mut edits = Vec::new();
        let full_cost =
            editorial_cost_for_mapping(&full_mapping, self.source, self.target, &mut edits);
        if full_cost < optimal.ged {
            update_optimal(optimal, full_cost, full_mapping, edits);
        }

        self.calculate_rest_of_children(
            &available_targets,
            &mut hungarian,
            &cost_matrix,
            editorial_cost,
            partial,
            v_i,
            optimal.ged,
            level + 1,
            &siblings,
        )
    }

    /// Generates the remaining children of one expansion into the sibling
    /// stream. Siblings arrive in nondecreasing bound order, so the first
    /// one at or above the upper bound ends the enumeration; so does a
    /// forbidden first element, which means row 0 has no fresh column left.
    #[allow(clippy::too_many_arguments)]
    fn calculate_rest_of_children(
        &self,
        available_targets: &Rc<Vec<VertexId>>,
        hungarian: &mut Assignment,
        pristine_matrix: &[Vec<f64>],
        editorial_cost: usize,
        partial: &Mapping,
        v_i: VertexId,
        upper_bound: usize,
        level: usize,
        siblings: &SiblingStream,
    ) -> Result<(), DiffError> {
        // starting from 1: the first child is already queued
        for _ in 1..available_targets.len() {
            let assignments = hungarian.next_child();
            if hungarian.cost(0, assignments[0]) >= FORBIDDEN {
                break;
            }
            let lower_bound = editorial_cost as f64 + matrix_sum(pristine_matrix, &assignments);
            if lower_bound >= upper_bound as f64 {
                break;
            }
            let sibling_target = available_targets[assignments[0]];
            siblings.borrow_mut().push_back(Some(MappingEntry {
                partial_mapping: partial.extend(v_i, sibling_target),
                level,
                lower_bound_cost: lower_bound,
                siblings_finished: false,
                siblings: Some(Rc::clone(siblings)),
                assignments,
                available_targets: Rc::clone(available_targets),
            }));
            self.check.check()?;
        }
        siblings.borrow_mut().push_back(None);
        Ok(())
    }

    /// Pulls one sibling from `entry`'s stream. A real sibling that still
    /// beats the incumbent is queued and its full completion probed; the
    /// end marker flips `siblings_finished` instead.
    fn add_sibling_to_queue(
        &self,
        entry: &mut MappingEntry,
        queue: &mut BinaryHeap<QueuedEntry>,
        optimal: &mut OptimalEdit,
        all_sources: &[VertexId],
        graph_size: usize,
    ) -> Result<(), DiffError> {
        let stream = match &entry.siblings {
            Some(stream) => Rc::clone(stream),
            None => {
                return Err(DiffError::invariant(
                    "entry expects siblings but has no stream",
                ))
            }
        };
        let slot = stream.borrow_mut().pop_front();
        let Some(slot) = slot else {
            return Err(DiffError::invariant(
                "sibling stream drained past its end marker",
            ));
        };
        let Some(sibling) = slot else {
            entry.siblings_finished = true;
            return Ok(());
        };

        if sibling.lower_bound_cost < optimal.ged as f64 {
            // reconstruct the completion from the parent prefix, which is
            // the sibling's mapping minus its last element
            let mut full_mapping = sibling.partial_mapping.remove_last_element();
            for (i, &assigned) in sibling.assignments.iter().enumerate() {
                full_mapping.add(
                    all_sources[sibling.level - 1 + i],
                    sibling.available_targets[assigned],
                );
            }
            if full_mapping.size() != graph_size {
                return Err(DiffError::invariant("sibling completion is not total"));
            }
            let mut edits = Vec::new();
            let full_cost =
                editorial_cost_for_mapping(&full_mapping, self.source, self.target, &mut edits);
            if full_cost < optimal.ged {
                update_optimal(optimal, full_cost, full_mapping, edits);
            }
            queue.push(QueuedEntry(sibling));
        }
        Ok(())
    }
}

fn update_optimal(
    optimal: &mut OptimalEdit,
    ged: usize,
    mapping: Mapping,
    edits: Vec<EditOperation>,
) {
    debug_assert!(ged < optimal.ged);
    debug!("improved ged to {}", ged);
    optimal.ged = ged;
    optimal.mapping = mapping;
    optimal.edits = edits;
}

fn matrix_sum(matrix: &[Vec<f64>], assignments: &[usize]) -> f64 {
    assignments
        .iter()
        .enumerate()
        .map(|(row, &col)| matrix[row][col])
        .sum()
}
