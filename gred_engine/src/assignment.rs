//! Minimum-cost assignment over a square cost matrix.
//!
//! [`Assignment::execute`] solves the problem with the Hungarian algorithm
//! in the label/slack formulation (O(m³)). [`Assignment::next_child`] then
//! enumerates next-best assignments that place row 0 on a fresh column, in
//! nondecreasing total cost, by banning the previous row-0 column and
//! re-solving. The working matrix is never reduced in place, so a banned
//! entry stays exactly [`FORBIDDEN`] and callers can detect exhaustion.

/// Finite stand-in for an infinite cost.
///
/// Kept finite so label arithmetic stays exact; every real pair cost is a
/// small nonnegative integer, far below this.
pub const FORBIDDEN: f64 = i32::MAX as f64;

/// Hungarian solver plus next-best enumeration state.
///
/// The solver owns its matrix and mutates it across [`Assignment::next_child`]
/// calls; callers keep a pristine copy to compute true assignment sums.
pub struct Assignment {
    cost_matrix: Vec<Vec<f64>>,
    dim: usize,
    label_by_worker: Vec<f64>,
    label_by_job: Vec<f64>,
    min_slack_worker_by_job: Vec<usize>,
    min_slack_value_by_job: Vec<f64>,
    match_job_by_worker: Vec<Option<usize>>,
    match_worker_by_job: Vec<Option<usize>>,
    parent_worker_by_committed_job: Vec<Option<usize>>,
    committed_workers: Vec<bool>,
}

impl Assignment {
    pub fn new(cost_matrix: Vec<Vec<f64>>) -> Self {
        let dim = cost_matrix.len();
        for row in &cost_matrix {
            assert_eq!(row.len(), dim, "cost matrix must be square");
        }
        Assignment {
            cost_matrix,
            dim,
            label_by_worker: vec![0.0; dim],
            label_by_job: vec![0.0; dim],
            min_slack_worker_by_job: vec![0; dim],
            min_slack_value_by_job: vec![0.0; dim],
            match_job_by_worker: vec![None; dim],
            match_worker_by_job: vec![None; dim],
            parent_worker_by_committed_job: vec![None; dim],
            committed_workers: vec![false; dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Current value of the working matrix at `(row, col)`.
    ///
    /// After [`Assignment::next_child`] has banned columns, this is how the
    /// caller detects that the first element of an assignment is forbidden
    /// and enumeration is exhausted.
    pub fn cost(&self, row: usize, col: usize) -> f64 {
        self.cost_matrix[row][col]
    }

    /// Computes a minimum-cost assignment; `result[w]` is the column
    /// assigned to row `w`.
    pub fn execute(&mut self) -> Vec<usize> {
        self.reset();
        self.compute_initial_feasible_solution();
        self.greedy_match();
        while let Some(worker) = self.fetch_unmatched_worker() {
            self.initialize_phase(worker);
            self.execute_phase();
        }
        self.match_job_by_worker
            .iter()
            .map(|job| job.expect("matching is complete after augmentation"))
            .collect()
    }

    /// Returns the best assignment that places row 0 on a column not yet
    /// produced, in nondecreasing total-cost order. After at most `dim - 1`
    /// calls every column is banned and the returned assignment has a
    /// [`FORBIDDEN`] first element.
    pub fn next_child(&mut self) -> Vec<usize> {
        let banned = self.match_job_by_worker[0].expect("execute() must run before next_child()");
        self.cost_matrix[0][banned] = FORBIDDEN;
        self.execute()
    }

    fn reset(&mut self) {
        self.label_by_worker.fill(0.0);
        self.label_by_job.fill(0.0);
        self.match_job_by_worker.fill(None);
        self.match_worker_by_job.fill(None);
    }

    /// Feasible labels: row minima for workers, then residual column minima
    /// for jobs. Equivalent to the classic row/column reduction but leaves
    /// the matrix untouched.
    fn compute_initial_feasible_solution(&mut self) {
        for w in 0..self.dim {
            let mut min = f64::INFINITY;
            for j in 0..self.dim {
                min = min.min(self.cost_matrix[w][j]);
            }
            self.label_by_worker[w] = min;
        }
        for j in 0..self.dim {
            let mut min = f64::INFINITY;
            for w in 0..self.dim {
                min = min.min(self.cost_matrix[w][j] - self.label_by_worker[w]);
            }
            self.label_by_job[j] = min;
        }
    }

    fn greedy_match(&mut self) {
        for w in 0..self.dim {
            for j in 0..self.dim {
                if self.match_job_by_worker[w].is_none()
                    && self.match_worker_by_job[j].is_none()
                    && self.slack(w, j) == 0.0
                {
                    self.assign(w, j);
                }
            }
        }
    }

    fn fetch_unmatched_worker(&self) -> Option<usize> {
        self.match_job_by_worker.iter().position(Option::is_none)
    }

    fn initialize_phase(&mut self, worker: usize) {
        self.committed_workers.fill(false);
        self.parent_worker_by_committed_job.fill(None);
        self.committed_workers[worker] = true;
        for j in 0..self.dim {
            self.min_slack_value_by_job[j] = self.slack(worker, j);
            self.min_slack_worker_by_job[j] = worker;
        }
    }

    /// Grows the alternating tree until an augmenting path is found, then
    /// flips the matches along it.
    fn execute_phase(&mut self) {
        loop {
            let mut min_slack_job = None;
            let mut min_slack = f64::INFINITY;
            for j in 0..self.dim {
                if self.parent_worker_by_committed_job[j].is_none()
                    && self.min_slack_value_by_job[j] < min_slack
                {
                    min_slack = self.min_slack_value_by_job[j];
                    min_slack_job = Some(j);
                }
            }
            let min_slack_job = min_slack_job.expect("an uncommitted job always remains");
            if min_slack > 0.0 {
                self.update_labeling(min_slack);
            }
            self.parent_worker_by_committed_job[min_slack_job] =
                Some(self.min_slack_worker_by_job[min_slack_job]);

            match self.match_worker_by_job[min_slack_job] {
                None => {
                    let mut committed_job = min_slack_job;
                    loop {
                        let parent_worker = self.parent_worker_by_committed_job[committed_job]
                            .expect("committed jobs have parents");
                        let displaced = self.match_job_by_worker[parent_worker];
                        self.assign(parent_worker, committed_job);
                        match displaced {
                            None => return,
                            Some(job) => committed_job = job,
                        }
                    }
                }
                Some(worker) => {
                    self.committed_workers[worker] = true;
                    for j in 0..self.dim {
                        if self.parent_worker_by_committed_job[j].is_none() {
                            let slack = self.slack(worker, j);
                            if slack < self.min_slack_value_by_job[j] {
                                self.min_slack_value_by_job[j] = slack;
                                self.min_slack_worker_by_job[j] = worker;
                            }
                        }
                    }
                }
            }
        }
    }

    fn update_labeling(&mut self, slack: f64) {
        for w in 0..self.dim {
            if self.committed_workers[w] {
                self.label_by_worker[w] += slack;
            }
        }
        for j in 0..self.dim {
            if self.parent_worker_by_committed_job[j].is_some() {
                self.label_by_job[j] -= slack;
            } else {
                self.min_slack_value_by_job[j] -= slack;
            }
        }
    }

    fn slack(&self, worker: usize, job: usize) -> f64 {
        self.cost_matrix[worker][job] - self.label_by_worker[worker] - self.label_by_job[job]
    }

    fn assign(&mut self, worker: usize, job: usize) {
        self.match_job_by_worker[worker] = Some(job);
        self.match_worker_by_job[job] = Some(worker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn total(matrix: &[Vec<f64>], assignments: &[usize]) -> f64 {
        assignments
            .iter()
            .enumerate()
            .map(|(row, &col)| matrix[row][col])
            .sum()
    }

    fn brute_force_minimum(matrix: &[Vec<f64>]) -> f64 {
        fn permute(remaining: &mut Vec<usize>, chosen: &mut Vec<usize>, matrix: &[Vec<f64>], best: &mut f64) {
            if remaining.is_empty() {
                *best = best.min(total(matrix, chosen));
                return;
            }
            for i in 0..remaining.len() {
                let col = remaining.remove(i);
                chosen.push(col);
                permute(remaining, chosen, matrix, best);
                chosen.pop();
                remaining.insert(i, col);
            }
        }
        let mut remaining: Vec<usize> = (0..matrix.len()).collect();
        let mut best = f64::INFINITY;
        permute(&mut remaining, &mut Vec::new(), matrix, &mut best);
        best
    }

    #[test]
    fn solves_known_matrix() {
        let matrix = vec![
            vec![4.0, 1.0, 3.0],
            vec![2.0, 0.0, 5.0],
            vec![3.0, 2.0, 2.0],
        ];
        let mut solver = Assignment::new(matrix.clone());
        let assignments = solver.execute();
        assert_eq!(total(&matrix, &assignments), 5.0);
    }

    #[test]
    fn matches_brute_force_on_random_matrices() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..50 {
            let dim = rng.gen_range(1..=5);
            let matrix: Vec<Vec<f64>> = (0..dim)
                .map(|_| (0..dim).map(|_| rng.gen_range(0..20) as f64).collect())
                .collect();
            let mut solver = Assignment::new(matrix.clone());
            let assignments = solver.execute();
            assert_eq!(
                total(&matrix, &assignments),
                brute_force_minimum(&matrix),
                "matrix: {matrix:?}"
            );
        }
    }

    #[test]
    fn avoids_forbidden_entries_when_possible() {
        let matrix = vec![
            vec![FORBIDDEN, 1.0, FORBIDDEN],
            vec![2.0, FORBIDDEN, 9.0],
            vec![FORBIDDEN, FORBIDDEN, 3.0],
        ];
        let mut solver = Assignment::new(matrix.clone());
        let assignments = solver.execute();
        assert_eq!(assignments, vec![1, 0, 2]);
    }

    #[test]
    fn next_child_is_monotone_and_exhausts() {
        let pristine = vec![
            vec![1.0, 2.0, 6.0, 8.0],
            vec![3.0, 1.0, 4.0, 9.0],
            vec![5.0, 2.0, 1.0, 7.0],
            vec![4.0, 6.0, 3.0, 1.0],
        ];
        let mut solver = Assignment::new(pristine.clone());
        let mut assignments = solver.execute();
        let mut seen_columns = vec![assignments[0]];
        let mut previous = total(&pristine, &assignments);

        for _ in 1..pristine.len() {
            assignments = solver.next_child();
            if solver.cost(0, assignments[0]) >= FORBIDDEN {
                break;
            }
            let sum = total(&pristine, &assignments);
            assert!(sum >= previous, "sibling sums must be nondecreasing");
            assert!(
                !seen_columns.contains(&assignments[0]),
                "row 0 must take a fresh column"
            );
            seen_columns.push(assignments[0]);
            previous = sum;
        }

        // all columns produced, one more call must report exhaustion
        assert_eq!(seen_columns.len(), pristine.len());
        let assignments = solver.next_child();
        assert!(solver.cost(0, assignments[0]) >= FORBIDDEN);
    }
}
