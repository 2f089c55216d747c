// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Constraint-propagation branch-and-bound for aircraft landing scheduling.
//!
//! `CpSolver` owns the reusable search structures: the trail that undoes
//! state changes, the stack of untried alternatives and the scratch space
//! for completions. A solve runs a search session that explores the tree
//! depth-first. Each node applies one decision, propagates separations to a
//! fixpoint and then either branches further, is closed by its lower bound,
//! or yields a completion that may replace the incumbent.
//!
//! Nodes branch on runways first, then on the order of co-runway pairs.
//! A fully sequenced node whose completion costs more than its lower bound
//! splits one landing-time interval, so every integer landing time remains
//! reachable and an exhausted search proves optimality.

use crate::{
    bound::lower_bound,
    branching::{
        decision::Decision,
        strategy::{Alternatives, SearchStrategy, select_split_aircraft},
    },
    completion::CompletionBuilder,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    propagate::propagate,
    result::CpSolverOutcome,
    stack::SearchStack,
    state::SearchState,
    stats::CpSearchStatistics,
    trail::SearchTrail,
};
use landing_model::{
    evaluate::SolutionEvaluator, index::AircraftIndex, model::Model, schedule::Schedule,
};
use landing_search::{command::SearchCommand, num::SolverNumeric, result::TerminationReason};

/// A reusable constraint search engine.
#[derive(Debug)]
pub struct CpSolver<T> {
    trail: SearchTrail<T>,
    stack: SearchStack<T>,
    completion: CompletionBuilder<T>,
}

impl<T> Default for CpSolver<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CpSolver<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
            completion: CompletionBuilder::new(),
        }
    }

    /// Creates a solver with storage sized for `num_aircraft` aircraft on
    /// `num_runways` runways.
    ///
    /// Every solve grows the storage as needed, so this only moves the
    /// allocations to construction time.
    #[inline]
    pub fn preallocated(num_runways: usize, num_aircraft: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_aircraft),
            stack: SearchStack::preallocated(num_runways, num_aircraft),
            completion: CompletionBuilder::new(),
        }
    }

    /// Returns the memory held by the trail and the stack.
    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.trail.allocated_memory_bytes() + self.stack.allocated_memory_bytes()
    }

    /// Searches `model` for a minimum-cost schedule.
    ///
    /// The search runs until optimality or infeasibility is proven, or until
    /// `monitor` answers anything other than `Continue`.
    pub fn solve<S>(
        &mut self,
        model: &Model<T>,
        strategy: SearchStrategy,
        mut monitor: S,
    ) -> CpSolverOutcome<T>
    where
        S: TreeSearchMonitor<T>,
    {
        self.solve_internal(model, strategy, &mut monitor, None)
    }

    /// Like `solve`, but starts from `initial` as the incumbent.
    ///
    /// `initial` is checked with the `SolutionEvaluator` first; an infeasible
    /// schedule is ignored and the search starts without an incumbent. A
    /// feasible one bounds the search from the first node, so subtrees that
    /// cannot beat it are pruned. It is returned unchanged if nothing better
    /// exists.
    pub fn solve_with_incumbent<S>(
        &mut self,
        model: &Model<T>,
        strategy: SearchStrategy,
        mut monitor: S,
        initial: &Schedule<T>,
    ) -> CpSolverOutcome<T>
    where
        S: TreeSearchMonitor<T>,
    {
        let evaluation = SolutionEvaluator::new(model).evaluate(initial);
        let seed = evaluation
            .is_feasible()
            .then(|| (initial.clone(), evaluation.objective()));
        self.solve_internal(model, strategy, &mut monitor, seed)
    }

    fn solve_internal<S>(
        &mut self,
        model: &Model<T>,
        strategy: SearchStrategy,
        monitor: &mut S,
        incumbent: Option<(Schedule<T>, T)>,
    ) -> CpSolverOutcome<T>
    where
        S: TreeSearchMonitor<T>,
    {
        let session = CpSearchSession::new(self, model, strategy, monitor, incumbent);
        let outcome = session.run();
        self.reset();
        outcome
    }

    /// Clears the logical state of the trail and stack, keeping their capacity.
    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
    }
}

/// The state of a single search run.
struct CpSearchSession<'a, T, S>
where
    T: SolverNumeric,
{
    solver: &'a mut CpSolver<T>,
    model: &'a Model<T>,
    evaluator: SolutionEvaluator<'a, T>,
    strategy: SearchStrategy,
    monitor: &'a mut S,
    state: SearchState<T>,
    incumbent: Option<(Schedule<T>, T)>,
    pending_command: Option<SearchCommand>,
    stats: CpSearchStatistics<T>,
    start_time: std::time::Instant,
}

impl<'a, T, S> CpSearchSession<'a, T, S>
where
    T: SolverNumeric,
{
    #[inline]
    fn best_objective(&self) -> Option<T> {
        self.incumbent.as_ref().map(|&(_, objective)| objective)
    }
}

impl<'a, T, S> std::fmt::Debug for CpSearchSession<'a, T, S>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpSearchSession")
            .field("strategy", &self.strategy)
            .field("state", &self.state)
            .field("best_objective", &self.best_objective())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, T, S> CpSearchSession<'a, T, S>
where
    T: SolverNumeric,
    S: TreeSearchMonitor<T>,
{
    fn new(
        solver: &'a mut CpSolver<T>,
        model: &'a Model<T>,
        strategy: SearchStrategy,
        monitor: &'a mut S,
        incumbent: Option<(Schedule<T>, T)>,
    ) -> Self {
        Self {
            solver,
            model,
            evaluator: SolutionEvaluator::new(model),
            strategy,
            monitor,
            state: SearchState::from_model(model),
            incumbent,
            pending_command: None,
            stats: CpSearchStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> CpSolverOutcome<T> {
        self.monitor.on_enter_search(self.model, &self.stats);

        if !self.initialize() {
            self.stats.set_total_time(self.start_time.elapsed());
            self.monitor.on_exit_search(&self.stats);
            return CpSolverOutcome::infeasible(self.stats);
        }

        let termination_reason = loop {
            self.monitor.on_step(&self.state, &self.stats);

            let command = match self.pending_command.take() {
                Some(command) => command,
                None => self.monitor.search_command(&self.state, &self.stats),
            };
            match command {
                SearchCommand::Continue => {}
                SearchCommand::Terminate(message) => break TerminationReason::Aborted(message),
                SearchCommand::BudgetExhausted(message) => {
                    break TerminationReason::BudgetExhausted(message);
                }
            }

            self.stats.on_step();

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    break if self.incumbent.is_some() {
                        TerminationReason::OptimalityProven
                    } else {
                        TerminationReason::InfeasibilityProven
                    };
                }
                self.backtrack_step();
            } else {
                self.process_next_decision();
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize(termination_reason)
    }

    fn finalize(self, reason: TerminationReason) -> CpSolverOutcome<T> {
        match reason {
            TerminationReason::OptimalityProven => match self.incumbent {
                Some((schedule, objective)) => {
                    CpSolverOutcome::optimal(schedule, objective, self.stats)
                }
                None => CpSolverOutcome::infeasible(self.stats),
            },
            TerminationReason::InfeasibilityProven => CpSolverOutcome::infeasible(self.stats),
            TerminationReason::BudgetExhausted(message) => {
                CpSolverOutcome::budget_exhausted(self.incumbent, message, self.stats)
            }
            TerminationReason::Aborted(message) => {
                CpSolverOutcome::aborted(self.incumbent, message, self.stats)
            }
        }
    }

    /// Builds the root node.
    ///
    /// Returns `false` if root propagation already proves infeasibility.
    fn initialize(&mut self) -> bool {
        let num_aircraft = self.model.num_aircraft();
        self.solver.trail.ensure_capacity(num_aircraft);
        self.solver
            .stack
            .ensure_capacity(self.model.num_runways(), num_aircraft);

        // Root frame. Must exist before any decision is pushed.
        self.solver.trail.push_frame();
        self.solver.stack.push_frame();
        self.stats.on_node_explored();
        self.stats.on_depth_update(1);

        for aircraft in self.model.aircraft() {
            if self.model.num_eligible_runways(aircraft) != 1 {
                continue;
            }
            if let Some(runway) = self.model.eligible_runways(aircraft).next() {
                self.solver
                    .trail
                    .assign_runway(&mut self.state, aircraft, runway);
            }
        }

        if propagate(self.model, &mut self.state, &mut self.solver.trail).is_err() {
            self.stats.on_propagation_failure();
            self.stats.on_pruning_infeasible();
            self.monitor
                .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
            return false;
        }

        let root_bound = lower_bound(self.model, &self.state);
        self.stats.set_root_lower_bound(root_bound);

        let command = self.monitor.search_command(&self.state, &self.stats);
        if !command.is_continue() {
            self.pending_command = Some(command);
            return true;
        }

        self.expand_node(root_bound);
        true
    }

    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);

        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
    }

    fn process_next_decision(&mut self) {
        debug_assert!(
            !self.solver.stack.is_current_level_empty(),
            "called `CpSearchSession::process_next_decision` with empty decision stack"
        );

        if let Some(decision) = self.solver.stack.pop() {
            self.descend(decision);
        }
    }

    /// Applies `decision` in a new level, propagates and expands the node.
    /// Leaves the level again if the node is closed.
    fn descend(&mut self, decision: Decision<T>) {
        self.solver.trail.push_frame();
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats
            .on_depth_update(self.solver.stack.depth() as u64);
        self.monitor.on_descend(&self.state, decision, &self.stats);

        self.apply(decision);

        if propagate(self.model, &mut self.state, &mut self.solver.trail).is_err() {
            self.stats.on_propagation_failure();
            self.stats.on_pruning_infeasible();
            self.monitor
                .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
            self.backtrack_step();
            return;
        }

        let command = self.monitor.search_command(&self.state, &self.stats);
        if !command.is_continue() {
            self.pending_command = Some(command);
            return;
        }

        let bound = lower_bound(self.model, &self.state);
        if !self.expand_node(bound) {
            self.backtrack_step();
        }
    }

    fn apply(&mut self, decision: Decision<T>) {
        let trail = &mut self.solver.trail;
        match decision {
            Decision::AssignRunway { aircraft, runway } => {
                trail.assign_runway(&mut self.state, aircraft, runway);
            }
            Decision::Sequence { leading, trailing } => {
                trail.impose_precedence(&mut self.state, leading, trailing);
            }
            Decision::Restrict {
                aircraft,
                lower,
                upper,
            } => {
                trail.tighten_lower(&mut self.state, aircraft, lower);
                trail.tighten_upper(&mut self.state, aircraft, upper);
            }
        }
    }

    /// Branches the propagated current node.
    ///
    /// Returns `false` if the node was closed without children.
    fn expand_node(&mut self, bound: T) -> bool {
        self.monitor
            .on_lower_bound_computed(&self.state, bound, &self.stats);

        if self.best_objective().is_some_and(|best| bound >= best) {
            self.prune_bound();
            return false;
        }

        let depth = self.solver.stack.depth();
        let alternatives = if let Some(aircraft) = self
            .strategy
            .select_unassigned_aircraft(self.model, &self.state)
        {
            self.strategy
                .runway_alternatives(self.model, &self.state, aircraft, depth)
        } else if let Some((a, b)) = self
            .strategy
            .select_unordered_pair(self.model, &self.state)
        {
            self.strategy
                .sequence_alternatives(self.model, &self.state, a, b, depth)
        } else {
            match self.complete(bound) {
                Some(aircraft) => {
                    self.strategy
                        .restrict_alternatives(self.model, &self.state, aircraft, depth)
                }
                None => return false,
            }
        };

        self.enqueue(alternatives)
    }

    /// Evaluates the completion of a fully sequenced node and offers it as
    /// incumbent.
    ///
    /// Returns the aircraft whose interval to split, or `None` if the node is
    /// closed.
    fn complete(&mut self, bound: T) -> Option<AircraftIndex> {
        let Some(schedule) =
            self.solver
                .completion
                .build(self.model, &self.state, self.strategy.landing_time)
        else {
            return None;
        };

        let evaluation = self.evaluator.evaluate(&schedule);
        if !evaluation.is_feasible() {
            self.stats.on_pruning_infeasible();
            self.monitor
                .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
            return None;
        }

        let cost = evaluation.objective();
        let split = if cost <= bound {
            None
        } else {
            select_split_aircraft(self.model, &self.state, &schedule)
        };

        if self.best_objective().is_none_or(|best| cost < best) {
            self.stats.on_solution_found();
            self.monitor
                .on_solution_found(&schedule, cost, &self.stats);
            self.incumbent = Some((schedule, cost));
        }

        // The completion attains the bound: nothing in this subtree is cheaper.
        let aircraft = split?;
        if self.best_objective().is_some_and(|best| bound >= best) {
            self.prune_bound();
            return None;
        }
        Some(aircraft)
    }

    fn prune_bound(&mut self) {
        self.stats.on_pruning_bound();
        self.monitor
            .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
    }

    /// Pushes `alternatives` so that the first is popped first.
    fn enqueue(&mut self, alternatives: Alternatives<T>) -> bool {
        let count = alternatives.len();
        if count == 0 {
            return false;
        }

        self.solver.stack.extend(alternatives.into_iter().rev());
        self.stats.on_decisions_generated(count);
        self.monitor
            .on_decisions_enqueued(&self.state, count, &self.stats);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        branching::strategy::{BranchingRule, ValueRule},
        completion::LandingTimeRule,
        monitor::{
            no_op::NoOperationMonitor, solution_limit::SolutionLimitMonitor,
            time_limit::TimeLimitMonitor,
        },
    };
    use landing_model::{
        index::{ClassIndex, RunwayIndex},
        model::ModelBuilder,
        schedule::LandingAssignment,
    };
    use landing_search::result::SolveStatus;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;

    type IntegerType = i64;

    fn ai(i: usize) -> AircraftIndex {
        AircraftIndex::new(i)
    }

    fn ri(i: usize) -> RunwayIndex {
        RunwayIndex::new(i)
    }

    /// One separation class; every aircraft has window (E, T, L) and unit penalties.
    fn uniform_model(
        num_runways: usize,
        windows: &[(IntegerType, IntegerType, IntegerType)],
        separation: IntegerType,
    ) -> Model<IntegerType> {
        let mut builder = ModelBuilder::<IntegerType>::new(num_runways, windows.len(), 1);
        for (i, &(e, t, l)) in windows.iter().enumerate() {
            builder.set_landing_window(ai(i), e, t, l);
        }
        builder.set_separation(ClassIndex::new(0), ClassIndex::new(0), separation);
        builder.build().unwrap()
    }

    /// A small instance with two classes and asymmetric separations.
    fn random_model(seed: u64, num_runways: usize, num_aircraft: usize) -> Model<IntegerType> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut builder = ModelBuilder::<IntegerType>::new(num_runways, num_aircraft, 2);
        for i in 0..num_aircraft {
            let earliest = rng.random_range(0..5);
            let target = earliest + rng.random_range(0..4);
            let latest = target + rng.random_range(0..4);
            builder
                .set_landing_window(ai(i), earliest, target, latest)
                .set_penalties(ai(i), rng.random_range(1..4), rng.random_range(1..4))
                .set_aircraft_class(ai(i), ClassIndex::new(i % 2));
        }
        let (heavy, light) = (ClassIndex::new(0), ClassIndex::new(1));
        builder
            .set_separation(heavy, heavy, 2)
            .set_separation(heavy, light, 3)
            .set_separation(light, heavy, 1)
            .set_separation(light, light, 0);
        builder.build().unwrap()
    }

    /// Minimum feasible objective by enumerating every runway and landing time.
    fn brute_force_optimum(model: &Model<IntegerType>) -> Option<IntegerType> {
        fn recurse(
            model: &Model<IntegerType>,
            evaluator: &SolutionEvaluator<'_, IntegerType>,
            partial: &mut Vec<LandingAssignment<IntegerType>>,
            best: &mut Option<IntegerType>,
        ) {
            let index = partial.len();
            if index == model.num_aircraft() {
                let evaluation = evaluator.evaluate_assignments(partial);
                if evaluation.is_feasible()
                    && best.is_none_or(|b| evaluation.objective() < b)
                {
                    *best = Some(evaluation.objective());
                }
                return;
            }
            let aircraft = ai(index);
            for runway in model.runways() {
                let earliest = model.earliest_landing_time(aircraft);
                let latest = model.latest_landing_time(aircraft);
                for time in earliest..=latest {
                    partial.push(LandingAssignment::new(aircraft, runway, time));
                    recurse(model, evaluator, partial, best);
                    partial.pop();
                }
            }
        }

        let evaluator = SolutionEvaluator::new(model);
        let mut best = None;
        recurse(model, &evaluator, &mut Vec::new(), &mut best);
        best
    }

    fn all_strategies() -> Vec<SearchStrategy> {
        let mut strategies = Vec::new();
        for branching in [
            BranchingRule::MostConstrained,
            BranchingRule::EarliestDeadline,
            BranchingRule::HighestPenaltyImpact,
        ] {
            for value in [
                ValueRule::EarliestFeasible,
                ValueRule::TargetClosest,
                ValueRule::Randomized,
            ] {
                for landing_time in [LandingTimeRule::Earliest, LandingTimeRule::TargetClosest] {
                    strategies.push(
                        SearchStrategy::new(branching, value)
                            .with_landing_time(landing_time)
                            .with_seed(11),
                    );
                }
            }
        }
        strategies
    }

    #[test]
    fn test_two_aircraft_optimum_is_five() {
        let model = uniform_model(1, &[(0, 10, 20), (0, 10, 20)], 5);
        let mut solver = CpSolver::<IntegerType>::new();

        for strategy in all_strategies() {
            let outcome = solver.solve(&model, strategy, NoOperationMonitor::new());
            assert_eq!(outcome.status(), SolveStatus::Optimal, "{}", strategy);

            let (schedule, objective) = outcome.incumbent().unwrap();
            assert_eq!(*objective, 5, "{}", strategy);

            let evaluation = SolutionEvaluator::new(&model).evaluate(schedule);
            assert!(evaluation.is_feasible(), "{}", strategy);
            assert_eq!(evaluation.objective(), 5, "{}", strategy);
        }
    }

    #[test]
    fn test_three_aircraft_infeasible() {
        // Three landings 6 apart do not fit into [0, 10].
        let model = uniform_model(1, &[(0, 5, 10), (0, 5, 10), (0, 5, 10)], 6);
        let mut solver = CpSolver::<IntegerType>::new();

        let outcome = solver.solve(&model, SearchStrategy::default(), NoOperationMonitor::new());
        assert_eq!(outcome.status(), SolveStatus::Infeasible);
        assert!(outcome.incumbent().is_none());

        let result = outcome.into_solve_result();
        assert!(result.schedule.is_none());
        assert!(result.objective.is_none());
    }

    #[test]
    fn test_root_propagation_proves_infeasibility() {
        let model = uniform_model(1, &[(0, 0, 0), (0, 0, 0)], 1);
        let mut solver = CpSolver::<IntegerType>::new();

        let outcome = solver.solve(&model, SearchStrategy::default(), NoOperationMonitor::new());
        assert_eq!(outcome.status(), SolveStatus::Infeasible);
        assert_eq!(outcome.statistics().nodes_explored, 1);
        assert_eq!(outcome.statistics().propagation_failures, 1);
    }

    #[test]
    fn test_empty_instance_is_optimal_with_zero_cost() {
        let model = ModelBuilder::<IntegerType>::new(2, 0, 0).build().unwrap();
        let mut solver = CpSolver::<IntegerType>::new();

        let outcome = solver.solve(&model, SearchStrategy::default(), NoOperationMonitor::new());
        assert_eq!(outcome.status(), SolveStatus::Optimal);
        assert_eq!(outcome.incumbent().map(|(_, objective)| *objective), Some(0));
    }

    #[test]
    fn test_multi_runway_optimum() {
        let model = uniform_model(2, &[(0, 10, 30); 4], 5);
        let mut solver = CpSolver::<IntegerType>::new();

        for strategy in all_strategies() {
            let outcome = solver.solve(&model, strategy, NoOperationMonitor::new());
            assert_eq!(outcome.status(), SolveStatus::Optimal, "{}", strategy);
            let (schedule, objective) = outcome.incumbent().unwrap();
            assert_eq!(*objective, 10, "{}", strategy);
            assert!(SolutionEvaluator::new(&model).evaluate(schedule).is_feasible());
        }
    }

    #[test]
    fn test_runway_restrictions_are_respected() {
        let mut builder = ModelBuilder::<IntegerType>::new(2, 3, 1);
        for i in 0..3 {
            builder.set_landing_window(ai(i), 0, 10, 30);
        }
        builder
            .set_separation(ClassIndex::new(0), ClassIndex::new(0), 5)
            .set_eligible_runways(ai(0), [ri(1)])
            .set_eligible_runways(ai(1), [ri(1)]);
        let model = builder.build().unwrap();

        let mut solver = CpSolver::<IntegerType>::new();
        let outcome = solver.solve(&model, SearchStrategy::default(), NoOperationMonitor::new());
        assert_eq!(outcome.status(), SolveStatus::Optimal);

        let (schedule, objective) = outcome.incumbent().unwrap();
        assert_eq!(*objective, 5);
        assert_eq!(schedule.runway_for_aircraft(ai(0)), ri(1));
        assert_eq!(schedule.runway_for_aircraft(ai(1)), ri(1));
        assert_eq!(schedule.runway_for_aircraft(ai(2)), ri(0));
    }

    #[test]
    fn test_matches_brute_force_on_small_instances() {
        for seed in 0..12 {
            let num_runways = 1 + (seed as usize % 2);
            let model = random_model(seed, num_runways, 3);
            let expected = brute_force_optimum(&model);

            let mut solver = CpSolver::<IntegerType>::new();
            for strategy in all_strategies() {
                let outcome = solver.solve(&model, strategy, NoOperationMonitor::new());
                let found = outcome.incumbent().map(|(_, objective)| *objective);
                assert_eq!(found, expected, "seed {} with {}", seed, strategy);
                let status = if expected.is_some() {
                    SolveStatus::Optimal
                } else {
                    SolveStatus::Infeasible
                };
                assert_eq!(outcome.status(), status, "seed {} with {}", seed, strategy);
            }
        }
    }

    #[test]
    fn test_determinism_of_schedule_and_node_counts() {
        let model = random_model(5, 2, 5);
        let strategy = SearchStrategy::default()
            .with_value(ValueRule::Randomized)
            .with_seed(3);

        let mut first_solver = CpSolver::<IntegerType>::new();
        let mut second_solver = CpSolver::<IntegerType>::new();
        let first = first_solver.solve(&model, strategy, NoOperationMonitor::new());
        let second = second_solver.solve(&model, strategy, NoOperationMonitor::new());
        let third = first_solver.solve(&model, strategy, NoOperationMonitor::new());

        for other in [&second, &third] {
            assert_eq!(first.status(), other.status());
            assert_eq!(first.incumbent(), other.incumbent());
            assert_eq!(
                first.statistics().nodes_explored,
                other.statistics().nodes_explored
            );
            assert_eq!(first.statistics().backtracks, other.statistics().backtracks);
        }
    }

    #[test]
    fn test_zero_time_budget_times_out() {
        let model = random_model(1, 2, 6);
        let mut solver = CpSolver::<IntegerType>::new();

        let outcome = solver.solve(
            &model,
            SearchStrategy::default(),
            TimeLimitMonitor::new(Duration::ZERO),
        );
        assert_eq!(outcome.status(), SolveStatus::TimedOut);
        assert!(matches!(
            outcome.termination_reason(),
            TerminationReason::BudgetExhausted(_)
        ));
    }

    #[test]
    fn test_solution_limit_returns_feasible_incumbent() {
        let model = uniform_model(1, &[(0, 10, 40); 4], 5);
        let mut solver = CpSolver::<IntegerType>::new();

        let outcome = solver.solve(
            &model,
            SearchStrategy::default(),
            SolutionLimitMonitor::new(1),
        );
        assert_eq!(outcome.status(), SolveStatus::Feasible);
        assert_eq!(outcome.statistics().solutions_found, 1);

        let (schedule, objective) = outcome.incumbent().unwrap();
        let evaluation = SolutionEvaluator::new(&model).evaluate(schedule);
        assert!(evaluation.is_feasible());
        assert_eq!(evaluation.objective(), *objective);
    }

    #[test]
    fn test_end_state_is_clean_across_runs() {
        let model = random_model(7, 2, 4);
        let mut solver = CpSolver::<IntegerType>::preallocated(2, 4);
        let mut objectives = Vec::new();

        for strategy in all_strategies().into_iter().take(4) {
            let outcome = solver.solve(&model, strategy, NoOperationMonitor::new());
            objectives.push(outcome.incumbent().map(|(_, objective)| *objective));

            assert_eq!(solver.trail.num_entries(), 0);
            assert_eq!(solver.trail.depth(), 0);
            assert_eq!(solver.stack.num_entries(), 0);
            assert_eq!(solver.stack.depth(), 0);
        }
        assert!(objectives.windows(2).all(|pair| pair[0] == pair[1]));
        assert!(solver.allocated_memory_bytes() > 0);
    }

    #[test]
    fn test_statistics_are_coherent() {
        let model = random_model(9, 2, 5);
        let mut solver = CpSolver::<IntegerType>::new();
        let outcome = solver.solve(&model, SearchStrategy::default(), NoOperationMonitor::new());
        let stats = outcome.statistics();

        assert!(stats.nodes_explored >= 1);
        assert!(stats.steps >= stats.nodes_explored - 1);
        assert!(stats.decisions_generated >= stats.nodes_explored - 1);
        assert!(stats.propagation_failures <= stats.prunings_infeasible);
        if let Some((_, objective)) = outcome.incumbent() {
            assert!(stats.root_lower_bound <= *objective);
            assert!(stats.solutions_found >= 1);
        }
    }

    #[test]
    fn test_session_debug_reports_best_objective() {
        let model = uniform_model(1, &[(0, 10, 20), (0, 10, 20)], 5);
        let mut solver = CpSolver::<IntegerType>::new();
        let mut monitor = NoOperationMonitor::new();
        let seed = Schedule::new(vec![ri(0), ri(0)], vec![10, 15]);

        let session = CpSearchSession::new(
            &mut solver,
            &model,
            SearchStrategy::default(),
            &mut monitor,
            Some((seed, 5)),
        );
        let text = format!("{:?}", session);
        assert!(text.starts_with("CpSearchSession"));
        assert!(text.contains("best_objective: Some(5)"));
    }

    #[test]
    fn test_optimal_initial_incumbent_never_grows_the_tree() {
        let model = random_model(5, 2, 6);
        let mut solver = CpSolver::<IntegerType>::new();
        let strategy = SearchStrategy::default();

        let cold = solver.solve(&model, strategy, NoOperationMonitor::new());
        let (schedule, objective) = cold.incumbent().unwrap();
        let (schedule, objective) = (schedule.clone(), *objective);

        let warm =
            solver.solve_with_incumbent(&model, strategy, NoOperationMonitor::new(), &schedule);
        assert_eq!(warm.status(), SolveStatus::Optimal);
        assert_eq!(warm.incumbent().map(|(_, o)| *o), Some(objective));
        assert!(warm.statistics().nodes_explored <= cold.statistics().nodes_explored);
    }

    #[test]
    fn test_infeasible_initial_incumbent_is_ignored() {
        let model = uniform_model(1, &[(0, 10, 40); 4], 5);
        let mut solver = CpSolver::<IntegerType>::new();
        let strategy = SearchStrategy::default();

        // Everyone lands at time 10 on the same runway.
        let clash = Schedule::new(vec![ri(0); 4], vec![10; 4]);
        assert!(!SolutionEvaluator::new(&model).evaluate(&clash).is_feasible());

        let cold = solver.solve(&model, strategy, NoOperationMonitor::new());
        let warm =
            solver.solve_with_incumbent(&model, strategy, NoOperationMonitor::new(), &clash);
        assert_eq!(warm.status(), cold.status());
        assert_eq!(
            warm.incumbent().map(|(_, o)| *o),
            cold.incumbent().map(|(_, o)| *o)
        );
        assert_eq!(
            warm.statistics().nodes_explored,
            cold.statistics().nodes_explored
        );
    }

    #[test]
    fn test_initial_incumbent_survives_exhausted_budget() {
        let model = uniform_model(1, &[(0, 10, 40); 4], 5);
        let mut solver = CpSolver::<IntegerType>::new();

        // Feasible but poor: 10, 15, 20, 25.
        let spread = Schedule::new(vec![ri(0); 4], vec![10, 15, 20, 25]);
        let expected = SolutionEvaluator::new(&model).evaluate(&spread);
        assert!(expected.is_feasible());

        let outcome = solver.solve_with_incumbent(
            &model,
            SearchStrategy::default(),
            TimeLimitMonitor::new(Duration::ZERO),
            &spread,
        );
        assert_eq!(outcome.status(), SolveStatus::TimedOut);
        let (schedule, objective) = outcome.incumbent().unwrap();
        assert_eq!(*objective, expected.objective());
        assert_eq!(schedule.landing_times(), spread.landing_times());
    }
}
