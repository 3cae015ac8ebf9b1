//! Round loop: generate → detect → resolve → trim → regenerate.
//!
//! States
//! - `Initializing`: validate, copy lines, generate round-0 points.
//! - `RoundActive`: one termination predicate per round (cancelled, converged,
//!   budget exhausted); otherwise resolve, trim, regenerate.
//! - Terminal: `Converged`, `MaxRoundsReached`, `Cancelled`.
//!
//! Every round consumes the previous `WorkingState` and builds a new one; nothing
//! created in a round is modified afterwards.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info, warn};

use super::cancel::CancelToken;
use super::detect::find_conflicts;
use super::generate::generate_all;
use super::params::PlacementParams;
use super::resolve::suppressions;
use super::trim::trim;
use super::types::{ConflictPair, Line, PointSet};
use crate::error::{ConfigurationError, ConvergenceWarning, PlacementError, Warning};
use crate::geom::{GeometryEngine, PlanarEngine};

/// Why the loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Converged,
    MaxRoundsReached,
    Cancelled,
}

/// Per-round bookkeeping (one entry per conflict check).
#[derive(Clone, Debug, PartialEq)]
pub struct RoundReport {
    pub round: u32,
    pub lines: usize,
    pub total_length: f64,
    pub points: usize,
    pub conflicts: usize,
    /// Losing lines recorded this round (0 on the terminal check).
    pub suppressed_lines: usize,
    pub replaced_lines: usize,
    pub dropped_lines: usize,
}

/// Result of a run.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub final_points: PointSet,
    pub final_lines: Vec<Line>,
    /// Completed trim rounds.
    pub rounds_run: u32,
    pub converged: bool,
    pub termination: Termination,
    pub history: Vec<RoundReport>,
    pub warnings: Vec<Warning>,
}

/// Line and point collections current at the start of a round.
#[derive(Clone, Debug)]
struct WorkingState {
    round: u32,
    lines: Vec<Line>,
    points: PointSet,
}

impl WorkingState {
    fn total_length(&self) -> f64 {
        self.lines.iter().map(Line::length).sum()
    }

    fn report(&self, conflicts: usize) -> RoundReport {
        RoundReport {
            round: self.round,
            lines: self.lines.len(),
            total_length: self.total_length(),
            points: self.points.len(),
            conflicts,
            suppressed_lines: 0,
            replaced_lines: 0,
            dropped_lines: 0,
        }
    }
}

enum Phase {
    Initializing(Vec<Line>),
    RoundActive(WorkingState),
    Done(WorkingState, Termination),
}

/// Iterative conflict resolver over a line collection.
#[derive(Clone, Debug)]
pub struct Resolver<E = PlanarEngine> {
    params: PlacementParams,
    engine: E,
    cancel: Option<CancelToken>,
}

impl Resolver<PlanarEngine> {
    pub fn new(params: PlacementParams) -> Result<Self, ConfigurationError> {
        Self::with_engine(params, PlanarEngine)
    }
}

impl<E: GeometryEngine> Resolver<E> {
    pub fn with_engine(params: PlacementParams, engine: E) -> Result<Self, ConfigurationError> {
        params.validate()?;
        Ok(Self {
            params,
            engine,
            cancel: None,
        })
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[inline]
    pub fn params(&self) -> &PlacementParams {
        &self.params
    }

    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Conflicts among `points` under this resolver's separation radius.
    pub fn conflicts(&self, points: &PointSet) -> BTreeSet<ConflictPair> {
        find_conflicts(&self.engine, points, self.params.separation_radius)
    }

    pub fn run(&self, lines: Vec<Line>) -> Result<Outcome, PlacementError> {
        let mut seen = HashSet::with_capacity(lines.len());
        if let Some(dup) = lines.iter().find(|l| !seen.insert(l.id())) {
            return Err(PlacementError::DuplicateLineId(dup.id()));
        }

        let mut warnings: Vec<Warning> = Vec::new();
        let mut history: Vec<RoundReport> = Vec::new();
        let mut phase = Phase::Initializing(lines);
        let (state, termination) = loop {
            phase = match phase {
                Phase::Initializing(lines) => Phase::RoundActive(self.initialize(lines, &mut warnings)),
                Phase::RoundActive(state) => self.round(state, &mut history, &mut warnings),
                Phase::Done(state, termination) => break (state, termination),
            };
        };

        info!(
            rounds = state.round,
            ?termination,
            lines = state.lines.len(),
            points = state.points.len(),
            warnings = warnings.len(),
            "placement finished"
        );
        Ok(Outcome {
            converged: termination == Termination::Converged,
            rounds_run: state.round,
            final_points: state.points,
            final_lines: state.lines,
            termination,
            history,
            warnings,
        })
    }

    fn initialize(&self, lines: Vec<Line>, warnings: &mut Vec<Warning>) -> WorkingState {
        let (points, invalid) = generate_all(&lines, self.params.spacing, 0);
        let bad: HashSet<_> = invalid.iter().map(|e| e.line).collect();
        warnings.extend(invalid.into_iter().map(Warning::from));
        let lines = lines.into_iter().filter(|l| !bad.contains(&l.id())).collect();
        WorkingState {
            round: 0,
            lines,
            points,
        }
    }

    fn round(
        &self,
        state: WorkingState,
        history: &mut Vec<RoundReport>,
        warnings: &mut Vec<Warning>,
    ) -> Phase {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            info!(round = state.round, "cancelled");
            return Phase::Done(state, Termination::Cancelled);
        }
        let conflicts = self.conflicts(&state.points);
        let mut report = state.report(conflicts.len());
        debug!(
            round = state.round,
            lines = report.lines,
            points = report.points,
            conflicts = report.conflicts,
            total_length = report.total_length,
            "round"
        );
        if conflicts.is_empty() {
            history.push(report);
            return Phase::Done(state, Termination::Converged);
        }
        if state.round >= self.params.max_iterations {
            history.push(report);
            let w = ConvergenceWarning {
                rounds: state.round,
                remaining_conflicts: conflicts.len(),
            };
            warn!(%w, "max iterations reached");
            warnings.push(w.into());
            return Phase::Done(state, Termination::MaxRoundsReached);
        }

        let next_round = state.round + 1;
        let suppression = suppressions(&conflicts, &state.points);
        report.suppressed_lines = suppression.len();
        let out = trim(
            &self.engine,
            &state.lines,
            &state.points,
            &suppression,
            self.params.buffer_radius,
            self.params.min_fragment_length,
            next_round,
        );
        report.replaced_lines = out.replaced;
        report.dropped_lines = out.dropped;
        if out.replaced == 0 && out.dropped == 0 && out.failures.is_empty() {
            debug!(round = state.round, "trim changed no line");
        }
        warnings.extend(out.failures.into_iter().map(Warning::from));
        let lines = out.lines;
        history.push(report);

        let (points, invalid) = generate_all(&lines, self.params.spacing, next_round);
        let bad: HashSet<_> = invalid.iter().map(|e| e.line).collect();
        warnings.extend(invalid.into_iter().map(Warning::from));
        let lines = if bad.is_empty() {
            lines
        } else {
            lines.into_iter().filter(|l| !bad.contains(&l.id())).collect()
        };
        Phase::RoundActive(WorkingState {
            round: next_round,
            lines,
            points,
        })
    }
}
