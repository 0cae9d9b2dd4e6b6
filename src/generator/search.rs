//! Multi-attempt timetable search driver.
//!
//! # Algorithm
//!
//! 1. Pre-place fixed subjects once into a shared baseline.
//! 2. For each attempt, clone the baseline and generate the slot visit
//!    order: periods ascending, weekday order natural on attempt 0 and a
//!    seeded permutation (keyed by attempt and period) afterwards, so
//!    later attempts fill different days first while staying reproducible.
//! 3. Anchor every elective block first, then place regular blocks with a
//!    most-constrained-variable heuristic: exact fewest-legal-slots when
//!    three or fewer remain (or on attempt 0), otherwise a uniform pick
//!    among the five most constrained for cross-attempt diversity.
//! 4. Each block runs two passes: default consecutive ceilings, then both
//!    ceilings relaxed by one, with every relaxed-pass period counted as
//!    a consecutive warning.
//! 5. Keep the attempt with the most placed periods (earliest attempt
//!    wins ties) and stop early on full placement.
//!
//! Shortfall is reported, never raised: the driver returns the best
//! partial schedule with a per-block placed/needed report.

use std::collections::{BTreeSet, HashMap};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{
    home_class_count, AvailabilityConstraint, Block, Cell, ClassKey, ConstraintIndex, FixedSubject,
    LinkedPos, Placement, TeacherLoad, TeacherRow, TimeGrid, Timetable,
};

use super::{apply_placement, can_place, PlacementRules};

/// Search driver configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Weekly grid to fill.
    pub grid: TimeGrid,
    /// Independent search attempts.
    pub attempts: u32,
    /// Default consecutive-run ceilings (relaxed by one on the fallback
    /// pass).
    pub rules: PlacementRules,
    /// Maximum periods per day for one regular block.
    pub max_daily_regular: u8,
    /// Informational weekly hour target carried into reports.
    pub target_weekly_hours: Option<u32>,
}

impl GeneratorConfig {
    /// Sets the grid.
    pub fn with_grid(mut self, grid: TimeGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Sets the attempt count (minimum 1).
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Sets the default consecutive-run ceilings.
    pub fn with_rules(mut self, rules: PlacementRules) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the per-day cap for regular blocks.
    pub fn with_max_daily_regular(mut self, cap: u8) -> Self {
        self.max_daily_regular = cap.max(1);
        self
    }

    /// Sets the informational weekly hour target.
    pub fn with_target_weekly_hours(mut self, hours: u32) -> Self {
        self.target_weekly_hours = Some(hours);
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            grid: TimeGrid::standard_week(),
            attempts: 10,
            rules: PlacementRules::default(),
            max_daily_regular: 2,
            target_weekly_hours: None,
        }
    }
}

/// Per-block placement report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockReport {
    /// Block display name.
    pub name: String,
    /// Whether the block is an elective rotation.
    pub is_elective: bool,
    /// Weekly periods required.
    pub needed: u32,
    /// Weekly periods placed.
    pub placed: u32,
    /// Whether the requirement was fully met.
    pub ok: bool,
    /// Periods placed under relaxed ceilings.
    pub warnings: u32,
}

/// The result of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// The best schedule found.
    pub schedule: Timetable,
    /// Teacher busy sets matching the schedule.
    pub teacher_load: TeacherLoad,
    /// Per-block placement reports, in placement order.
    pub blocks: Vec<BlockReport>,
    /// Total periods placed across all blocks.
    pub total_placed: u32,
    /// Total periods required across all blocks.
    pub total_needed: u32,
    /// Fixed-subject placements seeded before search (per entry per grade).
    pub fixed_count: u32,
    /// Total periods placed under relaxed ceilings.
    pub consecutive_warnings: u32,
    /// Index of the winning attempt.
    pub winning_attempt: u32,
    /// True when there was nothing to place and search never ran.
    pub skipped: bool,
}

impl GenerationOutcome {
    /// Placed percentage, rounded.
    pub fn percentage(&self) -> u32 {
        if self.total_needed == 0 {
            0
        } else {
            ((self.total_placed as f64 / self.total_needed as f64) * 100.0).round() as u32
        }
    }

    /// Whether every block met its requirement.
    pub fn fully_placed(&self) -> bool {
        self.total_placed >= self.total_needed
    }
}

/// One attempt's private result, before best-of selection.
#[derive(Debug, Clone)]
struct AttemptResult {
    schedule: Timetable,
    load: TeacherLoad,
    blocks: Vec<BlockReport>,
    total_placed: u32,
    warnings: u32,
    attempt: u32,
}

/// The timetable search driver.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a driver with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Runs the bounded multi-attempt search and returns the best outcome.
    ///
    /// An empty block list returns a skipped outcome carrying only the
    /// fixed-subject baseline.
    pub fn generate(
        &self,
        blocks: &[Block],
        fixed: &[FixedSubject],
        constraints: &[AvailabilityConstraint],
        teachers: &[TeacherRow],
    ) -> GenerationOutcome {
        let constraints = ConstraintIndex::from_slice(constraints);
        let target_grades: BTreeSet<&str> = blocks.iter().map(|b| b.grade.as_str()).collect();
        let (baseline, fixed_count) = self.seed_fixed(fixed, &target_grades, teachers);

        if blocks.is_empty() {
            return GenerationOutcome {
                schedule: baseline,
                teacher_load: TeacherLoad::new(),
                blocks: Vec::new(),
                total_placed: 0,
                total_needed: 0,
                fixed_count,
                consecutive_warnings: 0,
                winning_attempt: 0,
                skipped: true,
            };
        }

        // Electives anchor first, then larger requirements first.
        let mut ordered: Vec<&Block> = blocks.iter().collect();
        ordered.sort_by_key(|b| (!b.is_elective, std::cmp::Reverse(b.hours_per_week)));
        let total_needed: u32 = ordered.iter().map(|b| b.hours_per_week).sum();

        let best = self.run_attempts(&ordered, &baseline, &constraints, total_needed);

        GenerationOutcome {
            schedule: best.schedule,
            teacher_load: best.load,
            blocks: best.blocks,
            total_placed: best.total_placed,
            total_needed,
            fixed_count,
            consecutive_warnings: best.warnings,
            winning_attempt: best.attempt,
            skipped: false,
        }
    }

    /// Pre-places fixed subjects for every class of every matching grade.
    fn seed_fixed(
        &self,
        fixed: &[FixedSubject],
        target_grades: &BTreeSet<&str>,
        teachers: &[TeacherRow],
    ) -> (Timetable, u32) {
        let mut timetable = Timetable::new();
        let mut count = 0u32;

        for fs in fixed {
            if fs.day >= self.config.grid.days() {
                continue;
            }
            let grades: Vec<&str> = match fs.grade.as_deref() {
                Some(g) => {
                    if target_grades.contains(g) {
                        vec![g]
                    } else {
                        continue;
                    }
                }
                None => target_grades.iter().copied().collect(),
            };

            for grade in grades {
                let class_count = home_class_count(grade, teachers);
                for class in 1..=class_count {
                    for offset in 0..fs.period_count {
                        let cell = Cell::new(fs.day, fs.period_start + offset);
                        if !self.config.grid.contains(cell) {
                            continue;
                        }
                        timetable.set(
                            ClassKey::new(grade, class.to_string()),
                            cell,
                            Placement::fixed(
                                fs.subject.clone(),
                                LinkedPos::for_span(offset, fs.period_count),
                            ),
                        );
                    }
                }
                count += 1;
            }
        }

        (timetable, count)
    }

    #[cfg(not(feature = "parallel"))]
    fn run_attempts(
        &self,
        ordered: &[&Block],
        baseline: &Timetable,
        constraints: &ConstraintIndex,
        total_needed: u32,
    ) -> AttemptResult {
        let attempts = self.config.attempts.max(1);
        let mut best: Option<AttemptResult> = None;
        for attempt in 0..attempts {
            let result = self.run_attempt(attempt, ordered, baseline, constraints);
            let improved = best
                .as_ref()
                .is_none_or(|b| result.total_placed > b.total_placed);
            if improved {
                best = Some(result);
            }
            if best.as_ref().is_some_and(|b| b.total_placed >= total_needed) {
                break;
            }
        }
        best.expect("at least one attempt runs")
    }

    /// Attempt-parallel variant: attempts share no mutable state, so they
    /// fan out across rayon workers and reduce with the same deterministic
    /// best-by-placed, earliest-attempt tie-break. The early-exit shortcut
    /// does not apply; the attempt budget bounds the run instead.
    #[cfg(feature = "parallel")]
    fn run_attempts(
        &self,
        ordered: &[&Block],
        baseline: &Timetable,
        constraints: &ConstraintIndex,
        _total_needed: u32,
    ) -> AttemptResult {
        use rayon::prelude::*;
        let attempts = self.config.attempts.max(1);
        (0..attempts)
            .into_par_iter()
            .map(|attempt| self.run_attempt(attempt, ordered, baseline, constraints))
            .reduce_with(|best, candidate| {
                if candidate.total_placed > best.total_placed
                    || (candidate.total_placed == best.total_placed
                        && candidate.attempt < best.attempt)
                {
                    candidate
                } else {
                    best
                }
            })
            .expect("at least one attempt runs")
    }

    fn run_attempt(
        &self,
        attempt: u32,
        ordered: &[&Block],
        baseline: &Timetable,
        constraints: &ConstraintIndex,
    ) -> AttemptResult {
        let mut schedule = baseline.clone();
        let mut load = TeacherLoad::new();
        let visit = self.visit_order(attempt);
        let mut pick_rng = SmallRng::seed_from_u64(0x00C0_FFEE ^ u64::from(attempt));

        let mut blocks = Vec::with_capacity(ordered.len());
        let mut total_placed = 0u32;
        let mut warnings = 0u32;

        let mut report = |block: &Block, placed: u32, cw: u32, blocks: &mut Vec<BlockReport>| {
            blocks.push(BlockReport {
                name: block.name.clone(),
                is_elective: block.is_elective,
                needed: block.hours_per_week,
                placed,
                ok: placed >= block.hours_per_week,
                warnings: cw,
            });
        };

        for block in ordered.iter().filter(|b| b.is_elective) {
            let (placed, cw) = self.place_block(block, &visit, &mut schedule, &mut load, constraints);
            total_placed += placed;
            warnings += cw;
            report(block, placed, cw, &mut blocks);
        }

        let mut remaining: Vec<&Block> = ordered
            .iter()
            .filter(|b| !b.is_elective)
            .copied()
            .collect();
        while !remaining.is_empty() {
            let idx = self.pick_most_constrained(
                attempt,
                &remaining,
                &visit,
                &schedule,
                &load,
                constraints,
                &mut pick_rng,
            );
            let block = remaining.remove(idx);
            let (placed, cw) = self.place_block(block, &visit, &mut schedule, &mut load, constraints);
            total_placed += placed;
            warnings += cw;
            report(block, placed, cw, &mut blocks);
        }

        AttemptResult {
            schedule,
            load,
            blocks,
            total_placed,
            warnings,
            attempt,
        }
    }

    /// Slot visit order for one attempt: periods ascending, weekday order
    /// natural on attempt 0 and a per-(attempt, period) seeded permutation
    /// afterwards.
    fn visit_order(&self, attempt: u32) -> Vec<Cell> {
        let grid = &self.config.grid;
        let mut visit = Vec::with_capacity(grid.weekly_periods() as usize);
        for period in 1..=grid.max_periods() {
            let mut days: Vec<u8> = (0..grid.days()).collect();
            if attempt > 0 {
                let seed = (u64::from(attempt) << 32) | u64::from(period);
                days.shuffle(&mut SmallRng::seed_from_u64(seed));
            }
            for day in days {
                if period <= grid.periods_on(day) {
                    visit.push(Cell::new(day, period));
                }
            }
        }
        visit
    }

    /// Most-constrained-variable pick over the remaining regular blocks.
    ///
    /// Exact fewest-legal-slots when three or fewer remain or on attempt 0;
    /// otherwise a uniform pick among the five most constrained.
    #[allow(clippy::too_many_arguments)]
    fn pick_most_constrained(
        &self,
        attempt: u32,
        remaining: &[&Block],
        visit: &[Cell],
        schedule: &Timetable,
        load: &TeacherLoad,
        constraints: &ConstraintIndex,
        rng: &mut SmallRng,
    ) -> usize {
        let mut counts: Vec<(u32, usize)> = remaining
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let legal = visit
                    .iter()
                    .filter(|cell| {
                        can_place(
                            block,
                            cell.day,
                            cell.period,
                            &self.config.grid,
                            schedule,
                            load,
                            constraints,
                            self.config.rules,
                        )
                    })
                    .count() as u32;
                (legal, i)
            })
            .collect();
        counts.sort();

        if remaining.len() <= 3 || attempt == 0 {
            counts[0].1
        } else {
            let pool = counts.len().min(5);
            counts[rng.random_range(0..pool)].1
        }
    }

    /// Places one block: pass 1 under default ceilings, pass 2 relaxed,
    /// counting relaxed-pass periods as warnings. Returns (placed, cw).
    fn place_block(
        &self,
        block: &Block,
        visit: &[Cell],
        schedule: &mut Timetable,
        load: &mut TeacherLoad,
        constraints: &ConstraintIndex,
    ) -> (u32, u32) {
        let grid = &self.config.grid;
        let needed = block.hours_per_week;
        let linked = u32::from(block.linked_periods.max(1));
        let daily_cap = if block.is_elective {
            needed.div_ceil(u32::from(grid.days().max(1))).max(2)
        } else {
            u32::from(self.config.max_daily_regular)
        };

        let mut day_count: HashMap<u8, u32> = HashMap::new();
        let mut placed = 0u32;
        let mut warnings = 0u32;

        for pass in 0..2 {
            let rules = if pass == 0 {
                self.config.rules
            } else {
                self.config.rules.relaxed()
            };
            for cell in visit {
                if placed >= needed {
                    break;
                }
                if day_count.get(&cell.day).copied().unwrap_or(0) >= daily_cap {
                    continue;
                }
                if can_place(block, cell.day, cell.period, grid, schedule, load, constraints, rules)
                {
                    apply_placement(block, cell.day, cell.period, schedule, load);
                    placed += linked;
                    *day_count.entry(cell.day).or_insert(0) += linked;
                    if pass == 1 {
                        warnings += linked;
                    }
                }
            }
            if placed >= needed {
                break;
            }
        }

        (placed, warnings)
    }
}
