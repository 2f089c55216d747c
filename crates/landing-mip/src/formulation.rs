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

//! Declarative mixed-integer formulation of a landing instance.
//!
//! `MipModel::build` turns a `Model<T>` into plain variables, linear
//! constraints and a minimization objective over `f64` coefficients. The
//! formulation does not depend on any solver; backends translate it.
//!
//! Variables, per aircraft `i`:
//! - `landing_time_i` in `[E_i, L_i]`;
//! - `earliness_i` in `[0, T_i - E_i]` and `lateness_i` in `[0, L_i - T_i]`;
//! - `runway_i_r`, binary, for every eligible runway `r` (multi-runway only).
//!
//! Variables, per unordered pair `{i, j}` that shares an eligible runway:
//! - `order_i_j` and `order_j_i`, binary, summing to one;
//! - `same_runway_i_j`, binary, forced to one when both land on the same
//!   runway (multi-runway only; a single runway uses the constant one).
//!
//! Each pair is classified by its windows (`PairClass`) so that pairs whose
//! order is implied by the data skip the big-M disjunction.

use landing_model::{
    index::{AircraftIndex, RunwayIndex, TypedIndex, TypedIndexTag},
    model::Model,
};
use log::debug;
use num_traits::{PrimInt, Signed, ToPrimitive};
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VariableIndexTag;

impl TypedIndexTag for VariableIndexTag {
    const NAME: &'static str = "VariableIndex";
}

/// Position of a variable in `MipModel::variables`.
pub type VariableIndex = TypedIndex<VariableIndexTag>;

/// Domain of a decision variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Continuous,
    Binary,
}

impl std::fmt::Display for VariableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableKind::Continuous => write!(f, "continuous"),
            VariableKind::Binary => write!(f, "binary"),
        }
    }
}

/// A bounded decision variable with a stable name.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    name: String,
    kind: VariableKind,
    lower: f64,
    upper: f64,
}

impl Variable {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }
}

/// Relation between the left-hand side and the right-hand side of a constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl std::fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintSense::LessEqual => write!(f, "<="),
            ConstraintSense::GreaterEqual => write!(f, ">="),
            ConstraintSense::Equal => write!(f, "="),
        }
    }
}

/// `sum(coefficient * variable) sense rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    pub terms: Vec<(VariableIndex, f64)>,
    pub sense: ConstraintSense,
    pub rhs: f64,
    pub name: String,
}

impl LinearConstraint {
    /// Returns the left-hand side evaluated at `values`.
    ///
    /// # Panics
    ///
    /// Panics if a term refers to a variable outside `values`.
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(variable, coefficient)| coefficient * values[variable.get()])
            .sum()
    }

    /// Returns `true` if `values` satisfy the constraint within `tolerance`.
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        let activity = self.activity(values);
        match self.sense {
            ConstraintSense::LessEqual => activity <= self.rhs + tolerance,
            ConstraintSense::GreaterEqual => activity >= self.rhs - tolerance,
            ConstraintSense::Equal => (activity - self.rhs).abs() <= tolerance,
        }
    }
}

impl std::fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.name)?;
        for (position, (variable, coefficient)) in self.terms.iter().enumerate() {
            if position > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{} x{}", coefficient, variable.get())?;
        }
        write!(f, " {} {}", self.sense, self.rhs)
    }
}

/// How the windows of two aircraft constrain their relative order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PairClass {
    /// `leading` always lands first and the separation holds automatically.
    Separated {
        leading: AircraftIndex,
        trailing: AircraftIndex,
    },
    /// `leading` always lands first but the separation must still be enforced.
    Sequenced {
        leading: AircraftIndex,
        trailing: AircraftIndex,
    },
    /// The windows overlap; the order is a decision.
    Overlapping,
}

impl PairClass {
    /// Classifies the pair `{a, b}` from its windows and separations.
    pub fn classify<T>(model: &Model<T>, a: AircraftIndex, b: AircraftIndex) -> Self
    where
        T: PrimInt + Signed,
    {
        for (leading, trailing) in [(a, b), (b, a)] {
            let latest = model.latest_landing_time(leading);
            let earliest = model.earliest_landing_time(trailing);
            if latest < earliest {
                let cleared =
                    latest.saturating_add(model.separation(leading, trailing)) <= earliest;
                return if cleared {
                    PairClass::Separated { leading, trailing }
                } else {
                    PairClass::Sequenced { leading, trailing }
                };
            }
        }
        PairClass::Overlapping
    }
}

impl std::fmt::Display for PairClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairClass::Separated { leading, trailing } => {
                write!(f, "Separated({} before {})", leading.get(), trailing.get())
            }
            PairClass::Sequenced { leading, trailing } => {
                write!(f, "Sequenced({} before {})", leading.get(), trailing.get())
            }
            PairClass::Overlapping => write!(f, "Overlapping"),
        }
    }
}

/// Converts an instance value to a coefficient.
#[inline(always)]
fn coefficient<T: ToPrimitive>(value: T) -> f64 {
    // Primitive integers always convert, possibly with rounding.
    value.to_f64().unwrap_or(f64::NAN)
}

#[inline(always)]
fn pair_key(a: AircraftIndex, b: AircraftIndex) -> (usize, usize) {
    if a.get() <= b.get() {
        (a.get(), b.get())
    } else {
        (b.get(), a.get())
    }
}

/// A linear program with binary variables, minimized.
///
/// Construction is deterministic: the same `Model` always yields the same
/// variables and constraints in the same order.
#[derive(Clone, Debug, PartialEq)]
pub struct MipModel {
    num_aircraft: usize,
    num_runways: usize,
    variables: Vec<Variable>,
    constraints: Vec<LinearConstraint>,
    objective: Vec<(VariableIndex, f64)>,
    landing_time_vars: Vec<VariableIndex>,
    earliness_vars: Vec<VariableIndex>,
    lateness_vars: Vec<VariableIndex>,
    order_vars: FxHashMap<(usize, usize), VariableIndex>,
    runway_vars: FxHashMap<(usize, usize), VariableIndex>,
    same_runway_vars: FxHashMap<(usize, usize), VariableIndex>,
    pair_classes: FxHashMap<(usize, usize), PairClass>,
}

impl MipModel {
    fn empty(num_aircraft: usize, num_runways: usize) -> Self {
        Self {
            num_aircraft,
            num_runways,
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Vec::with_capacity(2 * num_aircraft),
            landing_time_vars: Vec::with_capacity(num_aircraft),
            earliness_vars: Vec::with_capacity(num_aircraft),
            lateness_vars: Vec::with_capacity(num_aircraft),
            order_vars: FxHashMap::default(),
            runway_vars: FxHashMap::default(),
            same_runway_vars: FxHashMap::default(),
            pair_classes: FxHashMap::default(),
        }
    }

    fn add_variable(
        &mut self,
        name: String,
        kind: VariableKind,
        lower: f64,
        upper: f64,
    ) -> VariableIndex {
        let index = VariableIndex::new(self.variables.len());
        self.variables.push(Variable {
            name,
            kind,
            lower,
            upper,
        });
        index
    }

    fn add_binary(&mut self, name: String) -> VariableIndex {
        self.add_variable(name, VariableKind::Binary, 0.0, 1.0)
    }

    fn add_constraint(
        &mut self,
        name: String,
        terms: Vec<(VariableIndex, f64)>,
        sense: ConstraintSense,
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            terms,
            sense,
            rhs,
            name,
        });
    }

    /// Builds the formulation of `model`.
    pub fn build<T>(model: &Model<T>) -> Self
    where
        T: PrimInt + Signed + ToPrimitive,
    {
        let num_aircraft = model.num_aircraft();
        let multi_runway = model.num_runways() > 1;
        let mut mip = Self::empty(num_aircraft, model.num_runways());

        for aircraft in model.aircraft() {
            let i = aircraft.get();
            let earliest = model.earliest_landing_time(aircraft);
            let target = model.target_landing_time(aircraft);
            let latest = model.latest_landing_time(aircraft);

            let x = mip.add_variable(
                format!("landing_time_{}", i),
                VariableKind::Continuous,
                coefficient(earliest),
                coefficient(latest),
            );
            let e = mip.add_variable(
                format!("earliness_{}", i),
                VariableKind::Continuous,
                0.0,
                coefficient(target.saturating_sub(earliest).max(T::zero())),
            );
            let l = mip.add_variable(
                format!("lateness_{}", i),
                VariableKind::Continuous,
                0.0,
                coefficient(latest.saturating_sub(target).max(T::zero())),
            );
            mip.landing_time_vars.push(x);
            mip.earliness_vars.push(e);
            mip.lateness_vars.push(l);

            // e >= T - x and l >= x - T
            mip.add_constraint(
                format!("earliness_def_{}", i),
                vec![(e, 1.0), (x, 1.0)],
                ConstraintSense::GreaterEqual,
                coefficient(target),
            );
            mip.add_constraint(
                format!("lateness_def_{}", i),
                vec![(l, 1.0), (x, -1.0)],
                ConstraintSense::GreaterEqual,
                -coefficient(target),
            );

            mip.objective.push((e, coefficient(model.earliness_penalty(aircraft))));
            mip.objective.push((l, coefficient(model.lateness_penalty(aircraft))));
        }

        if multi_runway {
            for aircraft in model.aircraft() {
                let i = aircraft.get();
                let mut terms = Vec::with_capacity(model.num_eligible_runways(aircraft));
                for runway in model.eligible_runways(aircraft) {
                    let z = mip.add_binary(format!("runway_{}_{}", i, runway.get()));
                    mip.runway_vars.insert((i, runway.get()), z);
                    terms.push((z, 1.0));
                }
                mip.add_constraint(format!("assign_{}", i), terms, ConstraintSense::Equal, 1.0);
            }
        }

        for a in model.aircraft() {
            for b in (a.get() + 1..num_aircraft).map(AircraftIndex::new) {
                if model.share_eligible_runway(a, b) {
                    mip.add_pair(model, a, b, multi_runway);
                }
            }
        }

        debug_assert_eq!(mip.landing_time_vars.len(), num_aircraft);
        let (mut separated, mut sequenced, mut overlapping) = (0usize, 0usize, 0usize);
        for class in mip.pair_classes.values() {
            match class {
                PairClass::Separated { .. } => separated += 1,
                PairClass::Sequenced { .. } => sequenced += 1,
                PairClass::Overlapping => overlapping += 1,
            }
        }
        debug!(
            "Built MIP with {} variables and {} constraints",
            mip.num_variables(),
            mip.num_constraints()
        );
        debug!(
            "Aircraft pairs: {} separated, {} sequenced, {} overlapping",
            separated, sequenced, overlapping
        );
        mip
    }

    fn add_pair<T>(
        &mut self,
        model: &Model<T>,
        a: AircraftIndex,
        b: AircraftIndex,
        multi_runway: bool,
    ) where
        T: PrimInt + Signed + ToPrimitive,
    {
        let (i, j) = (a.get(), b.get());
        let forward = self.add_binary(format!("order_{}_{}", i, j));
        let backward = self.add_binary(format!("order_{}_{}", j, i));
        self.order_vars.insert((i, j), forward);
        self.order_vars.insert((j, i), backward);
        self.add_constraint(
            format!("order_pair_{}_{}", i, j),
            vec![(forward, 1.0), (backward, 1.0)],
            ConstraintSense::Equal,
            1.0,
        );

        let same_runway = if multi_runway {
            let s = self.add_binary(format!("same_runway_{}_{}", i, j));
            self.same_runway_vars.insert((i, j), s);
            for runway in model.eligible_runways(a) {
                let r = runway.get();
                let (Some(&za), Some(&zb)) =
                    (self.runway_vars.get(&(i, r)), self.runway_vars.get(&(j, r)))
                else {
                    continue;
                };
                // s >= z_a + z_b - 1
                self.add_constraint(
                    format!("link_{}_{}_{}", i, j, r),
                    vec![(s, 1.0), (za, -1.0), (zb, -1.0)],
                    ConstraintSense::GreaterEqual,
                    -1.0,
                );
            }
            Some(s)
        } else {
            None
        };

        let class = PairClass::classify(model, a, b);
        self.pair_classes.insert((i, j), class);

        match class {
            PairClass::Separated { leading, trailing } => {
                self.fix_order(leading, trailing);
            }
            PairClass::Sequenced { leading, trailing } => {
                self.fix_order(leading, trailing);
                self.add_separation(model, leading, trailing, same_runway, None);
            }
            PairClass::Overlapping => {
                self.add_separation(model, a, b, same_runway, Some(forward));
                self.add_separation(model, b, a, same_runway, Some(backward));
            }
        }
    }

    fn fix_order(&mut self, leading: AircraftIndex, trailing: AircraftIndex) {
        let (i, j) = (leading.get(), trailing.get());
        if let Some(&y) = self.order_vars.get(&(i, j)) {
            self.add_constraint(
                format!("fix_order_{}_{}", i, j),
                vec![(y, 1.0)],
                ConstraintSense::Equal,
                1.0,
            );
        }
    }

    /// Adds `x_t >= x_l + sep * s - M * (1 - y)`, where `s` is one on a
    /// single runway and the disjunction term is dropped when `order` is `None`.
    fn add_separation<T>(
        &mut self,
        model: &Model<T>,
        leading: AircraftIndex,
        trailing: AircraftIndex,
        same_runway: Option<VariableIndex>,
        order: Option<VariableIndex>,
    ) where
        T: PrimInt + Signed + ToPrimitive,
    {
        let separation = model.separation(leading, trailing);
        let x_lead = self.landing_time_vars[leading.get()];
        let x_trail = self.landing_time_vars[trailing.get()];

        let mut terms = Vec::with_capacity(4);
        terms.push((x_trail, 1.0));
        terms.push((x_lead, -1.0));
        let mut rhs = 0.0;

        match same_runway {
            Some(s) => terms.push((s, -coefficient(separation))),
            None => rhs += coefficient(separation),
        }

        if let Some(y) = order {
            let big_m = model
                .latest_landing_time(leading)
                .saturating_add(separation)
                .saturating_sub(model.earliest_landing_time(trailing))
                .max(T::zero());
            let big_m = coefficient(big_m);
            terms.push((y, -big_m));
            rhs -= big_m;
        }

        self.add_constraint(
            format!("sep_{}_{}", leading.get(), trailing.get()),
            terms,
            ConstraintSense::GreaterEqual,
            rhs,
        );
    }

    #[inline]
    pub fn num_aircraft(&self) -> usize {
        self.num_aircraft
    }

    #[inline]
    pub fn num_runways(&self) -> usize {
        self.num_runways
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    #[inline]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Returns the variable at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_variables()`.
    #[inline]
    pub fn variable(&self, index: VariableIndex) -> &Variable {
        debug_assert!(
            index.get() < self.num_variables(),
            "called `MipModel::variable` with variable index out of bounds: the len is {} but the index is {}",
            self.num_variables(),
            index.get()
        );
        &self.variables[index.get()]
    }

    #[inline]
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Objective terms; the objective is minimized.
    #[inline]
    pub fn objective(&self) -> &[(VariableIndex, f64)] {
        &self.objective
    }

    /// Returns the objective evaluated at `values`.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|&(variable, coefficient)| coefficient * values[variable.get()])
            .sum()
    }

    /// Returns the landing time variable of `aircraft`.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft` is not in `0..num_aircraft()`.
    #[inline]
    pub fn landing_time_var(&self, aircraft: AircraftIndex) -> VariableIndex {
        debug_assert!(
            aircraft.get() < self.num_aircraft,
            "called `MipModel::landing_time_var` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft,
            aircraft.get()
        );
        self.landing_time_vars[aircraft.get()]
    }

    #[inline]
    pub fn earliness_var(&self, aircraft: AircraftIndex) -> VariableIndex {
        self.earliness_vars[aircraft.get()]
    }

    #[inline]
    pub fn lateness_var(&self, aircraft: AircraftIndex) -> VariableIndex {
        self.lateness_vars[aircraft.get()]
    }

    /// Returns the variable that is one when `leading` lands before
    /// `trailing`, or `None` if the two never share a runway.
    #[inline]
    pub fn order_var(
        &self,
        leading: AircraftIndex,
        trailing: AircraftIndex,
    ) -> Option<VariableIndex> {
        self.order_vars.get(&(leading.get(), trailing.get())).copied()
    }

    /// Returns the runway assignment variable, or `None` on a single runway
    /// or when `runway` is not eligible for `aircraft`.
    #[inline]
    pub fn runway_var(
        &self,
        aircraft: AircraftIndex,
        runway: RunwayIndex,
    ) -> Option<VariableIndex> {
        self.runway_vars.get(&(aircraft.get(), runway.get())).copied()
    }

    #[inline]
    pub fn same_runway_var(&self, a: AircraftIndex, b: AircraftIndex) -> Option<VariableIndex> {
        self.same_runway_vars.get(&pair_key(a, b)).copied()
    }

    /// Returns the class of the pair, or `None` if the two never share a runway.
    #[inline]
    pub fn pair_class(&self, a: AircraftIndex, b: AircraftIndex) -> Option<PairClass> {
        self.pair_classes.get(&pair_key(a, b)).copied()
    }
}

impl std::fmt::Display for MipModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MipModel(aircraft: {}, runways: {}, variables: {}, constraints: {})",
            self.num_aircraft,
            self.num_runways,
            self.num_variables(),
            self.num_constraints()
        )
    }
}
