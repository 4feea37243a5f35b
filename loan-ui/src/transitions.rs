//! Count-up animation of the calculator outputs.
//!
//! [`DisplayTransitions`] subscribes to calculator updates and tweens each
//! output from the value currently on screen to the new one. A new update for
//! an output cancels its running transition first, so at most one transition
//! per output is ever active.

use std::collections::HashMap;
use std::time::Duration;

use loan_core::LoanCalculatorOutput;
use loan_core::calculations::common::format_inr;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::trace;

use crate::calculator_state::{CalculatorObserver, OutputsUpdate};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Installment,
    TotalInterest,
    TotalCost,
}

impl OutputKind {
    pub const ALL: [OutputKind; 3] = [
        OutputKind::Installment,
        OutputKind::TotalInterest,
        OutputKind::TotalCost,
    ];

    pub fn of(
        &self,
        output: &LoanCalculatorOutput,
    ) -> Decimal {
        match self {
            Self::Installment => output.installment,
            Self::TotalInterest => output.total_interest,
            Self::TotalCost => output.total_cost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    from: Decimal,
    to: Decimal,
    elapsed: Duration,
    duration: Duration,
}

impl Transition {
    fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Quadratic ease-out.
    fn value(&self) -> Decimal {
        let t = self.progress();
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        match Decimal::from_f64(eased) {
            Some(eased) => self.from + (self.to - self.from) * eased,
            None => self.to,
        }
    }
}

#[derive(Debug)]
pub struct DisplayTransitions {
    duration: Duration,
    shown: HashMap<OutputKind, Decimal>,
    active: HashMap<OutputKind, Transition>,
    started: u64,
    cancelled: u64,
}

impl Default for DisplayTransitions {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

impl DisplayTransitions {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            shown: HashMap::new(),
            active: HashMap::new(),
            started: 0,
            cancelled: 0,
        }
    }

    /// Value currently on screen for `kind`.
    pub fn value(
        &self,
        kind: OutputKind,
    ) -> Decimal {
        match self.active.get(&kind) {
            Some(transition) => transition.value(),
            None => self.shown.get(&kind).copied().unwrap_or_default(),
        }
    }

    pub fn label(
        &self,
        kind: OutputKind,
    ) -> String {
        format_inr(self.value(kind))
    }

    pub fn is_animating(
        &self,
        kind: OutputKind,
    ) -> bool {
        self.active.contains_key(&kind)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn started(&self) -> u64 {
        self.started
    }

    /// Transitions cut short by a newer update.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Advances every running transition by `elapsed`; finished ones settle on
    /// their target.
    pub fn tick(
        &mut self,
        elapsed: Duration,
    ) {
        for transition in self.active.values_mut() {
            transition.elapsed += elapsed;
        }

        let finished: Vec<OutputKind> = self
            .active
            .iter()
            .filter(|(_, t)| t.is_finished())
            .map(|(kind, _)| *kind)
            .collect();
        for kind in finished {
            if let Some(transition) = self.active.remove(&kind) {
                self.shown.insert(kind, transition.to);
            }
        }
    }

    fn retarget(
        &mut self,
        kind: OutputKind,
        target: Decimal,
    ) {
        let from = self.value(kind);
        if self.active.remove(&kind).is_some() {
            self.cancelled += 1;
            trace!(?kind, "transition superseded");
        }
        self.shown.insert(kind, from);

        if from == target {
            return;
        }
        self.active.insert(
            kind,
            Transition {
                from,
                to: target,
                elapsed: Duration::ZERO,
                duration: self.duration,
            },
        );
        self.started += 1;
    }
}

impl CalculatorObserver for DisplayTransitions {
    fn outputs_changed(
        &mut self,
        update: &OutputsUpdate,
    ) {
        for kind in OutputKind::ALL {
            let target = kind.of(&update.current);
            if update.animate {
                self.retarget(kind, target);
            } else {
                if self.active.remove(&kind).is_some() {
                    self.cancelled += 1;
                }
                self.shown.insert(kind, target);
            }
        }
    }
}
