//! Reactive calculator state.
//!
//! [`CalculatorState`] is the single source of truth for the three loan
//! inputs. Every input is shown by two widgets (a slider and a numeric
//! field); accepting a value updates both and schedules a recomputation on
//! the [`FrameScheduler`]. The frame tick ([`CalculatorState::on_frame`])
//! recomputes once, rewrites the output display and notifies observers.
//!
//! Rejected values (not finite, zero or negative, or large enough to
//! overflow the calculation) leave the state untouched.

use std::sync::{Arc, Mutex, PoisonError};

use loan_core::calculations::EmiCalculator;
use loan_core::calculations::common::{format_inr, format_rate, two_decimals};
use loan_core::{LoanCalculatorInput, LoanCalculatorOutput};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use tracing::{debug, warn};

use crate::scheduler::FrameScheduler;
use crate::utils::parse_number;

/// The two widgets bound to one input.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetPair {
    pub slider: f64,
    pub field: String,
}

/// Formatted outputs as written to the result panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputDisplay {
    pub installment: String,
    pub total_interest: String,
    pub total_cost: String,
}

impl OutputDisplay {
    fn render(output: &LoanCalculatorOutput) -> Self {
        Self {
            installment: format_inr(output.installment),
            total_interest: format_inr(output.total_interest),
            total_cost: format_inr(output.total_cost),
        }
    }
}

/// Published after every recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputsUpdate {
    pub previous: LoanCalculatorOutput,
    pub current: LoanCalculatorOutput,
    /// `false` for the values a new subscriber starts from.
    pub animate: bool,
}

/// Side effects that follow the calculator outputs (animation, logging).
/// Correctness never depends on an observer being attached.
pub trait CalculatorObserver: Send {
    fn outputs_changed(
        &mut self,
        update: &OutputsUpdate,
    );
}

impl<T: CalculatorObserver> CalculatorObserver for Arc<Mutex<T>> {
    fn outputs_changed(
        &mut self,
        update: &OutputsUpdate,
    ) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .outputs_changed(update);
    }
}

pub struct CalculatorState {
    input: LoanCalculatorInput,
    output: LoanCalculatorOutput,
    principal: WidgetPair,
    term: WidgetPair,
    rate: WidgetPair,
    display: OutputDisplay,
    scheduler: FrameScheduler<LoanCalculatorInput>,
    observers: Vec<Box<dyn CalculatorObserver>>,
    recomputations: u64,
    display_updates: u64,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorState {
    /// Starts from 5,00,000 over 12 months at 16.99 % with outputs already
    /// computed.
    pub fn new() -> Self {
        let input = LoanCalculatorInput::default();
        // The defaults are far from the overflow range.
        let output = EmiCalculator::new(input)
            .calculate()
            .unwrap_or(LoanCalculatorOutput::ZERO);

        Self {
            input,
            output,
            principal: principal_widgets(input.principal),
            term: term_widgets(input.term_months),
            rate: rate_widgets(input.annual_rate_percent),
            display: OutputDisplay::render(&output),
            scheduler: FrameScheduler::new(),
            observers: Vec::new(),
            recomputations: 0,
            display_updates: 0,
        }
    }

    pub fn input(&self) -> LoanCalculatorInput {
        self.input
    }

    /// Outputs as of the last frame. Call [`Self::flush`] first when inputs
    /// may have changed since.
    pub fn output(&self) -> LoanCalculatorOutput {
        self.output
    }

    pub fn principal_widgets(&self) -> &WidgetPair {
        &self.principal
    }

    pub fn term_widgets(&self) -> &WidgetPair {
        &self.term
    }

    pub fn rate_widgets(&self) -> &WidgetPair {
        &self.rate
    }

    pub fn display(&self) -> &OutputDisplay {
        &self.display
    }

    /// e.g. `"₹ 5,00,000"`.
    pub fn principal_label(&self) -> String {
        format_inr(self.input.principal)
    }

    /// e.g. `"12 months"`.
    pub fn term_label(&self) -> String {
        format!("{} months", self.input.term_months)
    }

    /// e.g. `"16.99% p.a."`.
    pub fn rate_label(&self) -> String {
        format_rate(self.input.annual_rate_percent)
    }

    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn display_updates(&self) -> u64 {
        self.display_updates
    }

    pub fn has_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Attaches an observer. It is immediately told the current outputs with
    /// `animate == false`.
    pub fn subscribe(
        &mut self,
        mut observer: Box<dyn CalculatorObserver>,
    ) {
        observer.outputs_changed(&OutputsUpdate {
            previous: self.output,
            current: self.output,
            animate: false,
        });
        self.observers.push(observer);
    }

    pub fn set_principal(
        &mut self,
        value: f64,
    ) -> bool {
        let Some(principal) = positive_decimal(value) else {
            debug!(value, "principal ignored");
            return false;
        };
        let candidate = LoanCalculatorInput {
            principal,
            ..self.input
        };
        if !self.accept(candidate) {
            return false;
        }
        self.principal = WidgetPair {
            slider: value,
            field: principal.normalize().to_string(),
        };
        true
    }

    /// Term in months; fractional values are rounded to the nearest month.
    pub fn set_term(
        &mut self,
        value: f64,
    ) -> bool {
        let months = value.round();
        let Some(term_months) = months.to_u32().filter(|m| *m > 0) else {
            debug!(value, "term ignored");
            return false;
        };
        let candidate = LoanCalculatorInput {
            term_months,
            ..self.input
        };
        if !self.accept(candidate) {
            return false;
        }
        self.term = term_widgets(term_months);
        true
    }

    pub fn set_rate(
        &mut self,
        value: f64,
    ) -> bool {
        let Some(annual_rate_percent) = positive_decimal(value) else {
            debug!(value, "rate ignored");
            return false;
        };
        let candidate = LoanCalculatorInput {
            annual_rate_percent,
            ..self.input
        };
        if !self.accept(candidate) {
            return false;
        }
        self.rate = WidgetPair {
            slider: value,
            field: two_decimals(annual_rate_percent).to_string(),
        };
        true
    }

    /// Numeric-field entry for the principal, e.g. `"5,00,000"`.
    pub fn set_principal_text(
        &mut self,
        text: &str,
    ) -> bool {
        parse_number(text).is_ok_and(|value| self.set_principal(value))
    }

    pub fn set_term_text(
        &mut self,
        text: &str,
    ) -> bool {
        parse_number(text).is_ok_and(|value| self.set_term(value))
    }

    pub fn set_rate_text(
        &mut self,
        text: &str,
    ) -> bool {
        parse_number(text).is_ok_and(|value| self.set_rate(value))
    }

    /// Frame tick. Recomputes if anything was scheduled since the last frame
    /// and returns whether it did.
    pub fn on_frame(&mut self) -> bool {
        let Some(input) = self.scheduler.on_frame() else {
            return false;
        };

        let output = match EmiCalculator::new(input).calculate() {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "recomputation skipped");
                return false;
            }
        };

        let previous = self.output;
        self.output = output;
        self.recomputations += 1;

        self.display = OutputDisplay::render(&output);
        self.display_updates += 1;

        let update = OutputsUpdate {
            previous,
            current: output,
            animate: true,
        };
        for observer in &mut self.observers {
            observer.outputs_changed(&update);
        }
        true
    }

    /// Runs any pending recomputation now so that [`Self::output`] matches
    /// [`Self::input`].
    pub fn flush(&mut self) {
        self.on_frame();
    }

    fn accept(
        &mut self,
        candidate: LoanCalculatorInput,
    ) -> bool {
        if let Err(e) = EmiCalculator::new(candidate).calculate() {
            warn!(error = %e, "input rejected");
            return false;
        }
        self.input = candidate;
        self.scheduler.schedule(candidate);
        true
    }
}

fn positive_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    Decimal::from_f64(value).filter(|d| d.is_sign_positive() && !d.is_zero())
}

fn principal_widgets(principal: Decimal) -> WidgetPair {
    WidgetPair {
        slider: principal.to_f64().unwrap_or_default(),
        field: principal.normalize().to_string(),
    }
}

fn term_widgets(term_months: u32) -> WidgetPair {
    WidgetPair {
        slider: f64::from(term_months),
        field: term_months.to_string(),
    }
}

fn rate_widgets(rate: Decimal) -> WidgetPair {
    WidgetPair {
        slider: rate.to_f64().unwrap_or_default(),
        field: two_decimals(rate).to_string(),
    }
}
