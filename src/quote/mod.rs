//! Quote Intake
//!
//! Domain types for life insurance quote requests and the multi-step wizard
//! that collects them.
//!
//! ## Flow
//!
//! 1. A [`WizardState`] starts empty on the gender step
//! 2. Each step applies a [`StepInput`], filling one slice of [`QuoteFormData`]
//! 3. On the contact step the form is handed off for submission
//! 4. The store persists it as a [`QuoteRecord`] with snake_case columns

mod types;
mod wizard;

pub use types::{Gender, HealthStatus, NewQuoteRow, QuoteFormData, QuoteRecord, TermLength};
pub use wizard::{ContactDetails, Progress, QuoteStep, StepInput, WizardState};
