//! Quote Wizard
//!
//! Explicit state for the multi-step quote form. Each step reads and writes
//! one slice of [`QuoteFormData`]; the state is passed to steps rather than
//! shared globally, so each step can be exercised on its own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{Gender, HealthStatus, QuoteFormData, TermLength};

/// Steps of the wizard, in presentation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStep {
    Gender,
    DateOfBirth,
    HealthStatus,
    CoverageAmount,
    TermLength,
    Contact,
}

impl QuoteStep {
    pub const ALL: [QuoteStep; 6] = [
        QuoteStep::Gender,
        QuoteStep::DateOfBirth,
        QuoteStep::HealthStatus,
        QuoteStep::CoverageAmount,
        QuoteStep::TermLength,
        QuoteStep::Contact,
    ];

    /// Zero-based position in the sequence
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Option<QuoteStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<QuoteStep> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Question shown for this step
    pub fn title(&self) -> &'static str {
        match self {
            QuoteStep::Gender => "What is your gender?",
            QuoteStep::DateOfBirth => "When were you born?",
            QuoteStep::HealthStatus => "How would you describe your health?",
            QuoteStep::CoverageAmount => "How much coverage do you need?",
            QuoteStep::TermLength => "How long do you need coverage?",
            QuoteStep::Contact => "Where should we send your quotes?",
        }
    }

    /// Whether the slice of form data owned by this step is populated
    pub fn is_complete(&self, form: &QuoteFormData) -> bool {
        match self {
            QuoteStep::Gender => form.gender.is_some(),
            QuoteStep::DateOfBirth => form.date_of_birth.is_some(),
            QuoteStep::HealthStatus => form.health_status.is_some(),
            QuoteStep::CoverageAmount => form.coverage_amount.is_some(),
            QuoteStep::TermLength => form.term_length.is_some(),
            QuoteStep::Contact => {
                form.first_name.is_some()
                    && form.last_name.is_some()
                    && form.email.is_some()
                    && form.phone.is_some()
            }
        }
    }
}

/// Contact details collected on the final step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Value produced by a step view
#[derive(Debug, Clone, PartialEq)]
pub enum StepInput {
    Gender(Gender),
    DateOfBirth(NaiveDate),
    HealthStatus(HealthStatus),
    CoverageAmount(f64),
    TermLength(TermLength),
    Contact(ContactDetails),
}

impl StepInput {
    /// The step this input belongs to
    pub fn step(&self) -> QuoteStep {
        match self {
            StepInput::Gender(_) => QuoteStep::Gender,
            StepInput::DateOfBirth(_) => QuoteStep::DateOfBirth,
            StepInput::HealthStatus(_) => QuoteStep::HealthStatus,
            StepInput::CoverageAmount(_) => QuoteStep::CoverageAmount,
            StepInput::TermLength(_) => QuoteStep::TermLength,
            StepInput::Contact(_) => QuoteStep::Contact,
        }
    }
}

/// How many steps are done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(form: &QuoteFormData) -> Self {
        Self {
            completed: QuoteStep::ALL.iter().filter(|s| s.is_complete(form)).count(),
            total: QuoteStep::ALL.len(),
        }
    }

    /// Completion percentage, rounded down
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100) / self.total) as u8
    }
}

/// Wizard state container
#[derive(Debug, Clone)]
pub struct WizardState {
    form: QuoteFormData,
    current: QuoteStep,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    /// Start an empty wizard on the first step
    pub fn new() -> Self {
        Self {
            form: QuoteFormData::default(),
            current: QuoteStep::Gender,
        }
    }

    pub fn form(&self) -> &QuoteFormData {
        &self.form
    }

    pub fn current_step(&self) -> QuoteStep {
        self.current
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.form.gender = Some(gender);
    }

    pub fn set_date_of_birth(&mut self, date: NaiveDate) {
        self.form.date_of_birth = Some(date);
    }

    pub fn set_health_status(&mut self, status: HealthStatus) {
        self.form.health_status = Some(status);
    }

    pub fn set_coverage_amount(&mut self, amount: f64) {
        self.form.coverage_amount = Some(amount);
    }

    pub fn set_term_length(&mut self, term: TermLength) {
        self.form.term_length = Some(term);
    }

    pub fn set_contact(&mut self, contact: ContactDetails) {
        self.form.first_name = Some(contact.first_name);
        self.form.last_name = Some(contact.last_name);
        self.form.email = Some(contact.email);
        self.form.phone = Some(contact.phone);
    }

    /// Write the step's slice and move past it.
    ///
    /// Returns the step now shown. Staying on `Contact` after it is applied
    /// means the wizard is ready for submission.
    pub fn apply(&mut self, input: StepInput) -> QuoteStep {
        let step = input.step();
        match input {
            StepInput::Gender(g) => self.set_gender(g),
            StepInput::DateOfBirth(d) => self.set_date_of_birth(d),
            StepInput::HealthStatus(h) => self.set_health_status(h),
            StepInput::CoverageAmount(a) => self.set_coverage_amount(a),
            StepInput::TermLength(t) => self.set_term_length(t),
            StepInput::Contact(c) => self.set_contact(c),
        }
        self.current = step.next().unwrap_or(step);
        self.current
    }

    /// Go back one step; data already entered is kept
    pub fn back(&mut self) -> QuoteStep {
        if let Some(prev) = self.current.previous() {
            self.current = prev;
        }
        self.current
    }

    pub fn progress(&self) -> Progress {
        Progress::of(&self.form)
    }

    pub fn is_complete(&self) -> bool {
        QuoteStep::ALL.iter().all(|s| s.is_complete(&self.form))
    }

    /// Hand the collected data off for submission
    pub fn into_submission(self) -> QuoteFormData {
        self.form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactDetails {
        ContactDetails {
            first_name: "Sam".to_string(),
            last_name: "Okafor".to_string(),
            email: "sam@example.com".to_string(),
            phone: "555-0199".to_string(),
        }
    }

    #[test]
    fn test_new_wizard_is_empty() {
        let wizard = WizardState::new();
        assert_eq!(wizard.current_step(), QuoteStep::Gender);
        assert_eq!(wizard.form(), &QuoteFormData::default());
        assert_eq!(wizard.progress().completed, 0);
        assert!(!wizard.is_complete());
    }

    #[test]
    fn test_full_walkthrough() {
        let mut wizard = WizardState::new();

        assert_eq!(wizard.apply(StepInput::Gender(Gender::Male)), QuoteStep::DateOfBirth);
        assert_eq!(
            wizard.apply(StepInput::DateOfBirth(NaiveDate::from_ymd_opt(1990, 1, 2).unwrap())),
            QuoteStep::HealthStatus
        );
        wizard.apply(StepInput::HealthStatus(HealthStatus::Excellent));
        wizard.apply(StepInput::CoverageAmount(250_000.0));
        assert_eq!(wizard.apply(StepInput::TermLength(TermLength::Thirty)), QuoteStep::Contact);
        assert_eq!(wizard.apply(StepInput::Contact(contact())), QuoteStep::Contact);

        assert!(wizard.is_complete());
        assert_eq!(wizard.progress().percent(), 100);

        let form = wizard.into_submission();
        assert_eq!(form.gender, Some(Gender::Male));
        assert_eq!(form.term_length, Some(TermLength::Thirty));
        assert_eq!(form.full_name().as_deref(), Some("Sam Okafor"));
    }

    #[test]
    fn test_back_keeps_entered_data() {
        let mut wizard = WizardState::new();
        wizard.apply(StepInput::Gender(Gender::Female));
        assert_eq!(wizard.back(), QuoteStep::Gender);
        assert_eq!(wizard.form().gender, Some(Gender::Female));
        assert_eq!(wizard.back(), QuoteStep::Gender);
    }

    #[test]
    fn test_progress_counts_completed_slices() {
        let mut wizard = WizardState::new();
        wizard.set_health_status(HealthStatus::Fair);
        wizard.set_coverage_amount(100_000.0);

        let progress = wizard.progress();
        assert_eq!(progress.completed, 2);
        assert_eq!(progress.total, 6);
        assert_eq!(progress.percent(), 33);
    }

    #[test]
    fn test_contact_step_needs_all_fields() {
        let form = QuoteFormData {
            first_name: Some("A".to_string()),
            last_name: Some("B".to_string()),
            email: Some("a@b.c".to_string()),
            ..Default::default()
        };
        assert!(!QuoteStep::Contact.is_complete(&form));
    }

    #[test]
    fn test_step_navigation_bounds() {
        assert_eq!(QuoteStep::Gender.previous(), None);
        assert_eq!(QuoteStep::Contact.next(), None);
        assert_eq!(QuoteStep::TermLength.next(), Some(QuoteStep::Contact));
    }
}
