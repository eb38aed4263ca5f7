//! Checkout form validation.
//!
//! The rules are compiled once into a [`Validator`], which the reducer
//! receives as part of its environment. Every check is pure and reports
//! problems as data ([`FormErrors`]) rather than as `Err`.

use crate::model::{FormErrors, FormField, OrderDraft};
use regex::Regex;
use thiserror::Error;

/// Address: Latin or Cyrillic letters, digits, comma, period, whitespace
const ADDRESS_RULE: &str = r"^[A-Za-zА-Яа-яЁё0-9,.\s]+$";

/// Email: `local@domain.tld` without whitespace
const EMAIL_RULE: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Phone: optional `+7`/`8`, optional `(xxx)`, then 7 to 10 digits with
/// single space or hyphen separators
const PHONE_RULE: &str = r"^(?:\+7|8)?[\s-]?(?:\([0-9]{3}\))?[\s-]?(?:[0-9][\s-]?){6,9}[0-9]$";

/// Messages shown next to invalid fields
pub mod messages {
    /// Payment method not chosen
    pub const PAYMENT_REQUIRED: &str = "select a payment method";
    /// Address empty
    pub const ADDRESS_REQUIRED: &str = "enter delivery address";
    /// Address contains unsupported characters
    pub const ADDRESS_INVALID: &str = "invalid address";
    /// Email empty
    pub const EMAIL_REQUIRED: &str = "enter email";
    /// Email malformed
    pub const EMAIL_INVALID: &str = "invalid email";
    /// Phone empty
    pub const PHONE_REQUIRED: &str = "enter phone number";
    /// Phone malformed
    pub const PHONE_INVALID: &str = "invalid phone";
}

/// A validation rule failed to compile
#[derive(Error, Debug)]
#[error("invalid {rule} rule: {source}")]
pub struct ValidatorError {
    /// Which rule
    pub rule: &'static str,
    /// Underlying regex error
    #[source]
    pub source: regex::Error,
}

/// The two independently validated field sets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    /// `address` and `payment`, the first checkout step
    Address,
    /// `email` and `phone`, the second checkout step
    Contacts,
}

impl FieldGroup {
    /// Fields belonging to the group
    #[must_use]
    pub const fn fields(self) -> &'static [FormField] {
        match self {
            Self::Address => &[FormField::Payment, FormField::Address],
            Self::Contacts => &[FormField::Email, FormField::Phone],
        }
    }
}

/// Compiled checkout validation rules
#[derive(Clone, Debug)]
pub struct Validator {
    address: Regex,
    email: Regex,
    phone: Regex,
}

impl Validator {
    /// Compile the rules
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`] if a rule fails to compile.
    pub fn new() -> Result<Self, ValidatorError> {
        Ok(Self {
            address: compile("address", ADDRESS_RULE)?,
            email: compile("email", EMAIL_RULE)?,
            phone: compile("phone", PHONE_RULE)?,
        })
    }

    /// Check the address step: payment chosen, address present and well formed
    #[must_use]
    pub fn validate_address(&self, draft: &OrderDraft) -> FormErrors {
        let mut errors = FormErrors::new();

        if draft.payment.is_none() {
            errors.insert(FormField::Payment, messages::PAYMENT_REQUIRED);
        }

        if draft.address.is_empty() {
            errors.insert(FormField::Address, messages::ADDRESS_REQUIRED);
        } else if !self.address.is_match(&draft.address) {
            errors.insert(FormField::Address, messages::ADDRESS_INVALID);
        }

        errors
    }

    /// Check the contacts step: email and phone present and well formed
    #[must_use]
    pub fn validate_contacts(&self, draft: &OrderDraft) -> FormErrors {
        let mut errors = FormErrors::new();

        if draft.email.is_empty() {
            errors.insert(FormField::Email, messages::EMAIL_REQUIRED);
        } else if !self.email.is_match(&draft.email) {
            errors.insert(FormField::Email, messages::EMAIL_INVALID);
        }

        if draft.phone.is_empty() {
            errors.insert(FormField::Phone, messages::PHONE_REQUIRED);
        } else if !self.phone.is_match(&draft.phone) {
            errors.insert(FormField::Phone, messages::PHONE_INVALID);
        }

        errors
    }

    /// Validate one group
    #[must_use]
    pub fn validate(&self, group: FieldGroup, draft: &OrderDraft) -> FormErrors {
        match group {
            FieldGroup::Address => self.validate_address(draft),
            FieldGroup::Contacts => self.validate_contacts(draft),
        }
    }

    /// Validate both groups at once
    #[must_use]
    pub fn validate_all(&self, draft: &OrderDraft) -> FormErrors {
        let mut errors = self.validate_address(draft);
        errors.extend(self.validate_contacts(draft));
        errors
    }
}

fn compile(rule: &'static str, pattern: &str) -> Result<Regex, ValidatorError> {
    Regex::new(pattern).map_err(|source| ValidatorError { rule, source })
}
