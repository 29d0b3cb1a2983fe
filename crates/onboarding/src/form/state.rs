use std::collections::BTreeSet;

use crate::intake::domain::Address;

use super::validation::{validate_field, validate_form, FieldErrors};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("unknown form field '{0}'")]
    UnknownField(String),
}

/// Client-side onboarding form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dob: String,
    pub residential_address: Address,
    pub permanent_address: Address,
    pub same_as_residential: bool,
    touched: BTreeSet<String>,
    errors: FieldErrors,
}

impl OnboardingForm {
    /// Current value of a top-level or dotted address field.
    pub fn value(&self, name: &str) -> Option<&str> {
        let value = match name {
            "firstName" => &self.first_name,
            "lastName" => &self.last_name,
            "email" => &self.email,
            "dob" => &self.dob,
            "residentialAddress.street1" => &self.residential_address.street1,
            "residentialAddress.street2" => &self.residential_address.street2,
            "permanentAddress.street1" => &self.permanent_address.street1,
            "permanentAddress.street2" => &self.permanent_address.street2,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Record input for a field and mark it touched.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let slot = match name {
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "email" => &mut self.email,
            "dob" => &mut self.dob,
            "residentialAddress.street1" => &mut self.residential_address.street1,
            "residentialAddress.street2" => &mut self.residential_address.street2,
            "permanentAddress.street1" => &mut self.permanent_address.street1,
            "permanentAddress.street2" => &mut self.permanent_address.street2,
            _ => return Err(FormError::UnknownField(name.to_string())),
        };
        *slot = value.into();
        self.touched.insert(name.to_string());
        Ok(())
    }

    /// Checking copies the residential address over; unchecking clears the permanent one.
    pub fn set_same_as_residential(&mut self, checked: bool) {
        self.same_as_residential = checked;
        self.permanent_address = if checked {
            self.residential_address.clone()
        } else {
            Address::default()
        };
    }

    /// Validate a single field after the user leaves it.
    pub fn blur(&mut self, name: &str) -> Option<&str> {
        let value = self.value(name).unwrap_or_default();
        match validate_field(self, name, value) {
            Some(message) => {
                self.errors.insert(name.to_string(), message.to_string());
            }
            None => {
                self.errors.remove(name);
            }
        }
        self.errors.get(name).map(String::as_str)
    }

    /// Run every validator, replacing the stored errors. Returns whether the form may be sent.
    pub fn validate(&mut self) -> bool {
        self.errors = validate_form(self);
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// Errors are only shown for fields the user has interacted with.
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        if self.is_touched(name) {
            self.errors.get(name).map(String::as_str)
        } else {
            None
        }
    }
}
