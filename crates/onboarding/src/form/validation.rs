use std::collections::BTreeMap;

use super::state::OnboardingForm;

/// Error messages keyed by field name, dotted for address lines.
pub type FieldErrors = BTreeMap<String, String>;

/// Every field the client validates, in display order.
pub const VALIDATED_FIELDS: [&str; 8] = [
    "firstName",
    "lastName",
    "email",
    "dob",
    "residentialAddress.street1",
    "residentialAddress.street2",
    "permanentAddress.street1",
    "permanentAddress.street2",
];

/// Validate one field value in the context of the rest of the form.
pub fn validate_field(form: &OnboardingForm, name: &str, value: &str) -> Option<&'static str> {
    let missing = value.trim().is_empty();
    let message = match name {
        "firstName" => "First name is required.",
        "lastName" => "Last name is required.",
        "email" => "Email is required.",
        "dob" => "Date of Birth is required.",
        "residentialAddress.street1" => "Street 1 is required.",
        "residentialAddress.street2" => "Street 2 is required.",
        "permanentAddress.street1" if !form.same_as_residential => {
            "Permanent Street 1 is required."
        }
        "permanentAddress.street2" if !form.same_as_residential => {
            "Permanent Street 2 is required."
        }
        _ => return None,
    };

    missing.then_some(message)
}

/// Run every field validator against the current form state.
pub fn validate_form(form: &OnboardingForm) -> FieldErrors {
    VALIDATED_FIELDS
        .iter()
        .filter_map(|&name| {
            let value = form.value(name).unwrap_or_default();
            validate_field(form, name, value).map(|message| (name.to_string(), message.to_string()))
        })
        .collect()
}
