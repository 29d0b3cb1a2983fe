use super::common::*;
use crate::intake::domain::{Address, DocumentKind};
use crate::intake::validation::{
    age_on, parse_date_of_birth, parse_mirror_flag, SubmissionGuard, SubmissionPolicy,
    SubmissionRejection,
};

#[test]
fn valid_form_yields_applicant_and_classified_documents() {
    let validated = SubmissionGuard::default()
        .validate(valid_form(), today())
        .expect("form is valid");

    assert_eq!(validated.applicant.first_name, "Jane");
    assert_eq!(validated.applicant.dob, date(1990, 1, 1));
    assert_eq!(
        validated.applicant.residential_address,
        Address::new("12 Harbour Road", "Flat 3")
    );
    assert_eq!(
        validated.applicant.permanent_address,
        Address::new("4 Mill Lane", "Greenfield")
    );
    let kinds: Vec<_> = validated.documents.iter().map(|doc| doc.kind).collect();
    assert_eq!(kinds, vec![DocumentKind::Image, DocumentKind::Pdf]);
}

#[test]
fn age_counts_the_birthday_itself() {
    assert_eq!(age_on(date(2008, 10, 18), today()), 18);
    assert_eq!(age_on(date(2008, 10, 19), today()), 17);
    assert_eq!(age_on(date(2008, 11, 1), today()), 17);
    assert_eq!(age_on(date(1990, 1, 1), today()), 36);
}

#[test]
fn leap_day_birthdays_roll_over_on_march_first() {
    let dob = date(2008, 2, 29);
    assert_eq!(age_on(dob, date(2026, 2, 28)), 17);
    assert_eq!(age_on(dob, date(2026, 3, 1)), 18);
}

#[test]
fn eighteenth_birthday_today_is_eligible() {
    let form = valid_form().with_field("dob", "2008-10-18");
    assert!(SubmissionGuard::default().validate(form, today()).is_ok());
}

#[test]
fn one_day_short_of_eighteen_is_rejected() {
    let form = valid_form().with_field("dob", "2008-10-19");
    let err = SubmissionGuard::default()
        .validate(form, today())
        .expect_err("underage");
    assert_eq!(
        err,
        SubmissionRejection::Underage {
            minimum: 18,
            age: 17
        }
    );
    assert_eq!(err.to_string(), "User must be at least 18 years old.");
}

#[test]
fn future_birth_dates_are_underage() {
    let form = valid_form().with_field("dob", "2030-05-05");
    assert!(matches!(
        SubmissionGuard::default().validate(form, today()),
        Err(SubmissionRejection::Underage { .. })
    ));
}

#[test]
fn date_of_birth_accepts_timestamps_but_not_free_text() {
    assert_eq!(
        parse_date_of_birth("1990-01-01T00:00:00.000Z"),
        Some(date(1990, 1, 1))
    );
    assert_eq!(parse_date_of_birth(" 1990-01-01 "), Some(date(1990, 1, 1)));
    assert_eq!(parse_date_of_birth("01/01/1990"), None);

    let form = valid_form().with_field("dob", "yesterday");
    assert_eq!(
        SubmissionGuard::default().validate(form, today()),
        Err(SubmissionRejection::InvalidDateOfBirth)
    );
}

#[test]
fn blank_required_fields_are_named() {
    let form = valid_form().with_field("lastName", "   ");
    let err = SubmissionGuard::default()
        .validate(form, today())
        .expect_err("last name missing");
    assert_eq!(err.to_string(), "Last name is required.");
}

#[test]
fn residential_address_needs_both_lines() {
    let form = valid_form().with_field("residentialAddress", r#"{"street1":"12 Harbour Road"}"#);
    assert_eq!(
        SubmissionGuard::default().validate(form, today()),
        Err(SubmissionRejection::ResidentialAddressIncomplete)
    );
}

#[test]
fn malformed_address_json_counts_as_missing() {
    let form = valid_form().with_field("residentialAddress", "{street1: oops");
    assert_eq!(
        SubmissionGuard::default().validate(form, today()),
        Err(SubmissionRejection::ResidentialAddressIncomplete)
    );
}

#[test]
fn dotted_address_fields_are_accepted() {
    let mut form = valid_form();
    form.fields.remove("residentialAddress");
    let form = form
        .with_field("residentialAddress.street1", "9 Quay Street")
        .with_field("residentialAddress.street2", "Unit 1");

    let validated = SubmissionGuard::default()
        .validate(form, today())
        .expect("dotted fields parse");
    assert_eq!(
        validated.applicant.residential_address,
        Address::new("9 Quay Street", "Unit 1")
    );
}

#[test]
fn permanent_address_required_without_mirror_flag() {
    let form = valid_form().with_field("permanentAddress", r#"{"street1":"","street2":""}"#);
    let err = SubmissionGuard::default()
        .validate(form, today())
        .expect_err("permanent address missing");
    assert_eq!(
        err.to_string(),
        "Permanent address is required if not the same as residential address."
    );
}

#[test]
fn mirror_flag_ignores_permanent_content() {
    let form = valid_form()
        .with_field("sameAsResidential", "true")
        .with_field("permanentAddress", "not even json");

    let validated = SubmissionGuard::default()
        .validate(form, today())
        .expect("permanent address ignored");
    assert!(validated.applicant.same_as_residential);
    assert_eq!(
        validated.applicant.permanent_address,
        validated.applicant.residential_address
    );
}

#[test]
fn mirror_flag_parses_checkbox_values() {
    assert!(parse_mirror_flag(Some("true")));
    assert!(parse_mirror_flag(Some("ON")));
    assert!(parse_mirror_flag(Some("1")));
    assert!(!parse_mirror_flag(Some("false")));
    assert!(!parse_mirror_flag(Some("")));
    assert!(!parse_mirror_flag(None));
}

#[test]
fn fewer_than_two_documents_is_rejected() {
    let err = SubmissionGuard::default()
        .validate(with_single_document(valid_form()), today())
        .expect_err("one document");
    assert_eq!(
        err,
        SubmissionRejection::TooFewDocuments {
            required: 2,
            found: 1
        }
    );
    assert_eq!(err.to_string(), "Minimum two documents are required.");
}

#[test]
fn unknown_types_are_stored_as_pdf_by_default() {
    let mut form = valid_form();
    form.files[1].content_type = "text/plain".to_string();

    let validated = SubmissionGuard::default()
        .validate(form, today())
        .expect("lenient policy accepts");
    assert_eq!(validated.documents[1].kind, DocumentKind::Pdf);
}

#[test]
fn strict_policy_rejects_unknown_types() {
    let mut form = valid_form();
    form.files[1].content_type = "text/plain".to_string();

    let guard = SubmissionGuard::with_policy(SubmissionPolicy::new(true));
    let err = guard.validate(form, today()).expect_err("strict policy");
    assert!(matches!(
        err,
        SubmissionRejection::UnsupportedDocumentType { ref content_type, .. } if content_type == "text/plain"
    ));
    assert_eq!(
        err.to_string(),
        "Invalid file type. Only image and PDF files are allowed."
    );
}
