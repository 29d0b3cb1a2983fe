//! Client side of the onboarding form: field state, validation, document slots, and the
//! multipart client that talks to the intake endpoint.

pub mod attachments;
pub mod client;
pub mod state;
pub mod validation;

pub use attachments::{AttachedFile, AttachmentError, AttachmentId, AttachmentList, AttachmentSlot};
pub use client::{multipart_payload, ClientError, SubmissionClient};
pub use state::{FormError, OnboardingForm};
pub use validation::{validate_field, validate_form, FieldErrors, VALIDATED_FIELDS};
