use crate::infra::parse_date;
use chrono::NaiveDate;
use clap::Args;
use onboarding::error::AppError;
use onboarding::form::{
    AttachedFile, AttachmentId, AttachmentList, ClientError, OnboardingForm, SubmissionClient,
};
use onboarding::intake::DocumentKind;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// Base URL of the onboarding service
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    pub(crate) server: String,
    #[arg(long)]
    pub(crate) first_name: String,
    #[arg(long)]
    pub(crate) last_name: String,
    #[arg(long)]
    pub(crate) email: String,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) dob: NaiveDate,
    /// Residential street line 1
    #[arg(long)]
    pub(crate) street1: String,
    /// Residential street line 2
    #[arg(long)]
    pub(crate) street2: String,
    /// Use the residential address as the permanent address
    #[arg(long)]
    pub(crate) same_as_residential: bool,
    #[arg(long, conflicts_with = "same_as_residential")]
    pub(crate) permanent_street1: Option<String>,
    #[arg(long, conflicts_with = "same_as_residential")]
    pub(crate) permanent_street2: Option<String>,
    /// Image document to attach (JPEG, PNG, or GIF); repeatable
    #[arg(long = "image")]
    pub(crate) images: Vec<PathBuf>,
    /// PDF document to attach; repeatable
    #[arg(long = "pdf")]
    pub(crate) pdfs: Vec<PathBuf>,
    /// Validate locally and print the outcome without sending anything
    #[arg(long)]
    pub(crate) dry_run: bool,
}

pub(crate) async fn run_submit(args: SubmitArgs) -> Result<(), AppError> {
    let mut form = build_form(&args)?;
    let attachments = build_attachments(&args.images, &args.pdfs).await?;
    let document_count = attachments.files().count();

    if args.dry_run {
        if form.validate() {
            println!("Form is valid; {document_count} document(s) ready to send");
        } else {
            render_field_errors(&form);
        }
        return Ok(());
    }

    let client = SubmissionClient::new(&args.server);
    println!(
        "Submitting onboarding form with {document_count} document(s) to {}",
        client.endpoint()
    );
    match client.submit(&mut form, &attachments).await {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(ClientError::Invalid(errors)) => {
            render_field_errors(&form);
            Err(ClientError::Invalid(errors).into())
        }
        Err(other) => Err(other.into()),
    }
}

fn build_form(args: &SubmitArgs) -> Result<OnboardingForm, AppError> {
    let mut form = OnboardingForm::default();
    form.set_field("firstName", args.first_name.as_str())?;
    form.set_field("lastName", args.last_name.as_str())?;
    form.set_field("email", args.email.as_str())?;
    form.set_field("dob", args.dob.format("%Y-%m-%d").to_string())?;
    form.set_field("residentialAddress.street1", args.street1.as_str())?;
    form.set_field("residentialAddress.street2", args.street2.as_str())?;

    if args.same_as_residential {
        form.set_same_as_residential(true);
    } else {
        form.set_field(
            "permanentAddress.street1",
            args.permanent_street1.clone().unwrap_or_default(),
        )?;
        form.set_field(
            "permanentAddress.street2",
            args.permanent_street2.clone().unwrap_or_default(),
        )?;
    }

    Ok(form)
}

async fn build_attachments(
    images: &[PathBuf],
    pdfs: &[PathBuf],
) -> Result<AttachmentList, AppError> {
    let mut list = AttachmentList::default();
    let mut used = 0;

    let files = images
        .iter()
        .map(|path| (DocumentKind::Image, path))
        .chain(pdfs.iter().map(|path| (DocumentKind::Pdf, path)));

    for (kind, path) in files {
        let id = next_slot(&mut list, used);
        used += 1;
        list.select_kind(id, kind)?;
        list.attach(id, read_attachment(path).await?)?;
    }

    Ok(list)
}

fn next_slot(list: &mut AttachmentList, used: usize) -> AttachmentId {
    match list.slots().get(used) {
        Some(slot) => slot.id,
        None => list.add_slot(),
    }
}

async fn read_attachment(path: &Path) -> Result<AttachedFile, AppError> {
    let data = tokio::fs::read(path).await?;
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    Ok(AttachedFile {
        file_name,
        content_type,
        data,
    })
}

fn render_field_errors(form: &OnboardingForm) {
    println!("Form has errors:");
    for (field, message) in form.errors() {
        println!("- {field}: {message}");
    }
}
