//! taskflow attach command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::attachment::{
    complete_upload, expand_paths, validate_batch, AttachmentMeta, AttachmentPolicy,
    DownloadHandle, UploadCandidate,
};
use crate::cli::{emit_event, load_context, open_event_sink};
use crate::error::{Error, Result};
use crate::events::EventKind;
use crate::output::{emit_success, HumanOutput, OutputOptions};

/// Options for attach add
pub struct AddOptions {
    pub task: String,
    pub paths: Vec<String>,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for attach list
pub struct ListOptions {
    pub task: String,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for attach delete
pub struct DeleteOptions {
    pub task: String,
    pub attachment: String,
    pub yes: bool,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for attach download
pub struct DownloadOptions {
    pub task: String,
    pub attachment: String,
    pub out: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct AttachAddOutput {
    task_id: String,
    uploaded: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rejected: Vec<String>,
    attachments: Vec<AttachmentMeta>,
}

#[derive(Serialize)]
struct AttachListOutput {
    task_id: String,
    total: usize,
    attachments: Vec<AttachmentMeta>,
}

#[derive(Serialize)]
struct AttachDeleteOutput {
    task_id: String,
    attachment_id: String,
    deleted: bool,
}

#[derive(Serialize)]
struct AttachDownloadOutput {
    task_id: String,
    attachment_id: String,
    name: String,
    path: String,
    size: u64,
}

#[derive(Serialize)]
struct AttachmentEventData {
    task_id: String,
    attachment_id: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;

    ctx.store.get(&options.task)?;
    let files = expand_paths(&options.paths)?;
    let mut candidates = Vec::with_capacity(files.len());
    for file in &files {
        candidates.push(UploadCandidate::from_path(file)?);
    }

    let policy = AttachmentPolicy::from_config(&ctx.config.attachments)?;
    let outcome = validate_batch(candidates, &policy);
    if outcome.all_rejected() {
        for reason in &outcome.rejected {
            eprintln!("{reason}");
        }
        return Err(Error::Validation("Failed to upload files".to_string()));
    }

    let rejected = outcome.rejected;
    let attachments = complete_upload(outcome.accepted);
    let metas: Vec<AttachmentMeta> = attachments.iter().map(AttachmentMeta::from).collect();
    let uploaded = ctx.store.add_attachments(&options.task, attachments)?;

    let mut event_warnings = Vec::new();
    for meta in &metas {
        if let Some(warning) = emit_event(
            &mut event_sink,
            EventKind::AttachmentUploaded,
            AttachmentEventData {
                task_id: options.task.clone(),
                attachment_id: meta.id.clone(),
                name: meta.name.clone(),
                size: Some(meta.size),
            },
        ) {
            event_warnings.push(warning);
        }
    }

    let mut human = HumanOutput::new(format!("Successfully uploaded {uploaded} file(s)"));
    for warning in event_warnings {
        human.push_warning(warning);
    }
    for reason in &rejected {
        human.push_warning(reason.clone());
    }
    for meta in &metas {
        human.push_detail(format!(
            "{} {} ({}, {})",
            meta.id, meta.name, meta.size_display, meta.kind
        ));
    }

    let output = AttachAddOutput {
        task_id: options.task,
        uploaded,
        rejected,
        attachments: metas,
    };
    emit_success(
        OutputOptions {
            json: options.json && !events_to_stdout,
            quiet: options.quiet || events_to_stdout,
        },
        "attach add",
        &output,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let attachments = ctx.store.attachments(&options.task)?;
    let metas: Vec<AttachmentMeta> = attachments.iter().map(AttachmentMeta::from).collect();

    let mut human = HumanOutput::new(format!("Attachments for {}", options.task));
    human.push_summary("Total", metas.len().to_string());
    for meta in &metas {
        human.push_detail(format!(
            "{} {} ({}, {})",
            meta.id, meta.name, meta.size_display, meta.kind
        ));
    }

    let output = AttachListOutput {
        task_id: options.task,
        total: metas.len(),
        attachments: metas,
    };
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "attach list",
        &output,
        Some(&human),
    )
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let mut ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;
    let out_options = OutputOptions {
        json: options.json && !events_to_stdout,
        quiet: options.quiet || events_to_stdout,
    };

    let name = ctx
        .store
        .find_attachment(&options.task, &options.attachment)?
        .name
        .clone();

    if !options.yes {
        let output = AttachDeleteOutput {
            task_id: options.task.clone(),
            attachment_id: options.attachment.clone(),
            deleted: false,
        };
        let mut human = HumanOutput::new("Deletion cancelled");
        human.push_detail(format!("Are you sure you want to delete \"{name}\"?"));
        human.push_next_step(format!(
            "taskflow attach delete {} {} --yes",
            options.task, options.attachment
        ));
        return emit_success(out_options, "attach delete", &output, Some(&human));
    }

    let removed = ctx.store.delete_attachment(&options.task, &options.attachment)?;

    let event_warning = emit_event(
        &mut event_sink,
        EventKind::AttachmentDeleted,
        AttachmentEventData {
            task_id: options.task.clone(),
            attachment_id: removed.id.clone(),
            name: removed.name.clone(),
            size: None,
        },
    );

    let mut human = HumanOutput::new("Attachment deleted");
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("Name", removed.name.clone());
    human.push_summary("Size", crate::attachment::format_size(removed.size));

    let output = AttachDeleteOutput {
        task_id: options.task,
        attachment_id: removed.id,
        deleted: true,
    };
    emit_success(out_options, "attach delete", &output, Some(&human))
}

pub fn run_download(options: DownloadOptions) -> Result<()> {
    let ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let attachment = ctx.store.find_attachment(&options.task, &options.attachment)?;

    let handle = DownloadHandle::new(attachment)?;
    let dest = options
        .out
        .unwrap_or_else(|| PathBuf::from(handle.name()));
    let saved = handle.save_to(&dest)?;

    let mut human = HumanOutput::new(format!("Downloaded {}", attachment.name));
    human.push_summary("Path", saved.display().to_string());
    human.push_summary("Size", crate::attachment::format_size(attachment.size));

    let output = AttachDownloadOutput {
        task_id: options.task,
        attachment_id: attachment.id.clone(),
        name: attachment.name.clone(),
        path: saved.display().to_string(),
        size: attachment.size,
    };
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "attach download",
        &output,
        Some(&human),
    )
}

