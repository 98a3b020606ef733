//! Legal page command handlers.

use std::sync::Arc;

use tabled::Tabled;

use ridedesk_core::{Command as CoreCommand, CommandResult, Controller, LegalPage, LegalPageRequest};

use crate::cli::{GlobalOpts, LegalArgs, LegalCommand, LegalPageArgs};
use crate::error::CliError;
use crate::output;

use super::util;

/// Characters of content shown in list views.
const PREVIEW_CHARS: usize = 150;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LegalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Lang")]
    language: String,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Preview")]
    preview: String,
}

impl From<&Arc<LegalPage>> for LegalRow {
    fn from(p: &Arc<LegalPage>) -> Self {
        Self {
            id: p.id.to_string(),
            kind: p.kind.label().into(),
            title: p.title.clone(),
            language: p.language.clone(),
            updated: output::fmt_time(p.updated_at.or(p.created_at)),
            preview: p.preview(PREVIEW_CHARS),
        }
    }
}

fn detail(p: &LegalPage) -> String {
    [
        format!("ID:        {}", p.id),
        format!("Title:     {}", p.title),
        format!("Kind:      {} ({})", p.kind.label(), p.page_title),
        format!("Language:  {}", p.language),
        format!("Created:   {}", output::fmt_time(p.created_at)),
        format!("Updated:   {}", output::fmt_time(p.updated_at)),
        String::new(),
        p.content.clone(),
    ]
    .join("\n")
}

// ── Local checks ────────────────────────────────────────────────────

/// Build and check the request body. Reads `--content-file` when given.
pub fn page_request(args: &LegalPageArgs) -> Result<LegalPageRequest, CliError> {
    let content = match (&args.content, &args.content_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => String::new(),
    };
    let request = LegalPageRequest {
        title: args.title.clone(),
        page_title: args.page_title.clone(),
        language: args.language.clone(),
        content,
    };
    request.validate()?;
    Ok(request)
}

pub fn validate(cmd: &LegalCommand) -> Result<(), CliError> {
    match cmd {
        LegalCommand::List { .. } => {}
        LegalCommand::Get { page } => {
            util::entity_id(page, "page")?;
        }
        LegalCommand::Create(fields) => {
            page_request(fields)?;
        }
        LegalCommand::Update { page, fields } => {
            util::entity_id(page, "page")?;
            page_request(fields)?;
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: LegalArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LegalCommand::List { search, .. } => {
            controller.refresh_legal_pages().await?;
            let pages = controller.legal_pages(&util::query(&search));
            let out = output::render_list(
                &global.output,
                &pages,
                |p| LegalRow::from(p),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LegalCommand::Get { page } => {
            let id = util::entity_id(&page, "page")?;
            controller.refresh_legal_pages().await?;
            let found = controller
                .legal_page(&id)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "legal page".into(),
                    identifier: page,
                    list_command: "legal list".into(),
                })?;
            let out = output::render_single(
                &global.output,
                found.as_ref(),
                detail,
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LegalCommand::Create(fields) => {
            let request = page_request(&fields)?;
            let result = controller
                .execute(CoreCommand::CreateLegalPage(request))
                .await?;
            report(&result, "Legal page created", global)
        }

        LegalCommand::Update { page, fields } => {
            let id = util::entity_id(&page, "page")?;
            let request = page_request(&fields)?;
            let result = controller
                .execute(CoreCommand::UpdateLegalPage { id, request })
                .await?;
            report(&result, "Legal page updated", global)
        }
    }
}

fn report(result: &CommandResult, message: &str, global: &GlobalOpts) -> Result<(), CliError> {
    match result {
        CommandResult::LegalPage(page) => {
            let out = output::render_single(&global.output, page, detail, |p| p.id.to_string())?;
            output::print_output(&out, global.quiet);
        }
        _ => output::notice(message, global.quiet),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn args(content: Option<&str>, file: Option<std::path::PathBuf>) -> LegalPageArgs {
        LegalPageArgs {
            title: "Privacy".into(),
            page_title: "privacy".into(),
            language: "en".into(),
            content: content.map(str::to_owned),
            content_file: file,
        }
    }

    #[test]
    fn content_is_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "We keep your data safe.").unwrap();

        let request = page_request(&args(None, Some(file.path().to_path_buf()))).unwrap();
        assert_eq!(request.content, "We keep your data safe.");
    }

    #[test]
    fn empty_content_fails_locally() {
        let err = page_request(&args(Some("  "), None)).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }
}
