use crate::context::ExecutionContext;
use crate::output::{self, Painter};
use anyhow::Result;
use caseorg_core::{CaseLookupController, NoteEditor, SaveOutcome};
use caseorg_types::NOTE_FILE_NAME;
use serde::Serialize;

#[derive(Serialize)]
struct NoteView<'a> {
    case: String,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<&'a str>,
}

pub fn handle(
    ctx: &ExecutionContext,
    year: &str,
    month: &str,
    case: &str,
    set: Option<String>,
) -> Result<()> {
    let backend = ctx.backend();
    let backend = backend.as_ref();
    let mut lookup = CaseLookupController::new();
    let mut editor = NoteEditor::new();

    ctx.block_on(async {
        lookup.change_year(backend, year).await?;
        lookup.change_month(backend, month).await?;
        lookup.change_case(backend, case).await
    })?;

    let painter = Painter::detect();
    let Some(content) = set else {
        let exists = lookup.note_button().is_visible();
        if exists {
            lookup.open_note(&mut editor)?;
        }
        if ctx.is_json() {
            return output::print_json(&NoteView {
                case: lookup.selection().to_string(),
                exists,
                content: exists.then(|| editor.buffer().to_string()),
                template: lookup.note_template(),
            });
        }
        if exists {
            println!("{}", editor.display_text());
        } else {
            println!(
                "{}",
                painter.dim(&format!("No {} for {}", NOTE_FILE_NAME, lookup.selection()))
            );
            if let Some(template) = lookup.note_template() {
                println!("{}", template);
            }
        }
        return Ok(());
    };

    if lookup.note_button().is_visible() {
        lookup.open_note(&mut editor)?;
        editor.begin_edit();
    } else {
        lookup.open_create_note(&mut editor)?;
    }
    editor.set_buffer(content);
    let outcome = ctx.block_on(editor.save(backend))?;
    ctx.block_on(lookup.refresh_note(backend, &outcome))?;

    if let SaveOutcome::Saved { created, .. } = outcome {
        let verb = if created { "Created" } else { "Saved" };
        println!(
            "{} {} for {}",
            painter.ok(verb),
            NOTE_FILE_NAME,
            lookup.selection()
        );
    }
    Ok(())
}
