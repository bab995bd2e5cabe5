use crate::context::ExecutionContext;
use crate::output::Painter;
use anyhow::{Context, Result};
use caseorg_core::results::DeleteOutcome;
use caseorg_core::{ConfirmPolicy, NativeConfirm};
use caseorg_types::{DirPath, SearchResultRecord};
use std::io::{BufRead, Write};

/// `[y/N]` prompt on the controlling terminal
struct StdinConfirm;

impl NativeConfirm for StdinConfirm {
    fn confirm(&self, message: &str) -> bool {
        eprint!("{} [y/N] ", message);
        let _ = std::io::stderr().flush();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Used with `--yes`
struct AlwaysYes;

impl NativeConfirm for AlwaysYes {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

pub fn handle(ctx: &ExecutionContext, path: &str, yes: bool) -> Result<()> {
    let backend = ctx.backend();
    let mut renderer = ctx.renderer();
    let file = DirPath::parse(path)
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| path.to_string());
    renderer.render(Some(&[SearchResultRecord::new(file, path)]));

    let row = renderer
        .record_rows()
        .next()
        .map(|row| row.id)
        .context("Nothing to delete")?;
    let policy = if yes {
        ConfirmPolicy::new(AlwaysYes)
    } else {
        ConfirmPolicy::new(StdinConfirm)
    };

    let painter = Painter::detect();
    match ctx.block_on(renderer.delete_with_confirm(backend.as_ref(), &policy, row))? {
        DeleteOutcome::Deleted => println!("{} {}", painter.ok("Deleted"), path),
        DeleteOutcome::Declined => println!("{}", painter.dim("Cancelled")),
    }
    Ok(())
}
