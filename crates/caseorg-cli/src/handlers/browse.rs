use crate::context::ExecutionContext;
use crate::tui;
use anyhow::{Result, bail};
use is_terminal::IsTerminal;

pub fn ensure_terminal() -> Result<()> {
    if !std::io::stdout().is_terminal() {
        bail!("The browser needs an interactive terminal; try `caseorg search` or `caseorg tree`");
    }
    Ok(())
}

pub fn handle(ctx: &ExecutionContext) -> Result<()> {
    tui::run(ctx)
}
