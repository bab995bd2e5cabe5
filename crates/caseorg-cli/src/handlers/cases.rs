use crate::context::ExecutionContext;
use crate::output::{self, Painter};
use anyhow::Result;
use caseorg_core::CaseLookupController;

pub fn handle(ctx: &ExecutionContext, query: &str) -> Result<()> {
    let backend = ctx.backend();
    let mut lookup = CaseLookupController::new();

    ctx.block_on(lookup.search_by_name(backend.as_ref(), query))?;

    if ctx.is_json() {
        return output::print_json(lookup.matches());
    }
    let painter = Painter::detect();
    if lookup.matches().is_empty() {
        println!("{}", painter.dim("No matching cases"));
        return Ok(());
    }
    for hit in lookup.matches() {
        println!(
            "{}  {}",
            hit.case_name,
            painter.dim(&format!("{}/{}", hit.year, hit.month))
        );
    }
    Ok(())
}
