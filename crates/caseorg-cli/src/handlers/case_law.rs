use crate::args::CaseLawArgs;
use crate::context::ExecutionContext;
use crate::output::{self, Painter};
use anyhow::Result;
use caseorg_core::CaseLawBrowser;
use caseorg_types::CaseLawQuery;

use super::fail_on_error_row;

impl From<CaseLawArgs> for CaseLawQuery {
    fn from(args: CaseLawArgs) -> Self {
        CaseLawQuery {
            text: args.text.unwrap_or_default(),
            party: args.party.unwrap_or_default(),
            citation: args.citation.unwrap_or_default(),
            year: args.year.unwrap_or_default(),
            limit: args.limit,
            ..CaseLawQuery::default()
        }
    }
}

pub fn handle(ctx: &ExecutionContext, args: CaseLawArgs) -> Result<()> {
    let backend = ctx.backend();
    let mut renderer = ctx.renderer();
    let mut browser = CaseLawBrowser::new();

    ctx.block_on(browser.search(backend.as_ref(), &mut renderer, args.into()));
    fail_on_error_row(&renderer)?;

    if ctx.is_json() {
        return output::print_json(browser.records());
    }
    output::print_rows(&renderer, ctx.format)?;
    if !browser.year_filters().is_empty() {
        let painter = Painter::detect();
        println!(
            "{} {}",
            painter.dim("Years:"),
            browser.year_filters().join(", ")
        );
    }
    Ok(())
}
