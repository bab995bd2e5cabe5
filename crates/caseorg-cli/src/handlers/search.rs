use crate::args::SearchArgs;
use crate::context::ExecutionContext;
use crate::output;
use anyhow::Result;
use caseorg_core::SearchSession;
use caseorg_types::SearchQuery;

use super::fail_on_error_row;

impl From<SearchArgs> for SearchQuery {
    fn from(args: SearchArgs) -> Self {
        SearchQuery {
            q: args.q.unwrap_or_default(),
            party: args.party.unwrap_or_default(),
            year: args.year.unwrap_or_default(),
            month: args.month.unwrap_or_default(),
            domain: args.domain.unwrap_or_default(),
            subcategory: args.subcategory.unwrap_or_default(),
            file_type: args.file_type.unwrap_or_default(),
        }
    }
}

pub fn handle(ctx: &ExecutionContext, args: SearchArgs) -> Result<()> {
    let backend = ctx.backend();
    let mut renderer = ctx.renderer();
    let mut session = SearchSession::new();

    ctx.block_on(session.run(backend.as_ref(), &mut renderer, args.into()));

    fail_on_error_row(&renderer)?;
    output::print_rows(&renderer, ctx.format)
}
