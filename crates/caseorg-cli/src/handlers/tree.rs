use crate::context::ExecutionContext;
use crate::output;
use anyhow::Result;
use caseorg_core::DirectoryNavigator;
use caseorg_types::DirPath;

use super::fail_on_error_row;

pub fn handle(ctx: &ExecutionContext, path: Option<&str>) -> Result<()> {
    let backend = ctx.backend();
    let mut renderer = ctx.renderer();
    let mut navigator = DirectoryNavigator::new();
    let path = path.map(DirPath::parse).unwrap_or_else(DirPath::root);

    navigator.enter(&mut renderer);
    ctx.block_on(navigator.show_level(backend.as_ref(), &mut renderer, path))?;

    fail_on_error_row(&renderer)?;
    output::print_rows(&renderer, ctx.format)
}
