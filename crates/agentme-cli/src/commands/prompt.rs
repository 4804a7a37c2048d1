//! `agentme prompt [id]`: print the compiled system prompt.

use agentme_core::prompt;
use anyhow::Result;

use crate::context::AppContext;

pub async fn show(ctx: &AppContext, id: Option<&str>) -> Result<()> {
    let persona = ctx.resolve_persona(id).await?;
    println!("{}", prompt::compile(&persona));
    Ok(())
}
