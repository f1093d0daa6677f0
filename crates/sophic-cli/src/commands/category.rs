use sophic_core::category::MAX_CATEGORY_CHARS;
use sophic_core::CategoryGate;

use crate::app::AppContext;
use crate::errors::CliError;

pub fn handle_add(ctx: &AppContext, name: &str) -> anyhow::Result<()> {
    let list = ctx.categories()?;
    let gate = CategoryGate::new(&list);

    if !gate.add_category(name) {
        return Err(CliError::rejected(format!(
            "Rejected category \"{}\"\nHint: Names must be 1-{} characters without markup, paths or special sequences.",
            name.trim(),
            MAX_CATEGORY_CHARS
        ))
        .into());
    }

    if !ctx.quiet() {
        println!("Added category {}", name.trim());
    }
    Ok(())
}

pub fn handle_list(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let names = ctx.categories()?.list()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    if names.is_empty() {
        if !ctx.quiet() {
            println!("No categories yet.");
        }
        return Ok(());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}
