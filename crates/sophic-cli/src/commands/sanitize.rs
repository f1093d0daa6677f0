use sophic_core::sanitize;

use crate::cli::SanitizeArgs;

pub fn handle_sanitize(args: &SanitizeArgs) -> anyhow::Result<()> {
    println!("{}", sanitize(&args.text, args.field.into()));
    Ok(())
}
