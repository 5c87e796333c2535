//! Categories command - resolve the configured category names to folders

use anyhow::{Context, Result};

use crate::{
    context::AppContext,
    output::{category_line, get_formatter, OutputFormat},
    GlobalOptions,
};

#[derive(Debug, clap::Args)]
pub struct CategoriesCommand {}

impl CategoriesCommand {
    pub async fn execute(&self, opts: &GlobalOptions) -> Result<()> {
        let fmt = get_formatter(opts);
        let ctx = AppContext::build(&opts.config_path)?;
        ctx.require_session().await?;

        let categories = ctx
            .photos
            .fetch_categories()
            .await
            .context("Failed to fetch categories")?;

        if opts.format == OutputFormat::Json {
            let json =
                serde_json::to_value(&categories).context("Failed to serialize categories")?;
            fmt.print_json(&json);
            return Ok(());
        }

        let missing = categories.iter().filter(|c| c.is_placeholder()).count();
        fmt.success(&format!("{} categories", categories.len()));
        for category in &categories {
            fmt.info(&category_line(category));
        }
        if missing > 0 {
            fmt.warn(&format!(
                "{} categor{} without a matching Drive folder",
                missing,
                if missing == 1 { "y" } else { "ies" }
            ));
        }
        Ok(())
    }
}
