//! Photos commands - list all, recent, or per-category photos

use anyhow::{Context, Result};
use clap::Subcommand;
use vervegallery_core::domain::Photo;

use crate::{
    context::AppContext,
    output::{get_formatter, photo_line, OutputFormat, OutputFormatter},
    GlobalOptions,
};

#[derive(Debug, Subcommand)]
pub enum PhotosCommand {
    /// Newest photos across the whole Drive
    All,
    /// Most recent photos
    Recent {
        /// Number of photos (defaults to drive.recent_limit)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Photos in a category folder
    Category {
        /// Category ID or name
        category: String,
    },
}

impl PhotosCommand {
    pub async fn execute(&self, opts: &GlobalOptions) -> Result<()> {
        let fmt = get_formatter(opts);
        let ctx = AppContext::build(&opts.config_path)?;
        ctx.require_session().await?;

        let (title, photos) = match self {
            PhotosCommand::All => {
                let photos = ctx
                    .photos
                    .fetch_all_photos()
                    .await
                    .context("Failed to fetch photos")?;
                ("All photos".to_string(), photos)
            }
            PhotosCommand::Recent { limit } => {
                let photos = ctx
                    .photos
                    .fetch_recent_photos(*limit)
                    .await
                    .context("Failed to fetch recent photos")?;
                ("Recent photos".to_string(), photos)
            }
            PhotosCommand::Category { category } => {
                let category = ctx.resolve_category(category).await?;
                let photos = ctx
                    .photos
                    .fetch_photos_by_category(&category.id)
                    .await
                    .context("Failed to fetch category photos")?;
                (format!("Category {}", category.name), photos)
            }
        };

        print_photos(&*fmt, opts.format, &title, &photos)
    }
}

pub fn print_photos(
    fmt: &dyn OutputFormatter,
    format: OutputFormat,
    title: &str,
    photos: &[Photo],
) -> Result<()> {
    if format == OutputFormat::Json {
        let json = serde_json::to_value(photos).context("Failed to serialize photos")?;
        fmt.print_json(&json);
        return Ok(());
    }

    fmt.success(&format!(
        "{}: {} photo{}",
        title,
        photos.len(),
        if photos.len() == 1 { "" } else { "s" }
    ));
    for photo in photos {
        fmt.info(&photo_line(photo));
    }
    Ok(())
}
