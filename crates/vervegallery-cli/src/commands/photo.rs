//! Photo command - show one file's metadata

use anyhow::{Context, Result};
use vervegallery_core::{domain::FileId, ports::IDriveGateway};

use crate::{
    context::AppContext,
    output::{format_size, get_formatter, OutputFormat},
    GlobalOptions,
};

#[derive(Debug, clap::Args)]
pub struct PhotoCommand {
    /// Drive file ID
    pub file_id: String,
}

impl PhotoCommand {
    pub async fn execute(&self, opts: &GlobalOptions) -> Result<()> {
        let fmt = get_formatter(opts);
        let file_id = FileId::new(self.file_id.as_str()).context("Invalid file ID")?;

        let ctx = AppContext::build(&opts.config_path)?;
        ctx.require_session().await?;

        let photo = ctx
            .gateway
            .get_file_metadata(&file_id)
            .await
            .with_context(|| format!("Failed to fetch metadata for {}", file_id))?;

        if opts.format == OutputFormat::Json {
            let json = serde_json::to_value(&photo).context("Failed to serialize photo")?;
            fmt.print_json(&json);
            return Ok(());
        }

        fmt.success(&photo.name);
        fmt.info(&format!("ID:         {}", photo.id));
        fmt.info(&format!("Type:       {}", photo.mime_type));
        fmt.info(&format!("Size:       {}", format_size(photo.size)));
        fmt.info(&format!("Dimensions: {}x{}", photo.width, photo.height));
        if let Some(created) = photo.date_created {
            fmt.info(&format!(
                "Created:    {}",
                created.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        fmt.info(&format!("Image:      {}", photo.full_image_url));
        if !photo.thumbnail_url.is_empty() {
            fmt.info(&format!("Thumbnail:  {}", photo.thumbnail_url));
        }
        if !photo.download_url.is_empty() {
            fmt.info(&format!("Download:   {}", photo.download_url));
        }
        Ok(())
    }
}
