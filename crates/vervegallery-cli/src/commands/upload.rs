//! Upload command - upload an image, optionally into a category
//!
//! The upload runs on the photo store; progress is read back from the
//! store's upload status while the request is in flight.

use std::{path::Path, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use mime::Mime;
use tracing::info;
use vervegallery_core::domain::UploadFile;

use crate::{
    context::AppContext,
    output::{format_size, get_formatter, OutputFormat},
    GlobalOptions,
};

/// How often progress is sampled
const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, clap::Args)]
pub struct UploadCommand {
    /// Image file to upload
    pub path: PathBuf,

    /// Target category ID or name
    #[arg(long)]
    pub category: Option<String>,
}

impl UploadCommand {
    pub async fn execute(&self, opts: &GlobalOptions) -> Result<()> {
        let fmt = get_formatter(opts);

        let mime = guess_mime(&self.path);
        if mime.type_() != mime::IMAGE {
            bail!(
                "{} does not look like an image ({})",
                self.path.display(),
                mime
            );
        }
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .context("Upload path has no file name")?
            .to_string();
        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let ctx = AppContext::build(&opts.config_path)?;
        ctx.require_session().await?;

        let category = match &self.category {
            Some(key) => {
                let category = ctx.resolve_category(key).await?;
                if category.is_placeholder() {
                    bail!(
                        "Category '{}' has no Drive folder to upload into",
                        category.name
                    );
                }
                // selecting it makes the store refresh its photos afterwards
                ctx.photos.set_selected_category(Some(category.clone())).await;
                Some(category)
            }
            None => None,
        };

        info!(file = %name, size = data.len(), %mime, "Uploading");
        fmt.info(&format!("Uploading {} ({})", name, format_size(data.len() as u64)));

        let file = UploadFile::new(name.as_str(), mime.essence_str(), data);
        let upload = ctx
            .photos
            .upload_photo(file, category.as_ref().map(|c| c.id.as_str()));
        tokio::pin!(upload);

        let mut ticker = tokio::time::interval(PROGRESS_INTERVAL);
        let mut last_progress = None;
        let result = loop {
            tokio::select! {
                result = &mut upload => break result,
                _ = ticker.tick() => {
                    if let Some((_, status)) = ctx.photos.latest_upload() {
                        if last_progress != Some(status.progress) {
                            fmt.info(&format!("{:>3}%", status.progress));
                            last_progress = Some(status.progress);
                        }
                    }
                }
            }
        };
        let file_id = result.context("Upload failed")?;

        if opts.format == OutputFormat::Json {
            let status = ctx.photos.latest_upload().map(|(_, s)| s);
            let json = serde_json::json!({
                "file_id": file_id.as_str(),
                "category": category.as_ref().map(|c| c.id.as_str()),
                "status": status,
            });
            fmt.print_json(&json);
        } else {
            fmt.success(&format!("Uploaded {} as {}", name, file_id));
            if let Some(category) = &category {
                let count = ctx.photos.photos().await.len();
                fmt.info(&format!("{} now lists {} photos", category.name, count));
            }
        }
        Ok(())
    }
}

/// Guesses the MIME type from the file extension
fn guess_mime(path: &Path) -> Mime {
    mime_guess::from_path(path).first_or_octet_stream()
}
