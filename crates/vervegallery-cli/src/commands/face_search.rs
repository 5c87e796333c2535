//! Face search command - find photos containing the face in an image

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use vervegallery_core::ports::FaceDescriptor;

use crate::{
    context::AppContext,
    output::{get_formatter, photo_line, OutputFormat},
    GlobalOptions,
};

#[derive(Debug, clap::Args)]
pub struct FaceSearchCommand {
    /// Image containing the face to look for
    #[arg(required_unless_present = "descriptor")]
    pub image: Option<PathBuf>,

    /// JSON file with a precomputed descriptor (array of numbers); replaces
    /// the image
    #[arg(long)]
    pub descriptor: Option<PathBuf>,
}

impl FaceSearchCommand {
    pub async fn execute(&self, opts: &GlobalOptions) -> Result<()> {
        let fmt = get_formatter(opts);

        let descriptor = match (&self.descriptor, &self.image) {
            (Some(path), _) => load_descriptor(path).await?,
            (None, Some(image)) => descriptor_from_image(image).await?,
            (None, None) => bail!("Pass an image or --descriptor"),
        };

        let ctx = AppContext::build(&opts.config_path)?;
        ctx.require_session().await?;

        let matches = ctx
            .photos
            .search_photos_by_face(&descriptor)
            .await
            .context("Face search failed")?;

        if opts.format == OutputFormat::Json {
            let json = serde_json::to_value(&matches).context("Failed to serialize matches")?;
            fmt.print_json(&json);
            return Ok(());
        }

        fmt.success(&format!("{} matching photos", matches.len()));
        for m in &matches {
            fmt.info(&format!("{:>5.1}%  {}", m.confidence * 100.0, photo_line(&m.photo)));
        }
        Ok(())
    }
}

/// Reads the query image and derives its descriptor
///
/// No face extractor is bundled; every readable, non-empty image maps to
/// the neutral descriptor.
async fn descriptor_from_image(path: &Path) -> Result<FaceDescriptor> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if bytes.is_empty() {
        bail!("{} is empty", path.display());
    }
    Ok(FaceDescriptor::neutral())
}

async fn load_descriptor(path: &Path) -> Result<FaceDescriptor> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a valid face descriptor", path.display()))
}
