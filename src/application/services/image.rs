//! Machine-image resolution.

use crate::application::ports::ImageCatalog;
use crate::domain::GatewayError;

/// Name patterns tried most-specific first. The first pattern with any match
/// wins; later patterns are not consulted once one yields a result.
pub const IMAGE_NAME_PATTERNS: &[&str] = &["amzn2-ami-hvm-*-x86_64-gp2", "amzn2-ami-hvm-*"];

/// Resolve the image to launch.
///
/// A static override wins unvalidated and skips the catalog entirely.
/// Otherwise the newest available match is selected: candidates sorted by
/// creation-timestamp string descending, first taken.
///
/// # Errors
///
/// `NoImageFound` when no override is set and no pattern matches anything;
/// catalog query failures propagate as internal errors.
pub async fn resolve_image<C>(
    catalog: &C,
    override_id: Option<&str>,
) -> Result<String, GatewayError>
where
    C: ImageCatalog + ?Sized,
{
    if let Some(id) = override_id {
        return Ok(id.to_owned());
    }

    for pattern in IMAGE_NAME_PATTERNS {
        let mut images = catalog.images_by_name(pattern).await?;
        if images.is_empty() {
            continue;
        }
        images.sort_by(|a, b| b.creation_date.cmp(&a.creation_date));
        return Ok(images.remove(0).image_id);
    }

    Err(GatewayError::NoImageFound)
}
