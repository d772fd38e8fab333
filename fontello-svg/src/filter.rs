use crate::glyph::GlyphDescriptor;
use anyhow::Result;
use fontello_svg_common::join_set::JoinSet;
use std::path::Path;
use tracing::debug;

/// Returns the descriptors whose target file does not exist yet in `out_dir`, in input order.
///
/// Every path is checked concurrently. A path that cannot be checked counts as missing.
pub async fn missing_descriptors(
    descriptors: &[GlyphDescriptor],
    out_dir: &Path,
) -> Result<Vec<GlyphDescriptor>> {
    let mut joins = JoinSet::new();
    for glyph in descriptors {
        let target = glyph.target_path(out_dir);
        joins.spawn(async move {
            Ok(match tokio::fs::try_exists(&target).await {
                Ok(exists) => exists,
                Err(e) => {
                    debug!("Could not check '{}', treating it as missing: {e}", target.display());
                    false
                }
            })
        });
    }
    let exists = joins.join().await?;

    Ok(descriptors
        .iter()
        .zip(exists)
        .filter(|(_, exists)| !exists)
        .map(|(glyph, _)| glyph.clone())
        .collect())
}
