use crate::glyph::GlyphDescriptor;
use anyhow::{Context, Result};
use std::{
    fmt::{Display, Formatter},
    path::Path,
};
use tracing::debug;

struct GlyphStylesheetDisplay<'a> {
    url_prefix: String,
    glyphs: &'a [GlyphDescriptor],
}
impl<'a> Display for GlyphStylesheetDisplay<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for glyph in self.glyphs {
            writeln!(f, ".{} {{", glyph.css_class())?;
            writeln!(
                f,
                "\tbackground-image: url({:?});",
                format!("{}{}", self.url_prefix, glyph.file_name())
            )?;
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

/// Returns a stylesheet with one background image rule per glyph.
pub fn render_css<'a>(glyphs: &'a [GlyphDescriptor], url_prefix: &str) -> impl Display + 'a {
    GlyphStylesheetDisplay { url_prefix: url_prefix.to_string(), glyphs }
}

/// Writes the stylesheet for `glyphs` to `out_file`.
///
/// Rules are generated for every glyph whether or not its SVG file exists.
pub async fn write_css(
    glyphs: &[GlyphDescriptor],
    out_file: &Path,
    url_prefix: &str,
) -> Result<()> {
    debug!("Writing {} CSS rules to {}...", glyphs.len(), out_file.display());
    let css = render_css(glyphs, url_prefix).to_string();
    tokio::fs::write(out_file, css)
        .await
        .with_context(|| format!("could not write '{}'", out_file.display()))
}
