use crate::config::{ColorMap, GlyphConfigEntry};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_FILE_FORMAT: &str = "{0}-{1}-{2}.svg";
pub const DEFAULT_SVG_URL: &str =
    "https://raw.githubusercontent.com/fontello/{0}/master/src/svg/{1}.svg";

/// The collection Fontello uses for glyphs uploaded by the user.
pub const CUSTOM_ICONS: &str = "custom_icons";

/// Fontello collections whose repository name isn't simply `<collection>.font`.
const COLLECTION_REPOSITORIES: &[(&str, &str)] = &[
    ("fontawesome", "awesome-uni.font"),
    ("entypo", "entypo"),
    ("iconic", "iconic-uni.font"),
    ("websymbols", "websymbols-uni.font"),
    ("web-symbols", "websymbols-uni.font"),
];

/// Replaces `{N}` placeholders with `args[N]`. Anything else is copied as-is.
fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let placeholder = after.find('}').and_then(|end| {
            let idx: usize = after[..end].parse().ok()?;
            Some((*args.get(idx)?, end))
        });
        match placeholder {
            Some((arg, end)) => {
                out.push_str(arg);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// A filename template. `{0}` is the collection, `{1}` the glyph name and `{2}` the color label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileFormat(String);
impl FileFormat {
    pub fn new(format: impl Into<String>) -> Self {
        FileFormat(format.into())
    }

    pub fn render(&self, collection: &str, name: &str, color: &str) -> String {
        substitute(&self.0, &[collection, name, color])
    }
}
impl Default for FileFormat {
    fn default() -> Self {
        FileFormat::new(DEFAULT_FILE_FORMAT)
    }
}

/// A remote URL template. `{0}` is the collection's repository and `{1}` the glyph name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvgUrlTemplate(String);
impl SvgUrlTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        SvgUrlTemplate(template.into())
    }

    pub fn repository_for(collection: &str) -> String {
        match COLLECTION_REPOSITORIES.iter().find(|(x, _)| *x == collection) {
            Some((_, repository)) => repository.to_string(),
            None => format!("{collection}.font"),
        }
    }

    pub fn render(&self, collection: &str, name: &str) -> String {
        substitute(&self.0, &[&Self::repository_for(collection), name])
    }
}
impl Default for SvgUrlTemplate {
    fn default() -> Self {
        SvgUrlTemplate::new(DEFAULT_SVG_URL)
    }
}

/// Where the artwork for a glyph comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum SvgSource {
    /// Downloaded from the given URL.
    Remote(String),
    /// Drawn from an outline stored in the config file itself.
    Embedded { path: String, width: f64 },
}

/// A single glyph in a single color, as it will be written to disk.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphDescriptor {
    name: String,
    collection: String,
    color: String,
    fill: String,
    file_name: String,
    source: SvgSource,
}
impl GlyphDescriptor {
    /// Returns the name of the glyph.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the collection the glyph belongs to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the label of the color this glyph is drawn in.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns the fill value applied to the glyph's paths.
    pub fn fill(&self) -> &str {
        &self.fill
    }

    /// Returns the file name this glyph will be saved to.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source(&self) -> &SvgSource {
        &self.source
    }

    /// Returns the CSS class name used for this glyph in the generated stylesheet.
    pub fn css_class(&self) -> String {
        format!("{}-{}-{}", self.collection, self.name, self.color)
    }

    pub fn target_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(&self.file_name)
    }
}

/// Expands config entries into one descriptor per glyph and color.
///
/// Entries deselected in the Fontello interface are dropped.
pub fn build_descriptors(
    raw_glyphs: &[GlyphConfigEntry],
    colors: &ColorMap,
    file_format: &FileFormat,
    svg_url: &SvgUrlTemplate,
) -> Vec<GlyphDescriptor> {
    let mut out = Vec::with_capacity(raw_glyphs.len() * colors.len());
    for glyph in raw_glyphs {
        if !glyph.selected {
            debug!("Ignoring deselected glyph: {}-{}", glyph.css, glyph.src);
            continue;
        }

        let source = match &glyph.svg {
            Some(svg) if glyph.src == CUSTOM_ICONS => {
                SvgSource::Embedded { path: svg.path.clone(), width: svg.width }
            }
            _ => SvgSource::Remote(svg_url.render(&glyph.src, &glyph.css)),
        };

        for (color, fill) in colors.iter() {
            out.push(GlyphDescriptor {
                name: glyph.css.clone(),
                collection: glyph.src.clone(),
                color: color.to_string(),
                fill: fill.to_string(),
                file_name: file_format.render(&glyph.src, &glyph.css, color),
                source: source.clone(),
            });
        }
    }
    out
}
