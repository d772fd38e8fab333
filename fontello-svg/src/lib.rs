//! Downloads the SVG artwork of the glyphs selected in a Fontello configuration, optionally in
//! several colors, along with a stylesheet using them as background images.

mod config;
mod css;
mod download;
mod export;
mod fetch;
mod filter;
mod glyph;
mod recolor;

pub use config::{ColorMap, ConfigError, EmbeddedSvg, FontelloConfig, GlyphConfigEntry};
pub use css::{render_css, write_css};
pub use download::{download_svgs, DownloadEvent, DownloadSummary};
pub use export::{ExportEvent, ExportPlan, ExportReport};
pub use fetch::{FetchError, HttpFetcher, SvgFetcher};
pub use filter::missing_descriptors;
pub use glyph::{
    build_descriptors, FileFormat, GlyphDescriptor, SvgSource, SvgUrlTemplate, CUSTOM_ICONS,
    DEFAULT_FILE_FORMAT, DEFAULT_SVG_URL,
};
pub use recolor::recolor_paths;
