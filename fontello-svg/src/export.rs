use crate::{
    config::{ColorMap, FontelloConfig},
    css::write_css,
    download::{download_svgs, DownloadEvent, DownloadSummary},
    fetch::SvgFetcher,
    filter::missing_descriptors,
    glyph::{build_descriptors, FileFormat, GlyphDescriptor, SvgUrlTemplate},
};
use anyhow::{Context, Result};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, Instrument};

/// Everything that happens during an export, in the order it happens.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportEvent {
    /// The glyph's file already exists and was not downloaded again.
    Skipped(GlyphDescriptor),
    Download(DownloadEvent),
    /// The stylesheet was written to the given path.
    CssWrite(PathBuf),
    CssError { path: PathBuf, reason: String },
}
impl From<DownloadEvent> for ExportEvent {
    fn from(event: DownloadEvent) -> Self {
        ExportEvent::Download(event)
    }
}

/// The result of a finished export.
#[derive(Clone, Debug)]
pub struct ExportReport {
    pub glyphs: Vec<GlyphDescriptor>,
    pub skipped: Vec<GlyphDescriptor>,
    pub downloads: DownloadSummary,
    pub css: Option<PathBuf>,
}

#[derive(Clone, Debug)]
struct CssTarget {
    file: Option<PathBuf>,
    url_prefix: String,
}

/// Represents a configuration for exporting the glyphs of a Fontello config.
#[derive(Clone, Debug)]
pub struct ExportPlan {
    config: PathBuf,
    out_dir: PathBuf,
    colors: ColorMap,
    file_format: FileFormat,
    svg_url: SvgUrlTemplate,
    css: Option<CssTarget>,
    skip_existing: bool,
}
impl ExportPlan {
    /// Creates a plan exporting black glyphs and an `index.css` into `out_dir`, skipping files
    /// that already exist.
    pub fn new(config: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> ExportPlan {
        ExportPlan {
            config: config.into(),
            out_dir: out_dir.into(),
            colors: ColorMap::black(),
            file_format: FileFormat::default(),
            svg_url: SvgUrlTemplate::default(),
            css: Some(CssTarget { file: None, url_prefix: String::new() }),
            skip_existing: true,
        }
    }

    /// Sets the colors every glyph is exported in.
    pub fn colors(&mut self, colors: ColorMap) -> &mut Self {
        self.colors = colors;
        self
    }

    pub fn file_format(&mut self, file_format: FileFormat) -> &mut Self {
        self.file_format = file_format;
        self
    }

    pub fn svg_url(&mut self, svg_url: SvgUrlTemplate) -> &mut Self {
        self.svg_url = svg_url;
        self
    }

    /// Sets the URI prepended to file names in the stylesheet.
    pub fn css_url_prefix(&mut self, url_prefix: impl Into<String>) -> &mut Self {
        if let Some(css) = &mut self.css {
            css.url_prefix = url_prefix.into();
        }
        self
    }

    /// Sets where the stylesheet is written. Defaults to `index.css` in the output directory.
    pub fn css_file(&mut self, file: impl Into<PathBuf>) -> &mut Self {
        if let Some(css) = &mut self.css {
            css.file = Some(file.into());
        }
        self
    }

    /// Disables generating the stylesheet.
    pub fn no_css(&mut self) -> &mut Self {
        self.css = None;
        self
    }

    /// Whether glyphs whose file already exists are downloaded again.
    pub fn skip_existing(&mut self, skip_existing: bool) -> &mut Self {
        self.skip_existing = skip_existing;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn css_path(&self, css: &CssTarget) -> PathBuf {
        css.file.clone().unwrap_or_else(|| self.out_dir.join("index.css"))
    }

    /// Runs the export, streaming progress through `events`.
    ///
    /// The stylesheet is written alongside the downloads. This returns once both are finished.
    pub async fn run<F: SvgFetcher>(
        &self,
        fetcher: Arc<F>,
        events: UnboundedSender<ExportEvent>,
    ) -> Result<ExportReport> {
        let config = FontelloConfig::load(&self.config).await?;
        let glyphs =
            build_descriptors(&config.glyphs, &self.colors, &self.file_format, &self.svg_url);
        info!(
            "Exporting {} glyphs in {} colors to '{}'...",
            glyphs.len() / self.colors.len().max(1),
            self.colors.len(),
            self.out_dir.display(),
        );

        tokio::fs::create_dir_all(&self.out_dir)
            .await
            .with_context(|| format!("could not create '{}'", self.out_dir.display()))?;

        let to_download = if self.skip_existing {
            missing_descriptors(&glyphs, &self.out_dir).await?
        } else {
            glyphs.clone()
        };
        let pending: HashSet<_> = to_download.iter().map(|x| x.file_name()).collect();
        let skipped: Vec<_> = glyphs
            .iter()
            .filter(|x| !pending.contains(x.file_name()))
            .cloned()
            .collect();
        for glyph in &skipped {
            let _ = events.send(ExportEvent::Skipped(glyph.clone()));
        }

        let css_task = self.css.as_ref().map(|css| {
            let glyphs = glyphs.clone();
            let path = self.css_path(css);
            let url_prefix = css.url_prefix.clone();
            let events = events.clone();
            tokio::spawn(
                async move {
                    match write_css(&glyphs, &path, &url_prefix).await {
                        Ok(()) => {
                            let _ = events.send(ExportEvent::CssWrite(path.clone()));
                            Some(path)
                        }
                        Err(e) => {
                            let reason = format!("{e:#}");
                            let _ = events.send(ExportEvent::CssError { path, reason });
                            None
                        }
                    }
                }
                .in_current_span(),
            )
        });

        let downloads = download_svgs(fetcher, &to_download, &self.out_dir, events).await?;
        let css = match css_task {
            Some(task) => task.await?,
            None => None,
        };

        info!(
            "Saved {} files, skipped {}, {} failed.",
            downloads.written,
            skipped.len(),
            downloads.fetch_failed + downloads.write_failed,
        );
        Ok(ExportReport { glyphs, skipped, downloads, css })
    }
}
