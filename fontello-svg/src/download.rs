use crate::{
    fetch::SvgFetcher,
    glyph::{GlyphDescriptor, SvgSource},
    recolor::recolor_paths,
};
use anyhow::Result;
use fontello_svg_common::join_set::JoinSet;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, debug_span, Instrument};

/// Progress notifications sent while glyphs are downloaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadEvent {
    /// The glyph could not be retrieved from `url`. Nothing was written for it.
    FetchError { url: String, reason: String },
    /// The glyph was retrieved but could not be saved.
    WriteError { path: PathBuf, reason: String },
    /// The glyph was saved to `path`.
    SvgWrite { path: PathBuf },
}

/// How many glyphs ended up in each state after a download batch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub written: usize,
    pub fetch_failed: usize,
    pub write_failed: usize,
}

enum Outcome {
    Written,
    FetchFailed,
    WriteFailed,
}

/// Renders the outline of a user-uploaded glyph as a standalone document.
fn embedded_svg(path: &str, width: f64) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {width} 1000\">\
         <path d=\"{path}\"/></svg>"
    )
}

async fn download_one<E: From<DownloadEvent>>(
    fetcher: &impl SvgFetcher,
    glyph: &GlyphDescriptor,
    target: PathBuf,
    events: &UnboundedSender<E>,
) -> Outcome {
    let svg = match glyph.source() {
        SvgSource::Remote(url) => match fetcher.fetch(url).await {
            Ok(svg) => svg,
            Err(e) => {
                debug!("Download of '{url}' failed: {e}");
                let reason = e.to_string();
                let _ = events.send(DownloadEvent::FetchError { url: url.clone(), reason }.into());
                return Outcome::FetchFailed;
            }
        },
        SvgSource::Embedded { path, width } => embedded_svg(path, *width),
    };

    let svg = recolor_paths(&svg, glyph.fill());
    match tokio::fs::write(&target, svg).await {
        Ok(()) => {
            let _ = events.send(DownloadEvent::SvgWrite { path: target }.into());
            Outcome::Written
        }
        Err(e) => {
            debug!("Writing '{}' failed: {e}", target.display());
            let reason = e.to_string();
            let _ = events.send(DownloadEvent::WriteError { path: target, reason }.into());
            Outcome::WriteFailed
        }
    }
}

/// Downloads, recolors and saves every glyph into `out_dir`.
///
/// Each glyph is processed independently with a single attempt. Failures are reported through
/// `events` and never stop the rest of the batch. Returns once every glyph has been handled.
pub async fn download_svgs<F: SvgFetcher, E: From<DownloadEvent> + Send + 'static>(
    fetcher: Arc<F>,
    descriptors: &[GlyphDescriptor],
    out_dir: &Path,
    events: UnboundedSender<E>,
) -> Result<DownloadSummary> {
    let mut joins = JoinSet::new();
    for glyph in descriptors {
        let fetcher = fetcher.clone();
        let glyph = glyph.clone();
        let target = glyph.target_path(out_dir);
        let events = events.clone();

        let span = debug_span!("download", file = glyph.file_name());
        joins.spawn(
            async move { Ok(download_one(&*fetcher, &glyph, target, &events).await) }
                .instrument(span),
        );
    }

    let mut summary = DownloadSummary::default();
    for outcome in joins.join().await? {
        match outcome {
            Outcome::Written => summary.written += 1,
            Outcome::FetchFailed => summary.fetch_failed += 1,
            Outcome::WriteFailed => summary.write_failed += 1,
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{ColorMap, EmbeddedSvg, GlyphConfigEntry},
        fetch::testing::StaticFetcher,
        glyph::{build_descriptors, FileFormat, SvgUrlTemplate, CUSTOM_ICONS},
    };
    use tokio::sync::mpsc;

    const STAR: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0Z"/></svg>"#;

    fn entry(name: &str, collection: &str) -> GlyphConfigEntry {
        GlyphConfigEntry {
            uid: None,
            css: name.to_string(),
            code: None,
            src: collection.to_string(),
            selected: true,
            svg: None,
        }
    }

    fn descriptors(glyphs: &[GlyphConfigEntry], colors: &ColorMap) -> Vec<GlyphDescriptor> {
        build_descriptors(glyphs, colors, &FileFormat::default(), &SvgUrlTemplate::new("{0}/{1}"))
    }

    fn drain(mut rx: mpsc::UnboundedReceiver<DownloadEvent>) -> Vec<DownloadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn writes_one_file_per_color() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(StaticFetcher::default().with("entypo/star", STAR));
        let colors: ColorMap = [("black", "#000"), ("red", "#f00")].into_iter().collect();
        let glyphs = descriptors(&[entry("star", "entypo")], &colors);

        let (tx, rx) = mpsc::unbounded_channel();
        let summary = download_svgs(fetcher.clone(), &glyphs, dir.path(), tx).await.unwrap();

        assert_eq!(summary, DownloadSummary { written: 2, fetch_failed: 0, write_failed: 0 });
        assert_eq!(fetcher.requests(), 2);
        let black = std::fs::read_to_string(dir.path().join("entypo-star-black.svg")).unwrap();
        let red = std::fs::read_to_string(dir.path().join("entypo-star-red.svg")).unwrap();
        assert!(black.contains(r##"<path fill="#000" d="M0 0Z"/>"##));
        assert!(red.contains(r##"<path fill="#f00" d="M0 0Z"/>"##));

        let mut events = drain(rx);
        events.sort_by_key(|x| format!("{x:?}"));
        assert_eq!(
            events,
            [
                DownloadEvent::SvgWrite { path: dir.path().join("entypo-star-black.svg") },
                DownloadEvent::SvgWrite { path: dir.path().join("entypo-star-red.svg") },
            ]
        );
    }

    #[tokio::test]
    async fn not_found_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(StaticFetcher::default().with("entypo/star", STAR));
        let glyphs =
            descriptors(&[entry("missing", "entypo"), entry("star", "entypo")], &ColorMap::black());

        let (tx, rx) = mpsc::unbounded_channel();
        let summary = download_svgs(fetcher, &glyphs, dir.path(), tx).await.unwrap();

        assert_eq!(summary, DownloadSummary { written: 1, fetch_failed: 1, write_failed: 0 });
        assert!(!dir.path().join("entypo-missing-black.svg").exists());
        assert!(dir.path().join("entypo-star-black.svg").exists());

        let events = drain(rx);
        assert_eq!(events.len(), 2);
        assert!(events.contains(&DownloadEvent::FetchError {
            url: "entypo/missing".to_string(),
            reason: "server responded with 404 Not Found".to_string(),
        }));
    }

    #[tokio::test]
    async fn write_failures_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(StaticFetcher::default().with("entypo/star", STAR));
        let glyphs = descriptors(&[entry("star", "entypo")], &ColorMap::black());

        let (tx, rx) = mpsc::unbounded_channel();
        let out_dir = dir.path().join("does-not-exist");
        let summary = download_svgs(fetcher, &glyphs, &out_dir, tx).await.unwrap();

        assert_eq!(summary, DownloadSummary { written: 0, fetch_failed: 0, write_failed: 1 });
        match drain(rx).as_slice() {
            [DownloadEvent::WriteError { path, .. }] => {
                assert_eq!(path, &out_dir.join("entypo-star-black.svg"))
            }
            events => panic!("unexpected events: {events:?}"),
        }
    }

    #[tokio::test]
    async fn embedded_glyphs_skip_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(StaticFetcher::default());
        let mut logo = entry("logo", CUSTOM_ICONS);
        logo.svg = Some(EmbeddedSvg { path: "M0 0L500 0Z".to_string(), width: 500.0 });
        let glyphs = descriptors(&[logo], &ColorMap::black());

        let (tx, _rx) = mpsc::unbounded_channel::<DownloadEvent>();
        let summary = download_svgs(fetcher.clone(), &glyphs, dir.path(), tx).await.unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(fetcher.requests(), 0);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("custom_icons-logo-black.svg")).unwrap(),
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 500 1000\">\
             <path fill=\"#000000\" d=\"M0 0L500 0Z\"/></svg>"
        );
    }

    #[tokio::test]
    async fn empty_batch_makes_no_requests() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(StaticFetcher::default());
        let (tx, _rx) = mpsc::unbounded_channel::<DownloadEvent>();
        let summary = download_svgs(fetcher.clone(), &[], dir.path(), tx).await.unwrap();
        assert_eq!(summary, DownloadSummary::default());
        assert_eq!(fetcher.requests(), 0);
    }
}
