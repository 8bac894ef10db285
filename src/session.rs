//! UST/USTX → render → WAV helpers.

use crate::config::SessionConfig;
use crate::error::Result;
use std::path::Path;
use tracing::{debug, info};
use uta_core::{RenderConfig, RenderResult, Renderer, TimingLookup};
use uta_ust::UstProject;

/// One configured render job.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Render configuration for `project`: the UST tempo is adopted unless
    /// the session pins one.
    pub fn render_config_for(&self, project: &UstProject) -> RenderConfig {
        let mut config = self.config.render.clone();
        if !self.config.tempo_pinned {
            if let Some(bpm) = project.tempo_bpm {
                config.tempo_bpm = bpm;
            }
        }
        config
    }

    /// Render a parsed UST.
    pub fn render_ust<T>(&self, project: &UstProject, timing: &T) -> Result<RenderResult>
    where
        T: TimingLookup + ?Sized,
    {
        let config = self.render_config_for(project);
        debug!(
            title = project.title.as_deref().unwrap_or(""),
            tempo_bpm = config.tempo_bpm,
            notes = project.notes.len(),
            "rendering UST"
        );
        let result = Renderer::new(config)?.render(&project.notes, timing)?;
        info!(
            frames = result.length_samples(),
            workers = result.worker_count,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "render complete"
        );
        Ok(result)
    }

    /// Load a `.ust` or `.ustx` file and render it.
    pub fn render_ust_file<T>(&self, path: impl AsRef<Path>, timing: &T) -> Result<RenderResult>
    where
        T: TimingLookup + ?Sized,
    {
        let project = uta_ust::load_project(path)?;
        self.render_ust(&project, timing)
    }

    /// Write a render to disk using the session's export settings.
    #[cfg(feature = "export")]
    pub fn export(
        &self,
        result: &RenderResult,
        path: impl AsRef<Path>,
    ) -> Result<uta_export::ExportSummary> {
        let options = self.config.export.to_options()?;
        let summary =
            uta_export::export_to_file(path, &result.buffer, result.sample_rate, &options)?;
        Ok(summary)
    }
}

/// Load `path`, render it against `timing` with `config`.
pub fn render_ust_file<T>(
    path: impl AsRef<Path>,
    timing: &T,
    config: &SessionConfig,
) -> Result<RenderResult>
where
    T: TimingLookup + ?Sized,
{
    Session::new(config.clone()).render_ust_file(path, timing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uta_core::NoTiming;

    const UST: &str = "[#SETTING]\nTempo=60\n[#0000]\nLength=480\nLyric=a\nNoteNum=69\n";

    #[test]
    fn test_ust_tempo_adopted() {
        let project = uta_ust::parse_ust(UST).unwrap();
        let session = Session::default();
        assert_eq!(session.render_config_for(&project).tempo_bpm, 60.0);

        // one quarter note at 60 BPM is one second
        let result = session.render_ust(&project, &NoTiming).unwrap();
        assert_eq!(result.length_samples(), 44100);
    }

    #[test]
    fn test_pinned_tempo_wins() {
        let project = uta_ust::parse_ust(UST).unwrap();
        let session = Session::new(SessionConfig::default().with_tempo(120.0));
        assert_eq!(session.render_config_for(&project).tempo_bpm, 120.0);
    }

    #[test]
    fn test_ustx_file_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.ustx");
        std::fs::write(
            &path,
            "bpm: 60\ntracks:\n  - notes:\n      - {position: 480, duration: 480, tone: 69}\n",
        )
        .unwrap();
        // one second of lead-in plus one second of note at 60 BPM
        let result = Session::default().render_ust_file(&path, &NoTiming).unwrap();
        assert_eq!(result.length_samples(), 88200);
    }

    #[test]
    fn test_oversized_length_is_an_error() {
        let project = uta_ust::parse_ust("[#0000]\nLength=9000000000000000000\nLyric=a\n").unwrap();
        let err = Session::default().render_ust(&project, &NoTiming).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Render(uta_core::RenderError::TooLong { .. })
        ));
    }

    #[test]
    fn test_missing_ust_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = render_ust_file(dir.path().join("none.ust"), &NoTiming, &SessionConfig::default())
            .unwrap_err();
        assert!(matches!(err, crate::Error::Ust(_)));
    }
}
