//! Playback: the audio element seam, the mpv backend and the controller that
//! keeps the now-playing view in step with what is loaded.

pub mod controller;
pub mod mpv;

pub use controller::{LoadTicket, LyricsPanel, NowPlaying, PlaybackController, PlayerState, TrackSource};

/// The single media element the controller drives. Decoding and streaming
/// are entirely the backend's business.
pub trait AudioElement {
    /// Replace the current source. Playback stays paused until [`play`](Self::play).
    fn set_source(&mut self, url: &str) -> anyhow::Result<()>;
    /// Start playback. An error means the backend refused to start.
    fn play(&mut self) -> anyhow::Result<()>;
    fn pause(&mut self) -> anyhow::Result<()>;
    /// Absolute seek, in seconds.
    fn seek(&mut self, seconds: f64) -> anyhow::Result<()>;
    fn seek_relative(&mut self, seconds: f64) -> anyhow::Result<()>;
    fn set_volume(&mut self, volume: u8) -> anyhow::Result<()>;
    /// Whether a backend entry id reported with an end-of-file or error event
    /// still belongs to the latest [`set_source`](Self::set_source). Backends
    /// without entry ids accept everything.
    fn is_current_entry(&self, _entry: u64) -> bool {
        true
    }
}

impl<A: AudioElement + ?Sized> AudioElement for Box<A> {
    fn set_source(&mut self, url: &str) -> anyhow::Result<()> {
        (**self).set_source(url)
    }
    fn play(&mut self) -> anyhow::Result<()> {
        (**self).play()
    }
    fn pause(&mut self) -> anyhow::Result<()> {
        (**self).pause()
    }
    fn seek(&mut self, seconds: f64) -> anyhow::Result<()> {
        (**self).seek(seconds)
    }
    fn seek_relative(&mut self, seconds: f64) -> anyhow::Result<()> {
        (**self).seek_relative(seconds)
    }
    fn set_volume(&mut self, volume: u8) -> anyhow::Result<()> {
        (**self).set_volume(volume)
    }
    fn is_current_entry(&self, entry: u64) -> bool {
        (**self).is_current_entry(entry)
    }
}

/// Stand-in used when mpv could not be started: tracks still load and display,
/// but every attempt to play is refused.
#[derive(Debug, Default)]
pub struct DetachedAudio;

impl AudioElement for DetachedAudio {
    fn set_source(&mut self, _url: &str) -> anyhow::Result<()> {
        Ok(())
    }
    fn play(&mut self) -> anyhow::Result<()> {
        anyhow::bail!("audio backend unavailable")
    }
    fn pause(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
    fn seek(&mut self, _seconds: f64) -> anyhow::Result<()> {
        Ok(())
    }
    fn seek_relative(&mut self, _seconds: f64) -> anyhow::Result<()> {
        Ok(())
    }
    fn set_volume(&mut self, _volume: u8) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Always within `0.0..=100.0`.
    pub percent: f64,
    pub elapsed: String,
    pub total: String,
}

/// Progress for a position against a possibly unknown duration.
pub fn progress(position: f64, duration: Option<f64>) -> Progress {
    let position = sanitize(position);
    let duration = duration.map(sanitize).filter(|d| *d > 0.0);

    let percent = match duration {
        Some(d) => (position / d * 100.0).clamp(0.0, 100.0),
        None => 0.0,
    };

    Progress {
        percent,
        elapsed: format_time(position),
        total: duration.map(format_time).unwrap_or_else(|| "0:00".to_string()),
    }
}

/// `m:ss`, minutes unpadded.
pub fn format_time(seconds: f64) -> String {
    let total = sanitize(seconds).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

fn sanitize(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(125.0), "2:05");
        assert_eq!(format_time(59.0), "0:59");
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(59.99), "0:59");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
    }

    #[test]
    fn test_progress_unknown_duration() {
        for duration in [None, Some(0.0), Some(f64::NAN), Some(f64::INFINITY)] {
            let p = progress(12.0, duration);
            assert_eq!(p.percent, 0.0);
            assert_eq!(p.total, "0:00");
            assert_eq!(p.elapsed, "0:12");
        }
    }

    #[test]
    fn test_progress_percent_bounds() {
        assert_eq!(progress(15.0, Some(30.0)).percent, 50.0);
        assert_eq!(progress(45.0, Some(30.0)).percent, 100.0);
        assert_eq!(progress(f64::NAN, Some(30.0)).percent, 0.0);

        let p = progress(0.0, Some(30.0));
        assert_eq!((p.elapsed.as_str(), p.total.as_str()), ("0:00", "0:30"));
    }

    #[test]
    fn test_detached_audio_refuses_play() {
        let mut audio = DetachedAudio;
        assert!(audio.set_source("file.mp3").is_ok());
        assert!(audio.play().is_err());
    }
}
