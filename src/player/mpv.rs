use crate::app::events::{Event, PlayerEvent};
use crate::player::AudioElement;
use anyhow::Context;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, ReadHalf, WriteHalf},
    net::UnixStream,
    process::{Child, Command},
    sync::mpsc,
};

/// mpv running idle in the background, driven over its JSON IPC socket.
///
/// Commands are queued to a writer task, so the [`AudioElement`] calls never
/// block the event loop. Replies and property changes come back as
/// [`PlayerEvent`]s on the app channel.
#[derive(Debug)]
pub struct MpvAudio {
    child: Child,
    socket_path: PathBuf,
    commands: mpsc::UnboundedSender<serde_json::Value>,
    request_id: u64,
    entries: Arc<Mutex<EntryTracker>>,
}

impl MpvAudio {
    pub async fn spawn(
        event_tx: mpsc::Sender<Event>,
        audio_device: Option<&str>,
        log_file: Option<&Path>,
        volume: u8,
    ) -> anyhow::Result<Self> {
        let socket_path =
            std::env::temp_dir().join(format!("deezy-mpv-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&socket_path);

        let mut cmd = Command::new("mpv");
        cmd.args([
            "--no-video",
            "--idle=yes",
            "--input-terminal=no",
            // keep quiet, but we'll request log messages via IPC so we can show errors in UI
            "--really-quiet",
        ]);
        cmd.arg(format!("--volume={}", volume.min(100)));
        if let Some(dev) = audio_device {
            cmd.arg(format!("--audio-device={dev}"));
        }
        if let Some(p) = log_file {
            cmd.arg(format!("--log-file={}", p.display()));
        }
        let child = cmd
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("spawn mpv")?;

        // mpv creates the socket shortly after starting.
        let stream = connect_with_retry(&socket_path).await?;
        let (reader, writer) = tokio::io::split(stream);
        let (commands, command_rx) = mpsc::unbounded_channel();
        let entries = Arc::new(Mutex::new(EntryTracker::default()));

        tokio::spawn(read_events_loop(reader, event_tx, entries.clone()));
        tokio::spawn(write_commands_loop(writer, command_rx));

        let mut this = Self {
            child,
            socket_path,
            commands,
            request_id: 1,
            entries,
        };

        this.command(json!({"command":["request_log_messages", "warn"]}))?;
        this.command(json!({"command":["observe_property", 1, "time-pos"]}))?;
        this.command(json!({"command":["observe_property", 2, "duration"]}))?;
        this.command(json!({"command":["observe_property", 3, "pause"]}))?;

        tracing::info!(socket = %this.socket_path.display(), "mpv ready");
        Ok(this)
    }

    fn command(&mut self, v: serde_json::Value) -> anyhow::Result<()> {
        let id = self.next_request_id();
        self.send(v, id)
    }

    fn next_request_id(&mut self) -> u64 {
        let id = self.request_id;
        self.request_id += 1;
        id
    }

    fn send(&mut self, mut v: serde_json::Value, request_id: u64) -> anyhow::Result<()> {
        // Tag requests so errors come back as structured replies.
        if let serde_json::Value::Object(ref mut o) = v {
            o.insert("request_id".to_string(), serde_json::Value::from(request_id));
        }
        self.commands
            .send(v)
            .map_err(|_| anyhow::anyhow!("mpv ipc writer has stopped"))
    }
}

impl AudioElement for MpvAudio {
    fn set_source(&mut self, url: &str) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "pause", true]}))?;
        let id = self.next_request_id();
        // Registered before sending so the reply can't arrive first.
        if let Ok(mut entries) = self.entries.lock() {
            entries.load_requested(id);
        }
        self.send(json!({"command":["loadfile", url, "replace"]}), id)
    }

    fn play(&mut self) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "pause", false]}))
    }

    fn pause(&mut self) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "pause", true]}))
    }

    fn seek(&mut self, seconds: f64) -> anyhow::Result<()> {
        self.command(json!({"command":["seek", seconds, "absolute"]}))
    }

    fn seek_relative(&mut self, seconds: f64) -> anyhow::Result<()> {
        self.command(json!({"command":["seek", seconds, "relative"]}))
    }

    fn set_volume(&mut self, volume: u8) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "volume", volume.min(100)]}))
    }

    fn is_current_entry(&self, entry: u64) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.is_current(entry))
            .unwrap_or(true)
    }
}

/// Tracks which mpv playlist entry the latest `loadfile` produced, so
/// end-of-file and error events for a replaced file can be told apart.
#[derive(Debug, Default)]
struct EntryTracker {
    load_request: Option<u64>,
    current: Option<u64>,
}

impl EntryTracker {
    fn load_requested(&mut self, request_id: u64) {
        self.load_request = Some(request_id);
        self.current = None;
    }

    /// The `loadfile` reply names the new entry on recent mpv; `start-file`
    /// covers versions whose reply carries no data.
    fn observe(&mut self, v: &serde_json::Value) {
        let is_load_reply = self.load_request.is_some()
            && v.get("request_id").and_then(|x| x.as_u64()) == self.load_request;
        let entry = if is_load_reply {
            v.get("data").and_then(entry_id)
        } else if v.get("event").and_then(|x| x.as_str()) == Some("start-file") {
            entry_id(v)
        } else {
            None
        };
        if entry.is_some() {
            self.current = entry;
        }
    }

    fn is_current(&self, entry: u64) -> bool {
        self.current == Some(entry)
    }
}

fn entry_id(v: &serde_json::Value) -> Option<u64> {
    v.get("playlist_entry_id")?.as_u64()
}

impl Drop for MpvAudio {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// Output devices as listed by `mpv --audio-device=help`.
pub async fn list_audio_devices() -> anyhow::Result<Vec<String>> {
    let out = Command::new("mpv")
        .args(["--audio-device=help", "--no-video", "--idle=no"])
        .output()
        .await
        .context("run mpv --audio-device=help")?;
    Ok(parse_audio_devices(&String::from_utf8_lossy(&out.stdout)))
}

fn parse_audio_devices(help: &str) -> Vec<String> {
    // Lines look like: `  'coreaudio/BuiltInSpeakerDevice' (MacBook Pro Speakers)`
    help.lines()
        .filter_map(|l| {
            let l = l.trim();
            let rest = l.strip_prefix('\'')?;
            let end = rest.find('\'')?;
            Some(rest[..end].to_string())
        })
        .collect()
}

async fn connect_with_retry(path: &Path) -> anyhow::Result<UnixStream> {
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        match UnixStream::connect(path).await {
            Ok(s) => return Ok(s),
            Err(e) => {
                if tokio::time::Instant::now() > deadline {
                    return Err(e).with_context(|| format!("connect to mpv ipc {}", path.display()));
                }
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
        }
    }
}

async fn write_commands_loop(
    mut writer: WriteHalf<UnixStream>,
    mut commands: mpsc::UnboundedReceiver<serde_json::Value>,
) {
    while let Some(v) = commands.recv().await {
        let mut line = match serde_json::to_vec(&v) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("encode mpv command: {e}");
                continue;
            }
        };
        line.push(b'\n');
        if let Err(e) = writer.write_all(&line).await {
            tracing::warn!("write mpv ipc: {e}");
            break;
        }
        let _ = writer.flush().await;
    }
}

async fn read_events_loop(
    reader: ReadHalf<UnixStream>,
    event_tx: mpsc::Sender<Event>,
    entries: Arc<Mutex<EntryTracker>>,
) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(v) = serde_json::from_str::<serde_json::Value>(&line) else {
            continue;
        };
        if let Ok(mut entries) = entries.lock() {
            entries.observe(&v);
        }
        // Command replies: {"request_id":..., "error":"..."}
        if let (Some(_rid), Some(err)) = (v.get("request_id"), v.get("error"))
            && let Some(err_s) = err.as_str()
            && err_s != "success"
        {
            let _ = event_tx
                .send(Event::Player(PlayerEvent::Warning(format!("mpv ipc error: {err_s}"))))
                .await;
        }
        if let Some(pe) = map_mpv_event(&v)
            && event_tx.send(Event::Player(pe)).await.is_err()
        {
            break;
        }
    }
}

fn map_mpv_event(v: &serde_json::Value) -> Option<PlayerEvent> {
    match v.get("event")?.as_str()? {
        "property-change" => {
            let name = v.get("name")?.as_str()?;
            match name {
                "time-pos" => Some(PlayerEvent::Position {
                    seconds: v.get("data")?.as_f64().unwrap_or(0.0),
                }),
                "duration" => Some(PlayerEvent::Duration {
                    seconds: v.get("data")?.as_f64().unwrap_or(0.0),
                }),
                "pause" => {
                    let paused = v.get("data")?.as_bool().unwrap_or(false);
                    Some(if paused { PlayerEvent::Paused } else { PlayerEvent::Started })
                }
                _ => None,
            }
        }
        "end-file" => {
            // `stop` and `redirect` fire when we replace the source; only a natural
            // end advances the playlist.
            let entry = entry_id(v);
            match v.get("reason").and_then(|x| x.as_str()).unwrap_or("") {
                "eof" => Some(PlayerEvent::Ended { entry }),
                "error" => {
                    let err = v.get("file_error").or_else(|| v.get("error"));
                    let err = err.and_then(|x| x.as_str()).unwrap_or("unknown");
                    Some(PlayerEvent::Error {
                        entry,
                        message: format!("mpv end-file error: {err}"),
                    })
                }
                _ => None,
            }
        }
        "log-message" => {
            let level = v.get("level")?.as_str().unwrap_or("info");
            let text = v.get("text")?.as_str().unwrap_or("").trim();
            if (level == "warn" || level == "error") && !text.is_empty() {
                Some(PlayerEvent::Warning(format!("mpv {level}: {text}")))
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_property_changes() {
        let v = json!({"event":"property-change","id":1,"name":"time-pos","data":12.5});
        assert!(matches!(map_mpv_event(&v), Some(PlayerEvent::Position { seconds }) if seconds == 12.5));

        let v = json!({"event":"property-change","id":3,"name":"pause","data":true});
        assert!(matches!(map_mpv_event(&v), Some(PlayerEvent::Paused)));

        // Duration is null until a file is loaded.
        let v = json!({"event":"property-change","id":2,"name":"duration","data":null});
        assert!(matches!(map_mpv_event(&v), Some(PlayerEvent::Duration { seconds }) if seconds == 0.0));
    }

    #[test]
    fn test_map_end_file() {
        let eof = json!({"event":"end-file","reason":"eof","playlist_entry_id":3});
        assert!(matches!(map_mpv_event(&eof), Some(PlayerEvent::Ended { entry: Some(3) })));

        let replaced = json!({"event":"end-file","reason":"stop"});
        assert!(map_mpv_event(&replaced).is_none());

        let failed = json!({"event":"end-file","reason":"error","file_error":"loading failed"});
        match map_mpv_event(&failed) {
            Some(PlayerEvent::Error { entry: None, message }) => {
                assert!(message.contains("loading failed"))
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_entry_tracker_follows_latest_load() {
        let mut entries = EntryTracker::default();
        entries.load_requested(7);
        entries.observe(&json!({"request_id":7,"error":"success","data":{"playlist_entry_id":1}}));
        assert!(entries.is_current(1));

        // The old file hits EOF right as a new one is requested.
        entries.load_requested(9);
        assert!(!entries.is_current(1));
        entries.observe(&json!({"event":"end-file","reason":"eof","playlist_entry_id":1}));
        assert!(!entries.is_current(1));

        // Replies to other commands don't move the entry.
        entries.observe(&json!({"request_id":8,"error":"success","data":{"playlist_entry_id":5}}));
        assert!(!entries.is_current(5));

        entries.observe(&json!({"request_id":9,"error":"success","data":{"playlist_entry_id":2}}));
        assert!(entries.is_current(2));
        assert!(!entries.is_current(1));
    }

    #[test]
    fn test_entry_tracker_falls_back_to_start_file() {
        let mut entries = EntryTracker::default();
        entries.load_requested(4);
        entries.observe(&json!({"request_id":4,"error":"success"}));
        assert!(!entries.is_current(6));
        entries.observe(&json!({"event":"start-file","playlist_entry_id":6}));
        assert!(entries.is_current(6));
    }

    #[test]
    fn test_map_log_messages() {
        let warn = json!({"event":"log-message","level":"warn","prefix":"ffmpeg","text":"bad header\n"});
        assert!(matches!(map_mpv_event(&warn), Some(PlayerEvent::Warning(m)) if m == "mpv warn: bad header"));

        let info = json!({"event":"log-message","level":"info","text":"hello"});
        assert!(map_mpv_event(&info).is_none());
    }

    #[test]
    fn test_parse_audio_devices() {
        let help = "List of detected audio devices:\n  'auto' (Autoselect device)\n  'pulse/alsa_output.usb' (USB Audio)\n";
        assert_eq!(parse_audio_devices(help), vec!["auto", "pulse/alsa_output.usb"]);
    }
}
