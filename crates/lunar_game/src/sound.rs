//! Looped background music. Audio is best-effort: any failure downgrades to
//! a silent player so the game runs on machines without an output device.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

pub const MUSIC_VOLUME: f32 = 0.1;

pub struct MusicPlayer {
    _stream: Option<OutputStream>,
    _handle: Option<OutputStreamHandle>,
    sink: Option<Sink>,
}

impl MusicPlayer {
    pub fn silent() -> Self {
        MusicPlayer {
            _stream: None,
            _handle: None,
            sink: None,
        }
    }

    /// Open the default output device and loop the track at `volume`.
    pub fn play_looped(path: &Path, volume: f32) -> Self {
        match Self::try_play_looped(path, volume) {
            Ok(player) => player,
            Err(e) => {
                log::warn!("Music disabled: {e}");
                Self::silent()
            }
        }
    }

    fn try_play_looped(path: &Path, volume: f32) -> Result<Self, String> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| format!("Failed to open audio output: {e}"))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| format!("Failed to create audio sink: {e}"))?;
        let file = File::open(path)
            .map_err(|e| format!("Failed to open music file {}: {e}", path.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| format!("Failed to decode music file {}: {e}", path.display()))?;

        sink.set_volume(volume);
        sink.append(source.repeat_infinite());
        Ok(MusicPlayer {
            _stream: Some(stream),
            _handle: Some(handle),
            sink: Some(sink),
        })
    }

    pub fn stop(&self) {
        if let Some(sink) = &self.sink {
            sink.stop();
        }
    }
}
