//! Port fakes shared by the application unit tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::audio::{AudioClip, AudioFormat, AudioFragment, ClipHandle};

use super::ports::{
    AudioCue, AudioCueError, AudioCueType, AudioInput, CaptureError, CaptureSession, ClipRegistry,
    EndCallback, FragmentSender, PlaybackError, PlaybackService, Player, RegistryError,
};

/// Input that hands out sessions emitting a fixed fragment on start.
#[derive(Default)]
pub struct FakeInput {
    pub deny: AtomicBool,
    pub requests: AtomicUsize,
    /// Live flag of every session handed out, in order
    pub sessions: Mutex<Vec<Arc<AtomicBool>>>,
    /// Capturing flag of every session handed out, in order
    pub capturing: Mutex<Vec<Arc<AtomicBool>>>,
}

impl FakeInput {
    pub fn denying() -> Self {
        let input = Self::default();
        input.deny.store(true, Ordering::SeqCst);
        input
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|live| live.load(Ordering::SeqCst))
            .count()
    }

    /// Sessions currently emitting fragments
    pub fn capturing_sessions(&self) -> usize {
        self.capturing
            .lock()
            .unwrap()
            .iter()
            .filter(|capturing| capturing.load(Ordering::SeqCst))
            .count()
    }
}

#[async_trait]
impl AudioInput for FakeInput {
    async fn request_stream(&self) -> Result<Box<dyn CaptureSession>, CaptureError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.deny.load(Ordering::SeqCst) {
            return Err(CaptureError::Denied("permission denied".into()));
        }
        let live = Arc::new(AtomicBool::new(true));
        let capturing = Arc::new(AtomicBool::new(false));
        self.sessions.lock().unwrap().push(Arc::clone(&live));
        self.capturing.lock().unwrap().push(Arc::clone(&capturing));
        Ok(Box::new(FakeSession {
            live,
            capturing,
            sender: None,
        }))
    }
}

#[async_trait]
impl AudioInput for Arc<FakeInput> {
    async fn request_stream(&self) -> Result<Box<dyn CaptureSession>, CaptureError> {
        (**self).request_stream().await
    }
}

pub struct FakeSession {
    live: Arc<AtomicBool>,
    capturing: Arc<AtomicBool>,
    sender: Option<FragmentSender>,
}

impl CaptureSession for FakeSession {
    fn format(&self) -> AudioFormat {
        AudioFormat::mono(8_000)
    }

    fn start(&mut self, fragments: FragmentSender) -> Result<(), CaptureError> {
        if !self.live.load(Ordering::SeqCst) {
            return Err(CaptureError::Released);
        }
        let _ = fragments.send(AudioFragment::new(vec![1, 2, 3]));
        let _ = fragments.send(AudioFragment::new(vec![4]));
        self.sender = Some(fragments);
        self.capturing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) {
        self.sender = None;
        self.capturing.store(false, Ordering::SeqCst);
    }

    fn release(&mut self) {
        self.stop();
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// Registry keeping clips in a map, with handles `clip:<n>`
#[derive(Default)]
pub struct FakeRegistry {
    next: AtomicUsize,
    pub clips: Mutex<HashMap<ClipHandle, AudioClip>>,
    pub fail: AtomicBool,
}

impl ClipRegistry for FakeRegistry {
    fn register(&self, clip: AudioClip) -> Result<ClipHandle, RegistryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RegistryError::EncodeFailed("disk full".into()));
        }
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        let handle = ClipHandle::new(format!("clip:{}", id));
        self.clips.lock().unwrap().insert(handle.clone(), clip);
        Ok(handle)
    }

    fn release(&self, handle: &ClipHandle) -> bool {
        self.clips.lock().unwrap().remove(handle).is_some()
    }

    fn is_registered(&self, handle: &ClipHandle) -> bool {
        self.clips.lock().unwrap().contains_key(handle)
    }

    fn len(&self) -> usize {
        self.clips.lock().unwrap().len()
    }
}

#[derive(Default)]
struct PlayerState {
    paused: bool,
    looping: bool,
    stopped: bool,
    plays: usize,
}

/// Playback service whose players can be driven to their natural end.
#[derive(Default, Clone)]
pub struct FakePlayback {
    players: Arc<Mutex<Vec<(ClipHandle, Arc<Mutex<PlayerState>>, EndCallback)>>>,
    pub unsupported: Arc<Mutex<HashSet<ClipHandle>>>,
}

impl FakePlayback {
    /// Simulate the natural end of the most recent player for `handle`.
    /// Looping or stopped players do not end.
    pub fn finish(&self, handle: &ClipHandle) -> bool {
        let players = self.players.lock().unwrap();
        let Some((_, state, on_end)) = players.iter().rev().find(|(h, _, _)| h == handle) else {
            return false;
        };
        {
            let mut state = state.lock().unwrap();
            if state.looping || state.stopped || state.paused {
                return false;
            }
            state.paused = true;
        }
        on_end();
        true
    }

    /// Fire the end callback of every player ever loaded for `handle`
    pub fn fire_all_end_callbacks(&self, handle: &ClipHandle) {
        let players = self.players.lock().unwrap();
        for (h, _, on_end) in players.iter() {
            if h == handle {
                on_end();
            }
        }
    }

    pub fn loaded(&self) -> usize {
        self.players.lock().unwrap().len()
    }

    pub fn stopped(&self) -> usize {
        self.players
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, s, _)| s.lock().unwrap().stopped)
            .count()
    }

    pub fn is_looping(&self, handle: &ClipHandle) -> bool {
        self.players
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(h, _, _)| h == handle)
            .map(|(_, s, _)| s.lock().unwrap().looping)
            .unwrap_or(false)
    }

    pub fn plays(&self, handle: &ClipHandle) -> usize {
        self.players
            .lock()
            .unwrap()
            .iter()
            .filter(|(h, _, _)| h == handle)
            .map(|(_, s, _)| s.lock().unwrap().plays)
            .sum()
    }
}

impl PlaybackService for FakePlayback {
    fn load(
        &self,
        handle: &ClipHandle,
        on_end: EndCallback,
    ) -> Result<Box<dyn Player>, PlaybackError> {
        let state = Arc::new(Mutex::new(PlayerState {
            paused: true,
            ..Default::default()
        }));
        self.players
            .lock()
            .unwrap()
            .push((handle.clone(), Arc::clone(&state), on_end));
        Ok(Box::new(FakePlayer {
            handle: handle.clone(),
            state,
            unsupported: self.unsupported.lock().unwrap().contains(handle),
        }))
    }
}

struct FakePlayer {
    handle: ClipHandle,
    state: Arc<Mutex<PlayerState>>,
    unsupported: bool,
}

impl Player for FakePlayer {
    fn handle(&self) -> &ClipHandle {
        &self.handle
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.unsupported {
            return Err(PlaybackError::Unsupported("not a wav".into()));
        }
        let mut state = self.state.lock().unwrap();
        state.paused = false;
        state.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.lock().unwrap().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    fn set_looping(&mut self, looping: bool) {
        self.state.lock().unwrap().looping = looping;
    }

    fn stop(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.stopped = true;
        state.paused = true;
    }
}

/// Cue that records what was played
#[derive(Default, Clone)]
pub struct RecordingCue {
    pub played: Arc<Mutex<Vec<AudioCueType>>>,
}

#[async_trait]
impl AudioCue for RecordingCue {
    async fn play(&self, cue_type: AudioCueType) -> Result<(), AudioCueError> {
        self.played.lock().unwrap().push(cue_type);
        Ok(())
    }
}

/// Cue that notes how many sessions were capturing when each cue played
#[derive(Clone)]
pub struct ObservingCue {
    pub input: Arc<FakeInput>,
    pub seen: Arc<Mutex<Vec<(AudioCueType, usize)>>>,
}

impl ObservingCue {
    pub fn new(input: Arc<FakeInput>) -> Self {
        Self {
            input,
            seen: Arc::default(),
        }
    }
}

#[async_trait]
impl AudioCue for ObservingCue {
    async fn play(&self, cue_type: AudioCueType) -> Result<(), AudioCueError> {
        let capturing = self.input.capturing_sessions();
        self.seen.lock().unwrap().push((cue_type, capturing));
        Ok(())
    }
}
