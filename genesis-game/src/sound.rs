//! Sound notifications sent to the audio collaborator
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;

use crate::constants::DEFAULT_VOLUME;

/// Cues the engine and its callers can ask the audio layer to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundEvent {
    Combine,
    Discovery,
    Failure,
    Completion,
    DayTransition,
    Click,
    Hover,
    Success,
}

impl SoundEvent {
    /// Name the audio layer registers the cue under.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Combine => "combine",
            Self::Discovery => "discovery",
            Self::Failure => "failure",
            Self::Completion => "completion",
            Self::DayTransition => "dayTransition",
            Self::Click => "click",
            Self::Hover => "hover",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for SoundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fire-and-forget audio port. Implementations must not block.
pub trait SoundSink {
    fn play(&self, event: SoundEvent);
}

impl<T: SoundSink + ?Sized> SoundSink for &T {
    fn play(&self, event: SoundEvent) {
        (**self).play(event);
    }
}

/// Sink that drops every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&self, _event: SoundEvent) {}
}

/// Sink that remembers what it was asked to play.
#[derive(Debug, Default)]
pub struct SoundLog {
    events: RefCell<Vec<SoundEvent>>,
}

impl SoundLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return and clear everything recorded so far.
    pub fn take(&self) -> Vec<SoundEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl SoundSink for SoundLog {
    fn play(&self, event: SoundEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// Player-facing volume and mute switch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    volume: f32,
    enabled: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            enabled: true,
        }
    }
}

impl AudioSettings {
    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.volume
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the master volume, clamped to `0.0..=1.0`. NaN mutes.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    /// Flip mute and return whether sound is now enabled.
    pub const fn toggle_mute(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Gain the audio layer should apply right now.
    #[must_use]
    pub fn effective_gain(&self) -> f32 {
        if self.enabled { self.volume } else { 0.0 }
    }
}

/// Wraps a sink and drops cues while muted.
#[derive(Debug, Default)]
pub struct GatedSink<S> {
    inner: S,
    settings: AudioSettings,
}

impl<S: SoundSink> GatedSink<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            settings: AudioSettings::default(),
        }
    }

    pub const fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    pub const fn settings_mut(&mut self) -> &mut AudioSettings {
        &mut self.settings
    }

    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: SoundSink> SoundSink for GatedSink<S> {
    fn play(&self, event: SoundEvent) {
        if self.settings.effective_gain() > 0.0 {
            self.inner.play(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_serde() {
        for event in [
            SoundEvent::Combine,
            SoundEvent::DayTransition,
            SoundEvent::Success,
        ] {
            let json = serde_json::to_string(&event).unwrap();
            assert_eq!(json, format!("\"{}\"", event.as_str()));
        }
    }

    #[test]
    fn volume_is_clamped() {
        let mut settings = AudioSettings::default();
        settings.set_volume(1.5);
        assert!((settings.volume() - 1.0).abs() < f32::EPSILON);
        settings.set_volume(-2.0);
        assert!(settings.volume().abs() < f32::EPSILON);
        settings.set_volume(f32::NAN);
        assert!(settings.volume().abs() < f32::EPSILON);
    }

    #[test]
    fn gated_sink_drops_cues_while_muted() {
        let mut sink = GatedSink::new(SoundLog::new());
        sink.play(SoundEvent::Click);
        assert!(!sink.settings_mut().toggle_mute());
        sink.play(SoundEvent::Hover);
        assert!(sink.settings_mut().toggle_mute());
        sink.play(SoundEvent::Combine);
        assert_eq!(
            sink.inner().take(),
            vec![SoundEvent::Click, SoundEvent::Combine]
        );
    }
}
