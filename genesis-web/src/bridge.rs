//! JavaScript-facing game object.
//!
//! The page constructs one `GenesisGame`, passing callbacks for sound cues and
//! palette redraws, and drives it through the methods below.
use std::collections::BTreeMap;

use genesis_game::{
    Command, DiscoveryEngine, ElementId, ElementRecord, GameSession, GatedSink, Renderer,
    SoundEvent, SoundSink, catalog,
};
use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::dom;
use crate::notice::Notice;
use crate::storage::WebGameStorage;
use crate::view::{
    QuoteView, StatsView, combine_view, hint_view, palette, rounded_percent, stats_view,
};

/// Forwards cue names (`"discovery"`, `"dayTransition"`, ...) to a JS callback.
pub struct JsSoundSink {
    callback: Option<Function>,
}

impl SoundSink for JsSoundSink {
    fn play(&self, event: SoundEvent) {
        let Some(callback) = &self.callback else {
            return;
        };
        if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(event.as_str())) {
            log::warn!("sound callback failed: {}", dom::js_error_message(&err));
        }
    }
}

/// Hands the grouped palette to a JS callback.
pub struct JsRenderer {
    callback: Option<Function>,
}

impl Renderer for JsRenderer {
    fn render(&self, discovered: &BTreeMap<ElementId, ElementRecord>) {
        let Some(callback) = &self.callback else {
            return;
        };
        let groups = match serde_wasm_bindgen::to_value(&palette(discovered)) {
            Ok(groups) => groups,
            Err(err) => {
                log::warn!("palette serialization failed: {err}");
                return;
            }
        };
        if let Err(err) = callback.call1(&JsValue::NULL, &groups) {
            log::warn!("render callback failed: {}", dom::js_error_message(&err));
        }
    }
}

type WebSession = GameSession<'static, WebGameStorage, GatedSink<JsSoundSink>, JsRenderer>;

#[derive(Serialize)]
struct CommandView {
    notice: Option<Notice>,
    stats: StatsView,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

#[wasm_bindgen]
pub struct GenesisGame {
    session: WebSession,
}

#[wasm_bindgen]
impl GenesisGame {
    /// Start a game, resuming the saved slot when it holds progress.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn new(on_sound: Option<Function>, on_render: Option<Function>) -> Self {
        let seed = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
        let engine = DiscoveryEngine::new(
            catalog(),
            WebGameStorage,
            GatedSink::new(JsSoundSink { callback: on_sound }),
            JsRenderer {
                callback: on_render,
            },
        );
        Self {
            session: GameSession::resume(engine, seed),
        }
    }

    /// Toast to show when the constructor picked up a saved game.
    #[wasm_bindgen(js_name = resumeNotice)]
    pub fn resume_notice(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.was_resumed().then(Notice::resumed))
    }

    /// # Errors
    ///
    /// Rejects ids the player has not discovered.
    pub fn combine(&mut self, first: &str, second: &str) -> Result<JsValue, JsValue> {
        let report = self
            .session
            .combine(first, second)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        if let Some(err) = &report.autosave_error {
            dom::console_error(&format!("auto-save failed: {err}"));
        }
        to_js(&combine_view(&report, self.session.store(), catalog()))
    }

    pub fn save(&mut self) -> Result<JsValue, JsValue> {
        self.run(Command::Save)
    }

    pub fn load(&mut self) -> Result<JsValue, JsValue> {
        self.run(Command::Load)
    }

    #[wasm_bindgen(js_name = newGame)]
    pub fn new_game(&mut self) -> Result<JsValue, JsValue> {
        self.run(Command::NewGame)
    }

    /// A random hint, or the encouragement quote when nothing is left.
    pub fn hint(&mut self) -> Result<JsValue, JsValue> {
        let hint = self.session.hint();
        if hint.is_some() {
            self.session.engine().play(SoundEvent::Discovery);
        }
        to_js(&hint_view(hint.as_ref(), catalog()))
    }

    pub fn progress(&self) -> u8 {
        rounded_percent(self.session.progress())
    }

    pub fn stats(&self) -> Result<JsValue, JsValue> {
        to_js(&stats_view(self.session.store(), catalog()))
    }

    pub fn palette(&self) -> Result<JsValue, JsValue> {
        to_js(&palette(self.session.store().discovered()))
    }

    #[wasm_bindgen(js_name = dayDescription)]
    pub fn day_description(&self, day: u8) -> Option<String> {
        catalog().day_description(day).map(str::to_string)
    }

    #[wasm_bindgen(js_name = openingQuote)]
    pub fn opening_quote(&self) -> Result<JsValue, JsValue> {
        to_js(&QuoteView::from(&catalog().opening_quote))
    }

    /// Play a UI cue such as `"click"` or `"hover"`. Unknown names are ignored.
    #[wasm_bindgen(js_name = playCue)]
    pub fn play_cue(&self, name: &str) {
        match serde_json::from_value::<SoundEvent>(serde_json::Value::from(name)) {
            Ok(event) => self.session.engine().play(event),
            Err(_) => log::debug!("unknown cue `{name}`"),
        }
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, volume: f32) {
        self.session
            .engine_mut()
            .sound_mut()
            .settings_mut()
            .set_volume(volume);
    }

    /// Returns whether sound is enabled after the toggle.
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) -> bool {
        self.session
            .engine_mut()
            .sound_mut()
            .settings_mut()
            .toggle_mute()
    }

    /// Gain the page's audio graph should use right now.
    pub fn gain(&self) -> f32 {
        self.session.engine().sound().settings().effective_gain()
    }
}

impl GenesisGame {
    fn run(&mut self, command: Command) -> Result<JsValue, JsValue> {
        let result = self.session.dispatch(command);
        if let Err(err) = &result {
            dom::console_error(&err.to_string());
        }
        to_js(&CommandView {
            notice: Notice::for_command(&result),
            stats: stats_view(self.session.store(), catalog()),
        })
    }
}
