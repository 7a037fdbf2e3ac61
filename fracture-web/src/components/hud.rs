use fracture_game::{CharacterId, GameState};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Rendered copy of the store for display.
    pub state: GameState,
    pub on_back: Callback<()>,
    pub on_forward: Callback<()>,
    pub on_toggle_sound: Callback<()>,
}

fn meter(label: &str, value: i32) -> Html {
    let width = format!("width: {}%", value.clamp(0, 100));
    html! {
        <div class="hud-meter">
            <span class="hud-meter-label">{ label.to_string() }</span>
            <div class="hud-meter-track">
                <div class={format!("hud-meter-fill hud-meter-fill--{}", label.to_lowercase())}
                     style={width} />
            </div>
            <span class="hud-meter-value">{ value }</span>
        </div>
    }
}

/// Persistent overlay: chapter, alignment meters, spell list, trust
/// readout, history navigation and the sound toggle.
#[function_component(HudOverlay)]
pub fn hud_overlay(p: &Props) -> Html {
    let s = &p.state;
    let back = {
        let cb = p.on_back.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let forward = {
        let cb = p.on_forward.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let toggle_sound = {
        let cb = p.on_toggle_sound.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let spells = s.unlocked_spells.iter().map(|spell| {
        html! { <li class="hud-spell">{ spell.clone() }</li> }
    });
    let trust = CharacterId::ALL.iter().map(|&who| {
        html! {
            <li class="hud-trust-entry">
                <span>{ who.as_str() }</span>
                <span>{ s.trust_for(who) }</span>
            </li>
        }
    });

    html! {
        <aside class={classes!("hud", s.is_fractured.then_some("hud--fractured"))}>
            <header class="hud-header">
                <h4>{ format!("Chapter {}", s.current_chapter) }</h4>
                if s.is_fractured {
                    <span class="hud-fracture-warning">{ "TIME IS FRACTURED" }</span>
                }
                <span class="hud-fracture-level">{ format!("Fracture {}", s.fracture_level) }</span>
            </header>
            <div class="hud-meters">
                { meter("Stability", s.stability) }
                { meter("Chaos", s.chaos) }
                { meter("Knowledge", s.knowledge) }
            </div>
            <ul class="hud-spells">{ for spells }</ul>
            <ul class="hud-trust">{ for trust }</ul>
            <footer class="hud-controls">
                <button class="hud-btn" onclick={back} disabled={!s.can_go_back()}>
                    { "Rewind" }
                </button>
                <button class="hud-btn" onclick={forward} disabled={!s.can_go_forward()}>
                    { "Advance" }
                </button>
                <button class="hud-btn hud-btn--sound" onclick={toggle_sound}
                        aria-pressed={s.sound_enabled.to_string()}>
                    { if s.sound_enabled { "Sound on" } else { "Sound off" } }
                </button>
            </footer>
        </aside>
    }
}
