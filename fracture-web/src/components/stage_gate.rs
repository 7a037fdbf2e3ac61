use gloo::events::EventListener;
use gloo::utils::document;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

struct Briefing {
    title: &'static str,
    desc: &'static str,
    objective: &'static str,
}

const fn briefing(stage: u8) -> Briefing {
    match stage {
        1 => Briefing {
            title: "FROZEN HALL",
            desc: "Time has crystallized. Students and spells hang in mid-motion.",
            objective: "Scale the floating archives and reach the Grand Hourglass.",
        },
        2 => Briefing {
            title: "FRACTURED FOREST",
            desc: "The woods do not follow natural law. The trees breathe, and the sky rotates.",
            objective: "Follow the glowing spirit trail to the source of the rot.",
        },
        3 => Briefing {
            title: "CHAMBER OF THE DIVIDED SELF",
            desc: "A reflection that lives. A truth that bleeds.",
            objective: "Confront your echo and carry what it shows you back to the hub.",
        },
        _ => Briefing {
            title: "THE NORTH CORRIDOR",
            desc: "The anchor of the castle. Reality's weight is heaviest here.",
            objective: "Find the fractured sigil to investigate the first anomaly.",
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct Props {
    /// The pending stage awaiting acknowledgment.
    pub stage: u8,
    pub on_start: Callback<()>,
}

/// Full-screen stage briefing. Movement stays locked until the player
/// acknowledges with the button or Enter.
#[function_component(StageGate)]
pub fn stage_gate(p: &Props) -> Html {
    {
        let on_start = p.on_start.clone();
        use_effect_with(p.stage, move |_| {
            let listener = EventListener::new(&document(), "keydown", move |event| {
                if let Some(key_event) = event.dyn_ref::<KeyboardEvent>() {
                    if key_event.key() == "Enter" {
                        on_start.emit(());
                    }
                }
            });
            move || drop(listener)
        });
    }

    let data = briefing(p.stage);
    let start = {
        let cb = p.on_start.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <div class="stage-gate" role="dialog" aria-modal="true" aria-labelledby="gate-title">
            <div class="stage-gate-card">
                <h2 id="gate-title" class="stage-gate-title">{ data.title }</h2>
                <p class="stage-gate-desc">{ data.desc }</p>
                <div class="stage-gate-objective">
                    <h4>{ "Objective" }</h4>
                    <p>{ data.objective }</p>
                </div>
                <div class="stage-gate-keys">
                    <span>{ "WASD — Move" }</span>
                    <span>{ "SPACE — Jump" }</span>
                    <span>{ "SHIFT — Sprint" }</span>
                    <span>{ "Q/E — Turn camera" }</span>
                </div>
                <button class="stage-gate-start" onclick={start}>
                    { "Press Enter to begin" }
                </button>
            </div>
        </div>
    }
}
