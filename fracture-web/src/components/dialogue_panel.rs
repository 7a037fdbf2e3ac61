use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub text: AttrValue,
    #[prop_or_default]
    pub speaker: Option<AttrValue>,
    /// How many characters of `text` the typewriter has revealed.
    pub revealed: usize,
    pub complete: bool,
    pub is_fractured: bool,
    /// Choice buttons, rendered only once the reveal completes.
    #[prop_or_default]
    pub children: Children,
}

/// Bottom dialogue panel with the typewriter reveal and the choice
/// column. Choices stay hidden until the full text is shown.
#[function_component(DialoguePanel)]
pub fn dialogue_panel(p: &Props) -> Html {
    let shown: String = p.text.chars().take(p.revealed).collect();
    let panel_class = classes!(
        "dialogue-panel",
        p.is_fractured.then_some("dialogue-panel--fractured")
    );
    html! {
        <section class={panel_class} role="dialog" aria-live="polite">
            if let Some(speaker) = &p.speaker {
                <h3 class="dialogue-speaker">{ speaker.clone() }</h3>
            }
            <p class="dialogue-text">
                { shown }
                if !p.complete {
                    <span class="dialogue-caret" aria-hidden="true" />
                }
            </p>
            if p.complete {
                <div class="dialogue-choices">
                    { for p.children.iter() }
                </div>
            }
        </section>
    }
}
