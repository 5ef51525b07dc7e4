use std::cell::RefCell;
use std::rc::Rc;

use log::error;
use yew::prelude::*;

use crate::dom::runtime::Runtime;
use crate::engine::sections::SectionId;

type SharedRuntime = Rc<RefCell<Option<Runtime>>>;

const CTA_RIPPLE_COUNT: usize = 12;

const LANDING_CSS: &str = r#"
    body { margin: 0; overflow: hidden; background: #0b0b0f; color: #f5f5f5; font-family: sans-serif; }
    #loading-screen {
        position: fixed; inset: 0; z-index: 100; display: flex; align-items: center; justify-content: center;
        background: #0b0b0f; transition: opacity 0.5s ease, visibility 0.5s ease;
    }
    #loading-screen.hidden { opacity: 0; visibility: hidden; }
    .deck { position: fixed; inset: 0; }
    .section {
        position: absolute; inset: 0; display: flex; flex-direction: column; align-items: center;
        justify-content: center; opacity: 0; visibility: hidden;
        transition: transform 0.8s cubic-bezier(0.77, 0, 0.175, 1), opacity 0.8s ease;
    }
    .section.active { opacity: 1; visibility: visible; z-index: 2; }
    .particles { position: absolute; inset: 0; overflow: hidden; }
    .section-content { position: relative; z-index: 3; max-width: 960px; padding: 0 24px; text-align: center; }
    .title-line { opacity: 0; transform: translateY(30px); transition: opacity 0.6s ease, transform 0.6s ease; }
    .feature-item, .platform-mockup, .workspace-card, .percentage-display, .benefit-item,
    .section-title, .section-subtitle, .apply-cta, .rule-card, .final-apply-cta, [data-animate] { opacity: 0; }

    .top-nav { position: fixed; top: 0; left: 0; right: 0; z-index: 50; display: flex; justify-content: center; gap: 8px; padding: 12px; }
    .nav-link { background: none; border: none; color: inherit; cursor: pointer; opacity: 0.6; }
    .nav-link.active { opacity: 1; color: #FFD700; }
    .progress { position: fixed; left: 0; right: 0; bottom: 0; height: 3px; z-index: 50; }
    .progress-bar { height: 100%; width: 0; background: #FFD700; transition: width 0.8s ease; }
    .nav-arrow { position: fixed; right: 24px; z-index: 50; display: flex; cursor: pointer; background: none; border: 1px solid currentColor; color: inherit; }
    #nav-back { top: 72px; display: none; }
    #nav-main { bottom: 24px; }

    @keyframes slide-left { from { opacity: 0; transform: translateX(-60px); } to { opacity: 1; transform: none; } }
    @keyframes slide-right { from { opacity: 0; transform: translateX(60px); } to { opacity: 1; transform: none; } }
    @keyframes fade-in { from { opacity: 0; } to { opacity: 1; } }
    @keyframes zoom-in { from { opacity: 0; transform: scale(0.6); } to { opacity: 1; transform: none; } }
    @keyframes bounce { 0% { opacity: 0; transform: scale(0.8); } 60% { opacity: 1; transform: scale(1.05); } 100% { opacity: 1; transform: none; } }
    @keyframes flip-x { from { opacity: 0; transform: rotateX(90deg); } to { opacity: 1; transform: none; } }
    .animate-slide-left { animation: slide-left 0.6s ease forwards; }
    .animate-slide-right { animation: slide-right 0.6s ease forwards; }
    .animate-fade-in { animation: fade-in 0.6s ease forwards; }
    .animate-zoom-in { animation: zoom-in 0.6s ease forwards; }
    .animate-bounce { animation: bounce 0.8s ease forwards; }
    .animate-flip-x { animation: flip-x 0.6s ease forwards; }

    body.reduced-motion *, body.reduced-motion *::before, body.reduced-motion *::after {
        animation-duration: 0.01ms !important; transition-duration: 0.01ms !important;
    }
    body.animations-paused [data-animated] { animation-play-state: paused; }
"#;

#[derive(Properties, PartialEq)]
pub struct SectionNavProps {
    pub on_select: Callback<usize>,
}

/// Navbar with one link per section. Highlighting is driven by the runtime.
#[function_component(SectionNav)]
pub fn section_nav(props: &SectionNavProps) -> Html {
    html! {
        <nav class="top-nav">
            { for SectionId::ALL.iter().map(|section| {
                let index = section.index();
                let on_select = props.on_select.clone();
                html! {
                    <button
                        class={classes!("nav-link", (index == 0).then(|| "active"))}
                        onclick={Callback::from(move |_: MouseEvent| on_select.emit(index))}
                    >
                        { section.name().replace('-', " ") }
                    </button>
                }
            }) }
        </nav>
    }
}

fn particles(section: SectionId) -> Html {
    html! { <div class="particles" id={section.particle_container_id()}></div> }
}

/// Click ripple on a call-to-action, then a jump to `target`.
fn cta(runtime: &SharedRuntime, target: SectionId) -> Callback<MouseEvent> {
    let runtime = runtime.clone();
    Callback::from(move |ev: MouseEvent| {
        if let Some(runtime) = runtime.borrow().as_ref() {
            if let Some(section) = SectionId::from_index(runtime.current_section()) {
                runtime.add_burst_effect(section.name(), ev.client_x(), ev.client_y(), CTA_RIPPLE_COUNT);
            }
            runtime.go_to(target.index());
        }
    })
}

fn with_runtime(runtime: &SharedRuntime, action: impl Fn(&Runtime) + 'static) -> Callback<MouseEvent> {
    let runtime = runtime.clone();
    Callback::from(move |_: MouseEvent| {
        if let Some(runtime) = runtime.borrow().as_ref() {
            action(runtime);
        }
    })
}

#[function_component(Landing)]
pub fn landing() -> Html {
    let runtime: SharedRuntime = use_mut_ref(|| None);

    {
        let runtime = runtime.clone();
        use_effect_with_deps(
            move |_| {
                match Runtime::mount() {
                    Ok(mounted) => *runtime.borrow_mut() = Some(mounted),
                    Err(err) => error!("landing page failed to start: {}", err),
                }
                move || {
                    runtime.borrow_mut().take();
                }
            },
            (),
        );
    }

    let on_select = {
        let runtime = runtime.clone();
        Callback::from(move |index: usize| {
            if let Some(runtime) = runtime.borrow().as_ref() {
                runtime.go_to(index);
            }
        })
    };
    let go_next = with_runtime(&runtime, Runtime::next);
    let go_back = with_runtime(&runtime, Runtime::prev);
    let go_apply = cta(&runtime, SectionId::Apply);
    let go_final = cta(&runtime, SectionId::FinalApply);

    html! {
        <>
            <style>{ LANDING_CSS }</style>
            <div id="loading-screen">
                <div class="loading-logo">{"Loading"}</div>
            </div>

            <SectionNav on_select={on_select} />
            <div class="progress"><div class="progress-bar"></div></div>
            <button id="nav-back" class="nav-arrow" onclick={go_back}>{"↑"}</button>
            <button id="nav-main" class="nav-arrow" onclick={go_next}>{"↓"}</button>

            <main class="deck">
                <section id="hero" class="section active">
                    { particles(SectionId::Hero) }
                    <div class="section-content">
                        <h1>
                            <span class="title-line">{"Play the table."}</span><br />
                            <span class="title-line">{"Run the house."}</span>
                        </h1>
                        <p data-animate="fade-in">{"A workspace for streamers and affiliates who want to grow with us."}</p>
                        <button class="cta" onclick={go_apply.clone()}>{"Apply now"}</button>
                    </div>
                </section>

                <section id="platform" class="section">
                    { particles(SectionId::Platform) }
                    <div class="section-content">
                        <h2 class="section-title">{"The platform"}</h2>
                        <ul class="features">
                            <li class="feature-item">{"Live tables around the clock"}</li>
                            <li class="feature-item">{"Instant payouts"}</li>
                            <li class="feature-item">{"Dedicated account manager"}</li>
                        </ul>
                        <div class="platform-mockup"></div>
                    </div>
                </section>

                <section id="workspace" class="section">
                    { particles(SectionId::Workspace) }
                    <div class="section-content">
                        <h2 class="section-title">{"Your workspace"}</h2>
                        <div class="workspace-card">{"Studio setup"}</div>
                        <div class="workspace-card">{"Content calendar"}</div>
                        <div class="workspace-card">{"Performance reports"}</div>
                    </div>
                </section>

                <section id="benefits" class="section">
                    { particles(SectionId::Benefits) }
                    <div class="section-content">
                        <div class="percentage-display">{"50%"}</div>
                        <div class="benefit-item">{"Revenue share from day one"}</div>
                        <div class="benefit-item">{"Weekly settlements"}</div>
                        <div class="benefit-item">{"Bonus budget for your audience"}</div>
                    </div>
                </section>

                <section id="apply" class="section">
                    { particles(SectionId::Apply) }
                    <div class="section-content">
                        <h2 class="section-title">{"Ready to join?"}</h2>
                        <p class="section-subtitle">{"Tell us about your channel."}</p>
                        <button class="apply-cta" onclick={go_final.clone()}>{"Apply"}</button>
                    </div>
                </section>

                <section id="rules" class="section">
                    { particles(SectionId::Rules) }
                    <div class="section-content">
                        <h2 class="section-title" data-animate="fade-in">{"House rules"}</h2>
                        <div class="rule-card">{"Play responsibly"}</div>
                        <div class="rule-card">{"Adults only"}</div>
                        <div class="rule-card">{"Honest promotion"}</div>
                        <div class="rule-card">{"One account per person"}</div>
                    </div>
                </section>

                <section id="final-apply" class="section">
                    { particles(SectionId::FinalApply) }
                    <div class="section-content">
                        <h2 class="section-title">{"Your seat is waiting"}</h2>
                        <p class="section-subtitle">{"Applications are reviewed within two days."}</p>
                        <button class="final-apply-cta" onclick={go_apply}>{"Apply now"}</button>
                    </div>
                </section>
            </main>
        </>
    }
}
