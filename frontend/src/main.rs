use log::info;
use yew::prelude::*;

mod config;
mod error;
mod engine {
    pub mod sections;
    pub mod scheduler;
    pub mod shapes;
    pub mod particles;
    pub mod navigation;
    pub mod entry;
    pub mod input;
    pub mod motion;
    pub mod controller;
}
mod dom {
    pub mod canvas;
    pub mod effects;
    pub mod frame_loop;
    pub mod listeners;
    pub mod runtime;
}
mod pages {
    pub mod landing;
}

use pages::landing::Landing;

#[function_component]
fn App() -> Html {
    html! {
        <Landing />
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting landing page");
    yew::Renderer::<App>::new().render();
}
