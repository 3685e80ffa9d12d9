mod components;

use components::app::App;

fn main() {
    merge_idle::logging::init(tracing::Level::INFO);
    yew::Renderer::<App>::new().render();
}
