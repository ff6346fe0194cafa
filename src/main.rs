use dioxus::prelude::*;

mod api;
mod components;
mod dates;
mod views;

use api::ApiClient;
use components::Layout;
use views::{Home, NotFound, ShiftGroup};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Layout)]
        #[route("/")]
        Home {},
        #[route("/:shift_group")]
        ShiftGroup { shift_group: String },
        #[route("/:..segments")]
        NotFound { segments: Vec<String> },
}

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // backend base URL is injected here, once, and reaches components
    // through context
    use_context_provider(ApiClient::from_env);
    // bumped after a successful import so group lists re-fetch
    use_context_provider(|| Signal::new(0u32));

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }
        document::Meta { name: "description", content: "Shift group schedule dashboard" }
        Router::<Route> {}
    }
}
