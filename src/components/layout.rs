use dioxus::prelude::*;

use crate::components::GroupDirectory;
use crate::Route;

/// Application shell: the group directory sidebar next to the routed view.
#[component]
pub fn Layout() -> Element {
    rsx! {
        div { class: "flex w-screen h-screen gap-3 p-3 bg-neutral-100 overflow-hidden",
            GroupDirectory {}
            main { class: "flex-1 h-full overflow-hidden",
                Outlet::<Route> {}
            }
        }
    }
}
