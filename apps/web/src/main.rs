mod console_log;
mod directory;
mod fetch;
mod page;

use annuaire::SearchPolicy;
use log::LevelFilter;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use directory::Directory;
use page::PageController;

const AUTO_ATTRIBUTE: &str = "data-annuaire";
const REGION_ATTRIBUTE: &str = "data-region";

fn main() {
    console_log::init(LevelFilter::Info);

    // Pages opt in to automatic bootstrap with <body data-annuaire>.
    let Some(body) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    else {
        return;
    };
    if !body.has_attribute(AUTO_ATTRIBUTE) {
        return;
    }

    let region_id = body.get_attribute(REGION_ATTRIBUTE);
    spawn_local(async move {
        PageController::new(SearchPolicy::default())
            .bootstrap(region_id.as_deref())
            .await;
    });
}

/// Loads the dataset, renders `regionId`'s table when given and installs the
/// search box. Resolves to a handle on the loaded directory.
#[wasm_bindgen(js_name = initPage)]
pub async fn init_page(region_id: Option<String>) -> Directory {
    console_log::init(LevelFilter::Info);

    let controller = PageController::new(SearchPolicy::default());
    controller.bootstrap(region_id.as_deref()).await;
    controller.directory()
}

/// Fills `tbodyId` with the remote records whose region matches `regionName`.
#[wasm_bindgen(js_name = initRemotePage)]
pub async fn init_remote_page(endpoint: String, region_name: String, tbody_id: String) {
    console_log::init(LevelFilter::Info);

    page::bootstrap_remote(&endpoint, &region_name, &tbody_id).await;
}
