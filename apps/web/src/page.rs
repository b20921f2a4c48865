use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use annuaire::loader::load_dataset;
use annuaire::render::{render_remote_rows, render_search_box, render_structure_table};
use annuaire::search::Generation;
use annuaire::{DatasetStore, RemoteDirectory, SearchAction, SearchPolicy, SearchSession, DATASET_PATH};
use log::{error, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlInputElement};

use crate::directory::Directory;
use crate::fetch::BrowserFetcher;

const CONTAINER_SELECTOR: &str = "main .container";
const HEADER_SELECTOR: &str = ".site-header";

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Wires the dataset store and the search session to the page.
#[derive(Clone)]
pub struct PageController {
    store: Rc<RefCell<DatasetStore>>,
    session: Rc<RefCell<SearchSession>>,
}

impl PageController {
    pub fn new(policy: SearchPolicy) -> Self {
        Self {
            store: Rc::new(RefCell::new(DatasetStore::new())),
            session: Rc::new(RefCell::new(SearchSession::new(policy))),
        }
    }

    pub fn directory(&self) -> Directory {
        Directory::new(self.store.clone())
    }

    /// Loads the dataset, fills the region table when `region_id` is given,
    /// then installs the search box.
    pub async fn bootstrap(&self, region_id: Option<&str>) {
        // Await without holding a borrow on the store.
        let result = load_dataset(&BrowserFetcher, DATASET_PATH).await;
        self.store.borrow_mut().publish(result);

        if let Some(region_id) = region_id {
            if let Err(e) = self.render_region(region_id) {
                error!("Failed to render region {region_id}: {e:?}");
            }
        }

        if let Err(e) = self.install_search_box() {
            error!("Failed to install search box: {e:?}");
        }
    }

    fn render_region(&self, region_id: &str) -> Result<(), JsValue> {
        let Some(container) = document()?.query_selector(CONTAINER_SELECTOR)? else {
            return Ok(());
        };
        let html = render_structure_table(self.store.borrow().get_structures_by_region(region_id));
        container.set_inner_html(&html);
        Ok(())
    }

    fn install_search_box(&self) -> Result<(), JsValue> {
        let document = document()?;
        let Some(header) = document.query_selector(HEADER_SELECTOR)? else {
            return Ok(());
        };

        let markup = render_search_box(self.session.borrow().policy());
        header.insert_adjacent_html("beforeend", &markup)?;

        let input: HtmlInputElement = document
            .get_element_by_id("searchInput")
            .ok_or_else(|| JsValue::from_str("missing #searchInput"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("#searchInput is not an input"))?;
        let results = document
            .get_element_by_id("searchResults")
            .ok_or_else(|| JsValue::from_str("missing #searchResults"))?;

        let controller = self.clone();
        let on_input = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(input) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            controller.on_input(&results, &input.value());
        });
        input.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        // The listener lives as long as the page.
        on_input.forget();

        Ok(())
    }

    fn on_input(&self, results: &Element, value: &str) {
        let (generation, action) = self.session.borrow_mut().begin(value);
        let delay = self.session.borrow().policy().delay_for(&action);

        match delay {
            Some(delay) => {
                let controller = self.clone();
                let results = results.clone();
                let scheduled = schedule(delay, move || {
                    controller.apply(&results, generation, &action);
                });
                if let Err(e) = scheduled {
                    warn!("Could not debounce search: {e:?}");
                }
            }
            None => self.apply(results, generation, &action),
        }
    }

    fn apply(&self, results: &Element, generation: Generation, action: &SearchAction) {
        let outcome = self
            .session
            .borrow()
            .complete(generation, &self.store.borrow(), action);
        if let Some(outcome) = outcome {
            results.set_inner_html(outcome.html());
        }
    }
}

fn schedule(delay: Duration, callback: impl FnOnce() + 'static) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let callback = Closure::once_into_js(callback);
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)?;
    Ok(())
}

/// Fills the table body `tbody_id` with the remote records of one region.
pub async fn bootstrap_remote(endpoint: &str, region_name: &str, tbody_id: &str) {
    let records = RemoteDirectory::new(endpoint)
        .records_for_region(&BrowserFetcher, region_name)
        .await;

    let tbody = match document() {
        Ok(document) => document.get_element_by_id(tbody_id),
        Err(e) => {
            error!("Failed to reach the document: {e:?}");
            return;
        }
    };
    match tbody {
        Some(tbody) => tbody.set_inner_html(&render_remote_rows(&records)),
        None => warn!("No element #{tbody_id} to render {region_name} into"),
    }
}
