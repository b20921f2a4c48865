use std::cell::RefCell;
use std::rc::Rc;

use annuaire::render::{render_nav, render_search_results, render_structure_table};
use annuaire::DatasetStore;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Handle on the page's dataset store for other scripts.
#[wasm_bindgen]
pub struct Directory {
    store: Rc<RefCell<DatasetStore>>,
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(Into::into)
}

impl Directory {
    pub const fn new(store: Rc<RefCell<DatasetStore>>) -> Self {
        Self { store }
    }
}

#[wasm_bindgen]
impl Directory {
    #[wasm_bindgen(js_name = isLoaded)]
    pub fn is_loaded(&self) -> bool {
        self.store.borrow().is_loaded()
    }

    pub fn regions(&self) -> Result<JsValue, JsValue> {
        to_js(self.store.borrow().get_regions())
    }

    pub fn region(&self, id: &str) -> Result<JsValue, JsValue> {
        to_js(&self.store.borrow().get_region(id))
    }

    pub fn structures(&self, id: &str) -> Result<JsValue, JsValue> {
        to_js(self.store.borrow().get_structures_by_region(id))
    }

    pub fn search(&self, term: &str) -> Result<JsValue, JsValue> {
        to_js(&self.store.borrow().search_structure(term))
    }

    pub fn stats(&self) -> Result<JsValue, JsValue> {
        to_js(&self.store.borrow().get_stats())
    }

    #[wasm_bindgen(js_name = tableHtml)]
    pub fn table_html(&self, id: &str) -> String {
        render_structure_table(self.store.borrow().get_structures_by_region(id))
    }

    #[wasm_bindgen(js_name = navHtml)]
    pub fn nav_html(&self) -> String {
        render_nav(self.store.borrow().get_regions())
    }

    #[wasm_bindgen(js_name = searchHtml)]
    pub fn search_html(&self, term: &str) -> String {
        render_search_results(&self.store.borrow().search_structure(term))
    }
}
