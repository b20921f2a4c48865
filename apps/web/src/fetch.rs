use annuaire::{Fetch, LoadError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// `window.fetch` transport. Relative paths stay same-origin.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserFetcher;

fn js_reason(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl Fetch for BrowserFetcher {
    async fn get_text(&self, url: &str) -> Result<String, LoadError> {
        let Some(window) = web_sys::window() else {
            return Err(LoadError::fetch(url, "no window"));
        };

        let opts = RequestInit::new();
        opts.set_method("GET");
        if url.contains("://") {
            opts.set_mode(RequestMode::Cors);
        } else {
            opts.set_mode(RequestMode::SameOrigin);
        }

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|e| LoadError::fetch(url, js_reason(&e)))?;

        let response_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| LoadError::fetch(url, js_reason(&e)))?;

        let Ok(response) = response_value.dyn_into::<Response>() else {
            return Err(LoadError::fetch(url, "not a Response"));
        };
        if !response.ok() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body = response
            .text()
            .map_err(|e| LoadError::fetch(url, js_reason(&e)))?;
        let text = JsFuture::from(body)
            .await
            .map_err(|e| LoadError::fetch(url, js_reason(&e)))?;

        text.as_string()
            .ok_or_else(|| LoadError::fetch(url, "body is not text"))
    }
}
