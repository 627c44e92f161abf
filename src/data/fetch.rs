use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::LoadError;

fn js_message(value: &JsValue) -> String {
	value
		.dyn_ref::<js_sys::Error>()
		.map(|err| String::from(err.message()))
		.or_else(|| value.as_string())
		.unwrap_or_else(|| format!("{value:?}"))
}

/// GETs `url` and returns the body as text. Non-2xx answers are errors.
pub async fn fetch_text(url: &str) -> Result<String, LoadError> {
	let window = web_sys::window().ok_or(LoadError::NoWindow)?;
	let failed = |err: JsValue| LoadError::Fetch {
		url: url.to_string(),
		message: js_message(&err),
	};

	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(failed)?
		.dyn_into()
		.map_err(failed)?;
	if !response.ok() {
		return Err(LoadError::Status {
			url: url.to_string(),
			status: response.status(),
		});
	}

	let body = JsFuture::from(response.text().map_err(failed)?)
		.await
		.map_err(failed)?;
	body.as_string().ok_or_else(|| LoadError::Fetch {
		url: url.to_string(),
		message: "response body is not text".into(),
	})
}
