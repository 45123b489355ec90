//! WebAssembly bindings.
//!
//! Enable with the `wasm` feature:
//!
//! ```toml
//! [dependencies]
//! lww-dict = { version = "0.1", features = ["wasm"] }
//! ```
//!
//! Keys and values are strings; writes are stamped with `Date.now()`.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use wasm_bindgen::prelude::*;

use crate::clock::Clock;

type Inner = crate::LwwElementDict<String, String, u64, String>;

fn js_now() -> u64 {
    js_sys::Date::now() as u64
}

/// A last-write-wins dictionary of strings for use from JavaScript.
#[wasm_bindgen(js_name = LwwDict)]
pub struct WasmLwwDict {
    inner: Inner,
}

#[wasm_bindgen(js_class = LwwDict)]
impl WasmLwwDict {
    /// Create an empty dictionary owned by `peer_id`.
    #[wasm_bindgen(constructor)]
    pub fn new(peer_id: &str) -> Self {
        Self {
            inner: Inner::new(peer_id.to_string(), Clock::new(js_now)),
        }
    }

    /// The peer owning this replica.
    #[wasm_bindgen(js_name = peerId)]
    pub fn peer_id(&self) -> String {
        self.inner.peer_id().clone()
    }

    /// Assign `value` to `key`. Returns `false` if the write lost to an
    /// existing record.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        self.inner.set(key.to_string(), value.to_string())
    }

    /// Remove `key`.
    pub fn remove(&mut self, key: &str) -> bool {
        self.inner.remove(key.to_string())
    }

    /// Get the value for `key`, or `undefined`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    /// Check if `key` is present.
    #[wasm_bindgen(js_name = containsKey)]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of present keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if no key is present.
    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Merge another dictionary's state into this one.
    pub fn merge(&mut self, other: &WasmLwwDict) {
        self.inner.merge(&other.inner);
    }

    /// Compare replicated state, ignoring the owning peer.
    #[wasm_bindgen(js_name = contentEquals)]
    pub fn content_equals(&self, other: &WasmLwwDict) -> bool {
        self.inner.content_eq(&other.inner)
    }

    /// Present keys as a JavaScript array.
    pub fn keys(&self) -> Box<[JsValue]> {
        self.inner
            .keys()
            .map(|k| JsValue::from_str(k))
            .collect::<Vec<_>>()
            .into_boxed_slice()
    }

    /// Present entries formatted as `{key: value, ...}`.
    #[wasm_bindgen(js_name = toString)]
    pub fn to_string_js(&self) -> String {
        self.inner.to_string()
    }
}
