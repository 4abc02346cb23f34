//! Browser Checkout Bindings
//!
//! The Razorpay widget is a global constructor installed by its script.
//! It is reached through `Reflect` so no extern declarations are needed.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use lumina_core::{
    CheckoutOptions, CheckoutOutcome, CheckoutWidget, FlowError, PaymentFlow, PaymentReceipt, Timer,
};

use crate::api::HttpBackend;

/// Flow wired to the real widget, server and clock
pub type BrowserFlow = PaymentFlow<RazorpayWidget, HttpBackend, BrowserTimer>;

thread_local! {
    static FLOW: Rc<BrowserFlow> = Rc::new(PaymentFlow::new(
        RazorpayWidget::default(),
        HttpBackend::from_window(),
        BrowserTimer,
    ));
}

/// The page-wide payment flow
pub fn payment_flow() -> Rc<BrowserFlow> {
    FLOW.with(Rc::clone)
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn window() -> Result<web_sys::Window, FlowError> {
    web_sys::window().ok_or_else(|| FlowError::Widget("no window".into()))
}

/// Capture a promise's resolver so callbacks can settle it later
fn deferred() -> Result<(Promise, Function), FlowError> {
    let mut slot = None;
    let promise = Promise::new(&mut |resolve, _reject| slot = Some(resolve));
    let resolve = slot.ok_or_else(|| FlowError::Widget("promise executor did not run".into()))?;
    Ok((promise, resolve))
}

/// Drives the global `Razorpay` constructor; holds the live instance while open
#[derive(Default)]
pub struct RazorpayWidget {
    instance: RefCell<Option<JsValue>>,
}

#[async_trait(?Send)]
impl CheckoutWidget for RazorpayWidget {
    async fn load_script(&self, src: &str) -> lumina_core::Result<()> {
        let load = |e: JsValue| FlowError::AssetLoad(describe(&e));

        let document = window()?
            .document()
            .ok_or_else(|| FlowError::AssetLoad("no document".into()))?;
        let script: web_sys::HtmlScriptElement = document
            .create_element("script")
            .map_err(load)?
            .dyn_into()
            .map_err(|e: web_sys::Element| load(e.into()))?;
        script.set_src(src);
        script.set_async(true);

        let loaded = Promise::new(&mut |resolve, reject| {
            script.set_onload(Some(&resolve));
            script.set_onerror(Some(&reject));
        });

        let head = document
            .head()
            .ok_or_else(|| FlowError::AssetLoad("no <head>".into()))?;
        head.append_child(&script).map_err(load)?;

        JsFuture::from(loaded)
            .await
            .map_err(|_| FlowError::AssetLoad(format!("{src} failed to load")))?;
        Ok(())
    }

    async fn open(&self, options: CheckoutOptions) -> lumina_core::Result<CheckoutOutcome> {
        let widget = |e: JsValue| FlowError::Widget(describe(&e));

        let json = serde_json::to_string(&options).map_err(|e| FlowError::Widget(e.to_string()))?;
        let js_options = js_sys::JSON::parse(&json).map_err(widget)?;

        let (settled, resolve) = deferred()?;

        let on_paid = resolve.clone();
        let handler = Closure::once_into_js(move |response: JsValue| {
            let _ = on_paid.call1(&JsValue::NULL, &response);
        });
        Reflect::set(&js_options, &"handler".into(), &handler).map_err(widget)?;

        let on_dismiss = resolve;
        let ondismiss = Closure::once_into_js(move || {
            let _ = on_dismiss.call1(&JsValue::NULL, &JsValue::NULL);
        });
        let modal = Object::new();
        Reflect::set(&modal, &"ondismiss".into(), &ondismiss).map_err(widget)?;
        Reflect::set(&js_options, &"modal".into(), &modal).map_err(widget)?;

        let win = window()?;
        let constructor: Function = Reflect::get(&win, &"Razorpay".into())
            .map_err(widget)?
            .dyn_into()
            .map_err(|_| FlowError::Widget("Razorpay is not loaded".into()))?;
        let instance =
            Reflect::construct(&constructor, &Array::of1(&js_options)).map_err(widget)?;
        let open: Function = Reflect::get(&instance, &"open".into())
            .map_err(widget)?
            .dyn_into()
            .map_err(|_| FlowError::Widget("Razorpay.open is missing".into()))?;
        open.call0(&instance).map_err(widget)?;
        self.instance.replace(Some(instance));

        let response = JsFuture::from(settled).await;
        self.instance.replace(None);
        let response = response.map_err(widget)?;
        if response.is_null() || response.is_undefined() {
            return Ok(CheckoutOutcome::Dismissed);
        }

        let raw = js_sys::JSON::stringify(&response)
            .map_err(widget)?
            .as_string()
            .unwrap_or_default();
        let receipt: PaymentReceipt =
            serde_json::from_str(&raw).map_err(|e| FlowError::Widget(e.to_string()))?;

        Ok(CheckoutOutcome::Paid(receipt))
    }

    fn close(&self) {
        let Some(instance) = self.instance.take() else {
            return;
        };
        let closed = Reflect::get(&instance, &"close".into())
            .and_then(|close| close.dyn_into::<Function>())
            .and_then(|close| close.call0(&instance));
        if let Err(e) = closed {
            leptos::logging::warn!("Razorpay.close failed: {}", describe(&e));
        }
    }
}

/// `setTimeout`-backed delays
pub struct BrowserTimer;

/// Clears its timeout when the sleep future is dropped
struct PendingTimeout(Option<i32>);

impl Drop for PendingTimeout {
    fn drop(&mut self) {
        if let (Some(handle), Some(window)) = (self.0, web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }
}

impl Timer for BrowserTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let mut handle = None;
        let elapsed = Promise::new(&mut |resolve, _reject| {
            handle = web_sys::window().and_then(|window| {
                window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
                    .ok()
            });
        });
        let pending = PendingTimeout(handle);

        async move {
            let _pending = pending;
            let _ = JsFuture::from(elapsed).await;
        }
        .boxed_local()
    }
}
