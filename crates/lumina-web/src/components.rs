//! UI Components

use leptos::prelude::*;
use lumina_core::{FlowPhase, Thermostat, pricing};

/// Plan label and countdown; turns red in the last minute
#[component]
pub fn CountdownBadge(thermostat: RwSignal<Thermostat>) -> impl IntoView {
    let class = move || {
        if thermostat.with(Thermostat::running_low) {
            "countdown countdown-low"
        } else {
            "countdown"
        }
    };
    let plan = move || {
        if thermostat.with(|t| t.clock().session().balance_paid) {
            "Premium"
        } else {
            "Free trial"
        }
    };

    view! {
        <div class=class>
            <span class="plan">{plan}</span>
            <span class="time">{move || thermostat.with(Thermostat::countdown)}</span>
        </div>
    }
}

/// Shown after the access window lapses
#[component]
pub fn UpgradeCard(on_upgrade: Callback<()>, on_dismiss: Callback<()>) -> impl IntoView {
    view! {
        <div class="upgrade-card">
            <h3>"Your session has ended"</h3>
            <p>
                {format!(
                    "Unlock {} minutes of temperature control for ₹{}.",
                    pricing::PREMIUM_WINDOW_MINUTES,
                    pricing::PREMIUM_PRICE_INR,
                )}
            </p>
            <button class="btn btn-primary" on:click=move |_| on_upgrade.run(())>
                "Upgrade"
            </button>
            <button class="btn" on:click=move |_| on_dismiss.run(())>
                "Not now"
            </button>
        </div>
    }
}

#[component]
pub fn PaymentModal(
    phase: RwSignal<FlowPhase>,
    error: RwSignal<Option<String>>,
    on_pay: Callback<()>,
    on_close: Callback<()>,
) -> impl IntoView {
    let body = move || match phase.get() {
        FlowPhase::Details => view! {
            <div class="modal-body">
                <h2>{pricing::PRODUCT_NAME}</h2>
                <p>{pricing::PRODUCT_DESCRIPTION}</p>
                <div class="price">{format!("₹{}", pricing::PREMIUM_PRICE_INR)}</div>
                <Show when=move || error.with(Option::is_some)>
                    <p class="error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <button class="btn btn-primary" on:click=move |_| on_pay.run(())>
                    {format!("Pay ₹{}", pricing::PREMIUM_PRICE_INR)}
                </button>
                <button class="btn" on:click=move |_| on_close.run(())>
                    "Cancel"
                </button>
            </div>
        }
        .into_any(),
        FlowPhase::Processing => view! {
            <div class="modal-body processing">
                <div class="spinner"></div>
                <p>"Processing payment..."</p>
            </div>
        }
        .into_any(),
        FlowPhase::Success => view! {
            <div class="modal-body success">
                <h2>"Payment successful"</h2>
                <p>"Premium access is active for the next hour."</p>
                <button class="btn btn-primary" on:click=move |_| on_close.run(())>
                    "Continue"
                </button>
            </div>
        }
        .into_any(),
    };

    view! {
        <div class="modal-backdrop">
            <div class="modal">{body}</div>
        </div>
    }
}
