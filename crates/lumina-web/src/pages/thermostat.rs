//! Thermostat Page

use std::time::Duration;

use chrono::Utc;
use leptos::prelude::*;

use lumina_core::{FlowError, FlowOutcome, FlowPhase, Mode, SessionHook, Thermostat};

use crate::checkout::payment_flow;
use crate::components::{CountdownBadge, PaymentModal, UpgradeCard};

/// Forwards flow transitions into the page's signals
#[derive(Clone, Copy)]
struct SignalHook {
    thermostat: RwSignal<Thermostat>,
    phase: RwSignal<FlowPhase>,
}

impl SessionHook for SignalHook {
    fn premium_granted(&self) {
        self.thermostat.update(|t| t.grant_premium(Utc::now()));
    }

    fn trial_rearmed(&self) {
        self.thermostat.update(|t| t.rearm(Utc::now()));
    }

    fn phase_changed(&self, phase: FlowPhase) {
        self.phase.set(phase);
    }
}

#[component]
pub fn ThermostatPage() -> impl IntoView {
    let thermostat = RwSignal::new(Thermostat::new(Utc::now()));
    let phase = RwSignal::new(FlowPhase::Details);
    let error = RwSignal::new(None::<String>);
    let modal_open = RwSignal::new(false);
    let hook = SignalHook { thermostat, phase };

    if let Ok(handle) = set_interval_with_handle(
        move || {
            thermostat.update(|t| {
                let _ = t.tick(Utc::now());
            });
        },
        Duration::from_secs(1),
    ) {
        on_cleanup(move || handle.clear());
    }

    let adjust = move |delta: i32| {
        thermostat.update(|t| {
            if let Err(denied) = t.change_temperature(delta, Utc::now()) {
                leptos::logging::log!("{denied}");
            }
        });
    };

    let select = move |mode: Mode| {
        thermostat.update(|t| {
            if let Err(denied) = t.set_mode(mode, Utc::now()) {
                leptos::logging::log!("{denied}");
            }
        });
    };

    let pay = Callback::new(move |()| {
        error.set(None);
        leptos::task::spawn_local(async move {
            match payment_flow().run(&hook).await {
                Ok(FlowOutcome::Rejected { reason, .. }) => error.set(Some(reason)),
                Ok(FlowOutcome::Granted { .. } | FlowOutcome::Cancelled { .. })
                | Err(FlowError::InProgress) => {}
                Err(e) => error.set(Some(e.user_message().to_string())),
            }
        });
    });

    let close = Callback::new(move |()| {
        payment_flow().reset(&hook);
        error.set(None);
        modal_open.set(false);
    });

    let upgrade = Callback::new(move |()| {
        thermostat.update(Thermostat::dismiss_prompt);
        modal_open.set(true);
    });

    let dismiss = Callback::new(move |()| thermostat.update(Thermostat::dismiss_prompt));

    let modes = [Mode::Hot, Mode::Cool, Mode::Off]
        .into_iter()
        .map(|mode| {
            let class = move || {
                if thermostat.with(|t| t.mode() == mode) {
                    "mode active"
                } else {
                    "mode"
                }
            };
            view! {
                <button class=class on:click=move |_| select(mode)>
                    {mode.as_str().to_owned()}
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="thermostat">
            <header class="header">
                <h1>"Lumina Temp"</h1>
                <CountdownBadge thermostat=thermostat />
            </header>

            <section class="dial">
                <button class="btn-round" on:click=move |_| adjust(-1)>"-"</button>
                <div class="temperature">
                    {move || thermostat.with(|t| format!("{}°C", t.temperature()))}
                </div>
                <button class="btn-round" on:click=move |_| adjust(1)>"+"</button>
            </section>

            <section class="modes">{modes}</section>

            <Show when=move || thermostat.with(|t| t.clock().upgrade_prompt())>
                <UpgradeCard on_upgrade=upgrade on_dismiss=dismiss />
            </Show>

            <button class="btn btn-primary" on:click=move |_| modal_open.set(true)>
                "Go Premium"
            </button>

            <Show when=move || modal_open.get()>
                <PaymentModal phase=phase error=error on_pay=pay on_close=close />
            </Show>
        </div>
    }
}
