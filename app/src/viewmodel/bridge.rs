use std::{net::SocketAddr, sync::Arc, thread};

use serde::Deserialize;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::mpsc::UnboundedReceiver;
use warp::Filter;

use notifycore::geo::Coordinate;
use notifycore::prelude::LocationFix;

use crate::search::Completion;
use crate::viewmodel::view_model::ContentViewModel;

fn bridge_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

#[derive(Debug, Deserialize)]
struct SearchBody {
    text: String,
}

#[derive(Debug, Deserialize)]
struct SelectBody {
    index: usize,
}

#[derive(Debug, Deserialize)]
struct FixBody {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    timestamp: f64,
}

/// Bridge that publishes view state over localhost and accepts the
/// interactions a map UI would send.
pub struct ViewBridge {
    view_model: Arc<ContentViewModel>,
}

impl ViewBridge {
    pub fn new(view_model: Arc<ContentViewModel>) -> Self {
        Self { view_model }
    }

    /// Hosts the routes on a dedicated thread with its own runtime and
    /// pumps completer batches into the view-model. Runs until the
    /// process exits.
    pub fn serve_in_background(&self, mut results_rx: UnboundedReceiver<Vec<Completion>>) {
        let view_model = self.view_model.clone();
        thread::spawn(move || {
            let vm_filter = {
                let view_model = view_model.clone();
                warp::any().map(move || view_model.clone())
            };

            let state_route = warp::path("state")
                .and(warp::get())
                .and(vm_filter.clone())
                .map(|vm: Arc<ContentViewModel>| warp::reply::json(&vm.snapshot()));

            let search_route = warp::path("search")
                .and(warp::post())
                .and(warp::body::json())
                .and(vm_filter.clone())
                .map(|body: SearchBody, vm: Arc<ContentViewModel>| {
                    vm.on_search_location(&body.text);
                    warp::reply::json(&json!({"status": "ok"}))
                });

            let select_route = warp::path("select")
                .and(warp::post())
                .and(warp::body::json())
                .and(vm_filter.clone())
                .and_then(
                    |body: SelectBody, vm: Arc<ContentViewModel>| async move {
                        if vm.on_location_tap(body.index) {
                            Ok::<_, warp::Rejection>(warp::reply::json(&json!({
                                "status": "ok",
                                "pins": vm.snapshot().pins.len(),
                            })))
                        } else {
                            Err(warp::reject::custom(WarpError))
                        }
                    },
                );

            let alarm_route = warp::path("alarm")
                .and(warp::post())
                .and(vm_filter.clone())
                .and_then(|vm: Arc<ContentViewModel>| async move {
                    vm.set_alarm().await;
                    Ok::<_, warp::Rejection>(warp::reply::json(&json!({
                        "status": vm.snapshot().status,
                    })))
                });

            let fix_route = warp::path("fix")
                .and(warp::post())
                .and(warp::body::json())
                .and(vm_filter)
                .and_then(|body: FixBody, vm: Arc<ContentViewModel>| async move {
                    let fix = LocationFix::new(
                        Coordinate::new(body.latitude, body.longitude),
                        body.timestamp,
                    );
                    let delivered = vm.ingest_fix(fix).await;
                    Ok::<_, warp::Rejection>(warp::reply::json(&json!({
                        "status": "ok",
                        "delivered": delivered,
                    })))
                });

            let routes = state_route
                .or(search_route)
                .or(select_route)
                .or(alarm_route)
                .or(fix_route);

            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                let pump_vm = view_model.clone();
                tokio::spawn(async move {
                    while let Some(batch) = results_rx.recv().await {
                        pump_vm.apply_completions(batch);
                    }
                });
                warp::serve(routes).run(bridge_bind_address()).await;
            });
        });
    }

    pub fn publish_status(&self, message: &str) {
        println!("[UI] {}", message);
    }
}
