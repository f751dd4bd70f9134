//! JSON API over the climate service.
//!
//! `GET /api/report?q=<query>&year=<year>` runs a full location load and
//! returns the session plus rendered panels. `GET /api/session` returns
//! the latest applied session. Loads superseded by a newer request are
//! reported but never applied.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    panels::PanelReport, projection::START_YEAR, service::ClimateService, session::Session,
};

pub struct WebServerConfig {
    pub host: String,
    pub port: u16,
}

struct AppState {
    service: ClimateService,
    latest: Mutex<Option<Session>>,
}

pub async fn run(config: WebServerConfig, service: ClimateService) -> Result<()> {
    let state = Arc::new(AppState {
        service,
        latest: Mutex::new(None),
    });

    let router = Router::new()
        .route("/api/report", get(report))
        .route("/api/session", get(latest_session))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(%addr, "genmap API listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}

fn default_year() -> i32 {
    START_YEAR
}

#[derive(Debug, Deserialize)]
struct ReportParams {
    q: String,
    #[serde(default = "default_year")]
    year: i32,
}

#[derive(Serialize)]
struct ReportEnvelope {
    year: i32,
    superseded: bool,
    session: Option<Session>,
    panels: Vec<PanelReport>,
}

async fn report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Json<ReportEnvelope> {
    match state.service.load_location(&params.q).await {
        Some(session) => {
            let panels = state.service.render_panels(&session, params.year);
            {
                let mut guard = state.latest.lock().expect("latest session lock poisoned");
                *guard = Some(session.clone());
            }
            Json(ReportEnvelope {
                year: params.year,
                superseded: false,
                session: Some(session),
                panels,
            })
        }
        None => Json(ReportEnvelope {
            year: params.year,
            superseded: true,
            session: None,
            panels: Vec::new(),
        }),
    }
}

async fn latest_session(State(state): State<Arc<AppState>>) -> Json<Option<Session>> {
    let guard = state.latest.lock().expect("latest session lock poisoned");
    Json(guard.clone())
}
