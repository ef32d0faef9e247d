//! Demo walk-through of the console against the in-memory backend.

use transit_console::framework::{ModeKind, SearchMode, WorkflowError};
use transit_console::model::{RouteId, RouteInfo};
use transit_console::runtime::{setup_tracing, ConsoleConfig, ConsoleSystem};
use transit_console::sequence::{RouteStopService, StopSearch};
use transit_console::session::SubmitReceipt;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ConsoleConfig::from_env().with_routes(vec![
        RouteInfo::new(1, "Harbour Line"),
        RouteInfo::new(2, "Airport Express"),
    ]);
    let system = ConsoleSystem::new(config);

    let span = tracing::info_span!("bus_screen");
    async {
        run_bus_screen(&system).await.map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("route_stop_screen");
    let stops = async { run_route_stop_screen(&system).await }
        .instrument(span)
        .await;
    match stops {
        Ok(count) => info!(count, "Route stops listed"),
        Err(e) => error!(error = %e, "Route-stop screen failed"),
    }

    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}

async fn run_bus_screen(system: &ConsoleSystem) -> Result<(), WorkflowError> {
    let screen = system.open_session(system.buses.clone());

    screen.select_mode(ModeKind::Create).await?;
    screen.set_field("bus_number", "NB-1001").await?;
    screen.set_field("seat_capacity", "52").await?;
    screen.set_field("route_id", "1").await?;
    if let SubmitReceipt::Rejected(e) = screen.submit().await? {
        return Err(e);
    }
    let snapshot = screen.settle().await?;
    info!(mode = %snapshot.mode, "Bus created");

    screen.select_mode(ModeKind::Find).await?;
    screen.set_search_mode(SearchMode::All).await?;
    screen.submit().await?;
    let snapshot = screen.settle().await?;
    for bus in &snapshot.results {
        info!(id = %bus.bus_id, number = %bus.bus_number, status = %bus.status, "Bus");
    }
    if let Some(e) = snapshot.last_error {
        return Err(e);
    }
    Ok(())
}

async fn run_route_stop_screen(system: &ConsoleSystem) -> Result<usize, WorkflowError> {
    let service = system.route_stops.clone();
    let mut screen = system.route_stop_screen();

    screen.select_mode(ModeKind::Create);
    screen.choose_route(&service, RouteId(1)).await?;
    for name in ["Depot", "Market", "Pier"] {
        screen.editor_mut().append_stop(name)?;
    }
    screen.editor_mut().move_up(2)?;
    screen.save(&service).await?;

    screen.select_mode(ModeKind::Find);
    let count = screen.find(&service, StopSearch::All).await?;
    for group in screen.results() {
        info!(route = %group.route_name, stops = ?group.names(), "Route");
    }

    let all = service.find_all().await?;
    info!(stored = all.len(), "Stored stops");
    Ok(count)
}
