use crate::backend::{RouteStopActor, RouteStopClient, StoreActor, StoreClient};
use crate::framework::Resource;
use crate::model::{
    Alert, Bus, BusAssignment, BusType, CrowdReport, FavouriteRoute, Feedback, User,
};
use crate::runtime::ConsoleConfig;
use crate::sequence::RouteStopScreen;
use crate::session::{SessionActor, SessionClient};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Starts and owns every backend store the console talks to.
///
/// One [`StoreActor`] runs per resource type, plus the route-stop store. Screens are opened
/// on top of the stores with [`open_session`](Self::open_session) or
/// [`route_stop_screen`](Self::route_stop_screen).
///
/// # Example
///
/// ```ignore
/// let system = ConsoleSystem::new(ConsoleConfig::from_env());
/// let buses = system.open_session(system.buses.clone());
/// buses.select_mode(ModeKind::Create).await?;
/// // ...
/// drop(buses);
/// system.shutdown().await?;
/// ```
pub struct ConsoleSystem {
    pub users: StoreClient<User>,
    pub buses: StoreClient<Bus>,
    pub bus_types: StoreClient<BusType>,
    pub alerts: StoreClient<Alert>,
    pub bus_assignments: StoreClient<BusAssignment>,
    pub crowd_reports: StoreClient<CrowdReport>,
    pub feedback: StoreClient<Feedback>,
    pub favourite_routes: StoreClient<FavouriteRoute>,
    pub route_stops: RouteStopClient,
    config: ConsoleConfig,
    handles: Vec<JoinHandle<()>>,
}

impl ConsoleSystem {
    /// Spawns all stores. Must be called from within a Tokio runtime.
    pub fn new(config: ConsoleConfig) -> Self {
        let mut handles = Vec::new();

        let users = spawn_store(&config, &mut handles);
        let buses = spawn_store(&config, &mut handles);
        let bus_types = spawn_store(&config, &mut handles);
        let alerts = spawn_store(&config, &mut handles);
        let bus_assignments = spawn_store(&config, &mut handles);
        let crowd_reports = spawn_store(&config, &mut handles);
        let feedback = spawn_store(&config, &mut handles);
        let favourite_routes = spawn_store(&config, &mut handles);

        let (route_stop_actor, route_stops) =
            RouteStopActor::new(config.store_buffer, config.routes.clone());
        handles.push(tokio::spawn(route_stop_actor.run()));

        info!(stores = handles.len(), routes = config.routes.len(), "Console started");
        Self {
            users,
            buses,
            bus_types,
            alerts,
            bus_assignments,
            crowd_reports,
            feedback,
            favourite_routes,
            route_stops,
            config,
            handles,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Opens a screen session over `store`. The session ends when its last client drops.
    pub fn open_session<T: Resource>(&self, store: StoreClient<T>) -> SessionClient<T> {
        let (actor, client) = SessionActor::new(self.config.session_buffer, Arc::new(store));
        tokio::spawn(actor.run());
        client
    }

    /// A fresh route-stop screen offering the configured routes.
    pub fn route_stop_screen(&self) -> RouteStopScreen {
        RouteStopScreen::new(self.config.routes.clone())
    }

    /// Drops the system's clients and waits for every store to stop.
    ///
    /// Stores only stop once all clients are gone, so sessions and cloned clients must be
    /// dropped first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down console...");
        let Self {
            users,
            buses,
            bus_types,
            alerts,
            bus_assignments,
            crowd_reports,
            feedback,
            favourite_routes,
            route_stops,
            handles,
            ..
        } = self;
        drop((users, buses, bus_types, alerts, bus_assignments));
        drop((crowd_reports, feedback, favourite_routes, route_stops));

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(format!("Store task failed: {:?}", e));
            }
        }

        info!("Console shutdown complete.");
        Ok(())
    }
}

fn spawn_store<T: Resource>(config: &ConsoleConfig, handles: &mut Vec<JoinHandle<()>>) -> StoreClient<T> {
    let (actor, client) = StoreActor::<T>::new(config.store_buffer);
    handles.push(tokio::spawn(actor.run()));
    client
}
