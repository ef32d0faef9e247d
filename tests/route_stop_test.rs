use transit_console::backend::{RouteStopActor, RouteStopClient};
use transit_console::framework::{ModeKind, WorkflowError};
use transit_console::model::{RouteId, RouteInfo};
use transit_console::runtime::{ConsoleConfig, ConsoleSystem};
use transit_console::sequence::{
    Flow, RouteStopService, SaveOutcome, SequenceEditor, StopSearch,
};

fn routes() -> Vec<RouteInfo> {
    vec![
        RouteInfo::new(1, "Harbour Line"),
        RouteInfo::new(2, "Airport Express"),
        RouteInfo::new(3, "Airport Shuttle"),
    ]
}

fn spawn() -> RouteStopClient {
    let (actor, client) = RouteStopActor::new(16, routes());
    tokio::spawn(actor.run());
    client
}

async fn add_route(service: &RouteStopClient, route: u32, names: &[&str]) {
    let mut editor = SequenceEditor::new();
    editor
        .select_route(service, RouteId(route), Flow::Add)
        .await
        .unwrap();
    for name in names {
        editor.append_stop(name).unwrap();
    }
    editor.save(service).await.unwrap();
}

#[tokio::test]
async fn reordered_stops_persist_in_on_screen_order() {
    let service = spawn();
    let mut editor = SequenceEditor::new();
    editor
        .select_route(&service, RouteId(1), Flow::Add)
        .await
        .unwrap();
    editor.append_stop("Main St").unwrap();
    editor.append_stop("2nd Ave").unwrap();
    editor.append_stop("3rd Ave").unwrap();
    editor.move_up(2).unwrap();

    assert_eq!(editor.save(&service).await.unwrap(), SaveOutcome::Saved(3));

    let stored = service.get_stops_by_route(RouteId(1)).await.unwrap();
    assert_eq!(stored.names(), vec!["Main St", "3rd Ave", "2nd Ave"]);
    let orders: Vec<u32> = stored.stops.iter().map(|s| s.stop_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[tokio::test]
async fn update_flow_rewrites_whole_route() {
    let service = spawn();
    add_route(&service, 1, &["Depot", "Market", "Pier", "Lighthouse"]).await;

    let mut editor = SequenceEditor::new();
    editor
        .select_route(&service, RouteId(1), Flow::Update)
        .await
        .unwrap();
    editor.remove_stop(1).unwrap();
    editor.move_down(0).unwrap();
    editor.rename_stop(2, "Old Lighthouse").unwrap();
    editor.append_stop("Ferry Terminal").unwrap();
    editor.save(&service).await.unwrap();

    let stored = service.get_stops_by_route(RouteId(1)).await.unwrap();
    assert_eq!(
        stored.names(),
        vec!["Pier", "Depot", "Old Lighthouse", "Ferry Terminal"]
    );
    assert!(stored.is_contiguous());
}

#[tokio::test]
async fn update_flow_can_remove_every_stop() {
    let service = spawn();
    add_route(&service, 1, &["Depot", "Market"]).await;

    let mut editor = SequenceEditor::new();
    editor
        .select_route(&service, RouteId(1), Flow::Update)
        .await
        .unwrap();
    editor.remove_stop(1).unwrap();
    editor.remove_stop(0).unwrap();

    assert_eq!(editor.save(&service).await.unwrap(), SaveOutcome::Saved(0));
    assert!(!editor.is_bound());
    assert!(service.find_all().await.unwrap().is_empty());

    // With nothing stored the route goes back to the add flow.
    let err = editor
        .select_route(&service, RouteId(1), Flow::Update)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));
    add_route(&service, 1, &["Pier"]).await;
    let stored = service.get_stops_by_route(RouteId(1)).await.unwrap();
    assert_eq!(stored.names(), vec!["Pier"]);
}

#[tokio::test]
async fn update_flow_needs_existing_stops() {
    let service = spawn();
    let mut editor = SequenceEditor::new();

    let err = editor
        .select_route(&service, RouteId(2), Flow::Update)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::NotFound(_)));
    assert!(!editor.is_bound());
}

#[tokio::test]
async fn concurrent_editors_conflict_instead_of_clobbering() {
    let service = spawn();
    add_route(&service, 1, &["Depot", "Market", "Pier"]).await;

    let mut first = SequenceEditor::new();
    let mut second = SequenceEditor::new();
    first
        .select_route(&service, RouteId(1), Flow::Update)
        .await
        .unwrap();
    second
        .select_route(&service, RouteId(1), Flow::Update)
        .await
        .unwrap();

    first.move_down(0).unwrap();
    first.save(&service).await.unwrap();

    second.remove_stop(2).unwrap();
    let err = second.save(&service).await.unwrap_err();

    assert!(matches!(err, WorkflowError::ConflictOrConstraint(_)));
    assert_eq!(second.names(), vec!["Depot", "Market"]);
    let stored = service.get_stops_by_route(RouteId(1)).await.unwrap();
    assert_eq!(stored.names(), vec!["Market", "Depot", "Pier"]);

    // Reloading picks up the new baseline and the retry goes through.
    second
        .select_route(&service, RouteId(1), Flow::Update)
        .await
        .unwrap();
    second.remove_stop(2).unwrap();
    second.save(&service).await.unwrap();
    let stored = service.get_stops_by_route(RouteId(1)).await.unwrap();
    assert_eq!(stored.names(), vec!["Market", "Depot"]);
}

#[tokio::test]
async fn screen_find_groups_by_route() {
    let system = ConsoleSystem::new(ConsoleConfig::default().with_routes(routes()));
    let service = system.route_stops.clone();
    add_route(&service, 2, &["Central", "Terminal 1"]).await;
    add_route(&service, 3, &["Central", "Hotel Row", "Terminal 2"]).await;
    add_route(&service, 1, &["Depot"]).await;

    let mut screen = system.route_stop_screen();
    screen.select_mode(ModeKind::Find);
    let count = screen
        .find(&service, StopSearch::ByRouteName("AIRPORT".into()))
        .await
        .unwrap();

    assert_eq!(count, 5);
    let groups: Vec<_> = screen
        .results()
        .iter()
        .map(|g| (g.route_id, g.names()))
        .collect();
    assert_eq!(
        groups,
        vec![
            (RouteId(2), vec!["Central", "Terminal 1"]),
            (RouteId(3), vec!["Central", "Hotel Row", "Terminal 2"]),
        ]
    );

    drop(service);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn screen_add_flow_requires_a_stop_and_then_saves() {
    let system = ConsoleSystem::new(ConsoleConfig::default().with_routes(routes()));
    let service = system.route_stops.clone();
    let mut screen = system.route_stop_screen();

    screen.select_mode(ModeKind::Create);
    screen.choose_route(&service, RouteId(3)).await.unwrap();
    let err = screen.save(&service).await.unwrap_err();
    assert!(err.is_local());
    assert_eq!(screen.mode(), ModeKind::Create);
    assert_eq!(screen.last_error(), Some(&err));

    screen.editor_mut().append_stop("Hotel Row").unwrap();
    screen.save(&service).await.unwrap();
    assert_eq!(screen.mode(), ModeKind::Idle);

    screen.select_mode(ModeKind::Delete);
    let stop_id = service.find_all().await.unwrap()[0].stop_id;
    screen.set_stop_id(stop_id.to_string()).unwrap();
    screen.delete_stop(&service).await.unwrap();
    assert!(screen.results().is_empty());

    drop(service);
    system.shutdown().await.unwrap();
}
