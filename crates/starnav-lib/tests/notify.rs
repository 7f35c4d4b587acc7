mod common;

use std::sync::{Arc, Mutex};

use common::{triangle_catalog, triangle_graph};
use starnav_lib::{
    find_route, ManualRoute, NavGraph, RouteBook, RouteChange, RouteConstraints, RouteDescriptor,
    RouteListener,
};

#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<(String, Vec<String>, f64)>>,
}

impl EventLog {
    fn record(&self, kind: &str, route: &RouteDescriptor) {
        let stars = route.star_ids().into_iter().map(str::to_string).collect();
        self.events
            .lock()
            .expect("lock")
            .push((kind.to_string(), stars, route.total_distance));
    }

    fn kinds(&self) -> Vec<String> {
        self.events
            .lock()
            .expect("lock")
            .iter()
            .map(|(kind, _, _)| kind.clone())
            .collect()
    }
}

impl RouteListener for EventLog {
    fn on_route_created(&self, route: &RouteDescriptor) {
        self.record("created", route);
    }

    fn on_route_updated(&self, route: &RouteDescriptor) {
        self.record("updated", route);
    }

    fn on_route_deleted(&self, route: &RouteDescriptor) {
        self.record("deleted", route);
    }
}

/// Listener that only cares about deletions.
#[derive(Default)]
struct DeletionCounter(Mutex<usize>);

impl RouteListener for DeletionCounter {
    fn on_route_deleted(&self, _route: &RouteDescriptor) {
        *self.0.lock().expect("lock") += 1;
    }
}

#[test]
fn searched_route_lifecycle() {
    let graph = triangle_graph();
    let log = Arc::new(EventLog::default());
    let mut book = RouteBook::new();
    book.subscribe(log.clone());

    let route = find_route(&graph, "a", "c", &RouteConstraints::default()).expect("route");
    let id = route.id;
    assert_eq!(book.publish(route), RouteChange::Created);

    // Re-running the search under a tighter limit changes the course.
    let detour = find_route(
        &graph,
        "a",
        "c",
        &RouteConstraints::default().with_max_jump(4.0),
    )
    .expect("route")
    .with_id(id);
    assert_eq!(book.publish(detour.clone()), RouteChange::Updated);
    assert_eq!(book.publish(detour), RouteChange::Unchanged);

    assert!(book.remove(id).is_some());
    assert!(book.remove(id).is_none());

    assert_eq!(log.kinds(), vec!["created", "updated", "deleted"]);
    let events = log.events.lock().expect("lock");
    assert_eq!(events[1].1, vec!["a", "b", "c"]);
    assert_eq!(events[1].2, 7.0);
}

#[test]
fn reordered_catalog_republish_is_unchanged() {
    let graph = triangle_graph();
    let log = Arc::new(EventLog::default());
    let mut book = RouteBook::new();
    book.subscribe(log.clone());

    let constraints = RouteConstraints::default().with_max_jump(4.0);
    let route = find_route(&graph, "a", "c", &constraints).expect("route");
    let id = route.id;
    assert_eq!(book.publish(route), RouteChange::Created);

    let mut reversed = triangle_catalog();
    reversed.reverse();
    let rebuilt = NavGraph::connected(&reversed, 5.0).expect("graph builds");
    let again = find_route(&rebuilt, "a", "c", &constraints)
        .expect("route")
        .with_id(id);
    assert_ne!(again.node_indices(), vec![0, 1, 2]);
    assert_eq!(book.publish(again), RouteChange::Unchanged);

    assert_eq!(log.kinds(), vec!["created"]);
}

#[test]
fn manual_edits_publish_updates() {
    let graph = triangle_graph();
    let log = Arc::new(EventLog::default());
    let deletions = Arc::new(DeletionCounter::default());
    let mut book = RouteBook::new();
    book.subscribe(log.clone());
    book.subscribe(deletions.clone());

    let mut manual = ManualRoute::start(&graph, "a").expect("start");
    manual.push(&graph, "b").expect("push");
    book.publish(manual.finish().expect("finish"));

    manual.push(&graph, "d").expect("push");
    book.publish(manual.finish().expect("finish"));

    // Renaming alone is not a change worth announcing.
    manual.set_name("Scenic tour");
    assert_eq!(
        book.publish(manual.finish().expect("finish")),
        RouteChange::Unchanged
    );
    assert_eq!(book.get(manual.id()).map(|r| r.name.as_str()), Some("Scenic tour"));

    book.clear();
    assert_eq!(log.kinds(), vec!["created", "updated", "deleted"]);
    assert_eq!(*deletions.0.lock().expect("lock"), 1);
}

#[test]
fn listeners_added_later_miss_earlier_events() {
    let graph = triangle_graph();
    let mut book = RouteBook::new();
    let route = find_route(&graph, "a", "b", &RouteConstraints::default()).expect("route");
    book.publish(route);

    let late = Arc::new(EventLog::default());
    book.subscribe(late.clone());
    assert_eq!(book.listener_count(), 1);
    book.clear();

    assert_eq!(late.kinds(), vec!["deleted"]);
}
