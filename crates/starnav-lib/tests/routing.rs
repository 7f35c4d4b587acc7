mod common;

use common::{grid_catalog, star, triangle_graph};
use starnav_lib::{
    distance, find_route, find_routes, Error, NavGraph, RouteConstraints, MAX_EXACT_WAYPOINTS,
};

#[test]
fn direct_jump_beats_detour_in_triangle() {
    let graph = triangle_graph();
    let constraints = RouteConstraints::default().with_max_jump(5.0);
    let route = find_route(&graph, "a", "c", &constraints).expect("route exists");

    assert_eq!(route.star_ids(), vec!["a", "c"]);
    assert_eq!(route.total_distance, 5.0);
}

#[test]
fn tighter_max_jump_forces_detour() {
    let graph = triangle_graph();
    let constraints = RouteConstraints::default().with_max_jump(4.0);
    let route = find_route(&graph, "a", "c", &constraints).expect("route exists");

    assert_eq!(route.star_ids(), vec!["a", "b", "c"]);
    assert_eq!(route.segment_lengths, vec![3.0, 4.0]);
    assert_eq!(route.total_distance, 7.0);
}

#[test]
fn isolated_star_has_no_route() {
    let graph = triangle_graph();
    let err = find_route(&graph, "a", "d", &RouteConstraints::default()).expect_err("isolated");
    assert_eq!(
        err,
        Error::NoRoute {
            start: "a".to_string(),
            goal: "d".to_string()
        }
    );
}

#[test]
fn unknown_endpoint_suggests_alternatives() {
    let stars = vec![star("procyon", 0.0, 0.0, 0.0), star("sirius", 1.0, 0.0, 0.0)];
    let graph = NavGraph::connected(&stars, 2.0).expect("graph builds");
    let err = find_route(&graph, "procyn", "sirius", &RouteConstraints::default())
        .expect_err("unknown start");

    match &err {
        Error::UnknownNode { id, suggestions } => {
            assert_eq!(id, "procyn");
            assert!(suggestions.contains(&"procyon".to_string()));
            assert!(!suggestions.contains(&"sirius".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Did you mean"));
}

#[test]
fn same_star_route_is_single_node() {
    let graph = triangle_graph();
    // Even an isolated star routes to itself.
    let route = find_route(&graph, "d", "d", &RouteConstraints::default()).expect("trivial route");
    assert_eq!(route.star_ids(), vec!["d"]);
    assert_eq!(route.total_distance, 0.0);
    assert_eq!(route.hop_count(), 0);
}

#[test]
fn avoided_star_is_routed_around() {
    let graph = triangle_graph();
    let constraints = RouteConstraints::default().avoiding("b").with_max_jump(4.0);
    let err = find_route(&graph, "a", "c", &constraints).expect_err("only path uses b");
    assert!(err.is_no_route());

    let constraints = RouteConstraints::default().avoiding("b");
    let route = find_route(&graph, "a", "c", &constraints).expect("direct jump");
    assert_eq!(route.star_ids(), vec!["a", "c"]);
}

#[test]
fn min_jump_excludes_short_edges() {
    let graph = triangle_graph();
    // a-b (3) and b-c (4) are both at or under the bound.
    let constraints = RouteConstraints::default().with_min_jump(4.0);
    let err = find_route(&graph, "a", "b", &constraints).expect_err("no long jump reaches b");
    assert!(err.is_no_route());

    // a -> c (5) -> b (4) stays above the bound.
    let route = find_route(&graph, "a", "b", &RouteConstraints::default().with_min_jump(3.5))
        .expect("long way round");
    assert_eq!(route.star_ids(), vec!["a", "c", "b"]);
}

#[test]
fn waypoint_forces_detour() {
    let graph = triangle_graph();
    let constraints = RouteConstraints::default().visiting("b");
    let route = find_route(&graph, "a", "c", &constraints).expect("route exists");
    assert_eq!(route.star_ids(), vec!["a", "b", "c"]);
    assert_eq!(route.total_distance, 7.0);
}

#[test]
fn unreachable_waypoint_has_no_route() {
    let graph = triangle_graph();
    let constraints = RouteConstraints::default().visiting("d");
    assert!(find_route(&graph, "a", "c", &constraints)
        .expect_err("d is isolated")
        .is_no_route());
}

#[test]
fn waypoints_in_any_order_give_optimal_route() {
    let graph = NavGraph::connected(&grid_catalog(4), 1.0).expect("graph builds");
    let forward = RouteConstraints::default()
        .visiting("g0-3")
        .visiting("g3-0");
    let reversed = RouteConstraints::default()
        .visiting("g3-0")
        .visiting("g0-3");

    let first = find_route(&graph, "g0-0", "g3-3", &forward).expect("route exists");
    let second = find_route(&graph, "g0-0", "g3-3", &reversed).expect("route exists");

    // Out to one corner, back across, and out to the other: 3 + 6 + 3.
    assert_eq!(first.total_distance, 12.0);
    assert_eq!(first.star_ids(), second.star_ids());
}

#[test]
fn many_waypoints_still_visit_every_star() {
    let graph = NavGraph::connected(&grid_catalog(4), 1.0).expect("graph builds");
    let mut constraints = RouteConstraints::default();
    let waypoints: Vec<String> = (0..4)
        .flat_map(|row| (0..4).map(move |col| format!("g{row}-{col}")))
        .filter(|id| id != "g0-0" && id != "g3-3")
        .take(MAX_EXACT_WAYPOINTS + 2)
        .collect();
    for id in &waypoints {
        constraints = constraints.visiting(id.clone());
    }

    let route = find_route(&graph, "g0-0", "g3-3", &constraints).expect("route exists");
    for id in &waypoints {
        assert!(route.star_ids().contains(&id.as_str()), "{id} missing");
    }
    assert_eq!(route.start().map(|stop| stop.id.as_str()), Some("g0-0"));
    assert_eq!(route.goal().map(|stop| stop.id.as_str()), Some("g3-3"));
}

#[test]
fn equal_length_routes_are_chosen_deterministically() {
    let graph = NavGraph::connected(&grid_catalog(3), 1.0).expect("graph builds");
    let first = find_route(&graph, "g0-0", "g2-2", &RouteConstraints::default()).expect("route");
    for _ in 0..10 {
        let again =
            find_route(&graph, "g0-0", "g2-2", &RouteConstraints::default()).expect("route");
        assert_eq!(again.node_indices(), first.node_indices());
    }
    // Lowest index sequence among the six equal routes: along the first row.
    assert_eq!(first.node_indices(), vec![0, 1, 2, 5, 8]);
}

#[test]
fn equal_distance_prefers_fewer_jumps() {
    let stars = vec![
        star("a", 0.0, 0.0, 0.0),
        star("b", 1.0, 0.0, 0.0),
        star("c", 2.0, 0.0, 0.0),
    ];
    let graph = NavGraph::connected(&stars, 2.0).expect("graph builds");
    let route = find_route(&graph, "a", "c", &RouteConstraints::default()).expect("route");

    // a -> b -> c is also 2.0 and has the smaller index sequence.
    assert_eq!(route.star_ids(), vec!["a", "c"]);
    assert_eq!(route.total_distance, 2.0);
    assert_eq!(route.hop_count(), 1);

    let routes =
        find_routes(&graph, "a", "c", &RouteConstraints::default(), 2).expect("routes exist");
    assert_eq!(routes[0].star_ids(), vec!["a", "c"]);
    assert_eq!(routes[1].star_ids(), vec!["a", "b", "c"]);
}

#[test]
fn total_distance_is_sum_of_jumps() {
    let graph = NavGraph::connected(&grid_catalog(5), 1.5).expect("graph builds");
    let route = find_route(&graph, "g0-0", "g4-3", &RouteConstraints::default()).expect("route");
    let summed: f64 = route
        .stops
        .windows(2)
        .map(|pair| distance(pair[0].coordinates, pair[1].coordinates))
        .sum();
    assert!((route.total_distance - summed).abs() < 1e-12);
}

#[test]
fn ranked_routes_start_with_best() {
    let graph = triangle_graph();
    let routes =
        find_routes(&graph, "a", "c", &RouteConstraints::default(), 3).expect("routes exist");

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].star_ids(), vec!["a", "c"]);
    assert_eq!(routes[1].star_ids(), vec!["a", "b", "c"]);

    let best = find_route(&graph, "a", "c", &RouteConstraints::default()).expect("route");
    assert!(routes[0].same_course(&best));
}

#[test]
fn ranked_routes_report_no_route() {
    let graph = triangle_graph();
    let err = find_routes(&graph, "a", "d", &RouteConstraints::default(), 2).expect_err("none");
    assert!(err.is_no_route());
}
