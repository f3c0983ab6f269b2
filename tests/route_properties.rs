use itertools::Itertools;
use rand::{rngs::StdRng, SeedableRng};
use risk_pathfinding::{plan_route, Cell, RiskGrid};
use risk_pathfinding_scenarios::{random_free_cell, random_grid, ScenarioConfig};
use std::thread;

const EPS: f64 = 1e-9;

#[test]
fn start_equals_goal() {
    let grid = RiskGrid::with_layout(
        4,
        4,
        [Cell::new(1, 2)],
        [(Cell::new(2, 2), 0.3), (Cell::new(0, 0), 0.2)],
    )
    .unwrap();
    for row in 0..4 {
        for col in 0..4 {
            let a = Cell::new(row, col);
            let route = plan_route(&grid, Some(a), &[], Some(a));
            if grid.is_blocked(a) {
                assert!(route.is_none());
            } else {
                let route = route.unwrap();
                assert_eq!(route.cells(), &[a]);
                assert_eq!(route.total_cost(&grid), 0.0);
            }
        }
    }
}

/// On a corridor every route has to take the straight line, so each extra risky cell on it can
/// only add to the cost.
#[test]
fn cost_grows_with_risky_cells() {
    const LEN: i32 = 8;
    let start = Cell::new(0, 0);
    let goal = Cell::new(0, LEN - 1);
    let mut last_cost = 0.0;
    for k in 0..LEN {
        let risk = (0..k).map(|col| (Cell::new(0, col), 0.25));
        let grid = RiskGrid::with_layout(1, LEN as usize, [], risk).unwrap();
        let route = plan_route(&grid, Some(start), &[], Some(goal)).unwrap();
        let metrics = route.metrics(&grid);
        assert_eq!(metrics.risky_cells, k as usize);
        assert!(metrics.total_cost >= last_cost);
        last_cost = metrics.total_cost;
    }
}

#[test]
fn repeated_requests_agree() {
    let grid = RiskGrid::with_layout(
        10,
        10,
        (2..8).map(|row| Cell::new(row, 5)),
        (0..10).map(|col| (Cell::new(9, col), 0.6)),
    )
    .unwrap();
    let start = Some(Cell::new(5, 0));
    let goal = Some(Cell::new(5, 9));
    let waypoints = [Cell::new(0, 3)];
    let first = plan_route(&grid, start, &waypoints, goal).unwrap();
    for _ in 0..10 {
        assert_eq!(plan_route(&grid, start, &waypoints, goal).as_ref(), Some(&first));
    }
}

#[test]
fn waypoint_insertion() {
    let grid = RiskGrid::with_layout(
        8,
        8,
        [Cell::new(3, 3), Cell::new(3, 4), Cell::new(4, 3)],
        [(Cell::new(2, 2), 0.5), (Cell::new(5, 5), 0.5)],
    )
    .unwrap();
    let s = Cell::new(0, 0);
    let g = Cell::new(7, 7);
    let direct = plan_route(&grid, Some(s), &[], Some(g)).unwrap();
    for w in direct.iter().copied() {
        let via = plan_route(&grid, Some(s), &[w], Some(g)).unwrap();
        let sum = plan_route(&grid, Some(s), &[], Some(w))
            .unwrap()
            .total_cost(&grid)
            + plan_route(&grid, Some(w), &[], Some(g))
                .unwrap()
                .total_cost(&grid);
        assert!(via.total_cost(&grid) <= sum + EPS);
        assert_eq!(via.iter().filter(|c| **c == w).count(), 1);
    }
}

#[test]
fn blocked_start_or_goal() {
    let blocked = Cell::new(1, 1);
    let grid = RiskGrid::with_layout(3, 3, [blocked], []).unwrap();
    let free = Cell::new(0, 0);
    assert!(plan_route(&grid, Some(blocked), &[], Some(free)).is_none());
    assert!(plan_route(&grid, Some(free), &[], Some(blocked)).is_none());
    assert!(plan_route(&grid, Some(blocked), &[], Some(blocked)).is_none());
}

#[test]
fn diagonal_across_empty_grid() {
    let grid = RiskGrid::new(5, 5).unwrap();
    let route = plan_route(&grid, Some(Cell::new(0, 0)), &[], Some(Cell::new(4, 4))).unwrap();
    assert_eq!(route.len(), 5);
    assert!(route
        .iter()
        .tuple_windows()
        .all(|(a, b)| b.row - a.row == 1 && b.col - a.col == 1));
    assert!((route.total_cost(&grid) - 4.0 * 2f64.sqrt()).abs() < EPS);
}

#[test]
fn full_wall_without_gap() {
    for vertical in [false, true] {
        let wall = (0..7).map(|i| {
            if vertical {
                Cell::new(i, 3)
            } else {
                Cell::new(3, i)
            }
        });
        let grid = RiskGrid::with_layout(7, 7, wall, []).unwrap();
        let (start, goal) = if vertical {
            (Cell::new(3, 0), Cell::new(3, 6))
        } else {
            (Cell::new(0, 3), Cell::new(6, 3))
        };
        assert!(plan_route(&grid, Some(start), &[], Some(goal)).is_none());
    }
}

#[test]
fn single_risky_cell_between_neighbours() {
    // The risky start is charged on the only step of the route
    let grid = RiskGrid::with_layout(1, 2, [], [(Cell::new(0, 0), 2.0)]).unwrap();
    let route = plan_route(&grid, Some(Cell::new(0, 0)), &[], Some(Cell::new(0, 1))).unwrap();
    assert!((route.total_cost(&grid) - (1.0 + 2.0)).abs() < EPS);

    // A risky cell in the middle of a corridor is charged when leaving it
    let grid = RiskGrid::with_layout(1, 3, [], [(Cell::new(0, 1), 2.0)]).unwrap();
    let route = plan_route(&grid, Some(Cell::new(0, 0)), &[], Some(Cell::new(0, 2))).unwrap();
    assert_eq!(route.risky_cells(&grid), 1);
    assert!((route.total_cost(&grid) - (2.0 + 2.0)).abs() < EPS);
}

/// Planning only reads the grid, so threads can share one `&RiskGrid` without locking.
#[test]
fn concurrent_requests_on_shared_grid() {
    let mut rng = StdRng::seed_from_u64(3);
    let grid = random_grid(&ScenarioConfig::default(), &mut rng);
    let mut requests = Vec::new();
    while requests.len() < 16 {
        let mut pick = || random_free_cell(&grid, &mut rng);
        if let (Some(start), Some(w), Some(goal)) = (pick(), pick(), pick()) {
            requests.push((start, vec![w], goal));
        }
    }
    let expected = requests
        .iter()
        .map(|(start, waypoints, goal)| plan_route(&grid, Some(*start), waypoints, Some(*goal)))
        .collect::<Vec<_>>();

    let grid = &grid;
    let requests = &requests;
    let results = thread::scope(|s| {
        let handles = (0..4)
            .map(|_| {
                s.spawn(move || {
                    requests
                        .iter()
                        .map(|(start, waypoints, goal)| {
                            plan_route(grid, Some(*start), waypoints, Some(*goal))
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });
    for routes in results {
        assert_eq!(routes, expected);
    }
}
