use laser_arena_core::{GridCoord, WorldSnapshot};
use laser_arena_world::{Cell, CellView, World};

const SCENARIO: &str = r##"{
    "dimensions": {"width": 3, "height": 3},
    "staticObjects": [{"position": [0, 0], "type": "wall"}],
    "tanks": [{
        "position": [1, 1],
        "color": "#f00",
        "orientation": "north",
        "energy": 3,
        "name": "A"
    }],
    "lasers": []
}"##;

#[test]
fn wire_payload_parses_into_the_expected_world() {
    let snapshot = WorldSnapshot::from_json_str(SCENARIO).expect("payload decodes");
    let world = World::parse(&snapshot).expect("snapshot parses");

    assert_eq!(world.grid().cell(GridCoord::new(0, 0)), Cell::Wall);
    assert!(matches!(
        world.cell_view(GridCoord::new(1, 1)),
        CellView::Tank(tank) if tank.name == "A" && tank.energy == 3
    ));

    for x in 0..3 {
        for y in 0..3 {
            if (x, y) == (0, 0) || (x, y) == (1, 1) {
                continue;
            }
            assert_eq!(world.grid().cell(GridCoord::new(x, y)), Cell::Empty);
        }
    }

    assert_eq!(world.players().len(), 1);
    assert_eq!(world.players()[0].name, "A");
    assert!(world.lasers().is_empty());
}

#[test]
fn player_order_matches_snapshot_order() {
    let payload = r#"{
        "dimensions": {"width": 5, "height": 5},
        "staticObjects": [],
        "tanks": [
            {"position": [4, 4], "color": "red", "orientation": "east", "energy": 1, "name": "last"},
            {"position": [0, 0], "color": "blue", "orientation": "west", "energy": 2, "name": "first"}
        ],
        "lasers": []
    }"#;

    let snapshot = WorldSnapshot::from_json_str(payload).expect("payload decodes");
    let world = World::parse(&snapshot).expect("snapshot parses");

    let names: Vec<&str> = world
        .players()
        .iter()
        .map(|tank| tank.name.as_str())
        .collect();
    assert_eq!(names, vec!["last", "first"]);
}
