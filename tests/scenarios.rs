use citygen::city::{PlacementEvent, expand_city};
use citygen::config::GenerationSettings;
use citygen::grid::{Axis, GridPos};
use citygen::heightmap::Heightmap;
use citygen::site::{CitySite, Orientation, find_site_from, match_orientation};
use citygen::water::WaterLevel;
use citygen::{Simulation, SimulationParams, World};

const SIZE: usize = 20;

fn set_cell(world: &mut World, row: i32, col: i32, terrain: f64, water: f64) {
    let pos = GridPos::new(row, col);
    world.terrain.set(pos, terrain);
    world.water.set(pos, WaterLevel::Surface(water));
}

/// Устье с ориентацией `Right` вокруг (10, 10): площадка в строках 9–10, река в строках 12–13
fn right_mouth() -> World {
    let mut world = World::new(Heightmap::new(SIZE), 0.001);
    for row in [9, 10] {
        for col in 9..=11 {
            set_cell(&mut world, row, col, 1.0, 0.999);
        }
    }
    set_cell(&mut world, 12, 10, 0.0, 0.5);
    set_cell(&mut world, 13, 10, 0.0, 0.5);
    for col in 11..=13 {
        set_cell(&mut world, 12, col, 0.0, 0.5);
    }
    set_cell(&mut world, 12, 14, -1.0, -0.5);
    world
}

#[test]
fn right_pattern_is_found_at_seed() {
    let world = right_mouth();
    let site = find_site_from(&world, GridPos::new(10, 10));
    assert_eq!(
        site,
        Some(CitySite {
            pos: GridPos::new(10, 10),
            orientation: Orientation::Right,
        })
    );
}

#[test]
fn dry_mouth_matches_nothing() {
    let mut world = right_mouth();
    set_cell(&mut world, 12, 14, 1.0, 0.999);
    assert_eq!(match_orientation(&world, GridPos::new(10, 10)), None);
    assert_eq!(find_site_from(&world, GridPos::new(10, 10)), None);
}

#[test]
fn mirrored_river_side_also_matches() {
    let mut world = World::new(Heightmap::new(SIZE), 0.001);
    for row in [9, 10] {
        for col in 9..=11 {
            set_cell(&mut world, row, col, 1.0, 0.999);
        }
    }
    set_cell(&mut world, 12, 10, 0.0, 0.5);
    set_cell(&mut world, 13, 10, 0.0, 0.5);
    for col in 7..=9 {
        set_cell(&mut world, 12, col, 0.0, 0.5);
    }
    set_cell(&mut world, 12, 6, -1.0, -0.5);
    assert_eq!(
        match_orientation(&world, GridPos::new(10, 10)),
        Some(Orientation::Right)
    );
}

#[test]
fn repeated_expansion_is_idempotent() {
    let mut world = right_mouth();
    // Неровное плато за площадкой, по которому пойдёт город
    for row in 1..=9 {
        for col in 5..=15 {
            let h = 1.0 + 0.01 * f64::from(row + col);
            set_cell(&mut world, row, col, h, h - 0.001);
        }
    }
    let site = find_site_from(&world, GridPos::new(10, 10)).unwrap();
    assert_eq!(site.orientation, Orientation::Right);

    let first = expand_city(&mut world, site);
    assert!(!first.is_empty());
    let after_first = world.clone();

    let second = expand_city(&mut world, site);
    assert_eq!(first, second);
    assert_eq!(world, after_first);
}

#[test]
fn expansion_on_level_ground_repeats_exactly() {
    let mut hm = Heightmap::new(SIZE);
    hm.data = vec![2.0; SIZE * SIZE];
    let mut world = World::new(hm, 0.001);
    let site = CitySite {
        pos: GridPos::new(3, 10),
        orientation: Orientation::Left,
    };
    let first = expand_city(&mut world, site);
    let snapshot = world.clone();
    let second = expand_city(&mut world, site);
    assert_eq!(first, second);
    assert_eq!(world, snapshot);
}

/// Событие в системе координат ориентации: (вид, вдоль, поперёк, этажи)
fn relative(orientation: Orientation, origin: GridPos, event: &PlacementEvent) -> (u8, i32, i32, u32) {
    let cell = event.cell();
    let (d_row, d_col) = (cell.row - origin.row, cell.col - origin.col);
    let (along, across) = match orientation.axis() {
        Axis::Row => (d_row * orientation.step(), d_col),
        Axis::Col => (d_col * orientation.step(), d_row),
    };
    match event {
        PlacementEvent::Building(b) => (0, along, across, b.floors),
        PlacementEvent::RoadSegment { .. } => (1, along, across, 0),
        PlacementEvent::Crosswalk { .. } => (2, along, across, 0),
    }
}

#[test]
fn orientations_produce_mirrored_layouts() {
    let size = 21;
    let origin = GridPos::new(10, 10);
    let layouts: Vec<Vec<_>> = Orientation::ALL
        .iter()
        .map(|&orientation| {
            let mut hm = Heightmap::new(size);
            hm.data = vec![1.0; size * size];
            let mut world = World::new(hm, 0.001);
            expand_city(&mut world, CitySite { pos: origin, orientation })
                .iter()
                .map(|event| relative(orientation, origin, event))
                .collect()
        })
        .collect();

    assert_eq!(layouts[0].iter().filter(|e| e.0 != 0).count(), 10);
    for layout in &layouts[1..] {
        assert_eq!(layout, &layouts[0]);
    }
}

#[test]
fn seeded_runs_are_identical() {
    let params = SimulationParams {
        seed: 1234,
        grid_size: 32,
        generation: GenerationSettings {
            fault_passes: 400,
            walk_passes: 40,
            walk_steps: 200,
            rewalk_passes: 3,
            ..GenerationSettings::default()
        },
        ..SimulationParams::default()
    };

    let run = || {
        let mut sim = Simulation::new(params.clone()).unwrap();
        for tick in 0..200 {
            if tick == 100 {
                sim.toggle_erosion();
            }
            sim.step();
        }
        sim
    };
    let a = run();
    let b = run();
    assert_eq!(a.world(), b.world());
    assert_eq!(a.site(), b.site());
    assert_eq!(a.events(), b.events());
}
