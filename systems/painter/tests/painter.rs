use std::{cell::RefCell, rc::Rc};

use gridpaint_core::{
    CellCoord, Direction, Error, Event, PaintColor, RelativeDirection, StandardPalette,
};
use gridpaint_system_painter::{Config, MovementRule, Painter};
use gridpaint_world::World;

const RED: PaintColor = PaintColor::from_rgb(255, 0, 0);
const BLUE: PaintColor = PaintColor::from_rgb(0, 0, 255);

fn bucket_world(paint_on_origin: u32, asset_id: i32) -> World {
    World::from_description(&format!(
        r#"[[{{"tileType":1,"assetId":{asset_id},"value":{paint_on_origin}}},{{"tileType":1}},{{"tileType":0}}],
            [{{"tileType":1}},{{"tileType":1}},{{"tileType":1}}],
            [{{"tileType":1}},{{"tileType":1}},{{"tileType":1}}]]"#
    ))
    .expect("valid description")
}

fn recording(world: &mut World) -> Rc<RefCell<Vec<Event>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    world.register_observer(move |event: &Event| sink.borrow_mut().push(event.clone()));
    events
}

#[test]
fn construction_outside_the_grid_fails() {
    let mut world = World::empty(3).expect("empty world");
    for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 3), (7, 7)] {
        let error = Painter::spawn(&mut world, x, y, Direction::North, 0).expect_err("outside");
        assert!(
            matches!(error, Error::InvalidLocation { x: ex, y: ey } if ex == x && ey == y),
            "({x}, {y}): {error}"
        );
    }
}

#[test]
fn painters_receive_distinct_ids() {
    let mut world = World::empty(3).expect("empty world");
    let first = Painter::spawn(&mut world, 0, 0, Direction::North, 0).expect("spawn");
    let second = Painter::spawn(&mut world, 1, 1, Direction::South, 0).expect("spawn");
    assert!(first.id() < second.id());
}

#[test]
fn moving_north_from_the_top_row_fails_without_moving() {
    let mut world = World::empty(4).expect("empty world");
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::North, 0).expect("spawn");

    let error = painter.move_forward().expect_err("off the grid");
    assert!(matches!(
        error,
        Error::InvalidMove {
            facing: Direction::North,
            ..
        }
    ));
    assert_eq!(painter.cell(), CellCoord::new(0, 0));
}

#[test]
fn turning_to_east_allows_the_step() {
    let mut world = World::empty(2).expect("empty world");
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::North, 0).expect("spawn");

    painter.turn_left();
    painter.turn_left();
    painter.turn_left();
    assert!(painter.is_facing_east());

    painter.move_forward().expect("step east");
    assert_eq!((painter.x(), painter.y()), (1, 0));
    assert!(painter.move_forward().is_err());
}

#[test]
fn moves_follow_compass_offsets() {
    let mut world = World::empty(3).expect("empty world");
    let mut painter = Painter::spawn(&mut world, 1, 1, Direction::South, 0).expect("spawn");
    painter.move_forward().expect("south");
    assert_eq!(painter.cell(), CellCoord::new(1, 2));

    painter.turn_left();
    assert!(painter.is_facing_east());
    painter.move_forward().expect("east");
    assert_eq!(painter.cell(), CellCoord::new(2, 2));

    painter.turn_left();
    assert!(painter.is_facing_north());
    painter.move_forward().expect("north");
    assert_eq!(painter.cell(), CellCoord::new(2, 1));

    painter.turn_left();
    assert!(painter.is_facing_west());
    painter.move_forward().expect("west");
    assert_eq!(painter.cell(), CellCoord::new(1, 1));
}

#[test]
fn bounds_only_movement_walks_onto_walls() {
    let mut world = bucket_world(0, 0);
    let mut painter = Painter::spawn(&mut world, 1, 0, Direction::East, 0).expect("spawn");
    painter.move_forward().expect("walls are within bounds");
    assert_eq!(painter.cell(), CellCoord::new(2, 0));
}

#[test]
fn passable_movement_refuses_walls() {
    let mut world = bucket_world(0, 0);
    let config = Config::new(20, MovementRule::Passable);
    let mut painter =
        Painter::spawn_with(&mut world, 1, 0, Direction::East, 0, &config).expect("spawn");
    assert!(!painter.can_move_forward());
    assert!(painter.move_forward().is_err());
    assert_eq!(painter.cell(), CellCoord::new(1, 0));
}

#[test]
fn can_move_left_checks_the_north_neighbour_when_facing_east() {
    let mut world = World::empty(3).expect("empty world");
    let top = Painter::spawn(&mut world, 0, 0, Direction::East, 0).expect("spawn");
    assert!(!top.can_move(RelativeDirection::Left));
    assert!(top.can_move(RelativeDirection::Forward));
    assert!(top.can_move(RelativeDirection::Right));
    assert!(!top.can_move(RelativeDirection::Backward));

    let middle = Painter::spawn(&mut world, 0, 1, Direction::East, 0).expect("spawn");
    assert!(middle.can_move(RelativeDirection::Left));
    assert_eq!(middle.facing(), Direction::East);
    assert_eq!(middle.cell(), CellCoord::new(0, 1));
}

#[test]
fn can_move_named_parses_relative_tokens() {
    let mut world = World::empty(2).expect("empty world");
    let painter = Painter::spawn(&mut world, 0, 0, Direction::East, 0).expect("spawn");
    assert!(painter.can_move_named("FORWARD").expect("known token"));
    assert!(!painter.can_move_named("left").expect("known token"));
    assert!(matches!(
        painter.can_move_named("up"),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(painter.can_move_forward(), painter.can_move(RelativeDirection::Forward));
}

#[test]
fn painting_consumes_paint_and_colors_the_square() {
    let mut world = World::empty(2).expect("empty world");
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 2).expect("spawn");

    painter.paint(RED).expect("paint");
    assert_eq!(painter.paint_remaining(), 1);
    assert!(painter.is_on_paint());
    assert_eq!(painter.color(), Some(RED));

    painter.paint(BLUE).expect("repaint");
    assert_eq!(painter.color(), Some(BLUE));
    assert!(!painter.has_paint());
}

#[test]
fn painting_without_paint_fails_without_mutation() {
    let mut world = World::empty(2).expect("empty world");
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 0).expect("spawn");

    assert!(matches!(painter.paint(RED), Err(Error::OutOfPaint)));
    assert!(!painter.is_on_paint());
    assert_eq!(painter.paint_remaining(), 0);
}

#[test]
fn painting_a_bucket_square_fails_without_mutation() {
    let mut world = bucket_world(2, 5);
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 3).expect("spawn");

    let error = painter.paint(RED).expect_err("bucket square");
    assert!(matches!(error, Error::InvalidPaintLocation { paint_count: 2 }));
    assert_eq!(painter.paint_remaining(), 3);
    assert!(!painter.is_on_paint());
    assert!(painter.is_on_bucket());
}

#[test]
fn painting_a_wall_spends_paint_without_coloring_it() {
    let mut world = World::from_description(r#"[[{"tileType":0}]]"#).expect("valid description");
    let events = recording(&mut world);
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 1).expect("spawn");

    painter.paint(RED).expect("walls accept the attempt");

    assert_eq!(painter.paint_remaining(), 0);
    assert!(!painter.is_on_paint());
    assert_eq!(painter.color(), None);
    assert_eq!(
        events.borrow().last(),
        Some(&Event::PaintSpilled {
            painter: painter.id(),
            cell: CellCoord::new(0, 0),
            remaining: 0,
        })
    );
    assert!(!events
        .borrow()
        .iter()
        .any(|event| matches!(event, Event::TilePainted { .. })));
}

#[test]
fn painting_by_name_uses_the_palette() {
    let mut world = World::empty(2).expect("empty world");
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 2).expect("spawn");

    painter.paint_named("Red").expect("known colour");
    assert_eq!(painter.color(), Some(RED));

    let error = painter.paint_named("mauve").expect_err("unknown colour");
    assert!(matches!(error, Error::InvalidArgument(_)));
    assert_eq!(painter.paint_remaining(), 1);

    painter.paint_with("blue", &StandardPalette).expect("known colour");
    assert_eq!(painter.color(), Some(BLUE));
}

#[test]
fn unknown_colour_is_reported_before_missing_paint() {
    let mut world = World::empty(2).expect("empty world");
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 0).expect("spawn");
    assert!(matches!(
        painter.paint_named("mauve"),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn scraping_twice_matches_scraping_once() {
    let mut world = World::empty(2).expect("empty world");
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 1).expect("spawn");
    painter.paint(RED).expect("paint");

    painter.scrape_paint();
    let after_once = world.grid().borrow().clone();
    painter.scrape_paint();
    let after_twice = world.grid().borrow().clone();

    assert_eq!(after_once, after_twice);
    assert!(!painter.is_on_paint());
    assert_eq!(painter.color(), None);
}

#[test]
fn taking_then_painting_conserves_paint() {
    let mut world = bucket_world(1, 4);
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 0).expect("spawn");

    painter.take_paint();
    assert_eq!(painter.paint_remaining(), 1);
    assert!(!painter.is_on_bucket());

    painter.paint(RED).expect("square emptied");
    assert_eq!(painter.paint_remaining(), 0);

    let grid = world.grid();
    let grid = grid.borrow();
    let origin = grid.square_at(0, 0).expect("in bounds");
    assert_eq!(origin.paint_count(), 0);
    assert_eq!(origin.color(), Some(RED));
    let painted = grid.tiles().filter(|(_, tile)| tile.has_color()).count();
    assert_eq!(painted, 1);
}

#[test]
fn emptying_a_bucket_resets_its_asset() {
    let mut world = bucket_world(2, 9);
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 0).expect("spawn");

    painter.take_paint();
    assert_eq!(world.grid().borrow().square_at(0, 0).expect("in bounds").asset_id(), 9);

    painter.take_paint();
    let grid = world.grid();
    let origin = grid.borrow();
    let origin = origin.square_at(0, 0).expect("in bounds");
    assert_eq!(origin.asset_id(), 0);
    assert_eq!(origin.paint_count(), 0);
    assert_eq!(painter.paint_remaining(), 2);
}

#[test]
fn taking_from_an_empty_square_does_nothing() {
    let mut world = World::empty(2).expect("empty world");
    let mut painter = Painter::spawn(&mut world, 1, 1, Direction::East, 3).expect("spawn");
    painter.take_paint();
    assert_eq!(painter.paint_remaining(), 3);
}

#[test]
fn set_paint_ignores_negative_amounts() {
    let mut world = World::empty(2).expect("empty world");
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 4).expect("spawn");

    painter.set_paint(-3);
    assert_eq!(painter.paint_remaining(), 4);
    painter.set_paint(0);
    assert!(!painter.has_paint());
    painter.set_paint(11);
    assert_eq!(painter.paint_remaining(), 11);
}

#[test]
fn default_painter_on_a_large_grid_never_runs_dry() {
    let mut world = World::empty(20).expect("empty world");
    let mut painter = Painter::spawn_default(&mut world, &Config::default()).expect("spawn");

    assert!(painter.has_infinite_paint());
    assert_eq!(painter.cell(), CellCoord::new(0, 0));
    assert!(painter.is_facing_east());

    for _ in 0..25 {
        painter.paint(RED).expect("unlimited paint");
        assert!(painter.has_paint());
    }

    painter.set_paint(3);
    assert_eq!(painter.paint_remaining(), 0);
    assert!(painter.has_paint());
}

#[test]
fn default_painter_on_a_small_grid_has_finite_paint() {
    let mut world = World::empty(19).expect("empty world");
    let painter = Painter::spawn_default(&mut world, &Config::default()).expect("spawn");
    assert!(!painter.has_infinite_paint());
    assert!(!painter.has_paint());
}

#[test]
fn explicit_construction_never_grants_infinite_paint() {
    let mut world = World::empty(30).expect("empty world");
    let painter = Painter::spawn(&mut world, 0, 0, Direction::East, 0).expect("spawn");
    assert!(!painter.has_infinite_paint());
}

#[test]
fn threshold_comes_from_config() {
    let mut world = World::empty(5).expect("empty world");
    let config = Config::new(5, MovementRule::BoundsOnly);
    let painter = Painter::spawn_default(&mut world, &config).expect("spawn");
    assert!(painter.has_infinite_paint());
}

#[test]
fn painters_share_the_grid() {
    let mut world = World::empty(3).expect("empty world");
    let mut first = Painter::spawn(&mut world, 1, 1, Direction::East, 1).expect("spawn");
    let mut second = Painter::spawn(&mut world, 1, 1, Direction::West, 0).expect("spawn");

    first.paint(BLUE).expect("paint");
    assert!(second.is_on_paint());
    assert_eq!(second.color(), Some(BLUE));

    second.scrape_paint();
    assert!(!first.is_on_paint());
}

#[test]
fn observers_see_each_state_change_in_order() {
    let mut world = bucket_world(1, 3);
    let events = recording(&mut world);

    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 0).expect("spawn");
    painter.take_paint();
    painter.paint(RED).expect("paint");
    painter.scrape_paint();
    painter.turn_left();
    painter.turn_left();
    painter.turn_left();
    painter.move_forward().expect("south");
    painter.set_paint(2);

    let id = painter.id();
    let recorded = events.borrow();
    assert!(matches!(recorded[0], Event::PainterAdded { painter } if painter.id == id));
    assert_eq!(
        recorded[1..],
        [
            Event::PaintTaken {
                painter: id,
                cell: CellCoord::new(0, 0),
                left_on_tile: 0,
                inventory: 1,
            },
            Event::TilePainted {
                painter: id,
                cell: CellCoord::new(0, 0),
                color: RED,
                remaining: 0,
            },
            Event::PaintScraped {
                painter: id,
                cell: CellCoord::new(0, 0),
            },
            Event::PainterTurned {
                painter: id,
                facing: Direction::North,
            },
            Event::PainterTurned {
                painter: id,
                facing: Direction::West,
            },
            Event::PainterTurned {
                painter: id,
                facing: Direction::South,
            },
            Event::PainterMoved {
                painter: id,
                from: CellCoord::new(0, 0),
                to: CellCoord::new(0, 1),
            },
            Event::PaintAmountSet {
                painter: id,
                amount: 2,
            },
        ]
    );
}

#[test]
fn failed_actions_notify_nobody() {
    let mut world = World::empty(2).expect("empty world");
    let events = recording(&mut world);
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::North, 0).expect("spawn");

    assert!(painter.move_forward().is_err());
    assert!(painter.paint(RED).is_err());
    painter.scrape_paint();
    painter.take_paint();
    painter.set_paint(-1);

    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn grid_reads_between_actions_do_not_block_painting() {
    let mut world = World::empty(2).expect("empty world");
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 2).expect("spawn");
    let grid = world.grid();

    painter.paint(RED).expect("paint");
    assert!(grid.borrow().square_at(0, 0).expect("in bounds").has_color());
    painter.scrape_paint();
    assert!(!grid.borrow().square_at(0, 0).expect("in bounds").has_color());
}

#[test]
#[should_panic]
fn painting_while_holding_a_grid_borrow_panics() {
    let mut world = World::empty(2).expect("empty world");
    let mut painter = Painter::spawn(&mut world, 0, 0, Direction::East, 1).expect("spawn");
    let grid = world.grid();
    let _held = grid.borrow();

    let _ = painter.paint(RED);
}
