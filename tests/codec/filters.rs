//! Skip options on both sides of the codec.

use ecsnap_foundation::Entity;
use ecsnap_serde::{Format, Options, deserialize, to_document};
use ecsnap_storage::World;

use crate::fixtures::{
    ChildOf, Position, Velocity, destination, name, position, snapshot, source, velocity,
};

fn resources_only() -> World {
    let mut world = World::new();
    world.add_resource(Velocity::default()).unwrap();
    world.add_resource(Position::default()).unwrap();
    world
}

fn components_only() -> World {
    let mut world = World::new();
    world.register_component::<Position>().unwrap();
    world.register_component::<Velocity>().unwrap();
    world.register_component::<ChildOf>().unwrap();
    world
}

fn decode(bytes: &[u8], world: &mut World, options: &Options) {
    deserialize(bytes, world, Format::Json, options).unwrap();
}

// =============================================================================
// Encode Side
// =============================================================================

#[test]
fn encode_skip_entities() {
    let (bytes, ..) = snapshot(&Options::new().skip_entities());
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(!text.contains("\"Pool\""));
    assert!(!text.contains("\"Components\""));

    let mut world = resources_only();
    decode(&bytes, &mut world, &Options::new());

    assert_eq!(world.query().count(), 0);
    assert_eq!(world.resource::<Velocity>(), Some(&velocity(1000.0, 0.0)));
}

#[test]
fn encode_skip_all_components() {
    let (bytes, parent, child) = snapshot(&Options::new().skip_all_components());

    // No component types need to be registered.
    let mut world = resources_only();
    decode(&bytes, &mut world, &Options::new());

    assert_eq!(world.query().count(), 3);
    assert!(world.alive(parent));
    assert!(world.alive(child));
    assert!(world.component_ids(child).unwrap().is_empty());
    assert_eq!(world.resource::<Velocity>(), Some(&velocity(1000.0, 0.0)));
}

#[test]
fn encode_skip_one_component() {
    let (bytes, parent, child) = snapshot(&Options::new().skip_component::<Position>());

    let mut world = World::new();
    world.register_component::<Velocity>().unwrap();
    world.register_component::<ChildOf>().unwrap();
    world.add_resource(Velocity::default()).unwrap();
    world.add_resource(Position::default()).unwrap();
    decode(&bytes, &mut world, &Options::new());

    let entities: Vec<Entity> = world.query().collect();
    assert_eq!(entities.len(), 3);
    assert!(!world.has::<Velocity>(entities[0]));
    assert!(!world.has::<Velocity>(entities[1]));
    assert_eq!(world.get::<Velocity>(child), Some(&velocity(5.0, 6.0)));
    assert_eq!(world.get::<ChildOf>(child), Some(&ChildOf { entity: parent }));
    assert!(world.component_id::<Position>().is_none());
}

#[test]
fn encode_skip_one_component_drops_type_name() {
    let (world, ..) = source();
    let document = to_document(&world, &Options::new().skip_component::<Position>()).unwrap();
    assert!(!document.types.iter().any(|t| t == name::<Position>()));
    assert!(
        document
            .components
            .iter()
            .all(|record| !record.contains_key(name::<Position>()))
    );
}

#[test]
fn encode_skip_all_resources() {
    let (bytes, ..) = snapshot(&Options::new().skip_all_resources());
    let mut world = components_only();
    decode(&bytes, &mut world, &Options::new());
    assert_eq!(world.len(), 3);
}

#[test]
fn encode_skip_one_resource() {
    let (bytes, ..) = snapshot(&Options::new().skip_resource::<Position>());

    let mut world = components_only();
    world.add_resource(Velocity::default()).unwrap();
    decode(&bytes, &mut world, &Options::new());

    assert_eq!(world.resource::<Velocity>(), Some(&velocity(1000.0, 0.0)));
    assert!(world.resource_id::<Position>().is_none());
}

// =============================================================================
// Decode Side
// =============================================================================

#[test]
fn decode_skip_entities() {
    let (bytes, ..) = snapshot(&Options::new());

    // Component types are not even looked up.
    let mut world = resources_only();
    decode(&bytes, &mut world, &Options::new().skip_entities());

    assert_eq!(world.query().count(), 0);
    assert!(world.is_fresh());
    assert_eq!(world.resource::<Velocity>(), Some(&velocity(1000.0, 0.0)));
}

#[test]
fn decode_skip_all_components() {
    let (bytes, parent, child) = snapshot(&Options::new());
    let mut world = destination();
    decode(&bytes, &mut world, &Options::new().skip_all_components());

    assert_eq!(world.query().count(), 3);
    assert!(world.alive(parent));
    assert!(world.alive(child));
    assert!(!world.has::<Position>(parent));
    assert!(!world.has::<ChildOf>(child));
    assert_eq!(world.resource::<Velocity>(), Some(&velocity(1000.0, 0.0)));
}

#[test]
fn decode_skip_one_component() {
    let (bytes, parent, child) = snapshot(&Options::new());
    let mut world = destination();
    decode(&bytes, &mut world, &Options::new().skip_component::<Position>());

    let entities: Vec<Entity> = world.query().collect();
    assert_eq!(entities.len(), 3);
    for &entity in &entities {
        assert!(!world.has::<Position>(entity));
    }
    assert_eq!(world.get::<Velocity>(child), Some(&velocity(5.0, 6.0)));
    assert_eq!(world.get::<ChildOf>(child), Some(&ChildOf { entity: parent }));
    assert!(!world.has::<Velocity>(parent));
}

#[test]
fn decode_skip_component_by_name() {
    let (bytes, _, child) = snapshot(&Options::new());
    let mut world = destination();
    decode(
        &bytes,
        &mut world,
        &Options::new().skip_component_named(name::<Velocity>()),
    );
    assert!(!world.has::<Velocity>(child));
    assert_eq!(world.get::<Position>(child), Some(&position(3.0, 4.0)));
}

#[test]
fn decode_skip_all_resources() {
    let (bytes, ..) = snapshot(&Options::new());
    let mut world = components_only();
    decode(&bytes, &mut world, &Options::new().skip_all_resources());
    assert_eq!(world.len(), 3);
    assert!(world.resource_registry().is_empty());
}

#[test]
fn decode_skip_one_resource() {
    let (bytes, ..) = snapshot(&Options::new());
    let mut world = destination();
    decode(&bytes, &mut world, &Options::new().skip_resource::<Position>());

    assert_eq!(world.resource::<Velocity>(), Some(&velocity(1000.0, 0.0)));
    assert_eq!(world.resource::<Position>(), Some(&Position::default()));
}

#[test]
fn unknown_skip_names_match_nothing() {
    let (bytes, ..) = snapshot(&Options::new());
    let mut world = destination();
    decode(
        &bytes,
        &mut world,
        &Options::new()
            .skip_component_named("no::such::Component")
            .skip_resource_named("no::such::Resource"),
    );
    assert_eq!(world.resource::<Position>(), Some(&position(1000.0, 0.0)));
    assert_eq!(world.query().filter(|e| world.has::<Position>(*e)).count(), 2);
}
