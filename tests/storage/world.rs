//! Integration tests for world state
//!
//! Tests spawning, component access, query order, pools, and resources.

use ecsnap_foundation::{Entity, ErrorKind, Mask};
use ecsnap_storage::{Component, ComponentValue, EntityBuilder, World};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Health {
    current: i64,
    max: i64,
}
impl Component for Health {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Tag;
impl Component for Tag {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Clock(u64);

fn health(current: i64) -> Health {
    Health { current, max: 100 }
}

// =============================================================================
// Components
// =============================================================================

#[test]
fn spawn_registers_types_on_demand() {
    let mut world = World::new();
    assert!(world.component_id::<Health>().is_none());

    let e = world.spawn(EntityBuilder::new().with(health(50))).unwrap();
    assert!(world.component_id::<Health>().is_some());
    assert_eq!(world.get::<Health>(e), Some(&health(50)));
}

#[test]
fn erased_values_spawn_like_typed_ones() {
    let mut world = World::new();
    let id = world.register_component::<Health>().unwrap();
    let e = world
        .spawn(EntityBuilder::new().with_value(ComponentValue::new(id, Box::new(health(7)))))
        .unwrap();
    assert_eq!(
        world.get_by_id(e, id).unwrap().downcast_ref::<Health>(),
        Some(&health(7))
    );
}

#[test]
fn builder_len() {
    let builder = EntityBuilder::new().with(Tag).with(health(1));
    assert_eq!(builder.len(), 2);
    assert!(EntityBuilder::new().is_empty());
}

#[test]
fn component_ids_are_sorted() {
    let mut world = World::new();
    let tag = world.register_component::<Tag>().unwrap();
    let hp = world.register_component::<Health>().unwrap();
    let e = world
        .spawn(EntityBuilder::new().with(health(1)).with(Tag))
        .unwrap();
    assert_eq!(world.component_ids(e).unwrap(), &[tag, hp]);
}

#[test]
fn dead_entities_have_nothing() {
    let mut world = World::new();
    let e = world.spawn(EntityBuilder::new().with(Tag)).unwrap();
    world.remove_entity(e).unwrap();

    assert!(world.get::<Tag>(e).is_none());
    assert!(!world.has::<Tag>(e));
    assert!(world.component_ids(e).is_none());
    assert!(world.relation_of(e).is_none());
}

// =============================================================================
// Query Order
// =============================================================================

#[test]
fn query_order_is_deterministic() {
    let build = || {
        let mut world = World::new();
        for i in 0..20 {
            let builder = if i % 3 == 0 {
                EntityBuilder::new().with(Tag)
            } else {
                EntityBuilder::new().with(health(i))
            };
            let e = world.spawn(builder).unwrap();
            if i % 7 == 0 {
                world.remove_entity(e).unwrap();
            }
        }
        world
    };
    let a = build();
    let b = build();
    assert_eq!(a.query().collect::<Vec<_>>(), b.query().collect::<Vec<_>>());
    assert_eq!(a.query().count(), a.len());
}

#[test]
fn query_with_filters_by_mask() {
    let mut world = World::new();
    world.spawn(EntityBuilder::new().with(Tag)).unwrap();
    let both = world
        .spawn(EntityBuilder::new().with(Tag).with(health(3)))
        .unwrap();
    let hp = world.component_id::<Health>().unwrap();
    let found: Vec<_> = world.query_with(&Mask::from_ids([hp])).collect();
    assert_eq!(found, vec![both]);
}

// =============================================================================
// Pools
// =============================================================================

#[test]
fn dump_and_load_between_worlds() {
    let mut source = World::new();
    let entities: Vec<_> = (0..4)
        .map(|i| source.spawn(EntityBuilder::new().with(health(i))).unwrap())
        .collect();
    source.remove_entity(entities[2]).unwrap();
    let dump = source.dump_entities();

    let mut dest = World::new();
    dest.register_component::<Health>().unwrap();
    let alive = dest.load_entities(&dump).unwrap();
    assert_eq!(alive.len(), 3);
    for e in alive {
        assert!(dest.alive(e));
        assert!(!dest.has::<Health>(e));
    }
    assert!(!dest.alive(entities[2]));
}

#[test]
fn load_rejects_invalid_dump() {
    let mut dump = World::new().dump_entities();
    dump.alive.push(9);
    let err = World::new().load_entities(&dump).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidPool(_)));
}

#[test]
fn load_rejects_free_slot_posing_as_alive() {
    let dump = ecsnap_storage::EntityDump {
        entities: vec![
            Entity::new(0, u32::MAX),
            Entity::new(1, 0),
            Entity::new(2, 1),
        ],
        alive: vec![1],
        next: 2,
        available: 1,
    };
    let mut world = World::new();
    let err = world.load_entities(&dump).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidPool(_)));
    assert!(world.is_fresh());
    assert!(!world.alive(Entity::new(2, 1)));
}

#[test]
fn reset_allows_reload() {
    let mut world = World::new();
    world.spawn(EntityBuilder::new().with(Tag)).unwrap();
    let dump = world.dump_entities();

    assert!(matches!(
        world.load_entities(&dump).unwrap_err().kind,
        ErrorKind::PoolNotEmpty
    ));
    world.reset();
    world.load_entities(&dump).unwrap();
    assert_eq!(world.dump_entities(), dump);
}

// =============================================================================
// Resources
// =============================================================================

#[test]
fn registered_resource_without_value() {
    let mut world = World::new();
    let id = world.register_resource::<Clock>().unwrap();
    assert!(world.resource::<Clock>().is_none());
    assert!(world.resource_slot_mut(id).is_none());

    world.add_resource(Clock(3)).unwrap();
    let slot = world.resource_slot_mut(id).unwrap();
    *slot.downcast_mut::<Clock>().unwrap() = Clock(4);
    assert_eq!(world.resource::<Clock>(), Some(&Clock(4)));
}
