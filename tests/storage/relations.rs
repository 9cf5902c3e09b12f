//! Integration tests for relation components
//!
//! Tests targets, the one-relation rule, and target cleanup.

use ecsnap_foundation::{Entity, ErrorKind};
use ecsnap_storage::{Component, EntityBuilder, World};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ChildOf;
impl Component for ChildOf {
    const IS_RELATION: bool = true;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Likes {
    strength: u8,
}
impl Component for Likes {
    const IS_RELATION: bool = true;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Name(String);
impl Component for Name {}

#[test]
fn relation_registration_carries_flag() {
    let mut world = World::new();
    let id = world.register_component::<ChildOf>().unwrap();
    assert!(world.component_registry().info(id).unwrap().is_relation());
}

#[test]
fn untargeted_relation_has_zero_target() {
    let mut world = World::new();
    let e = world.spawn(EntityBuilder::new().with(ChildOf)).unwrap();
    let id = world.component_id::<ChildOf>().unwrap();
    assert_eq!(world.relation(e, id).unwrap(), Entity::ZERO);
}

#[test]
fn relation_survives_adding_components() {
    let mut world = World::new();
    let parent = world.new_entity();
    let child = world
        .spawn(EntityBuilder::new().with_relation(Likes { strength: 3 }, parent))
        .unwrap();
    world.add(child, Name("kid".to_string())).unwrap();

    let id = world.component_id::<Likes>().unwrap();
    assert_eq!(world.relation(child, id).unwrap(), parent);
    assert_eq!(world.get::<Likes>(child), Some(&Likes { strength: 3 }));
}

#[test]
fn set_relation_requires_relation_component() {
    let mut world = World::new();
    let parent = world.new_entity();
    let e = world.spawn(EntityBuilder::new().with(Name("a".into()))).unwrap();
    let name = world.component_id::<Name>().unwrap();

    let err = world.set_relation(e, name, parent).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotARelation { .. }));
    assert!(world.relation(e, name).is_err());
}

#[test]
fn set_relation_rejects_dead_target() {
    let mut world = World::new();
    let gone = world.new_entity();
    world.remove_entity(gone).unwrap();
    let e = world.spawn(EntityBuilder::new().with(ChildOf)).unwrap();
    let id = world.component_id::<ChildOf>().unwrap();

    let err = world.set_relation(e, id, gone).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DeadRelationTarget(_)));
    world.set_relation(e, id, Entity::ZERO).unwrap();
}

#[test]
fn at_most_one_relation_per_entity() {
    let mut world = World::new();
    let err = world
        .spawn(EntityBuilder::new().with(ChildOf).with(Likes { strength: 1 }))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MultipleRelations(_)));
    assert!(world.is_empty());
}

#[test]
fn removing_target_clears_every_pointer() {
    let mut world = World::new();
    let parent = world.new_entity();
    let a = world
        .spawn(EntityBuilder::new().with_relation(ChildOf, parent))
        .unwrap();
    let b = world
        .spawn(
            EntityBuilder::new()
                .with(Name("b".into()))
                .with_relation(ChildOf, parent),
        )
        .unwrap();

    world.remove_entity(parent).unwrap();
    assert_eq!(world.relation_of(a).map(|(_, t)| t), Some(Entity::ZERO));
    assert_eq!(world.relation_of(b).map(|(_, t)| t), Some(Entity::ZERO));
}
