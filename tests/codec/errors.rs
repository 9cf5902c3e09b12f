//! Rejected documents and destinations.

use ecsnap_foundation::{ErrorKind, Namespace, Result};
use ecsnap_serde::{Options, TARGET_TAG, from_str};
use ecsnap_storage::World;
use serde_json::{Value, json};

use crate::fixtures::{ChildOf, ChildRelation, Position, Velocity, name};

fn pool() -> Value {
    json!({
        "Entities": [[0, u32::MAX], [1, 0], [2, 0]],
        "Alive": [1, 2],
        "Next": 0,
        "Available": 0
    })
}

fn types() -> Value {
    json!([name::<Velocity>(), name::<ChildOf>(), name::<Position>()])
}

fn parent_record() -> Value {
    json!({ (name::<Position>()): { "x": 1.0, "y": 2.0 } })
}

fn child_record() -> Value {
    json!({
        (name::<Position>()): { "x": 3.0, "y": 4.0 },
        (name::<Velocity>()): { "x": 5.0, "y": 6.0 },
        (name::<ChildOf>()): { "entity": [1, 0] }
    })
}

fn resources() -> Value {
    json!({ (name::<Velocity>()): { "x": 1000.0, "y": 0.0 } })
}

fn text_ok() -> Value {
    json!({
        "Pool": pool(),
        "Types": types(),
        "Components": [parent_record(), child_record()],
        "Resources": resources()
    })
}

fn decode(document: &Value, world: &mut World) -> Result<()> {
    from_str(&document.to_string(), world, &Options::new())
}

/// Resets the world and gives it an empty velocity resource to patch.
fn ready(world: &mut World) {
    world.reset();
    world.add_resource(Velocity::default()).unwrap();
}

fn registered() -> World {
    let mut world = World::new();
    world.register_component::<Position>().unwrap();
    world.register_component::<ChildOf>().unwrap();
    world.register_component::<ChildRelation>().unwrap();
    world
}

#[test]
fn unparseable_text() {
    let mut world = registered();
    let err = from_str("{xxx}", &mut world, &Options::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedDocument(_)));
    assert!(world.is_fresh());
}

#[test]
fn destination_must_register_every_type() {
    let mut world = registered();

    let err = decode(&text_ok(), &mut world).unwrap_err();
    assert!(err.to_string().contains("component type is not registered"));
    assert_eq!(err.namespace(), Some(Namespace::Component));
    assert!(world.is_fresh());

    world.reset();
    world.register_component::<Velocity>().unwrap();
    let err = decode(&text_ok(), &mut world).unwrap_err();
    assert!(err.to_string().contains("resource type is not registered"));
    assert_eq!(err.namespace(), Some(Namespace::Resource));

    world.reset();
    world.register_resource::<Velocity>().unwrap();
    let err = decode(&text_ok(), &mut world).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingResourceSlot(_)));
    assert!(err.to_string().contains("resource type registered but has no value"));

    ready(&mut world);
    decode(&text_ok(), &mut world).unwrap();
    assert_eq!(world.len(), 2);
    assert_eq!(world.resource::<Velocity>().unwrap().x, 1000.0);
}

#[test]
fn record_count_must_match_pool() {
    let mut world = registered();
    world.register_component::<Velocity>().unwrap();
    ready(&mut world);

    let document = json!({
        "Pool": pool(),
        "Types": types(),
        "Components": [child_record()],
        "Resources": resources()
    });
    let err = decode(&document, &mut world).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::EntityCountMismatch { records: 1, alive: 2 }
    ));
    assert!(err.to_string().contains("world has 2 alive entities"));
    assert!(world.is_fresh());
}

#[test]
fn types_must_be_a_list() {
    let mut world = registered();
    world.register_component::<Velocity>().unwrap();
    ready(&mut world);

    let mut document = text_ok();
    document["Types"] = json!({ "a": "b" });
    let err = decode(&document, &mut world).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedDocument(_)));
}

#[test]
fn records_must_be_maps() {
    let mut world = registered();
    world.register_component::<Velocity>().unwrap();
    ready(&mut world);

    let mut document = text_ok();
    document["Components"][0] = json!([]);
    let err = decode(&document, &mut world).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedDocument(_)));
    assert!(world.is_fresh());
}

#[test]
fn component_payload_must_fit_its_type() {
    let mut world = registered();
    world.register_component::<Velocity>().unwrap();
    ready(&mut world);

    let mut document = text_ok();
    document["Components"][0][name::<Position>()] = json!([]);
    let err = decode(&document, &mut world).unwrap_err();
    match err.kind {
        ErrorKind::MalformedValue {
            namespace,
            type_name,
            entity,
            ..
        } => {
            assert_eq!(namespace, Namespace::Component);
            assert_eq!(type_name, name::<Position>());
            assert_eq!(entity, Some(0));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn resource_payload_must_fit_its_type() {
    let mut world = registered();
    ready(&mut world);

    let document = json!({
        "Pool": { "Entities": [[0, u32::MAX]], "Alive": [], "Next": 0, "Available": 0 },
        "Types": [],
        "Components": [],
        "Resources": { (name::<Velocity>()): [] }
    });
    let err = decode(&document, &mut world).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::MalformedValue {
            namespace: Namespace::Resource,
            entity: None,
            ..
        }
    ));
    assert_eq!(world.resource::<Velocity>(), Some(&Velocity::default()));
}

#[test]
fn relation_target_must_be_an_entity() {
    let mut world = registered();
    world.reset();

    let document = json!({
        "Pool": pool(),
        "Types": [name::<Position>(), name::<ChildRelation>()],
        "Components": [
            { (name::<Position>()): { "x": 1.0, "y": 2.0 } },
            {
                (name::<Position>()): { "x": 5.0, "y": 6.0 },
                (TARGET_TAG): {},
                (name::<ChildRelation>()): { "dummy": 0 }
            }
        ],
        "Resources": {}
    });
    let err = decode(&document, &mut world).unwrap_err();
    match err.kind {
        ErrorKind::MalformedValue {
            type_name, entity, ..
        } => {
            assert_eq!(type_name, TARGET_TAG);
            assert_eq!(entity, Some(1));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn populated_destination_must_match_record_count() {
    let mut world = registered();
    world.register_component::<Velocity>().unwrap();
    ready(&mut world);
    world.new_entity();

    let document = json!({
        "Types": types(),
        "Components": [parent_record(), child_record()],
        "Resources": resources()
    });
    let err = decode(&document, &mut world).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::EntityCountMismatch { records: 2, alive: 1 }
    ));
    assert_eq!(world.len(), 1);
}
