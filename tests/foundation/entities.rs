//! Integration tests for Entity
//!
//! Tests identity, the zero entity, formatting, and the wire form.

use ecsnap_foundation::Entity;

#[test]
fn equality_uses_index_and_generation() {
    assert_eq!(Entity::new(3, 1), Entity::new(3, 1));
    assert_ne!(Entity::new(3, 1), Entity::new(3, 2));
    assert_ne!(Entity::new(3, 1), Entity::new(4, 1));
}

#[test]
fn zero_entity() {
    assert!(Entity::ZERO.is_zero());
    assert!(Entity::default().is_zero());
    assert!(!Entity::new(0, 1).is_zero());
    assert!(!Entity::new(1, 0).is_zero());
}

#[test]
fn wire_form_is_a_pair() {
    let entity = Entity::new(7, 2);
    assert_eq!(serde_json::to_string(&entity).unwrap(), "[7,2]");
    let parsed: Entity = serde_json::from_str("[7,2]").unwrap();
    assert_eq!(parsed, entity);
}

#[test]
fn wire_form_rejects_other_shapes() {
    assert!(serde_json::from_str::<Entity>("{}").is_err());
    assert!(serde_json::from_str::<Entity>("[1]").is_err());
    assert!(serde_json::from_str::<Entity>("[1,2,3]").is_err());
    assert!(serde_json::from_str::<Entity>("[-1,0]").is_err());
}

#[test]
fn display_shows_index() {
    assert_eq!(format!("{}", Entity::new(42, 3)), "Entity(42)");
}
