use std::collections::HashSet;

use learn_ngin::{EntityAllocator, engine::TransformManager};

use cgmath::{Matrix4, SquareMatrix, Vector3};

#[test]
fn entities_are_unique() {
    let mut entities = EntityAllocator::new();
    let minted: HashSet<_> = (0..100).map(|_| entities.create()).collect();
    assert_eq!(minted.len(), 100);
    assert_eq!(entities.len(), 100);
}

#[test]
fn destroyed_ids_are_not_reused() {
    let mut entities = EntityAllocator::new();
    let first = entities.create();
    assert!(entities.destroy(first));
    assert!(!entities.is_alive(first));
    assert!(!entities.destroy(first));

    let second = entities.create();
    assert_ne!(first, second);
    assert!(entities.is_alive(second));
    assert_eq!(entities.len(), 1);
}

#[test]
fn allocators_are_independent() {
    let mut a = EntityAllocator::new();
    let mut b = EntityAllocator::new();
    let from_a = a.create();
    assert!(!b.is_alive(from_a));
    assert!(b.is_empty());
    b.create();
    assert_eq!(a.len(), 1);
}

#[test]
fn entities_display_their_id() {
    let mut entities = EntityAllocator::new();
    let entity = entities.create();
    assert_eq!(entity.to_string(), format!("entity#{}", entity.id()));
    assert_ne!(entity.id(), 0);
}

#[test]
fn transforms_default_to_identity() {
    let mut entities = EntityAllocator::new();
    let placed = entities.create();
    let unplaced = entities.create();

    let mut transforms = TransformManager::default();
    let moved = Matrix4::from_translation(Vector3::new(0.0, 0.0, -4.0));
    transforms.set(placed, moved);

    assert!(transforms.has(placed));
    assert!(!transforms.has(unplaced));
    assert_eq!(transforms.get(placed), moved);
    assert_eq!(transforms.get(unplaced), Matrix4::identity());
}
