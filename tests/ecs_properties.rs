use std::collections::BTreeMap;

use proptest::prelude::*;
use savanna::core::{EntityId, SimulationConfig, Vec2};
use savanna::ecs::{ComponentKind, ComponentMask, World};
use savanna::entity::{Health, Position};

#[derive(Debug, Clone)]
enum Op {
    Create,
    Destroy(usize),
    AddPosition(usize, f32, f32),
    RemovePosition(usize),
    AddHealth(usize, i16),
    RemoveHealth(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Create),
        1 => any::<usize>().prop_map(Op::Destroy),
        3 => (any::<usize>(), 0.0f32..1000.0, 0.0f32..1000.0).prop_map(|(i, x, y)| Op::AddPosition(i, x, y)),
        1 => any::<usize>().prop_map(Op::RemovePosition),
        2 => (any::<usize>(), 1i16..200).prop_map(|(i, h)| Op::AddHealth(i, h)),
        1 => any::<usize>().prop_map(Op::RemoveHealth),
    ]
}

#[derive(Debug, Default, Clone, Copy)]
struct Expected {
    position: bool,
    health: bool,
}

fn pick(live: &BTreeMap<u32, Expected>, i: usize) -> Option<EntityId> {
    if live.is_empty() {
        return None;
    }
    live.keys().nth(i % live.len()).map(|&raw| EntityId(raw))
}

fn small_world() -> World {
    let mut config = SimulationConfig::default();
    config.world.size_tiles = 32;
    config.world.max_entities = 64;
    World::new(config).unwrap()
}

proptest! {
    #[test]
    fn mask_matches_component_presence(ops in prop::collection::vec(op(), 1..120)) {
        let mut world = small_world();
        let mut live: BTreeMap<u32, Expected> = BTreeMap::new();
        let mut destroyed: Vec<EntityId> = Vec::new();

        for op in ops {
            match op {
                Op::Create => {
                    if let Ok(id) = world.create_entity() {
                        prop_assert!(!live.contains_key(&id.0));
                        prop_assert_eq!(world.mask(id), ComponentMask::EMPTY);
                        if let Some(&last) = destroyed.last() {
                            prop_assert_eq!(id, last, "most recently freed id is reused first");
                            destroyed.pop();
                        }
                        live.insert(id.0, Expected::default());
                    }
                }
                Op::Destroy(i) => {
                    if let Some(id) = pick(&live, i) {
                        prop_assert!(world.destroy_entity(id));
                        prop_assert!(!world.destroy_entity(id));
                        live.remove(&id.0);
                        destroyed.push(id);
                    }
                }
                Op::AddPosition(i, x, y) => {
                    if let Some(id) = pick(&live, i) {
                        prop_assert!(world.add(id, Position::new(x, y)));
                        live.entry(id.0).or_default().position = true;
                    }
                }
                Op::RemovePosition(i) => {
                    if let Some(id) = pick(&live, i) {
                        let expected = live[&id.0].position;
                        prop_assert_eq!(world.remove::<Position>(id), expected);
                        live.entry(id.0).or_default().position = false;
                    }
                }
                Op::AddHealth(i, hp) => {
                    if let Some(id) = pick(&live, i) {
                        prop_assert!(world.add(id, Health::full(hp)));
                        live.entry(id.0).or_default().health = true;
                    }
                }
                Op::RemoveHealth(i) => {
                    if let Some(id) = pick(&live, i) {
                        let expected = live[&id.0].health;
                        prop_assert_eq!(world.remove::<Health>(id), expected);
                        live.entry(id.0).or_default().health = false;
                    }
                }
            }

            for (&raw, expected) in &live {
                let id = EntityId(raw);
                let mask = world.mask(id);
                prop_assert!(world.is_alive(id));
                prop_assert_eq!(mask.has(ComponentKind::Position), expected.position);
                prop_assert_eq!(mask.has(ComponentKind::Health), expected.health);
                prop_assert_eq!(world.has::<Position>(id), expected.position);
                prop_assert_eq!(world.get::<Health>(id).is_some(), expected.health);
                prop_assert_eq!(world.spatial().entry(id).is_some(), expected.position);
            }
            for &id in &destroyed {
                prop_assert!(!world.is_alive(id));
                prop_assert_eq!(world.mask(id), ComponentMask::EMPTY);
                prop_assert!(world.get::<Position>(id).is_none());
                prop_assert!(world.spatial().entry(id).is_none());
            }
            prop_assert_eq!(world.entity_count(), live.len());
        }
    }

    #[test]
    fn recycled_ids_start_clean(hp in 1i16..100, x in 0.0f32..500.0, y in 0.0f32..500.0) {
        let mut world = small_world();
        let id = world.create_entity().unwrap();
        world.add(id, Position::new(x, y));
        world.add(id, Health::full(hp));
        world.destroy_entity(id);

        let reused = world.create_entity().unwrap();
        prop_assert_eq!(reused, id);
        prop_assert_eq!(world.mask(reused), ComponentMask::EMPTY);
        prop_assert!(world.query_radius(Vec2::new(x, y), 1.0).is_empty());
    }
}
