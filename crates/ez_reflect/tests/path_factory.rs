use std::sync::atomic::{AtomicI32, Ordering};

use ez_reflect::TypeRegistryArc;
use ez_reflect::access::{PathError, ReflectionPathFactory};
use ez_reflect::derive::Reflect;
use ez_reflect::member::{MemberDescriptor, MethodDescriptor, Visibility};
use ez_reflect::registry::TypeMeta;

// -----------------------------------------------------------------------------
// Fixtures

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
struct Stats {
    pub hp: i32,
    pub mana: i32,
}

#[derive(Reflect, Default)]
struct Unit {
    pub name: String,
}

#[derive(Reflect, Default)]
#[reflect(extend = hero_members)]
struct Hero {
    #[reflect(base)]
    pub unit: Unit,
    pub stats: Stats,
    #[reflect(read_only)]
    pub id: u32,
    shield: Stats,
}

impl Hero {
    fn shield(&self) -> Stats {
        self.shield.clone()
    }

    fn set_shield(&mut self, shield: Stats) {
        self.shield = shield;
    }
}

fn hero_members(meta: &mut TypeMeta) {
    meta.push_member(MemberDescriptor::property::<Hero, Stats>(
        "Shield",
        Visibility::Public,
        Some(Hero::shield),
        Some(Hero::set_shield),
    ));
    meta.push_method(MethodDescriptor::shared::<Hero, (i32,), i32>("damage", Visibility::Public, |hero, (times,)| {
        hero.stats.hp * times
    }));
    meta.push_method(MethodDescriptor::exclusive::<Hero, (i32,), i32>("heal", Visibility::Public, |hero, (amount,)| {
        hero.stats.hp += amount;
        hero.stats.hp
    }));
}

static VOLUME: AtomicI32 = AtomicI32::new(5);

#[derive(Reflect, Default)]
#[reflect(extend = settings_members)]
struct Settings;

fn settings_members(meta: &mut TypeMeta) {
    meta.push_member(MemberDescriptor::static_field::<Settings, i32>(
        "volume",
        Visibility::Public,
        || VOLUME.load(Ordering::Relaxed),
        Some(|value| VOLUME.store(value, Ordering::Relaxed)),
    ));
    meta.push_method(MethodDescriptor::static_method::<Settings, (i32, i32), i32>(
        "clamp",
        Visibility::Public,
        |(value, max)| value.min(max),
    ));
}

fn hero() -> Hero {
    Hero {
        unit: Unit { name: String::from("Aria") },
        stats: Stats { hp: 10, mana: 3 },
        id: 7,
        shield: Stats { hp: 1, mana: 0 },
    }
}

// -----------------------------------------------------------------------------
// Instance paths

#[test]
fn nested_fields_and_base_members() {
    let factory = ReflectionPathFactory::new(TypeRegistryArc::default());
    let mut hero = hero();

    let hp = factory.build_getter::<Hero, i32>("stats.hp").unwrap();
    let set_hp = factory.build_setter::<Hero, i32>("stats.hp").unwrap();
    assert_eq!(hp.get(&hero), Ok(10));
    set_hp.set(&mut hero, 25).unwrap();
    assert_eq!(hero.stats.hp, 25);

    let name = factory.build_getter::<Hero, String>("name").unwrap();
    assert_eq!(name.get(&hero).unwrap(), "Aria");
}

#[test]
fn properties_are_written_back() {
    let factory = ReflectionPathFactory::new(TypeRegistryArc::default());
    let mut hero = hero();

    let set = factory.build_setter::<Hero, i32>("Shield.mana").unwrap();
    set.set(&mut hero, 40).unwrap();
    assert_eq!(hero.shield, Stats { hp: 1, mana: 40 });

    let get = factory.build_getter::<Hero, Stats>("Shield").unwrap();
    assert_eq!(get.get(&hero).unwrap().mana, 40);
}

#[test]
fn terminal_method_calls() {
    let factory = ReflectionPathFactory::new(TypeRegistryArc::default());
    let mut hero = hero();

    let damage = factory.build_getter::<Hero, i32>("damage(3)").unwrap();
    assert_eq!(damage.get(&hero), Ok(30));

    let heal = factory.build_invoker::<Hero, i32>("heal(5)").unwrap();
    assert_eq!(heal.invoke(&mut hero), Ok(15));

    // `()` drops the result.
    let heal_quietly = factory.build_invoker::<Hero, ()>("heal(1)").unwrap();
    heal_quietly.invoke(&mut hero).unwrap();
    assert_eq!(hero.stats.hp, 16);
}

#[test]
fn paths_are_cached() {
    let factory = ReflectionPathFactory::new(TypeRegistryArc::default());
    factory.build_getter::<Hero, i32>("stats.hp").unwrap();
    factory.build_getter::<Hero, i32>("stats.hp").unwrap();
    assert_eq!(factory.cached(), 1);

    factory.build_setter::<Hero, i32>("stats.hp").unwrap();
    assert_eq!(factory.cached(), 2);
}

// -----------------------------------------------------------------------------
// Static roots

#[test]
fn static_roots() {
    let factory = ReflectionPathFactory::new(TypeRegistryArc::default());
    factory.registry().write().register::<Settings>();

    let volume = factory.build_static_getter::<i32>("-t:Settings -p:volume").unwrap();
    let set_volume = factory.build_static_setter::<i32>("-t:Settings -p:volume").unwrap();
    set_volume.set(8).unwrap();
    assert_eq!(volume.get(), Ok(8));

    let clamp = factory.build_static_invoker::<i32>("-t:Settings -p:clamp(12, 10)").unwrap();
    assert_eq!(clamp.invoke(), Ok(10));

    let err = factory.build_static_getter::<i32>("volume").unwrap_err();
    assert!(matches!(err, PathError::MissingStaticRoot { .. }));

    let err = factory.build_static_getter::<i32>("-t:Nowhere -p:volume").unwrap_err();
    assert!(matches!(err, PathError::UnknownType { .. }));
}

// -----------------------------------------------------------------------------
// Validation

#[test]
fn invalid_paths_fail_when_built() {
    let factory = ReflectionPathFactory::new(TypeRegistryArc::default());

    let err = factory.build_getter::<Hero, i32>("stats.speed").unwrap_err();
    assert!(matches!(err, PathError::MemberNotFound { ref member, .. } if member == "speed"));

    let err = factory.build_getter::<Hero, i32>("damage(1).hp").unwrap_err();
    assert!(matches!(err, PathError::MethodNotTerminal { method: "damage" }));

    let err = factory.build_getter::<Hero, i32>("damage(1, 2)").unwrap_err();
    assert!(matches!(err, PathError::ArgumentCount { expected: 1, actual: 2, .. }));

    let err = factory.build_getter::<Hero, i32>("damage(\"x\")").unwrap_err();
    assert!(matches!(err, PathError::ArgumentMismatch { index: 0, .. }));

    let err = factory.build_getter::<Hero, i64>("stats.hp").unwrap_err();
    assert!(matches!(err, PathError::TypeMismatch { member: "hp", .. }));

    let err = factory.build_getter::<Hero, i32>("heal(1)").unwrap_err();
    assert!(matches!(err, PathError::ExclusiveReceiver { method: "heal" }));

    let err = factory.build_setter::<Hero, u32>("id").unwrap_err();
    assert!(matches!(err, PathError::NotWritable { member: "id" }));

    let err = factory.build_invoker::<Hero, i32>("stats").unwrap_err();
    assert!(matches!(err, PathError::NotInvokable { member: "stats" }));

    let err = factory.build_getter::<Hero, i32>("stats..hp").unwrap_err();
    assert!(matches!(err, PathError::Parse { .. }));
}
