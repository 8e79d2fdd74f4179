use std::sync::Arc;

use ez_reflect::derive::Reflect;
use ez_reflect::member::{MemberDescriptor, Visibility};
use ez_reflect::registry::TypeMeta;
use ez_serial::binary::{BinaryReader, BinaryWriter};
use ez_serial::processor::ProcessorKind;
use ez_serial::{SerializationData, SerializationError, Serializer};

// -----------------------------------------------------------------------------
// Fixtures

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
#[reflect(serializable, default)]
struct Player {
    pub id: i32,
    pub name: String,
    pub health: f32,
    pub scores: Vec<i32>,
}

fn test_player() -> Player {
    Player {
        id: 100,
        name: String::from("TestPlayer"),
        health: 75.5,
        scores: vec![100, 200, 300],
    }
}

#[derive(Reflect, Default, Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
enum Class {
    #[default]
    Warrior = 1,
    Mage = 2,
    Rogue = 9,
}

#[derive(Reflect, Default, Debug, Clone, Copy, PartialEq)]
#[reflect(unmanaged)]
struct Vec3 {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(serializable, default)]
struct Entity {
    pub id: u32,
    pub position: Vec3,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
struct Hero {
    #[reflect(base)]
    pub entity: Entity,
    pub class: Class,
    pub title: Option<String>,
    pub path: Vec<Vec3>,
    #[reflect(non_serialized)]
    pub cached_power: u64,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(serializable, default)]
struct Node {
    pub value: i32,
    pub children: Vec<Node>,
}

// -----------------------------------------------------------------------------
// Composite round trips

#[test]
fn player_round_trip() {
    let serializer = Serializer::default();
    let player = test_player();

    let bytes = serializer.serialize_to_binary(&player).unwrap();
    // id, name, health, then the three scores as fixed-width i32.
    assert_eq!(&bytes[..3], &[0xC8, 0x01, 10]);
    assert_eq!(bytes.len(), 2 + 11 + 4 + 1 + 12);

    let decoded = serializer.deserialize_from_binary::<Player>(&bytes).unwrap();
    assert_eq!(decoded.id, 100);
    assert_eq!(decoded.name, "TestPlayer");
    assert_eq!(decoded.health, 75.5);
    assert_eq!(decoded.scores, [100, 200, 300]);
}

#[test]
fn derived_type_inherits_configuration() {
    let serializer = Serializer::default();
    let hero = Hero {
        entity: Entity {
            id: 7,
            position: Vec3 { x: 1.0, y: 2.0, z: 3.0 },
        },
        class: Class::Rogue,
        title: Some(String::from("the Quick")),
        path: vec![Vec3::default(), Vec3 { x: -1.0, y: 0.5, z: 8.0 }],
        cached_power: 9000,
    };

    let bytes = serializer.serialize_to_binary(&hero).unwrap();
    // Base members come first: the id, then the 12-byte position blob.
    assert_eq!(bytes[0], 7);
    assert_eq!(&bytes[1..5], &1.0_f32.to_le_bytes());
    assert_eq!(bytes[13], 9);

    let decoded = serializer.deserialize_from_binary::<Hero>(&bytes).unwrap();
    assert_eq!(decoded.entity, hero.entity);
    assert_eq!(decoded.class, Class::Rogue);
    assert_eq!(decoded.title, hero.title);
    assert_eq!(decoded.path, hero.path);
    assert_eq!(decoded.cached_power, 0);

    let kinds = serializer.processors();
    assert_eq!(kinds.get_processor::<Vec3>().unwrap().kind(), ProcessorKind::GenericPrimitive);
    assert_eq!(kinds.get_processor::<Vec<Vec3>>().unwrap().kind(), ProcessorKind::GenericPrimitiveArray);
    assert_eq!(kinds.get_processor::<Class>().unwrap().kind(), ProcessorKind::Enum);
    assert_eq!(kinds.get_processor::<Hero>().unwrap().kind(), ProcessorKind::Composite);
}

#[test]
fn recursive_types() {
    let serializer = Serializer::default();
    let tree = Node {
        value: 1,
        children: vec![
            Node {
                value: 2,
                children: vec![Node { value: 4, children: Vec::new() }],
            },
            Node { value: 3, children: Vec::new() },
        ],
    };

    let bytes = serializer.serialize_to_binary(&tree).unwrap();
    assert_eq!(serializer.deserialize_from_binary::<Node>(&bytes).unwrap(), tree);
}

#[test]
fn deserialize_into_keeps_the_instance() {
    let serializer = Serializer::default();
    let mut data = SerializationData::default();
    serializer.serialize(&test_player(), &mut data).unwrap();

    let mut target = Player {
        scores: Vec::with_capacity(64),
        ..Player::default()
    };
    serializer.deserialize_into(&data, &mut target).unwrap();
    assert_eq!(target, test_player());
}

// -----------------------------------------------------------------------------
// Member selection

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(serializable(all_fields, require_explicit_field_opt_in), default)]
struct Secretive {
    pub name: String,
    hidden: u32,
    #[reflect(serialize_field)]
    kept: u32,
}

#[test]
fn explicit_opt_in() {
    let serializer = Serializer::default();
    let value = Secretive {
        name: String::from("n"),
        hidden: 5,
        kept: 6,
    };

    let bytes = serializer.serialize_to_binary(&value).unwrap();
    assert_eq!(bytes, [1, b'n', 6]);

    let decoded = serializer.deserialize_from_binary::<Secretive>(&bytes).unwrap();
    assert_eq!(decoded.hidden, 0);
    assert_eq!(decoded.kept, 6);
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(serializable(public_fields, public_properties), default, extend = add_level)]
struct Leveled {
    pub name: String,
    level: u32,
}

impl Leveled {
    fn level(&self) -> u32 {
        self.level
    }

    fn set_level(&mut self, level: u32) {
        self.level = level;
    }
}

fn add_level(meta: &mut TypeMeta) {
    meta.push_member(MemberDescriptor::property::<Leveled, u32>(
        "Level",
        Visibility::Public,
        Some(Leveled::level),
        Some(Leveled::set_level),
    ));
}

#[test]
fn properties_go_through_accessors() {
    let serializer = Serializer::default();
    let value = Leveled {
        name: String::from("x"),
        level: 300,
    };

    let bytes = serializer.serialize_to_binary(&value).unwrap();
    assert_eq!(bytes, [1, b'x', 0xAC, 0x02]);
    assert_eq!(serializer.deserialize_from_binary::<Leveled>(&bytes).unwrap(), value);
}

#[derive(Reflect, Default)]
#[reflect(serializable(inherit = false), default)]
struct Sealed {
    pub id: u32,
}

#[derive(Reflect, Default)]
#[reflect(default)]
struct Unsealed {
    #[reflect(base)]
    pub sealed: Sealed,
    pub extra: u8,
}

#[test]
fn inheritance_violation_names_the_derived_type() {
    let serializer = Serializer::default();
    assert!(serializer.serialize_to_binary(&Sealed { id: 1 }).is_ok());

    let err = serializer.serialize_to_binary(&Unsealed::default()).unwrap_err();
    match err {
        SerializationError::InheritanceViolation { derived, base } => {
            assert!(derived.ends_with("Unsealed"));
            assert!(base.ends_with("Sealed"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[derive(Reflect)]
struct Plain {
    pub id: u32,
}

#[derive(Reflect, Debug)]
#[reflect(serializable)]
struct NoDefault {
    pub id: u32,
}

#[test]
fn unsupported_and_unconstructible_types() {
    let serializer = Serializer::default();

    let err = serializer.serialize_to_binary(&Plain { id: 1 }).unwrap_err();
    assert!(matches!(err, SerializationError::UnsupportedType { type_path } if type_path.ends_with("Plain")));

    let bytes = serializer.serialize_to_binary(&NoDefault { id: 3 }).unwrap();
    let err = serializer.deserialize_from_binary::<NoDefault>(&bytes).unwrap_err();
    assert!(matches!(err, SerializationError::MissingDefaultConstructor { .. }));

    let mut target = NoDefault { id: 0 };
    serializer
        .deserialize_into(&SerializationData::from_bytes(bytes), &mut target)
        .unwrap();
    assert_eq!(target.id, 3);
}

// -----------------------------------------------------------------------------
// Primitives

#[test]
fn integer_round_trips() {
    let serializer = Serializer::default();
    for value in [0, 42, -9999, i32::MIN, i32::MAX] {
        let bytes = serializer.serialize_to_binary(&value).unwrap();
        assert_eq!(serializer.deserialize_from_binary::<i32>(&bytes).unwrap(), value);
    }

    let bytes = serializer.serialize_to_binary(&u64::MAX).unwrap();
    assert_eq!(bytes.len(), 10);
    assert_eq!(serializer.deserialize_from_binary::<u64>(&bytes).unwrap(), 18_446_744_073_709_551_615);

    for value in [i64::MIN, -1, i64::MAX] {
        let bytes = serializer.serialize_to_binary(&value).unwrap();
        assert_eq!(serializer.deserialize_from_binary::<i64>(&bytes).unwrap(), value);
    }
    for value in [i8::MIN, i8::MAX] {
        let bytes = serializer.serialize_to_binary(&value).unwrap();
        assert_eq!(bytes.len(), 1);
        assert_eq!(serializer.deserialize_from_binary::<i8>(&bytes).unwrap(), value);
    }
}

#[test]
#[allow(clippy::approx_constant, reason = "the value under test, not an approximation of pi")]
fn float_round_trips() {
    let serializer = Serializer::default();

    let bytes = serializer.serialize_to_binary(&3.14159_f32).unwrap();
    let value = serializer.deserialize_from_binary::<f32>(&bytes).unwrap();
    assert!((value - 3.14159).abs() < 1e-5);

    let bytes = serializer.serialize_to_binary(&123.45678901234_f64).unwrap();
    let value = serializer.deserialize_from_binary::<f64>(&bytes).unwrap();
    assert!((value - 123.45678901234).abs() < 1e-8);
}

#[test]
fn large_arrays_match_the_scalar_encoding() {
    let serializer = Serializer::default();
    let ints = (0..10_000).map(|i| i * 7 - 35_000).collect::<Vec<i32>>();
    let longs = (0..10_000_i64).map(|i| i * i64::from(i32::MAX)).collect::<Vec<i64>>();

    let mut scalar = BinaryWriter::default();
    scalar.write_len(ints.len());
    ints.iter().for_each(|value| scalar.write_unmanaged(value));

    let bytes = serializer.serialize_to_binary(&ints).unwrap();
    assert_eq!(bytes, scalar.as_slice());
    assert_eq!(serializer.deserialize_from_binary::<Vec<i32>>(&bytes).unwrap(), ints);

    let bytes = serializer.serialize_to_binary(&longs).unwrap();
    assert_eq!(bytes.len(), 2 + 10_000 * 8);
    assert_eq!(serializer.deserialize_from_binary::<Vec<i64>>(&bytes).unwrap(), longs);
}

// -----------------------------------------------------------------------------
// Null and empty, per tier

#[test]
fn raw_tier_collapses_null_into_empty() {
    let mut writer = BinaryWriter::default();
    writer.write_opt_str(None);
    writer.write_str("");
    writer.write_opt_bytes(None);
    writer.write_bytes(&[]);
    assert_eq!(writer.as_slice(), &[0, 0, 0, 0]);

    let mut reader = BinaryReader::from_slice(writer.as_slice());
    assert_eq!(reader.read_string().unwrap(), "");
    assert_eq!(reader.read_string().unwrap(), "");
    assert!(reader.read_bytes().unwrap().is_empty());
    assert!(reader.read_bytes().unwrap().is_empty());
}

#[test]
fn object_tier_keeps_none_apart_from_empty() {
    let serializer = Serializer::default();

    let empty = serializer.serialize_to_binary(&String::new()).unwrap();
    assert_eq!(serializer.deserialize_from_binary::<String>(&empty).unwrap(), "");

    let none = serializer.serialize_to_binary(&None::<String>).unwrap();
    let some_empty = serializer.serialize_to_binary(&Some(String::new())).unwrap();
    assert_eq!(none, [0]);
    assert_eq!(some_empty, [1, 0]);
    assert_eq!(serializer.deserialize_from_binary::<Option<String>>(&none).unwrap(), None);
    assert_eq!(
        serializer.deserialize_from_binary::<Option<String>>(&some_empty).unwrap(),
        Some(String::new())
    );

    let none = serializer.serialize_to_binary(&None::<Vec<i32>>).unwrap();
    let some_empty = serializer.serialize_to_binary(&Some(Vec::<i32>::new())).unwrap();
    assert_eq!(serializer.deserialize_from_binary::<Option<Vec<i32>>>(&none).unwrap(), None);
    assert_eq!(
        serializer.deserialize_from_binary::<Option<Vec<i32>>>(&some_empty).unwrap(),
        Some(Vec::new())
    );

    let empty = serializer.serialize_to_binary(&Vec::<String>::new()).unwrap();
    assert_eq!(empty, [0]);
    assert!(serializer.deserialize_from_binary::<Vec<String>>(&empty).unwrap().is_empty());
}

// -----------------------------------------------------------------------------
// Malformed input

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(serializable, default)]
struct Empty {}

#[derive(Reflect, Default, Debug, Clone, Copy, PartialEq)]
#[reflect(unmanaged)]
struct Marker;

#[test]
fn malformed_input_is_fatal() {
    let serializer = Serializer::default();

    let err = serializer.deserialize_from_binary::<u8>(&[1, 2]).unwrap_err();
    assert_eq!(err, SerializationError::TrailingBytes { remaining: 1 });

    let bytes = serializer.serialize_to_binary(&test_player()).unwrap();
    let err = serializer.deserialize_from_binary::<Player>(&bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(err, SerializationError::EndOfStream { .. }));

    let err = serializer.deserialize_from_binary::<Class>(&[4]).unwrap_err();
    assert!(matches!(err, SerializationError::InvalidDiscriminant { discriminant: 4, .. }));

    let err = serializer.deserialize_from_binary::<Option<i32>>(&[2, 0]).unwrap_err();
    assert!(matches!(err, SerializationError::InvalidBool { position: 0, value: 2 }));

    // A count far beyond the input never allocates its elements.
    let err = serializer.deserialize_from_binary::<Vec<u64>>(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]).unwrap_err();
    assert!(matches!(err, SerializationError::EndOfStream { .. }));

    // Elements that take no bytes cannot be checked against the input, so
    // their counts are bounded instead of looping 2^40 times.
    let huge = [0x80, 0x80, 0x80, 0x80, 0x80, 0x20];
    let err = serializer.deserialize_from_binary::<Vec<Empty>>(&huge).unwrap_err();
    assert!(matches!(err, SerializationError::EndOfStream { needed: 0x100_0000_0000, .. }));
    let err = serializer.deserialize_from_binary::<Vec<Marker>>(&huge).unwrap_err();
    assert!(matches!(err, SerializationError::EndOfStream { needed: 0x100_0000_0000, .. }));

    let empties = serializer.deserialize_from_binary::<Vec<Empty>>(&[2]).unwrap();
    assert_eq!(empties, [Empty {}, Empty {}]);
    let markers = serializer.deserialize_from_binary::<Vec<Marker>>(&[3]).unwrap();
    assert_eq!(markers, [Marker; 3]);
}

// -----------------------------------------------------------------------------
// Registry

#[test]
fn processors_are_cached_and_shared() {
    let serializer = Arc::new(Serializer::default());
    let first = serializer.processors().get_processor::<i32>().unwrap();
    assert_eq!(first.kind(), ProcessorKind::Int32);
    assert!(Arc::ptr_eq(&first, &serializer.processors().get_processor::<i32>().unwrap()));

    std::thread::scope(|scope| {
        for id in 0..4 {
            let serializer = &serializer;
            scope.spawn(move || {
                let player = Player { id, ..test_player() };
                let bytes = serializer.serialize_to_binary(&player).unwrap();
                assert_eq!(serializer.deserialize_from_binary::<Player>(&bytes).unwrap(), player);
            });
        }
    });
}
