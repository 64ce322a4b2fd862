use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use prettystruct::{Error, Pretty, PrettyJson, Registry, Restore, Symbol, Truthy, Value};

#[derive(Pretty)]
#[pretty(eq, truthy, hash, json)]
struct Abc {
    a: i64,
    #[pretty(variadic)]
    b: Vec<Value>,
    c: i64,
    #[pretty(default = 4)]
    d: i64,
    e: i64,
    #[pretty(kwargs)]
    f: BTreeMap<String, String>,
}

fn extras() -> BTreeMap<String, String> {
    BTreeMap::from([("g".to_string(), "A".to_string()), ("h".to_string(), "B".to_string())])
}

fn abc() -> Abc {
    Abc::new(
        1,
        vec![Value::Int(2), Value::Seq(vec![Value::Int(3), Value::Int(4)])],
        5,
        1,
        7,
        extras(),
    )
}

fn hash_of(value: &impl Hash) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn init_stores_every_parameter() {
    let abc = abc();
    assert_eq!(abc.a, 1);
    assert_eq!(
        abc.b,
        vec![Value::Int(2), Value::Seq(vec![Value::Int(3), Value::Int(4)])]
    );
    assert_eq!(abc.c, 5);
    assert_eq!(abc.d, 1);
    assert_eq!(abc.e, 7);
    assert_eq!(abc.f, extras());
}

#[test]
fn display_and_debug_forms() {
    let abc = abc();
    assert_eq!(abc.to_string(), "Abc(1, 2, [3, 4], c=5, d=1, e=7, g=A, h=B)");
    assert_eq!(
        format!("{abc:?}"),
        "Abc(1, 2, [3, 4], c=5, d=1, e=7, g=\"A\", h=\"B\")"
    );
}

#[test]
fn textual_form_omits_defaults() {
    let abc = Abc::new(
        1,
        vec![Value::Int(2), Value::Seq(vec![Value::Int(3), Value::Int(4)])],
        5,
        4,
        7,
        extras(),
    );
    assert_eq!(
        format!("{abc:?}"),
        "Abc(1, 2, [3, 4], c=5, e=7, g=\"A\", h=\"B\")"
    );
}

#[test]
fn copy_replays_the_constructor() {
    let abc = abc();
    let copy = abc.clone();
    assert_eq!(copy, abc);
    assert_eq!(format!("{copy:?}"), format!("{abc:?}"));
}

#[test]
fn equality_tracks_variadic_contents() {
    let abc = abc();
    assert_eq!(abc, abc.clone());
    let abb = Abc::new(
        1,
        vec![Value::Int(1), Value::Seq(vec![Value::Int(3), Value::Int(4)])],
        5,
        1,
        7,
        extras(),
    );
    assert_ne!(abc, abb);
}

#[test]
fn equality_treats_one_sided_keywords_as_unequal() {
    let abc = abc();
    let mut fewer = extras();
    fewer.remove("h");
    let other = Abc::new(1, abc.b.clone(), 5, 1, 7, fewer);
    assert_ne!(abc, other);
}

#[test]
fn truthiness_follows_rebound_arguments() {
    assert!(abc().is_truthy());
    let abb = Abc::new(
        1,
        vec![Value::Int(0), Value::Seq(vec![Value::Int(3), Value::Int(4)])],
        5,
        1,
        7,
        extras(),
    );
    assert!(!abb.is_truthy());
}

#[test]
fn hash_is_stable_and_state_sensitive() {
    let abc = abc();
    assert_eq!(hash_of(&abc), hash_of(&abc));
    let abb = Abc::new(
        1,
        vec![Value::Int(1), Value::Seq(vec![Value::Int(3), Value::Int(4)])],
        5,
        1,
        7,
        extras(),
    );
    assert_ne!(hash_of(&abc), hash_of(&abb));
}

#[test]
fn json_round_trip_is_idempotent() {
    let abc = abc();
    let json = abc.to_json().unwrap();
    let wire: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        wire,
        serde_json::json!([
            "Abc",
            [1, 2, [3, 4]],
            { "c": 5, "d": 1, "e": 7, "g": "A", "h": "B" }
        ])
    );

    let back = Abc::from_json(&json, &Registry::new()).unwrap();
    assert_eq!(back, abc);
    assert_eq!(back.to_json().unwrap(), json);
}

#[test]
fn decode_rejects_malformed_payloads() {
    assert!(matches!(
        Abc::from_json("{}", &Registry::new()),
        Err(Error::InvalidStructure)
    ));
    assert!(matches!(
        Abc::from_json("[\"Abc\", [], {}, 0]", &Registry::new()),
        Err(Error::InvalidStructure)
    ));
    assert!(matches!(
        Abc::from_json("[\"Zzz\", []]", &Registry::new()),
        Err(Error::ClassMismatch { expected, found })
            if expected == "Abc" && found == "Zzz"
    ));
}

#[derive(Pretty)]
#[pretty(eq, json)]
struct Wrap {
    #[pretty(extends)]
    abc: Abc,
    z: i64,
}

#[test]
fn chained_copy_routes_keyword_extras_to_the_base() {
    let wrap = Wrap::new(abc(), 9);
    assert_eq!(
        wrap.to_string(),
        "Wrap(1, 2, [3, 4], c=5, d=1, e=7, z=9, g=A, h=B)"
    );
    let copy = wrap.clone();
    assert_eq!(copy, wrap);
    assert_eq!(copy.abc.f, extras());
    assert_eq!(copy.z, 9);
}

#[test]
fn chained_equality_tracks_base_keyword_extras() {
    let wrap = Wrap::new(abc(), 9);
    let mut fewer = extras();
    fewer.remove("h");
    let other = Wrap::new(Abc::new(1, wrap.abc.b.clone(), 5, 1, 7, fewer), 9);
    assert_ne!(wrap, other);
    assert_eq!(wrap, Wrap::new(abc(), 9));
}

#[test]
fn chained_json_round_trip_with_variadic_base() {
    let wrap = Wrap::new(abc(), 9);
    let json = wrap.to_json().unwrap();
    let wire: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        wire,
        serde_json::json!([
            "Wrap",
            [1, 2, [3, 4]],
            { "c": 5, "d": 1, "e": 7, "z": 9, "g": "A", "h": "B" }
        ])
    );

    let back = Wrap::from_json(&json, &Registry::new()).unwrap();
    assert_eq!(back, wrap);
    assert_eq!(back.abc.f, extras());
    assert_eq!(back.to_json().unwrap(), json);
}

#[test]
fn restore_bypasses_the_constructor() {
    let mut abc = abc();
    abc.restore(&[("a".to_string(), Value::Int(9))]).unwrap();
    assert_eq!(abc.a, 9);
    assert!(matches!(
        abc.restore(&[("zz".to_string(), Value::Int(0))]),
        Err(Error::UnknownField(name)) if name == "zz"
    ));
}

#[derive(Pretty)]
#[pretty(eq, json)]
struct Point {
    x: i64,
    #[pretty(default = 0)]
    y: i64,
}

#[derive(Pretty)]
#[pretty(eq)]
struct Label {
    #[pretty(extends)]
    point: Point,
    text: String,
}

#[test]
fn chained_construction_populates_ancestor_parameters() {
    let label = Label::new(Point::new(1, 2), "origin".to_string());
    assert_eq!(label.point.x, 1);
    assert_eq!(label.point.y, 2);
    assert_eq!(label.to_string(), "Label(1, 2, origin)");

    // an ancestor parameter at its default drops out of the textual form
    // and pushes later parameters into keyword position
    let label = Label::new(Point::new(1, 0), "origin".to_string());
    assert_eq!(label.to_string(), "Label(1, text=origin)");
}

#[test]
fn chained_copy_and_equality() {
    let label = Label::new(Point::new(1, 2), "origin".to_string());
    let copy = label.clone();
    assert_eq!(copy, label);
    assert_ne!(copy, Label::new(Point::new(1, 3), "origin".to_string()));
}

#[test]
fn restore_reaches_embedded_state() {
    let mut label = Label::new(Point::new(1, 2), "origin".to_string());
    label.restore(&[("x".to_string(), Value::Int(9))]).unwrap();
    assert_eq!(label.point.x, 9);
    assert!(matches!(
        label.restore(&[("zz".to_string(), Value::Int(0))]),
        Err(Error::UnknownField(name)) if name == "zz"
    ));
}

#[test]
fn decode_accepts_mapping_elision_and_refills_defaults() {
    let point = Point::from_json("[\"Point\", {\"x\": 1}]", &Registry::new()).unwrap();
    assert_eq!(point, Point::new(1, 0));
}

#[derive(Pretty)]
#[pretty(eq, json)]
struct Inner {
    v: i64,
}

#[derive(Pretty)]
#[pretty(eq, json)]
struct Outer {
    inner: Inner,
    tag: Symbol,
}

#[test]
fn nested_objects_and_symbols_round_trip() {
    let outer = Outer::new(Inner::new(7), Symbol::new("Widget"));
    let json = outer.to_json().unwrap();
    let wire: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        wire,
        serde_json::json!(["Outer", [["Inner", [7], {}], "Widget"], {}])
    );

    let registry = Registry::new().with::<Inner>();
    let back = Outer::from_json(&json, &registry).unwrap();
    assert_eq!(back, outer);
}

#[test]
fn nested_typed_mappings_decode() {
    let registry = Registry::new().with::<Inner>();
    let outer = Outer::from_json(
        "[\"Outer\", [{\"type\": \"Inner\", \"v\": 7}, \"Widget\"], {}]",
        &registry,
    )
    .unwrap();
    assert_eq!(outer, Outer::new(Inner::new(7), Symbol::new("Widget")));
}

#[test]
fn nested_display_prefers_pretty_forms() {
    let outer = Outer::new(Inner::new(7), Symbol::new("Widget"));
    assert_eq!(outer.to_string(), "Outer(Inner(7), Widget)");
    assert_eq!(format!("{outer:?}"), "Outer(Inner(7), Widget)");
}

#[derive(Pretty)]
struct Empty {}

#[test]
fn empty_parameter_lists_still_work() {
    let empty = Empty::new();
    assert_eq!(empty.to_string(), "Empty()");
    let copy = empty.clone();
    assert_eq!(copy.to_string(), "Empty()");
}
