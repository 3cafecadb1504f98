use elke::{DataTree, NodeKind, PathAddress, ScalarValue, TreeError, Value};
use serde_json::json;
use std::collections::HashSet;

fn main_input() -> Value {
    Value::from(json!({
        "component_100": {
            "type": "snglvol",
            "xgeometry": { "area": 0.25, "length": 1.0 },
            "initial_conditions": { "pressure": 1.0e6, "temperature": 300.0 },
            "param1": [2, 3, 4],
            "param2": ["abc", "def"],
            "param3": ["mixed", 123, 45.6]
        }
    }))
}

#[test]
fn nested_example_builds_typed_nodes() -> Result<(), Box<dyn std::error::Error>> {
    let tree = DataTree::build("MainInput", &main_input())?;

    assert_eq!(tree.name(), "MainInput");
    assert_eq!(tree.root().kind(), NodeKind::Map);
    assert_eq!(tree.root().address().to_string(), "MainInput/");

    let component = tree.lookup("MainInput/component_100/").ok_or("missing component")?;
    assert_eq!(component.kind(), NodeKind::Map);
    assert_eq!(component.value(), None);

    let ty = tree.lookup("MainInput/component_100/type/").ok_or("missing type")?;
    assert_eq!(ty.kind(), NodeKind::Scalar);
    assert_eq!(ty.value(), Some(&ScalarValue::Str("snglvol".to_string())));

    let area = tree
        .lookup("MainInput/component_100/xgeometry/area/")
        .ok_or("missing area")?;
    assert_eq!(area.value(), Some(&ScalarValue::Real(0.25)));

    let length = tree
        .lookup("MainInput/component_100/xgeometry/length")
        .ok_or("missing length")?;
    assert_eq!(length.value(), Some(&ScalarValue::Real(1.0)));

    let param1 = tree.lookup("MainInput/component_100/param1/").ok_or("missing param1")?;
    assert_eq!(param1.kind(), NodeKind::Sequence);

    let items: Vec<_> = tree
        .children(param1.address())
        .map(|n| (n.name().to_string(), n.kind(), n.value().cloned()))
        .collect();
    assert_eq!(
        items,
        vec![
            ("0".to_string(), NodeKind::Scalar, Some(ScalarValue::Int(2))),
            ("1".to_string(), NodeKind::Scalar, Some(ScalarValue::Int(3))),
            ("2".to_string(), NodeKind::Scalar, Some(ScalarValue::Int(4))),
        ]
    );
    Ok(())
}

#[test]
fn mixed_sequence_keeps_each_element_type() -> Result<(), Box<dyn std::error::Error>> {
    let tree = DataTree::build("MainInput", &main_input())?;

    let values: Vec<_> = (0..3)
        .map(|i| {
            tree.lookup(&format!("MainInput/component_100/param3/{}/", i))
                .and_then(|n| n.value().cloned())
        })
        .collect();
    assert_eq!(
        values,
        vec![
            Some(ScalarValue::Str("mixed".to_string())),
            Some(ScalarValue::Int(123)),
            Some(ScalarValue::Real(45.6)),
        ]
    );
    Ok(())
}

#[test]
fn nested_sequences_and_maps_are_addressed_by_position() -> Result<(), Box<dyn std::error::Error>> {
    let graph = Value::from(json!({
        "grid": [[1, 2], [3]],
        "blocks": [{ "name": "a", "on": true }, {}]
    }));
    let tree = DataTree::build("T", &graph)?;

    let inner = tree.lookup("T/grid/0/").ok_or("missing grid/0")?;
    assert_eq!(inner.kind(), NodeKind::Sequence);
    assert_eq!(
        tree.lookup("T/grid/1/0/").and_then(|n| n.value()),
        Some(&ScalarValue::Int(3))
    );

    let block = tree.lookup("T/blocks/0/").ok_or("missing block")?;
    assert_eq!(block.kind(), NodeKind::Map);
    assert_eq!(
        tree.lookup("T/blocks/0/on/").and_then(|n| n.value()),
        Some(&ScalarValue::Bool(true))
    );

    let empty = tree.lookup("T/blocks/1/").ok_or("missing empty block")?;
    assert_eq!(empty.kind(), NodeKind::Map);
    assert_eq!(tree.children(empty.address()).count(), 0);
    Ok(())
}

#[test]
fn nodes_are_unique_and_kind_consistent() -> Result<(), Box<dyn std::error::Error>> {
    let tree = DataTree::build("MainInput", &main_input())?;

    let addresses: HashSet<&PathAddress> = tree.iter().map(|n| n.address()).collect();
    assert_eq!(addresses.len(), tree.len());

    for node in tree.iter() {
        assert_eq!(node.value().is_some(), node.kind() == NodeKind::Scalar);
    }
    Ok(())
}

#[test]
fn ancestors_precede_descendants() -> Result<(), Box<dyn std::error::Error>> {
    let tree = DataTree::build("MainInput", &main_input())?;

    let mut seen = HashSet::new();
    for node in tree.iter() {
        if let Some(parent) = node.address().parent() {
            assert!(seen.contains(&parent), "{} before its parent", node.address());
        }
        seen.insert(node.address().clone());
    }
    Ok(())
}

#[test]
fn null_value_is_rejected() {
    let graph = Value::from(json!({ "a": { "ok": 1, "missing": null } }));

    let res = DataTree::build("T", &graph);
    assert!(matches!(
        res,
        Err(TreeError::UnsupportedType { ref address, ref type_name })
            if address == "T/a/missing/" && type_name == "null"
    ));
}

#[test]
fn value_without_scalar_mapping_is_rejected() {
    let graph = Value::map([("list", Value::List(vec![Value::Other("binary".to_string())]))]);

    let res = DataTree::build("T", &graph);
    assert!(matches!(
        res,
        Err(TreeError::UnsupportedType { ref address, .. }) if address == "T/list/0/"
    ));
}

#[test]
fn out_of_range_unsigned_is_rejected() {
    let graph = Value::from(json!({ "big": u64::MAX }));
    assert!(matches!(
        DataTree::build("T", &graph),
        Err(TreeError::UnsupportedType { .. })
    ));
}

#[test]
fn key_with_separator_is_rejected() {
    let graph = Value::map([("a/b", Value::from(1))]);
    assert!(matches!(
        DataTree::build("T", &graph),
        Err(TreeError::InvalidSegment(ref s)) if s == "a/b"
    ));

    assert!(matches!(
        DataTree::build("T/U", &Value::Map(Vec::new())),
        Err(TreeError::InvalidSegment(_))
    ));
}

#[test]
fn empty_key_is_rejected() {
    let graph = Value::map([("a", Value::map([("", Value::from(1))]))]);
    assert!(matches!(
        DataTree::build("T", &graph),
        Err(TreeError::InvalidSegment(ref s)) if s.is_empty()
    ));

    assert!(matches!(
        DataTree::build("", &Value::Map(Vec::new())),
        Err(TreeError::InvalidSegment(_))
    ));
}

#[test]
fn duplicate_keys_are_rejected() {
    let graph = Value::map([("a", Value::from(1)), ("a", Value::from(2))]);
    assert!(matches!(
        DataTree::build("T", &graph),
        Err(TreeError::DuplicateAddress(ref a)) if a == "T/a/"
    ));
}

#[test]
fn root_must_be_a_map() {
    let graph = Value::List(vec![Value::from(1)]);
    assert!(matches!(
        DataTree::build("T", &graph),
        Err(TreeError::RootNotMap("sequence"))
    ));
}

#[test]
fn full_width_integers_survive() -> Result<(), Box<dyn std::error::Error>> {
    let graph = Value::map([
        ("big", Value::from(i64::MAX)),
        ("small", Value::from(i64::MIN)),
        ("byte", Value::from(300)),
    ]);
    let tree = DataTree::build("T", &graph)?;

    assert_eq!(
        tree.lookup("T/big").and_then(|n| n.value()),
        Some(&ScalarValue::Int(i64::MAX))
    );
    assert_eq!(
        tree.lookup("T/small").and_then(|n| n.value()),
        Some(&ScalarValue::Int(i64::MIN))
    );
    assert_eq!(
        tree.lookup("T/byte").and_then(|n| n.value()),
        Some(&ScalarValue::Int(300))
    );
    Ok(())
}

#[test]
fn lookup_of_unknown_address_is_none() -> Result<(), Box<dyn std::error::Error>> {
    let tree = DataTree::build("MainInput", &main_input())?;

    assert!(tree.lookup("MainInput/nothing/").is_none());
    assert!(tree.lookup("Other/component_100/").is_none());
    assert!(tree.lookup("").is_none());

    let missing = PathAddress::root("MainInput")?.child("nothing")?;
    assert_eq!(tree.children(&missing).count(), 0);
    Ok(())
}
