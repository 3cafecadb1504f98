use elke::{PathAddress, TreeError};
use std::collections::HashSet;

#[test]
fn root_and_child_render_with_trailing_separator() -> Result<(), Box<dyn std::error::Error>> {
    let root = PathAddress::root("MainInput")?;
    assert_eq!(root.to_string(), "MainInput/");

    let area = root.child("component_100")?.child("xgeometry")?.child("area")?;
    assert_eq!(area.to_string(), "MainInput/component_100/xgeometry/area/");
    assert_eq!(area.name(), "area");
    assert_eq!(area.depth(), 4);
    Ok(())
}

#[test]
fn separator_in_segment_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let root = PathAddress::root("MainInput")?;

    let res = root.child("a/b");
    assert!(matches!(res, Err(TreeError::InvalidSegment(ref s)) if s == "a/b"));

    assert!(matches!(
        PathAddress::root("Main/Input"),
        Err(TreeError::InvalidSegment(_))
    ));
    assert!(matches!(root.child(""), Err(TreeError::InvalidSegment(_))));
    Ok(())
}

#[test]
fn parent_and_direct_children() -> Result<(), Box<dyn std::error::Error>> {
    let root = PathAddress::root("T")?;
    let list = root.child("param1")?;
    let item = list.child("0")?;

    assert_eq!(item.parent(), Some(list.clone()));
    assert_eq!(list.parent(), Some(root.clone()));
    assert_eq!(root.parent(), None);

    assert!(list.is_parent_of(&item));
    assert!(root.is_parent_of(&list));
    assert!(!root.is_parent_of(&item));
    assert!(!item.is_parent_of(&list));
    Ok(())
}

#[test]
fn parse_accepts_canonical_text() -> Result<(), Box<dyn std::error::Error>> {
    let built = PathAddress::root("T")?.child("a")?.child("b")?;

    let parsed: PathAddress = "T/a/b/".parse()?;
    assert_eq!(parsed, built);

    let without_trailing: PathAddress = "T/a/b".parse()?;
    assert_eq!(without_trailing, built);

    assert!("".parse::<PathAddress>().is_err());
    assert!("T//b/".parse::<PathAddress>().is_err());
    Ok(())
}

#[test]
fn equality_and_hash_follow_segments() -> Result<(), Box<dyn std::error::Error>> {
    let a = PathAddress::root("T")?.child("x")?;
    let b: PathAddress = "T/x/".parse()?;
    let c = PathAddress::root("T")?.child("y")?;

    let mut set = HashSet::new();
    set.insert(a.clone());
    assert!(set.contains(&b));
    assert!(!set.contains(&c));
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn serde_uses_canonical_string() -> Result<(), Box<dyn std::error::Error>> {
    let address = PathAddress::root("T")?.child("param1")?.child("2")?;

    let json = serde_json::to_string(&address)?;
    assert_eq!(json, "\"T/param1/2/\"");

    let back: PathAddress = serde_json::from_str(&json)?;
    assert_eq!(back, address);

    assert!(serde_json::from_str::<PathAddress>("\"T//\"").is_err());
    Ok(())
}
