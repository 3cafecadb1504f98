use crate::node::Value;
use crate::render::RenderOptions;
use crate::tree::DataTree;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Loads an input graph. `.json` files go through serde_json, anything
/// else is read as YAML.
pub fn load_graph(path: &str) -> Result<Value> {
    let data =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))?;

    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let json: serde_json::Value = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse JSON: {}", path))?;
        Ok(Value::from(json))
    } else {
        let yaml: serde_yaml::Value = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse YAML: {}", path))?;
        Ok(Value::from_yaml(yaml)?)
    }
}

pub fn save_tree(path: &str, tree: &DataTree, options: &RenderOptions) -> Result<()> {
    fs::write(path, tree.serialize_with(options))
        .with_context(|| format!("Failed to write to file: {}", path))?;
    Ok(())
}

pub fn load_tree(path: &str) -> Result<DataTree> {
    let data =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))?;
    let tree =
        DataTree::from_yaml(&data).with_context(|| format!("Failed to rebuild tree: {}", path))?;
    Ok(tree)
}

pub fn exists(path: &str) -> bool {
    Path::new(path).exists()
}

/// Tree name used when none is given: the file stem.
pub fn default_root_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("root")
        .to_string()
}
