//! # Document Loading
//!
//! Reads schema, input and options documents from disk. The format follows
//! the file extension: `.yaml`/`.yml` are YAML, everything else is JSON.
//! The path `-` reads standard input as YAML, which also accepts JSON.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value;

/// Document encodings the CLI understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Format::Yaml,
            _ => Format::Json,
        }
    }
}

/// Read and parse one document.
pub fn read_document(path: &Path) -> anyhow::Result<Value> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("cannot read standard input")?;
        return parse(&content, Format::Yaml).context("invalid document on standard input");
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    parse(&content, Format::from_path(path)).with_context(|| format!("invalid document {}", path.display()))
}

/// Parse document text in the given format.
pub fn parse(content: &str, format: Format) -> anyhow::Result<Value> {
    match format {
        Format::Json => serde_json::from_str(content).context("invalid JSON"),
        Format::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content).context("invalid YAML")?;
            yaml_to_json(&yaml)
        }
    }
}

/// Convert a YAML tree into the JSON subset. Scalar map keys become
/// strings and tags are dropped.
fn yaml_to_json(yaml: &serde_yaml::Value) -> anyhow::Result<Value> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                match n.as_f64().and_then(serde_json::Number::from_f64) {
                    Some(number) => Value::Number(number),
                    None => bail!("cannot represent YAML number {n} in JSON"),
                }
            }
        }
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.iter().map(yaml_to_json).collect::<anyhow::Result<_>>()?)
        }
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                let key = match key {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => bail!("unsupported YAML map key {other:?}"),
                };
                object.insert(key, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a")), Format::Json);
    }

    #[test]
    fn test_yaml_keys_and_order() {
        let value = parse("zeta: 1\n1: x\ntrue: [1.5, null]\n", Format::Yaml).unwrap();
        assert_eq!(value, json!({"zeta": 1, "1": "x", "true": [1.5, null]}));
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "1", "true"]);
    }

    #[test]
    fn test_read_document_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "name: {{ type: string }}").unwrap();
        let value = read_document(file.path()).unwrap();
        assert_eq!(value, json!({"name": {"type": "string"}}));
    }

    #[test]
    fn test_read_errors_name_the_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = read_document(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains(&file.path().display().to_string()));
    }
}
