use crate::engines::generation::Strategy;
use crate::error::{GapmaError, Result};
use crate::utils::fs::write_atomic;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Key under which paraphrase competitor sets are stored.
pub const COMPETITORS_KEY: &str = "Competitors";

/// JSON document of generated descriptions, keyed server -> tool -> entry.
///
/// Every write reloads the document, sets one nested key and writes the
/// whole document back, so sibling entries are never lost.
pub struct DescriptionStore {
    path: PathBuf,
}

impl DescriptionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The whole document; empty when the file does not exist yet.
    pub fn load(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(map) => Ok(map),
            _ => Err(GapmaError::Store(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    pub fn get(&self, server: &str, tool: &str, key: &str) -> Result<Option<Value>> {
        let document = self.load()?;
        Ok(document
            .get(server)
            .and_then(|tools| tools.get(tool))
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    pub fn set_description(
        &self,
        server: &str,
        tool: &str,
        strategy: Strategy,
        description: &str,
    ) -> Result<()> {
        self.set_entry(server, tool, strategy.tag(), Value::String(description.to_string()))
    }

    pub fn set_competitors(&self, server: &str, tool: &str, variants: &[String]) -> Result<()> {
        let list = variants.iter().cloned().map(Value::String).collect();
        self.set_entry(server, tool, COMPETITORS_KEY, Value::Array(list))
    }

    /// Read-merge-write of `document[server][tool][key] = value`.
    pub fn set_entry(&self, server: &str, tool: &str, key: &str, value: Value) -> Result<()> {
        let mut document = self.load()?;

        let tools = child_object(&mut document, server)?;
        let entries = child_object(tools, tool)?;
        entries.insert(key.to_string(), value);

        let json = serde_json::to_vec_pretty(&Value::Object(document))?;
        write_atomic(&self.path, &json)?;
        log::info!("Updated {} with {}/{}/{}", self.path.display(), server, tool, key);
        Ok(())
    }
}

fn child_object<'a>(parent: &'a mut Map<String, Value>, key: &str) -> Result<&'a mut Map<String, Value>> {
    match parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
    {
        Value::Object(map) => Ok(map),
        _ => Err(GapmaError::Store(format!(
            "Entry {:?} exists but is not a JSON object",
            key
        ))),
    }
}
