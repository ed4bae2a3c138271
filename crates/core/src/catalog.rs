use std::{fs, io, path::Path};

use anyhow::{Context, anyhow};
use serde::Serialize;
use serde_json::{Map, Value};

/// One career record from the static dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
  pub title: String,
  pub summary: String,
  pub skills: Vec<String>,
  /// Every field of the source record, unknown ones included.
  #[serde(skip)]
  pub raw_fields: Map<String, Value>,
}

impl CatalogEntry {
  /// Build from a dataset record; missing fields default to empty.
  #[must_use]
  pub fn from_fields(raw_fields: Map<String, Value>) -> Self {
    let text = |key: &str| {
      raw_fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
    };
    let skills = raw_fields
      .get("skills")
      .and_then(Value::as_array)
      .map(|skills| {
        skills
          .iter()
          .filter_map(Value::as_str)
          .map(str::to_owned)
          .collect()
      })
      .unwrap_or_default();

    Self {
      title: text("title"),
      summary: text("summary"),
      skills,
      raw_fields,
    }
  }

  /// Text sent to the embedding provider for this entry.
  #[must_use]
  pub fn embedding_text(&self) -> String {
    format!(
      "{}. {} Skills: {}",
      self.title,
      self.summary,
      self.skills.join(", ")
    )
  }
}

/// The career dataset, in file order. Entry positions are stable indices.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  entries: Vec<CatalogEntry>,
}

impl Catalog {
  /// Load the dataset, degrading to an empty catalog when the file is missing or unreadable.
  pub fn load(path: &Path) -> Self {
    match fs::read_to_string(path) {
      Ok(raw) => match Self::from_json_str(&raw) {
        Ok(catalog) => {
          tracing::info!(path = %path.display(), entries = catalog.len(), "career dataset loaded");
          catalog
        }
        Err(err) => {
          tracing::error!(path = %path.display(), "career dataset is malformed: {err:#}");
          Self::default()
        }
      },
      Err(err) if err.kind() == io::ErrorKind::NotFound => {
        tracing::warn!(path = %path.display(), "career dataset not found, some features may not work");
        Self::default()
      }
      Err(err) => {
        tracing::error!(path = %path.display(), "failed to read career dataset: {err}");
        Self::default()
      }
    }
  }

  /// Parse a JSON array of records. Non-object records are skipped.
  pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
    let records: Vec<Value> =
      serde_json::from_str(raw).context("career dataset must be a JSON array")?;

    let entries = records
      .into_iter()
      .enumerate()
      .filter_map(|(position, record)| match record {
        Value::Object(fields) => Some(CatalogEntry::from_fields(fields)),
        other => {
          tracing::warn!(position, "skipping non-object dataset record: {other}");
          None
        }
      })
      .collect();

    Ok(Self { entries })
  }

  pub fn get(&self, index: usize) -> anyhow::Result<&CatalogEntry> {
    self
      .entries
      .get(index)
      .ok_or_else(|| anyhow!("catalog index {index} out of range ({} entries)", self.len()))
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// One embedding text per entry, in catalog order.
  #[must_use]
  pub fn embedding_texts(&self) -> Vec<String> {
    self.entries.iter().map(CatalogEntry::embedding_text).collect()
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  const DATASET: &str = r#"[
    {"title": "Data Scientist", "summary": "Builds models.", "skills": ["Python", "Statistics"], "salary": "high"},
    {"title": "UX Designer", "summary": "Designs interfaces."},
    "not a record"
  ]"#;

  #[test]
  fn records_keep_order_and_raw_fields() {
    let catalog = Catalog::from_json_str(DATASET).unwrap();
    assert_eq!(catalog.len(), 2);

    let first = catalog.get(0).unwrap();
    assert_eq!(first.title, "Data Scientist");
    assert_eq!(first.skills, vec!["Python", "Statistics"]);
    assert_eq!(first.raw_fields.get("salary"), Some(&Value::from("high")));

    let second = catalog.get(1).unwrap();
    assert!(second.skills.is_empty());
    assert!(catalog.get(2).is_err());
  }

  #[test]
  fn embedding_text_is_deterministic() {
    let catalog = Catalog::from_json_str(DATASET).unwrap();
    assert_eq!(
      catalog.embedding_texts(),
      vec![
        "Data Scientist. Builds models. Skills: Python, Statistics".to_owned(),
        "UX Designer. Designs interfaces. Skills: ".to_owned(),
      ]
    );
    assert_eq!(catalog.embedding_texts(), catalog.embedding_texts());
  }

  #[test]
  fn non_array_dataset_is_rejected() {
    assert!(Catalog::from_json_str(r#"{"title": "x"}"#).is_err());
  }

  #[test]
  fn missing_file_degrades_to_empty() {
    let catalog = Catalog::load(Path::new("/definitely/not/here/careers.json"));
    assert!(catalog.is_empty());
  }
}
