use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level geographic grouping. Owns its structures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub nom: String,
    pub page: String,
    #[serde(default)]
    pub structures: Vec<Structure>,
}

/// An organisation listed in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub id: String,
    pub nom: String,
    pub email: String,
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
}

/// Opaque summary record shipped alongside the regions.
///
/// The store never interprets it; keys keep document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statistics(Map<String, Value>);

impl Statistics {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Map<String, Value>> for Statistics {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// The whole `structures.json` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub regions: Vec<Region>,
    #[serde(default)]
    pub statistiques: Statistics,
}

impl Dataset {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn structure_count(&self) -> usize {
        self.regions.iter().map(|region| region.structures.len()).sum()
    }
}

/// A structure annotated with the name of the region that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub nom: String,
    pub email: String,
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
    pub region: String,
}

impl SearchResult {
    pub fn project(structure: &Structure, region: &Region) -> Self {
        Self {
            id: structure.id.clone(),
            nom: structure.nom.clone(),
            email: structure.email.clone(),
            contact: structure.contact.clone(),
            ville: structure.ville.clone(),
            region: region.nom.clone(),
        }
    }
}

/// One row of the spreadsheet-backed record API.
///
/// Columns the directory does not display are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    #[serde(rename = "Région", default)]
    pub region: String,
    #[serde(rename = "Structure", default)]
    pub structure: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Contact", default)]
    pub contact: String,
    #[serde(rename = "Ville", default, skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
