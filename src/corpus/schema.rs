use serde::{Deserialize, Serialize};

// On-disk corpus layout: units -> topics -> words. Field names follow the
// existing data files (`es` / `zh`).

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub topics: Vec<TopicData>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TopicData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub words: Vec<WordData>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WordData {
    pub id: String,
    #[serde(rename = "es")]
    pub source: String,
    #[serde(rename = "zh")]
    pub native: String,
    #[serde(default)]
    pub pos: String,
}
