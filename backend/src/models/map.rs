use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    #[serde(default)]
    pub world_map: Vec<City>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub city: String,
    #[serde(default)]
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    #[serde(default)]
    pub data: Vec<DatabaseTables>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseTables {
    pub database: String,
    #[serde(default)]
    pub tables: Vec<String>,
}

impl MapView {
    pub fn table_count(&self) -> usize {
        self.world_map
            .iter()
            .flat_map(|city| &city.regions)
            .flat_map(|region| &region.data)
            .map(|db| db.tables.len())
            .sum()
    }
}
