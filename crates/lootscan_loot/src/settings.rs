use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    /// Pack-relative directory holding one subdirectory per biome.
    pub loot_table_dir: PathBuf,
    /// File names skipped inside biome directories.
    pub ignored_files: Vec<String>,
    pub include_mythical: bool,
    pub output_file: String,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            loot_table_dir: PathBuf::from("data/minecraft/loot_tables/chests"),
            ignored_files: vec!["mineshaft.json".to_owned()],
            include_mythical: true,
            output_file: "loot.json".to_owned(),
        }
    }
}

impl ExtractorSettings {
    pub fn is_ignored(&self, file_name: &str) -> bool {
        self.ignored_files.iter().any(|f| f == file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_defaults() {
        let settings: ExtractorSettings =
            serde_json::from_str(r#"{"loot_table_dir": "data/mt/loot_table/treasure"}"#).unwrap();
        assert_eq!(settings.loot_table_dir, PathBuf::from("data/mt/loot_table/treasure"));
        assert_eq!(settings.output_file, "loot.json");
        assert!(settings.is_ignored("mineshaft.json"));
        assert!(!settings.is_ignored("common.json"));
    }
}
