//! Persisted grid defaults

mod settings_file;

pub use settings_file::*;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use lazygrid_core::{ColumnMeta, Field, DEFAULT_NOTIFICATION_TTL};
use lazygrid_interchange::ExportKind;
use lazygrid_table::{
    EditPolicy, ExclusionRule, GridConfig, SelectionMode, TableDensity, DEFAULT_PAGE_SIZE,
    DEFAULT_PAGE_SIZES, DEFAULT_PIN_CAP,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GridSettings {
    pub pagination: PaginationSettings,
    pub pinning: PinningSettings,
    pub selection: SelectionSettings,
    pub editing: EditingSettings,
    pub export: ExportSettings,
    pub appearance: AppearanceSettings,
}

impl GridSettings {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    pub fn settings_path() -> Result<PathBuf> {
        settings_file()
    }

    /// Read settings from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        serde_json::from_str(&content).with_context(|| "Failed to parse settings JSON")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;
        Ok(())
    }

    /// Check the settings and build the grid configuration
    pub fn to_grid_config(&self) -> Result<GridConfig> {
        let pagination = &self.pagination;
        if pagination.page_sizes.contains(&0) {
            bail!("Page sizes must be greater than zero");
        }
        if !pagination.page_sizes.is_empty()
            && !pagination.page_sizes.contains(&pagination.default_page_size)
        {
            bail!(
                "Default page size {} is not one of {:?}",
                pagination.default_page_size,
                pagination.page_sizes
            );
        }

        Ok(GridConfig {
            page_size: pagination.default_page_size,
            page_sizes: pagination.page_sizes.clone(),
            max_pinned: self.pinning.max_pinned,
            selection_mode: self.selection.mode,
            notification_ttl: Duration::from_millis(self.selection.notification_ttl_ms),
            edit_policy: EditPolicy::new(self.editing.read_only_rules.clone()),
            columns: ColumnMeta::defaults(),
            visible_columns: self.appearance.visible_columns.clone(),
            density: self.appearance.density,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    pub default_page_size: usize,
    pub page_sizes: Vec<usize>,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinningSettings {
    pub max_pinned: usize,
}

impl Default for PinningSettings {
    fn default() -> Self {
        Self {
            max_pinned: DEFAULT_PIN_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    pub mode: SelectionMode,
    pub notification_ttl_ms: u64,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            mode: SelectionMode::default(),
            notification_ttl_ms: DEFAULT_NOTIFICATION_TTL.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditingSettings {
    /// Rows matching any of these are read-only
    pub read_only_rules: Vec<ExclusionRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub dataset_name: String,
    pub default_format: ExportKind,
    /// Falls back to the data directory when unset
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            dataset_name: "todos".to_string(),
            default_format: ExportKind::Csv,
            output_dir: None,
        }
    }
}

impl ExportSettings {
    pub fn resolved_output_dir(&self) -> Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => exports_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppearanceSettings {
    pub density: TableDensity,
    /// `None` shows every column
    pub visible_columns: Option<Vec<Field>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazygrid_core::CellValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = GridSettings::load_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, GridSettings::default());
        assert_eq!(settings.pagination.default_page_size, 10);
        assert_eq!(settings.pinning.max_pinned, 2);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = GridSettings::default();
        settings.pagination.default_page_size = 20;
        settings.selection.mode = SelectionMode::Checkbox;
        settings.editing.read_only_rules = vec![ExclusionRule::new(
            Field::Title,
            CellValue::Text("et porro tempora".into()),
        )];
        settings.appearance.visible_columns = Some(vec![Field::Id, Field::Title]);
        settings.save_to(&path).unwrap();

        assert_eq!(GridSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "pinning": { "max_pinned": 3 } }"#).unwrap();

        let settings = GridSettings::load_from(&path).unwrap();
        assert_eq!(settings.pinning.max_pinned, 3);
        assert_eq!(settings.pagination, PaginationSettings::default());
        assert_eq!(settings.export.dataset_name, "todos");
    }

    #[test]
    fn grid_config_carries_settings() {
        let mut settings = GridSettings::default();
        settings.selection.notification_ttl_ms = 1500;
        settings.appearance.density = TableDensity::Large;

        let config = settings.to_grid_config().unwrap();
        assert_eq!(config.notification_ttl, Duration::from_millis(1500));
        assert_eq!(config.density, TableDensity::Large);
        assert_eq!(config.max_pinned, 2);
    }

    #[test]
    fn default_page_size_must_be_offered() {
        let mut settings = GridSettings::default();
        settings.pagination.default_page_size = 15;
        assert!(settings.to_grid_config().is_err());

        settings.pagination.page_sizes = vec![15, 30];
        assert!(settings.to_grid_config().is_ok());
    }

    #[test]
    fn explicit_output_dir_wins() {
        let settings = ExportSettings {
            output_dir: Some(PathBuf::from("/tmp/exports")),
            ..ExportSettings::default()
        };
        assert_eq!(
            settings.resolved_output_dir().unwrap(),
            PathBuf::from("/tmp/exports")
        );
    }
}
