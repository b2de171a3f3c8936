//! CSV-backed persistence for the canonical observation table.

pub mod error;

use crate::store::error::StoreError;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

const DATASET_FILE: &str = "weather_data.csv";

/// Owns the directory the observation table is persisted in.
///
/// The table is a single named CSV dataset with the columns `date`
/// (ISO-8601 string), `temperature` and `rainfall`. Saving overwrites the
/// previous dataset.
pub struct ObservationStore {
    data_dir: PathBuf,
}

impl ObservationStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the persisted dataset.
    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(DATASET_FILE)
    }

    /// Whether a persisted dataset exists.
    pub fn exists(&self) -> bool {
        self.dataset_path().is_file()
    }

    /// Loads the persisted observation table.
    ///
    /// Fails with [`StoreError::NotFound`] when no dataset has been saved
    /// yet; the caller decides whether that triggers acquisition.
    pub fn load(&self) -> Result<DataFrame, StoreError> {
        let path = self.dataset_path();
        if !path.is_file() {
            return Err(StoreError::NotFound(path));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.clone()))
            .map_err(|e| StoreError::Read(path.clone(), e))?
            .finish()
            .map_err(|e| StoreError::Read(path.clone(), e))?;

        info!("Loaded {} observations from {:?}", df.height(), path);
        Ok(df)
    }

    /// Persists the observation table, overwriting any previous dataset.
    pub fn save(&self, table: &DataFrame) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| StoreError::DirCreation(self.data_dir.clone(), e))?;

        let path = self.dataset_path();
        let mut file = File::create(&path).map_err(|e| StoreError::Io(path.clone(), e))?;

        let mut table = table.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut table)
            .map_err(|e| StoreError::Write(path.clone(), e))?;

        info!("Saved {} observations to {:?}", table.height(), path);
        Ok(())
    }
}

impl AsRef<Path> for ObservationStore {
    fn as_ref(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{COL_DATE, COL_RAINFALL, COL_TEMPERATURE};

    fn sample_table() -> DataFrame {
        df!(
            COL_DATE => ["2025-01-01", "2025-01-02", "2025-01-03"],
            COL_TEMPERATURE => [Some(0.0), None, Some(20.0)],
            COL_RAINFALL => [Some(0.0), Some(5.0), Some(0.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_load_missing_dataset_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObservationStore::new(dir.path());
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObservationStore::new(dir.path().join("data"));

        assert!(!store.exists());
        store.save(&sample_table()).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.height(), 3);
        assert_eq!(
            loaded.get_column_names_str(),
            [COL_DATE, COL_TEMPERATURE, COL_RAINFALL]
        );

        let dates = loaded.column(COL_DATE).unwrap().str().unwrap();
        assert_eq!(dates.get(0), Some("2025-01-01"));
        let temperature = loaded.column(COL_TEMPERATURE).unwrap().f64().unwrap();
        assert_eq!(temperature.get(1), None);
        assert_eq!(temperature.get(2), Some(20.0));
    }

    #[test]
    fn test_save_overwrites_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObservationStore::new(dir.path());

        store.save(&sample_table()).unwrap();
        let smaller = df!(
            COL_DATE => ["2025-02-01"],
            COL_TEMPERATURE => [1.5],
            COL_RAINFALL => [0.0],
        )
        .unwrap();
        store.save(&smaller).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.height(), 1);
    }
}
