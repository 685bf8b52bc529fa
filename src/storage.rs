use crate::constants::{BOOK_PRICES_CSV, BOOK_PRICES_JSON};
use crate::error::Result;
use crate::pipeline::compare::index_by_title;
use crate::types::{Book, BookSnapshot};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const BOOK_CSV_HEADER: [&str; 5] = ["title", "price", "availability", "rating", "scraped_at"];

/// Pretty-prints `value` to a sibling temp file and renames it over `path`,
/// so readers see either the old document or the new one.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
    fs::rename(&tmp, path)?;
    debug!("wrote {}", path.display());
    Ok(())
}

/// `None` when the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Appends rows, writing `header` first only when the file is new.
pub fn append_csv<I>(path: &Path, header: &[&str], rows: I) -> Result<usize>
where
    I: IntoIterator<Item = Vec<String>>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let is_new = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    if is_new {
        writer.write_record(header)?;
    }
    let mut written = 0;
    for row in rows {
        writer.write_record(&row)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// The book tracker's files: an append-only CSV log and the latest JSON
/// snapshot used for the next comparison.
pub struct BookArchive {
    dir: PathBuf,
}

impl BookArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn csv_path(&self) -> PathBuf {
        self.dir.join(BOOK_PRICES_CSV)
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir.join(BOOK_PRICES_JSON)
    }

    /// Previous snapshot keyed by title. Empty on the first run.
    pub fn load_previous(&self) -> Result<HashMap<String, Book>> {
        let snapshot: Option<BookSnapshot> = read_json(&self.json_path())?;
        Ok(snapshot
            .map(|s| index_by_title(s.books))
            .unwrap_or_default())
    }

    pub fn save_csv(&self, books: &[Book]) -> Result<()> {
        let rows = books.iter().map(|b| {
            vec![
                b.title.clone(),
                b.price.to_string(),
                b.availability.clone(),
                b.rating.clone(),
                b.scraped_at.to_rfc3339(),
            ]
        });
        let written = append_csv(&self.csv_path(), &BOOK_CSV_HEADER, rows)?;
        info!("Saved {} records to {}", written, self.csv_path().display());
        Ok(())
    }

    pub fn save_json(&self, books: &[Book]) -> Result<()> {
        let snapshot = BookSnapshot {
            last_updated: Utc::now(),
            count: books.len(),
            books: books.to_vec(),
        };
        write_json_atomic(&self.json_path(), &snapshot)?;
        info!("Saved latest prices to {}", self.json_path().display());
        Ok(())
    }
}

/// A dashboard's "latest result" document. Writers are serialized and each
/// write replaces the file atomically.
pub struct ResultCache<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ResultCache<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<T>> {
        read_json(&self.path)
    }

    pub async fn store(&self, value: &T) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        write_json_atomic(&self.path, value)
    }
}
