//! CSV snapshot tables
//!
//! One file per snapshot, named `state_<subject>_<YYYYMMDD_HHMMSS>.csv`, with
//! header `timestamp,root_hash,file_path,file_hash` and one row per file. The
//! timestamp and root hash repeat on every row. Fields are quoted per RFC 4180
//! when they contain a comma, quote, or line break.

use crate::error::StoreError;
use crate::snapshot::Snapshot;
use crate::store::{SnapshotId, SnapshotStore};
use crate::types::Digest;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

const HEADER: [&str; 4] = ["timestamp", "root_hash", "file_path", "file_hash"];
const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Directory of CSV snapshot tables
pub struct CsvSnapshotStore {
    dir: PathBuf,
}

impl CsvSnapshotStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(subject: &str, timestamp: &DateTime<Utc>) -> String {
        format!("state_{}_{}.csv", subject, timestamp.format(FILE_STAMP_FORMAT))
    }

    /// Parse the timestamp out of a file name belonging to `subject`
    ///
    /// Requires the exact shape `state_<subject>_<stamp>.csv` so that subject
    /// `a` never claims files of subject `a_b`.
    fn stamp_for(subject: &str, file_name: &str) -> Option<NaiveDateTime> {
        let rest = file_name.strip_prefix("state_")?.strip_prefix(subject)?;
        let stamp = rest.strip_prefix('_')?.strip_suffix(".csv")?;
        NaiveDateTime::parse_from_str(stamp, FILE_STAMP_FORMAT).ok()
    }
}

impl SnapshotStore for CsvSnapshotStore {
    #[instrument(skip(self, snapshot), fields(dir = %self.dir.display()))]
    fn save(&self, snapshot: &Snapshot, subject: &str) -> Result<SnapshotId, StoreError> {
        if snapshot.is_empty() {
            return Err(StoreError::Backend(
                "cannot store a snapshot with no files as a CSV table".to_string(),
            ));
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::file_name(subject, &snapshot.timestamp));

        let mut writer = BufWriter::new(File::create(&path)?);
        write_record(&mut writer, &HEADER)?;

        let timestamp = snapshot
            .timestamp
            .to_rfc3339_opts(SecondsFormat::AutoSi, true);
        let root = snapshot.root.to_hex();
        for (file_path, digest) in &snapshot.files {
            let digest = digest.to_hex();
            write_record(
                &mut writer,
                &[timestamp.as_str(), root.as_str(), file_path.as_str(), digest.as_str()],
            )?;
        }
        writer.flush()?;

        info!(path = %path.display(), files = snapshot.len(), "Saved snapshot");
        Ok(SnapshotId::new(path.to_string_lossy()))
    }

    #[instrument(skip(self))]
    fn load(&self, id: &SnapshotId) -> Result<Snapshot, StoreError> {
        let path = Path::new(id.as_str());
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        let snapshot = parse_table(&text).map_err(|(line, reason)| StoreError::Malformed {
            id: id.to_string(),
            line,
            reason,
        })?;
        debug!(files = snapshot.len(), "Loaded snapshot");
        Ok(snapshot)
    }

    fn list(&self, subject: &str) -> Result<Vec<SnapshotId>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                warn!(name = ?entry.file_name(), "Skipping non UTF-8 file name");
                continue;
            };
            if let Some(stamp) = Self::stamp_for(subject, name) {
                found.push((stamp, entry.path()));
            }
        }

        found.sort();
        Ok(found
            .into_iter()
            .map(|(_, path)| SnapshotId::new(path.to_string_lossy()))
            .collect())
    }
}

/// Write one record, quoting fields that need it
fn write_record<W: Write>(writer: &mut W, fields: &[&str]) -> std::io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| quote_field(f)).collect();
    writeln!(writer, "{}", line.join(","))
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split CSV text into records, each tagged with the line it starts on
fn parse_records(text: &str) -> Result<Vec<(usize, Vec<String>)>, (usize, String)> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            '"' => return Err((line, "unexpected quote in unquoted field".to_string())),
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut fields)));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err((record_line, "unterminated quoted field".to_string()));
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }

    Ok(records)
}

/// Rebuild a snapshot from table text
fn parse_table(text: &str) -> Result<Snapshot, (usize, String)> {
    let mut records = parse_records(text)?.into_iter();

    let (line, header) = records.next().ok_or((1, "missing header".to_string()))?;
    if header != HEADER {
        return Err((line, "invalid CSV header".to_string()));
    }

    let mut stamp: Option<(String, DateTime<Utc>)> = None;
    let mut root: Option<(String, Digest)> = None;
    let mut files = BTreeMap::new();

    for (line, row) in records {
        let [timestamp, root_hash, file_path, file_hash]: [String; 4] = row
            .try_into()
            .map_err(|r: Vec<String>| (line, format!("expected 4 fields, got {}", r.len())))?;

        match &stamp {
            Some((raw, _)) if *raw != timestamp => {
                return Err((line, "timestamp differs from first row".to_string()))
            }
            Some(_) => {}
            None => {
                let parsed = DateTime::parse_from_rfc3339(&timestamp)
                    .map_err(|e| (line, format!("invalid timestamp: {}", e)))?
                    .with_timezone(&Utc);
                stamp = Some((timestamp, parsed));
            }
        }

        match &root {
            Some((raw, _)) if *raw != root_hash => {
                return Err((line, "root hash differs from first row".to_string()))
            }
            Some(_) => {}
            None => {
                let parsed = Digest::from_hex(&root_hash)
                    .map_err(|e| (line, format!("invalid root hash: {}", e)))?;
                root = Some((root_hash, parsed));
            }
        }

        let digest = Digest::from_hex(&file_hash)
            .map_err(|e| (line, format!("invalid file hash: {}", e)))?;
        if files.insert(file_path.clone(), digest).is_some() {
            return Err((line, format!("duplicate file path: {}", file_path)));
        }
    }

    match (stamp, root) {
        (Some((_, timestamp)), Some((_, root))) => Ok(Snapshot {
            timestamp,
            root,
            files,
        }),
        _ => Err((1, "snapshot has no rows".to_string())),
    }
}
