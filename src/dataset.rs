// Reference Dataset - AFSC lookup tables
// Six headerless CSV tables loaded once at startup, immutable afterwards

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// CATEGORY
// ============================================================================

/// Category - which code family a table or candidate belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Enlisted,
    Officer,
}

impl Category {
    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            Category::Enlisted => "enlisted",
            Category::Officer => "officer",
        }
    }
}

// ============================================================================
// TABLE ROW TYPES
// ============================================================================

/// One base code row: the code with its skill slot wildcarded, plus a job title.
/// A single row may encode several placeholder variants, which is why lookup
/// is by substring containment rather than equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseCodeEntry {
    pub code: String,
    pub title: String,
}

/// One prefix row: a single leading letter and its expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixEntry {
    pub symbol: String,
    pub title: String,
}

/// One shred row: a trailing letter scoped to a specific base code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShredEntry {
    pub base_code: String,
    pub symbol: String,
    pub title: String,
}

/// The three lookup tables for one category, in source row order.
/// Lookups are ordered linear scans: multiple shred rows can share a base
/// code pattern and differ only by symbol, so first-match-wins over the
/// original ordering is part of the contract.
#[derive(Debug, Clone, Default)]
pub struct CategoryTables {
    pub base: Vec<BaseCodeEntry>,
    pub prefixes: Vec<PrefixEntry>,
    pub shreds: Vec<ShredEntry>,
}

// ============================================================================
// LOAD ERRORS
// ============================================================================

/// A reference table that cannot be read or has the wrong shape is fatal at
/// startup; the annotator must not run with a partial dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read reference table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed row {row} in {path}: expected {expected} fields, found {found}")]
    MalformedRow {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },
}

// ============================================================================
// REFERENCE DATASET
// ============================================================================

const ENLISTED_BASE_FILE: &str = "EnlistedAFSCs.csv";
const OFFICER_BASE_FILE: &str = "OfficerAFSCs.csv";
const ENLISTED_PREFIX_FILE: &str = "EnlistedPrefixes.csv";
const OFFICER_PREFIX_FILE: &str = "OfficerPrefixes.csv";
const ENLISTED_SHRED_FILE: &str = "EnlistedShreds.csv";
const OFFICER_SHRED_FILE: &str = "OfficerShreds.csv";

/// All lookup tables for both categories, grouped per category instead of
/// threading fourteen parallel lists through every call.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataset {
    pub enlisted: CategoryTables,
    pub officer: CategoryTables,
}

impl ReferenceDataset {
    /// Load the six reference tables from a directory.
    ///
    /// Base code tables are `#`-delimited two-field rows; prefix tables are
    /// `,`-delimited two-field rows; shred tables are `,`-delimited
    /// three-field rows. None of them carry a header row.
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        let enlisted = CategoryTables {
            base: load_base_codes(&dir.join(ENLISTED_BASE_FILE))?,
            prefixes: load_prefixes(&dir.join(ENLISTED_PREFIX_FILE))?,
            shreds: load_shreds(&dir.join(ENLISTED_SHRED_FILE))?,
        };

        let officer = CategoryTables {
            base: load_base_codes(&dir.join(OFFICER_BASE_FILE))?,
            prefixes: load_prefixes(&dir.join(OFFICER_PREFIX_FILE))?,
            shreds: load_shreds(&dir.join(OFFICER_SHRED_FILE))?,
        };

        Ok(ReferenceDataset { enlisted, officer })
    }

    /// Tables for one category
    pub fn tables(&self, category: Category) -> &CategoryTables {
        match category {
            Category::Enlisted => &self.enlisted,
            Category::Officer => &self.officer,
        }
    }
}

fn load_base_codes(path: &Path) -> Result<Vec<BaseCodeEntry>, LoadError> {
    let rows = read_rows(path, b'#', 2)?;
    Ok(rows
        .into_iter()
        .map(|row| BaseCodeEntry {
            code: row[0].clone(),
            title: row[1].clone(),
        })
        .collect())
}

fn load_prefixes(path: &Path) -> Result<Vec<PrefixEntry>, LoadError> {
    let rows = read_rows(path, b',', 2)?;
    Ok(rows
        .into_iter()
        .map(|row| PrefixEntry {
            symbol: row[0].clone(),
            title: row[1].clone(),
        })
        .collect())
}

fn load_shreds(path: &Path) -> Result<Vec<ShredEntry>, LoadError> {
    let rows = read_rows(path, b',', 3)?;
    Ok(rows
        .into_iter()
        .map(|row| ShredEntry {
            base_code: row[0].clone(),
            symbol: row[1].clone(),
            title: row[2].clone(),
        })
        .collect())
}

/// Read a headerless delimited table, enforcing the expected field count on
/// every row. Row numbers in errors are 1-based.
fn read_rows(path: &Path, delimiter: u8, expected: usize) -> Result<Vec<Vec<String>>, LoadError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if record.len() != expected {
            return Err(LoadError::MalformedRow {
                path: path.to_path_buf(),
                row: index + 1,
                expected,
                found: record.len(),
            });
        }

        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_tables(dir: &TempDir) {
        fs::write(
            dir.path().join(ENLISTED_BASE_FILE),
            "3D0X2#Cyber Systems Operations\n3D1X2#Cyber Transport Systems\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(OFFICER_BASE_FILE),
            "62EX#Developmental Engineer\n11FX#Fighter Pilot\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(ENLISTED_PREFIX_FILE),
            "A,Air National Guard\nK,Instructor\n",
        )
        .unwrap();
        fs::write(dir.path().join(OFFICER_PREFIX_FILE), "Q,Standardization/Evaluation\n").unwrap();
        fs::write(
            dir.path().join(ENLISTED_SHRED_FILE),
            "3D0X2,A,Network Systems\n3D0X2,B,Systems Administration\n",
        )
        .unwrap();
        fs::write(dir.path().join(OFFICER_SHRED_FILE), "62EX,B,Bioenvironmental\n").unwrap();
    }

    #[test]
    fn test_load_all_tables() {
        let dir = TempDir::new().unwrap();
        write_tables(&dir);

        let dataset = ReferenceDataset::load(dir.path()).unwrap();

        assert_eq!(dataset.enlisted.base.len(), 2);
        assert_eq!(dataset.enlisted.base[0].code, "3D0X2");
        assert_eq!(dataset.enlisted.base[0].title, "Cyber Systems Operations");
        assert_eq!(dataset.officer.base[0].code, "62EX");
        assert_eq!(dataset.enlisted.prefixes[0].symbol, "A");
        assert_eq!(dataset.officer.shreds[0].base_code, "62EX");
        assert_eq!(dataset.officer.shreds[0].symbol, "B");
    }

    #[test]
    fn test_row_order_is_preserved() {
        let dir = TempDir::new().unwrap();
        write_tables(&dir);

        let dataset = ReferenceDataset::load(dir.path()).unwrap();

        // Two shred rows share the base code pattern; source order decides ties
        let shreds: Vec<&str> = dataset
            .enlisted
            .shreds
            .iter()
            .map(|s| s.symbol.as_str())
            .collect();
        assert_eq!(shreds, vec!["A", "B"]);
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_tables(&dir);
        fs::remove_file(dir.path().join(OFFICER_SHRED_FILE)).unwrap();

        let err = ReferenceDataset::load(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn test_malformed_row_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_tables(&dir);
        fs::write(
            dir.path().join(ENLISTED_SHRED_FILE),
            "3D0X2,A,Network Systems\n3D0X2,missing-title\n",
        )
        .unwrap();

        let err = ReferenceDataset::load(dir.path()).unwrap_err();
        match err {
            LoadError::MalformedRow {
                row,
                expected,
                found,
                ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_tables_accessor() {
        let dir = TempDir::new().unwrap();
        write_tables(&dir);

        let dataset = ReferenceDataset::load(dir.path()).unwrap();
        assert_eq!(dataset.tables(Category::Enlisted).base.len(), 2);
        assert_eq!(dataset.tables(Category::Officer).base.len(), 2);
    }
}
