//! Result store
//!
//! Writes accepted certificates to `{domain}_{date}/{domain}_{date}_{i}.pem`.
//! Reruns overwrite files with the same index.

use super::pem::PemExporter;
use crate::models::CertificateRecord;
use crate::utils::StoreError;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Persists accepted certificates under a base directory
pub struct ResultStore {
    base_dir: PathBuf,
}

impl ResultStore {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Directory that holds the results for `domain` on `date`
    pub fn directory_for(&self, domain: &str, date: NaiveDate) -> PathBuf {
        self.base_dir.join(run_label(domain, date))
    }

    /// Write every certificate, returning the paths in index order
    pub fn save(
        &self,
        domain: &str,
        date: NaiveDate,
        certificates: &[&CertificateRecord],
    ) -> Result<Vec<PathBuf>, StoreError> {
        let dir = self.directory_for(domain, date);
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::CreateDir {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;

        let label = run_label(domain, date);
        certificates
            .iter()
            .enumerate()
            .map(|(i, cert)| {
                let path = dir.join(format!("{}_{}.pem", label, i));
                std::fs::write(&path, PemExporter::export_certificate(&cert.der)).map_err(|e| {
                    StoreError::Write {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    }
                })?;
                tracing::debug!("Wrote certificate {} to {}", cert.id, path.display());
                Ok(path)
            })
            .collect()
    }
}

fn run_label(domain: &str, date: NaiveDate) -> String {
    format!("{}_{}", domain, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, der: Vec<u8>) -> CertificateRecord {
        CertificateRecord {
            id,
            not_before: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            not_after: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            subject: format!("CN=cert{}", id),
            pem: String::new(),
            der,
        }
    }

    #[test]
    fn test_save_layout_and_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultStore::new(tmp.path());
        let date = NaiveDate::from_ymd_opt(2024, 8, 30).unwrap();

        let first = record(7, vec![0x30, 0x03, 0x02, 0x01, 0x07]);
        let second = record(9, vec![0x30, 0x03, 0x02, 0x01, 0x09]);
        let paths = store.save("example.com", date, &[&first, &second]).unwrap();

        let dir = tmp.path().join("example.com_2024-08-30");
        assert_eq!(
            paths,
            vec![
                dir.join("example.com_2024-08-30_0.pem"),
                dir.join("example.com_2024-08-30_1.pem"),
            ]
        );

        let reloaded = ::pem::parse(std::fs::read(&paths[1]).unwrap()).unwrap();
        assert_eq!(reloaded.contents(), second.der.as_slice());
    }

    #[test]
    fn test_rerun_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultStore::new(tmp.path());
        let date = NaiveDate::from_ymd_opt(2024, 8, 30).unwrap();

        store
            .save("example.com", date, &[&record(1, vec![0x01])])
            .unwrap();
        let paths = store
            .save("example.com", date, &[&record(2, vec![0x02])])
            .unwrap();

        let reloaded = ::pem::parse(std::fs::read(&paths[0]).unwrap()).unwrap();
        assert_eq!(reloaded.contents(), &[0x02]);
    }

    #[test]
    fn test_empty_set_still_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultStore::new(tmp.path());
        let date = NaiveDate::from_ymd_opt(2024, 8, 30).unwrap();

        let paths = store.save("example.com", date, &[]).unwrap();
        assert!(paths.is_empty());
        assert!(store.directory_for("example.com", date).is_dir());
    }
}
