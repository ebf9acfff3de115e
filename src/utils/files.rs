use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

pub const SECRETS_YAML: &str = "secrets.yaml";
pub const WORK_PREFERENCES_YAML: &str = "work_preferences.yaml";
pub const PLAIN_TEXT_RESUME_YAML: &str = "plain_text_resume.yaml";
pub const OUTPUT_FOLDER: &str = "output";

const REQUIRED_FILES: [&str; 3] = [SECRETS_YAML, WORK_PREFERENCES_YAML, PLAIN_TEXT_RESUME_YAML];

#[derive(Debug, Error)]
pub enum FileManagerError {
    #[error("Data folder not found: {}", .0.display())]
    DataFolderNotFound(PathBuf),

    #[error("Missing files in data folder: {}", .0.join(", "))]
    MissingFiles(Vec<String>),

    #[error("Plain text resume file not found: {}", .0.display())]
    ResumeNotFound(PathBuf),

    #[error("failed to create output folder {}: {source}", .path.display())]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolved locations inside a validated data folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub secrets: PathBuf,
    pub work_preferences: PathBuf,
    pub plain_text_resume: PathBuf,
    pub output: PathBuf,
}

pub struct FileManager;

impl FileManager {
    pub fn validate_data_folder(data_folder: &Path) -> Result<DataPaths, FileManagerError> {
        if !data_folder.is_dir() {
            return Err(FileManagerError::DataFolderNotFound(data_folder.to_path_buf()));
        }

        let missing: Vec<String> = REQUIRED_FILES
            .iter()
            .filter(|file| !data_folder.join(file).exists())
            .map(|file| file.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(FileManagerError::MissingFiles(missing));
        }

        let output = data_folder.join(OUTPUT_FOLDER);
        fs::create_dir_all(&output).map_err(|source| FileManagerError::OutputFolder {
            path: output.clone(),
            source,
        })?;
        debug!("output folder ready at {}", output.display());

        info!("data folder validated: {}", data_folder.display());

        Ok(DataPaths {
            secrets: data_folder.join(SECRETS_YAML),
            work_preferences: data_folder.join(WORK_PREFERENCES_YAML),
            plain_text_resume: data_folder.join(PLAIN_TEXT_RESUME_YAML),
            output,
        })
    }

    pub fn get_uploads(
        plain_text_resume: &Path,
    ) -> Result<BTreeMap<String, PathBuf>, FileManagerError> {
        if !plain_text_resume.exists() {
            return Err(FileManagerError::ResumeNotFound(plain_text_resume.to_path_buf()));
        }

        Ok(BTreeMap::from([(
            "plainTextResume".to_string(),
            plain_text_resume.to_path_buf(),
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn missing_folder_is_reported() {
        let dir = TempDir::new().unwrap();
        let absent = dir.path().join("nope");
        let err = FileManager::validate_data_folder(&absent).unwrap_err();
        assert!(matches!(err, FileManagerError::DataFolderNotFound(ref p) if p == &absent));
    }

    #[test]
    fn only_the_missing_files_are_listed() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), WORK_PREFERENCES_YAML);

        let err = FileManager::validate_data_folder(dir.path()).unwrap_err();
        match err {
            FileManagerError::MissingFiles(ref files) => {
                assert_eq!(files, &vec![SECRETS_YAML.to_string(), PLAIN_TEXT_RESUME_YAML.to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Missing files in data folder: secrets.yaml, plain_text_resume.yaml"
        );
        assert!(!dir.path().join(OUTPUT_FOLDER).exists());
    }

    #[test]
    fn complete_folder_resolves_paths_and_creates_output() {
        let dir = TempDir::new().unwrap();
        for file in REQUIRED_FILES {
            touch(dir.path(), file);
        }

        let paths = FileManager::validate_data_folder(dir.path()).unwrap();
        assert_eq!(paths.secrets, dir.path().join(SECRETS_YAML));
        assert_eq!(paths.work_preferences, dir.path().join(WORK_PREFERENCES_YAML));
        assert_eq!(paths.plain_text_resume, dir.path().join(PLAIN_TEXT_RESUME_YAML));
        assert!(paths.output.is_dir());

        // second run must not fail on the existing output folder
        let again = FileManager::validate_data_folder(dir.path()).unwrap();
        assert_eq!(again, paths);
    }

    #[test]
    fn uploads_point_at_the_resume() {
        let dir = TempDir::new().unwrap();
        let resume = dir.path().join(PLAIN_TEXT_RESUME_YAML);
        assert!(matches!(
            FileManager::get_uploads(&resume).unwrap_err(),
            FileManagerError::ResumeNotFound(_)
        ));

        touch(dir.path(), PLAIN_TEXT_RESUME_YAML);
        let uploads = FileManager::get_uploads(&resume).unwrap();
        assert_eq!(uploads.get("plainTextResume"), Some(&resume));
    }
}
