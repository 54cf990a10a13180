// src/storage.rs
//
// Bucket de objetos onde ficam os arquivos dos projetos.

use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::{fs, io::AsyncWriteExt};

use crate::common::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Grava um objeto novo. Nunca sobrescreve.
    async fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<(), AppError>;

    /// Objetos diretamente dentro da pasta (sem recursão).
    async fn list(&self, folder: &str) -> Result<Vec<StoredObject>, AppError>;

    async fn remove(&self, path: &str) -> Result<(), AppError>;

    async fn download(&self, path: &str) -> Result<Vec<u8>, AppError>;

    fn public_url(&self, path: &str) -> String;
}

/// Remove vários objetos. Falhas só viram aviso no log.
pub async fn remove_objects(storage: &dyn ObjectStorage, paths: &[String]) {
    for path in paths {
        if let Err(e) = storage.remove(path).await {
            tracing::warn!("⚠️ Falha ao remover objeto {}: {:?}", path, e);
        }
    }
}

/// Bucket no sistema de arquivos: {raiz}/{bucket}/{caminho}
#[derive(Debug, Clone)]
pub struct LocalBucket {
    root: PathBuf,
    public_base: String,
}

impl LocalBucket {
    pub fn new(storage_root: impl AsRef<Path>, bucket: &str, public_base: &str) -> Self {
        Self {
            root: storage_root.as_ref().join(bucket),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    // Só aceita caminhos relativos sem '..'
    fn resolve(&self, path: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(path);
        let is_safe = !path.is_empty()
            && !path.contains('\\')
            && relative.components().all(|c| matches!(c, Component::Normal(_)));

        if !is_safe {
            return Err(AppError::InvalidStoragePath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStorage for LocalBucket {
    async fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<(), AppError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => AppError::FileAlreadyExists(path.to_string()),
                _ => AppError::StorageError(e),
            })?;
        file.write_all(bytes).await?;
        file.flush().await?;

        tracing::info!("📦 Objeto gravado: {} ({} bytes, {})", path, bytes.len(), content_type);
        Ok(())
    }

    async fn list(&self, folder: &str) -> Result<Vec<StoredObject>, AppError> {
        let dir = self.resolve(folder)?;

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // Pasta ainda não criada = nenhum arquivo
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut objects = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            objects.push(StoredObject {
                path: format!("{}/{}", folder.trim_end_matches('/'), name),
                name,
                size: metadata.len(),
                updated_at: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    async fn remove(&self, path: &str) -> Result<(), AppError> {
        let target = self.resolve(path)?;
        fs::remove_file(&target).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::FileNotFound(path.to_string()),
            _ => AppError::StorageError(e),
        })
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let target = self.resolve(path)?;
        fs::read(&target).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::FileNotFound(path.to_string()),
            _ => AppError::StorageError(e),
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_bucket() -> (LocalBucket, PathBuf) {
        let root = std::env::temp_dir().join(format!("bucket-test-{}", Uuid::new_v4()));
        (LocalBucket::new(&root, "project-resources", "http://localhost:3000/files/"), root)
    }

    #[tokio::test]
    async fn upload_list_download_remove() {
        let (bucket, root) = temp_bucket();
        let folder = "landing_page_acme_2024_05_01";
        let path = format!("{}/1714550400000_brief.pdf", folder);

        bucket.upload(&path, b"%PDF-1.4", "application/pdf").await.unwrap();

        let listed = bucket.list(folder).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "1714550400000_brief.pdf");
        assert_eq!(listed[0].path, path);
        assert_eq!(listed[0].size, 8);

        assert_eq!(bucket.download(&path).await.unwrap(), b"%PDF-1.4");

        bucket.remove(&path).await.unwrap();
        assert!(bucket.list(folder).await.unwrap().is_empty());
        assert!(matches!(bucket.download(&path).await, Err(AppError::FileNotFound(_))));

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn never_overwrites() {
        let (bucket, root) = temp_bucket();
        bucket.upload("f/a.txt", b"one", "text/plain").await.unwrap();

        let second = bucket.upload("f/a.txt", b"two", "text/plain").await;
        assert!(matches!(second, Err(AppError::FileAlreadyExists(_))));
        assert_eq!(bucket.download("f/a.txt").await.unwrap(), b"one");

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn missing_folder_lists_empty() {
        let (bucket, _root) = temp_bucket();
        assert!(bucket.list("nothing_here").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_escaping_paths() {
        let (bucket, _root) = temp_bucket();
        for bad in ["../secret.txt", "/etc/passwd", "a/../../b.txt", ""] {
            assert!(matches!(
                bucket.download(bad).await,
                Err(AppError::InvalidStoragePath(_))
            ));
        }
    }

    #[tokio::test]
    async fn removes_uploads_of_deleted_projects() {
        use crate::models::project::{tests::{sample_project, uploaded}, uploaded_paths, Resource};

        let (bucket, root) = temp_bucket();
        bucket.upload("website_acme/1_brief.pdf", b"%PDF", "application/pdf").await.unwrap();
        bucket.upload("website_acme/2_logo.png", b"png", "image/png").await.unwrap();

        let mut project = sample_project("Site", 1, 0);
        project.resources = vec![
            uploaded("Brief", "website_acme/1_brief.pdf"),
            uploaded("Logo", "website_acme/2_logo.png"),
            // já apagado à mão: só gera aviso
            uploaded("Antigo", "website_acme/0_old.pdf"),
            Resource::link("Repo".into(), "https://github.com/a/b".into(), None),
        ];

        remove_objects(&bucket, &uploaded_paths(&[project])).await;
        assert!(bucket.list("website_acme").await.unwrap().is_empty());

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn public_url_joins_base() {
        let (bucket, _root) = temp_bucket();
        assert_eq!(
            bucket.public_url("f/a.txt"),
            "http://localhost:3000/files/f/a.txt"
        );
    }
}
