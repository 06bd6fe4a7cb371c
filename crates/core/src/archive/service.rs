//! Archive service implementation using Apache OpenDAL.

use opendal::{services, Operator};

use mobilia_shared::types::ProjectId;

use super::config::{ArchiveConfig, ArchiveProvider};
use super::error::ArchiveError;

/// Archive service for rendered project paperwork.
pub struct ArchiveService {
    operator: Operator,
}

impl ArchiveService {
    /// Create a new archive service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be initialized.
    pub fn from_config(config: &ArchiveConfig) -> Result<Self, ArchiveError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &ArchiveProvider) -> Result<Operator, ArchiveError> {
        match provider {
            ArchiveProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| ArchiveError::configuration(e.to_string()))?
                    .finish())
            }
            ArchiveProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| ArchiveError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| ArchiveError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Archive key for a project document.
    ///
    /// Format: `projects/{project_id}/{sanitized_filename}`
    #[must_use]
    pub fn document_key(project_id: ProjectId, filename: &str) -> String {
        format!("projects/{project_id}/{}", sanitize_filename(filename))
    }

    /// Stores a rendered document.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<(), ArchiveError> {
        self.operator.write(key, bytes).await?;
        Ok(())
    }

    /// Fetches an archived document.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::NotFound` when the key does not exist.
    pub async fn fetch(&self, key: &str) -> Result<Vec<u8>, ArchiveError> {
        let buffer = self.operator.read(key).await?;
        Ok(buffer.to_vec())
    }

    /// Removes an archived document.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn remove(&self, key: &str) -> Result<(), ArchiveError> {
        self.operator.delete(key).await?;
        Ok(())
    }
}

/// Strips path separators and control characters from a filename.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("recibo_anticipo.pdf"), "recibo_anticipo.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("a:b*c?.pdf"), "a_b_c_.pdf");
    }

    #[test]
    fn test_document_key_shape() {
        let project = ProjectId::new();
        let key = ArchiveService::document_key(project, "cotizacion cliente.pdf");
        assert!(key.starts_with(&format!("projects/{project}/")));
        assert!(key.ends_with("cotizacion cliente.pdf"));
    }

    #[tokio::test]
    async fn test_store_and_fetch_roundtrip_on_local_fs() {
        let root = std::env::temp_dir().join(format!("mobilia-archive-{}", uuid::Uuid::new_v4()));
        let service = ArchiveService::from_config(&ArchiveConfig {
            provider: ArchiveProvider::local_fs(&root),
        })
        .unwrap();

        let key = ArchiveService::document_key(ProjectId::new(), "orden_compra.pdf");
        service.store(&key, b"%PDF-1.4 stub".to_vec()).await.unwrap();
        let bytes = service.fetch(&key).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4 stub".to_vec());

        service.remove(&key).await.unwrap();
        assert!(matches!(
            service.fetch(&key).await,
            Err(ArchiveError::NotFound { .. })
        ));
    }
}
