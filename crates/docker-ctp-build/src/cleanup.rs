//! 実行中に作ったイメージの後片付け

use crate::docker::Docker;

/// 登録順に削除する。重複登録はそのまま 2 回削除を試みる
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupManager {
    images: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<String>,
    pub failed: Vec<String>,
}

impl CleanupManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, image: impl Into<String>) {
        let image = image.into();
        tracing::debug!("Registered {} for cleanup", image);
        self.images.push(image);
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// 登録済みイメージをすべて削除し、登録リストを空にする
    ///
    /// 個々の失敗は警告ログのみで、残りの削除は続行する。
    pub async fn cleanup_all(&mut self, docker: &Docker) -> CleanupReport {
        let mut report = CleanupReport::default();
        if self.images.is_empty() {
            return report;
        }

        tracing::info!("Cleaning up {} image(s)...", self.images.len());
        for image in self.images.drain(..) {
            if docker.runner().is_dry_run() {
                tracing::info!("DRY-RUN would remove image {}", image);
                report.removed.push(image);
                continue;
            }

            match docker.remove_image(&image).await {
                Ok(()) => {
                    tracing::info!("Removed image {}", image);
                    report.removed.push(image);
                }
                Err(e) => {
                    tracing::warn!("Failed to remove image {}: {}", image, e.user_message());
                    report.failed.push(image);
                }
            }
        }
        report
    }
}
