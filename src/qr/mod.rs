//! QR code generation for print campaigns

pub mod render;

pub use render::{QrLabel, render, render_bare, render_labeled};

use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::{error, info};

use crate::attribution::build_attribution_url;
use crate::config::{Campaign, QrConfig};
use crate::errors::{PrintlinkerError, Result};
use crate::utils::sanitize_file_name;

/// 成功生成的二维码
#[derive(Debug, Clone)]
pub struct GeneratedQr {
    pub campaign_name: String,
    pub token: String,
    pub url: String,
    pub path: PathBuf,
}

/// 批量生成结果
#[derive(Debug, Default)]
pub struct QrBatchResult {
    pub generated: Vec<GeneratedQr>,
    /// (活动名, 错误)
    pub failed: Vec<(String, PrintlinkerError)>,
}

impl QrBatchResult {
    pub fn success_count(&self) -> usize {
        self.generated.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }
}

/// `{token}_{sanitized_name}.png`
pub fn qr_file_name(token: &str, campaign_name: &str) -> String {
    format!("{}_{}.png", token, sanitize_file_name(campaign_name))
}

/// Render and save the QR code for a single campaign.
pub fn generate_one(
    campaign: &Campaign,
    config: &QrConfig,
    output_dir: &Path,
) -> Result<GeneratedQr> {
    let (url, token) = build_attribution_url(campaign);
    let img = render(&url, &campaign.name, &token, &campaign.location, config)?;

    let path = output_dir.join(qr_file_name(&token, &campaign.name));
    img.save_with_format(&path, ImageFormat::Png)?;

    Ok(GeneratedQr {
        campaign_name: campaign.name.clone(),
        token,
        url,
        path,
    })
}

/// 为所有活动生成二维码
///
/// 输出目录创建失败直接返回错误；单个活动失败只记录日志，继续处理后续活动。
pub fn generate_all<P: AsRef<Path>>(
    campaigns: &[Campaign],
    config: &QrConfig,
    output_dir: P,
) -> Result<QrBatchResult> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir).map_err(|e| {
        PrintlinkerError::file_operation(format!(
            "Failed to create QR output directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    let mut result = QrBatchResult::default();
    let total = campaigns.len();

    for (i, campaign) in campaigns.iter().enumerate() {
        match generate_one(campaign, config, output_dir) {
            Ok(qr) => {
                info!(
                    "[{}/{}] QR code for '{}' saved to {}",
                    i + 1,
                    total,
                    campaign.name,
                    qr.path.display()
                );
                result.generated.push(qr);
            }
            Err(e) => {
                error!(
                    "[{}/{}] Failed to generate QR code for '{}': {}",
                    i + 1,
                    total,
                    campaign.name,
                    e
                );
                result.failed.push((campaign.name.clone(), e));
            }
        }
    }

    Ok(result)
}
