use anyhow::{anyhow, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const MANIFEST_ENTRY: &str = "manifest.json";
const ENTRIES_ENTRY: &str = "entries.json";
pub const BUNDLE_FORMAT_V1: &str = "schedule-bundle-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
    pub sha256: String,
}

#[derive(Debug, Clone)]
pub struct ImportedBundle {
    pub bundle_format: String,
    pub entries_json: String,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Write the serialized entry list plus a manifest into a zip bundle.
pub fn export_schedule_bundle(
    entries_json: &str,
    entry_count: usize,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let sha256 = sha256_hex(entries_json.as_bytes());
    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": chrono::Utc::now().to_rfc3339(),
        "entryCount": entry_count,
        "entriesSha256": sha256,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    zip.start_file(ENTRIES_ENTRY, opts)
        .context("failed to start entries entry")?;
    zip.write_all(entries_json.as_bytes())
        .context("failed to write entries entry")?;

    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        entry_count,
        sha256,
    })
}

/// Read a bundle back, checking its format and payload checksum.
///
/// The returned payload is still raw text; callers run it through the same
/// shape filter used for the persisted slot.
pub fn import_schedule_bundle(in_path: &Path) -> anyhow::Result<ImportedBundle> {
    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT_V1 {
        return Err(anyhow!("unsupported bundle format: {}", format));
    }

    let mut entries_json = String::new();
    archive
        .by_name(ENTRIES_ENTRY)
        .context("bundle missing entries.json")?
        .read_to_string(&mut entries_json)
        .context("failed to read entries.json")?;

    if let Some(expected) = manifest.get("entriesSha256").and_then(|v| v.as_str()) {
        let actual = sha256_hex(entries_json.as_bytes());
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(anyhow!(
                "entries.json checksum mismatch: expected {}, got {}",
                expected,
                actual
            ));
        }
    }

    Ok(ImportedBundle {
        bundle_format: format.to_string(),
        entries_json,
    })
}
