//! Concurrent file collection.
//!
//! Discovery walks directories per platform concurrently; file reads are
//! all issued at once and awaited together. Unreadable or invalid files
//! are logged and skipped — only a missing base directory fails the run.

use std::path::{Path, PathBuf};

use langsheet::config::{PlatformConfig, PlatformKind};
use tokio::task::JoinSet;

/// One file read from a locale directory.
#[derive(Debug, Clone)]
pub struct LocaleFile {
    /// File name, extension included.
    pub name: String,
    pub contents: String,
}

/// One file read from a platform tree (`<base>/<platform>/<lang>/<file>`).
#[derive(Debug, Clone)]
pub struct PlatformFile {
    pub platform: String,
    pub kind: PlatformKind,
    pub lang: String,
    pub path: PathBuf,
    pub name: String,
    pub contents: String,
}

/// Reads every file with the given extension in one locale directory, all
/// reads issued concurrently. Results come back in file-name order so
/// later merging is deterministic.
pub async fn read_locale_dir(dir: &Path, extension: &str) -> Result<Vec<LocaleFile>, String> {
    let suffix = if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{}", extension)
    };

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| format!("locale directory {} does not exist: {}", dir.display(), e))?;

    let mut names: Vec<String> = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(&suffix) {
                names.push(name.to_string());
            }
        }
    }

    let mut reads = JoinSet::new();
    for name in names {
        let path = dir.join(&name);
        reads.spawn(async move {
            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => Some(LocaleFile { name, contents }),
                Err(e) => {
                    log::warn!("[{}] read skipped: {}", path.display(), e);
                    None
                }
            }
        });
    }

    let mut files: Vec<LocaleFile> = reads.join_all().await.into_iter().flatten().collect();
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Collects every locale file under the per-platform trees. Platform
/// directories are walked concurrently; missing ones are skipped with a
/// warning. Results come back sorted by platform, language, and name.
pub async fn collect_platform_files(
    base: &Path,
    platforms: &[PlatformConfig],
) -> Vec<PlatformFile> {
    let mut discoveries = JoinSet::new();
    for platform in platforms.iter().cloned() {
        let base = base.to_path_buf();
        discoveries.spawn(async move { discover_platform(&base, &platform).await });
    }
    let found: Vec<(PlatformConfig, String, PathBuf)> = discoveries
        .join_all()
        .await
        .into_iter()
        .flatten()
        .collect();

    let mut reads = JoinSet::new();
    for (platform, lang, path) in found {
        reads.spawn(async move {
            let contents = match tokio::fs::read_to_string(&path).await {
                Ok(contents) => contents,
                Err(e) => {
                    log::warn!("[{}] read skipped: {}", path.display(), e);
                    return None;
                }
            };
            if platform.kind == PlatformKind::Web && is_empty_web_file(&contents) {
                log::warn!("[{}] empty or invalid content, skipped", path.display());
                return None;
            }
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            Some(PlatformFile {
                platform: platform.name.clone(),
                kind: platform.kind,
                lang,
                path,
                name,
                contents,
            })
        });
    }

    let mut files: Vec<PlatformFile> = reads.join_all().await.into_iter().flatten().collect();
    files.sort_by(|a, b| {
        (&a.platform, &a.lang, &a.name).cmp(&(&b.platform, &b.lang, &b.name))
    });
    files
}

/// Lists `(platform, lang, path)` for every matching file under one
/// platform directory.
async fn discover_platform(
    base: &Path,
    platform: &PlatformConfig,
) -> Vec<(PlatformConfig, String, PathBuf)> {
    let platform_dir = base.join(&platform.dir);
    let mut langs = match tokio::fs::read_dir(&platform_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("[{}] platform directory skipped: {}", platform_dir.display(), e);
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    while let Ok(Some(lang_entry)) = langs.next_entry().await {
        let is_dir = lang_entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        if !is_dir {
            continue;
        }
        let Some(lang) = lang_entry.file_name().to_str().map(str::to_string) else {
            continue;
        };

        let lang_dir = lang_entry.path();
        let Ok(mut files) = tokio::fs::read_dir(&lang_dir).await else {
            continue;
        };
        while let Ok(Some(file_entry)) = files.next_entry().await {
            let Some(name) = file_entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if platform.kind.matches_file(&name) {
                found.push((platform.clone(), lang.clone(), file_entry.path()));
            }
        }
    }
    found
}

/// Generated files that carry no entries at all.
fn is_empty_web_file(contents: &str) -> bool {
    let trimmed = contents.trim();
    trimmed.is_empty()
        || trimmed == "module.exports = undefined;"
        || trimmed == "module.exports={};"
}
