use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{bail, Context, Result};

static STAGE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replaces `path` with `content` so a concurrent reader observes either the
/// previous value or the new one, never a torn write. The content is staged
/// in a sibling `.part` file, flushed, and moved into place with a rename.
pub fn write_text_atomic(path: &Path, content: &str) -> Result<()> {
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        bail!("'{}' is not a writable file path", path.display());
    };
    if path.is_dir() {
        bail!("'{}' is a directory", path.display());
    }

    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)
        .with_context(|| format!("failed to create {}", parent_dir.display()))?;

    let stage_path = parent_dir.join(format!(
        ".{file_name}.{}-{}.part",
        std::process::id(),
        STAGE_COUNTER.fetch_add(1, Ordering::Relaxed),
    ));
    let mut stage = File::create(&stage_path)
        .with_context(|| format!("failed to stage write at {}", stage_path.display()))?;
    stage
        .write_all(content.as_bytes())
        .and_then(|()| stage.sync_all())
        .with_context(|| format!("failed to stage write at {}", stage_path.display()))?;
    drop(stage);

    fs::rename(&stage_path, path).with_context(|| {
        format!(
            "failed to move staged write into place at {}",
            path.display()
        )
    })?;
    Ok(())
}
