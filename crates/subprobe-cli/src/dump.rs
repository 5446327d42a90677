//! JSON result files: `<purpose>_<submission_id>.json`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;

pub fn report_path(dir: &Path, purpose: &str, submission_id: &str) -> PathBuf {
    dir.join(format!("{purpose}_{submission_id}.json"))
}

/// Write `value` as pretty JSON, replacing any previous file of the same name.
pub fn write_report(
    dir: &Path,
    purpose: &str,
    submission_id: &str,
    value: &Value,
) -> anyhow::Result<PathBuf> {
    let path = report_path(dir, purpose, submission_id);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("writing {}", path.display()))?;
    writer.flush()?;
    Ok(path)
}
