pub mod check;
pub mod run;

use anyhow::Context;
use knobs::{Knobs, Manifest};
use std::path::Path;

/// Load a manifest file and register everything it declares
pub(crate) fn load_manifest(path: &Path) -> anyhow::Result<Knobs> {
    let manifest = Manifest::from_path(path)
        .with_context(|| format!("Failed to load manifest {}", path.display()))?;
    let knobs = Knobs::from_manifest(manifest)
        .with_context(|| format!("Invalid manifest {}", path.display()))?;
    tracing::debug!("Loaded manifest {}", path.display());
    Ok(knobs)
}
