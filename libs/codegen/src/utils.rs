use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Write generated files to the given output directory, creating it if needed.
///
/// Files are written in name order so partial output after a failure is
/// predictable.
pub fn write_modules(output_dir: &Path, modules: &HashMap<String, String>) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let mut names: Vec<&String> = modules.keys().collect();
    names.sort();
    for filename in names {
        let path = output_dir.join(filename);
        fs::write(&path, &modules[filename])
            .with_context(|| format!("writing generated file {}", path.display()))?;
    }

    Ok(())
}
