//! Generated test scaffolding for commit-based extraction.

use std::path::Path;

use crate::error::{HarvestError, Result};

/// Requirements written for every commit-based extraction.
pub const DEFAULT_REQUIREMENTS: &str = "pytest\n";

/// Renders a bash script running each test file through pytest.
#[must_use]
pub fn render_run_test_script(tests: &[String]) -> String {
    let mut script = String::from("#!/bin/bash\n");
    for test in tests {
        script.push_str("python -m pytest ");
        script.push_str(test);
        script.push('\n');
    }
    script
}

/// Writes `run_test.sh` into `out_dir` and makes it executable.
///
/// # Errors
///
/// Returns an error if the script cannot be written or its mode set.
pub fn write_run_test_script(out_dir: &Path, tests: &[String]) -> Result<()> {
    let path = out_dir.join("run_test.sh");
    std::fs::write(&path, render_run_test_script(tests)).map_err(|e| HarvestError::io(&path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .map_err(|e| HarvestError::io(&path, e))?;
    }
    Ok(())
}

/// Writes `requirements.txt` containing [`DEFAULT_REQUIREMENTS`].
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_requirements(out_dir: &Path) -> Result<()> {
    let path = out_dir.join("requirements.txt");
    std::fs::write(&path, DEFAULT_REQUIREMENTS).map_err(|e| HarvestError::io(&path, e))
}
