use anyhow::Result;
use log::info;
use std::path::PathBuf;

/// Validate a measurement file and exit non-zero on failure
pub fn run(file: PathBuf) -> Result<()> {
    use daqfile::validator::validate_file;

    info!("Validating {}", file.display());
    let report = validate_file(&file);

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
