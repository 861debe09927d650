//! Example: archiving a folder and extracting it again with diskward-core
//!
//! Run with: `cargo run --example round_trip`

use diskward_core::ArchiveReader;
use diskward_core::ArchiveWriter;
use diskward_core::CreationConfig;
use diskward_core::LinkPolicy;
use diskward_core::TemporaryFolder;
use diskward_core::write_archive;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Everything below lives in a scratch folder removed on exit
    let scratch = TemporaryFolder::new()?;
    let source = scratch.path().join("project");
    std::fs::create_dir_all(source.join("src"))?;
    std::fs::write(source.join("README.md"), "Hello, diskward!")?;
    std::fs::write(source.join("src/main.txt"), "fn main() {}")?;
    std::fs::write(source.join("debug.log"), "noise")?;

    // Example 1: defaults write <source>.zip and leave links out
    println!("Example 1: Simple creation");
    let report = write_archive(&source, None, &CreationConfig::default())?;
    println!(
        "  Wrote {} with {} files",
        report.archive_path.display(),
        report.files_added
    );

    // Example 2: builder with exclusions and a tar.xz target
    println!("\nExample 2: Builder pattern");
    let archive = scratch.path().join("project.tar.xz");
    let report = ArchiveWriter::new(&source)
        .target(&archive)
        .link_policy(LinkPolicy::Validate)
        .exclude_name("*.log")
        .compression_level(9)
        .write()?;
    println!(
        "  Stored {} files, skipped {}, ratio {:.2}",
        report.files_added,
        report.entries_skipped,
        report.compression_ratio()
    );

    // Example 3: extraction removes every link unless told otherwise
    println!("\nExample 3: Extraction");
    let report = ArchiveReader::new(&archive)
        .target(scratch.path().join("restored"))
        .read()?;
    println!(
        "  Extracted {} files into {}",
        report.files_extracted,
        report.target_folder.display()
    );

    scratch.close()?;
    println!("\nExamples completed successfully!");
    Ok(())
}
