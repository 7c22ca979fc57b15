//! Example: packing and unpacking with emarch-core
//!
//! Run with: `cargo run --example round_trip`
//! Needs `tar` and `gzip` on `PATH`.

use emarch_core::ArchiveFormat;
use emarch_core::PackEngine;
use emarch_core::StdioReporter;
use emarch_core::ToolConfig;
use emarch_core::UnpackEngine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let work = std::env::temp_dir().join("emarch-example");
    let out = work.join("out");
    std::fs::create_dir_all(&out)?;
    std::fs::write(work.join("hello.txt"), "Hello, emarch!")?;

    let reporter = StdioReporter::new();
    let config = ToolConfig::default();

    println!("Example 1: pack into a tar.gz");
    let format = ArchiveFormat::resolve("hello.tgz")?;
    let report = PackEngine::new(config, &reporter)
        .in_dir(&work)
        .pack(format, "hello.tgz", &["hello.txt"])?;
    println!("  ran: {}", report.commands.join("; "));

    println!("\nExample 2: scan and unpack it elsewhere");
    let report = UnpackEngine::new(config, &reporter)
        .in_dir(&out)
        .unpack(format, work.join("hello.tgz"), false)?;
    println!("  scanned: {:?}", report.verdict);
    println!("  content: {}", std::fs::read_to_string(out.join("hello.txt"))?);

    std::fs::remove_dir_all(&work)?;
    println!("\nExamples completed successfully!");
    Ok(())
}
