use anyhow::Context;
use tracing_subscriber::EnvFilter;
use vfs_sort_kit::{
    CheckedAction, ReportMode, VfsConfig, VirtualFileSystem, WriterHandler, expand_pattern,
    report_channel,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // an optional TOML file selects the backend; memory otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => VfsConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => VfsConfig::default(),
    };
    let fs = config.open()?;

    fs.write_entry("/docs/first.txt", b"Hello", false)?;
    fs.write_entry("/second.txt", b"World", false)?;
    fs.write_entry("/docs/notes.md", b"# notes", false)?;

    let first = String::from_utf8(fs.read_entry("/docs/first.txt")?)?;
    let second = String::from_utf8(fs.read_entry("/second.txt")?)?;
    println!("{first}, {second}!");

    println!("text files in /docs: {:?}", expand_pattern(&fs, "/docs/*.txt")?);

    // failures inside callbacks are reported once, at the top
    let (errors, reports) = report_channel();
    let show_size = |name: &&str| -> anyhow::Result<()> {
        let content = fs.read_entry(name)?;
        println!("{name}: {} bytes", content.len());
        Ok(())
    };
    let mut open = CheckedAction::new("Could not open entry", errors, show_size)
        .with_mode(ReportMode::OkDetails);
    open.perform(&"/docs/first.txt");
    open.perform(&"/docs/missing.txt");

    let handler = WriterHandler::new(std::io::stderr());
    reports.dispatch_pending(&handler);

    fs.remove_entry("/docs")?;
    fs.remove_entry("/second.txt")?;
    Ok(())
}
