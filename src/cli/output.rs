use super::commands::OutputFormat;
use colored::*;
use img_sweep::Report;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub fn write_report(report: &Report, format: OutputFormat, output: Option<&Path>) -> anyhow::Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => {
            colored::control::set_override(false);
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(io::stdout().lock()),
    };

    match format {
        OutputFormat::Text => write_text(report, &mut writer)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, report)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => write_csv(report, &mut writer)?,
    }

    writer.flush()?;
    Ok(())
}

fn write_text(report: &Report, writer: &mut dyn Write) -> io::Result<()> {
    writeln!(writer, "Scan root: {}", report.scan_root.display())?;
    writeln!(
        writer,
        "{} catalog references, {} images scanned",
        report.reference_count, report.files_scanned
    )?;
    for orphan in &report.orphans {
        writeln!(writer, "  {}", orphan.relative_path)?;
    }
    if report.orphans.is_empty() {
        writeln!(writer, "{}", "No orphaned images found".green())?;
    } else {
        writeln!(
            writer,
            "{} orphaned images, {} bytes reclaimable",
            format!("{}", report.orphan_count()).red(),
            format!("{}", report.reclaimable_bytes()).red(),
        )?;
    }
    Ok(())
}

fn write_csv(report: &Report, writer: &mut dyn Write) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["path", "relative_path", "size"])?;
    for orphan in &report.orphans {
        csv_writer.write_record(&[
            orphan.path.to_string_lossy().into_owned(),
            orphan.relative_path.clone(),
            orphan.size.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn print_deletion(report: &Report) {
    println!(
        "{} of {} files deleted",
        format!("{}", report.deleted_count()).green(),
        report.requested
    );
    for error in &report.errors {
        println!("  {}", error.red());
    }
}
