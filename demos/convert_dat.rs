// cargo run --example convert_dat -- mesh.dat [out_dir] [options.json]
use pflotran_mesh::convert::{ConvertOptions, export_mesh_with_regions};
use std::path::{Path, PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        eprintln!("usage: convert_dat <mesh.dat> [out_dir] [options.json]");
        std::process::exit(2);
    };
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let options: ConvertOptions = match args.next() {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => ConvertOptions::default(),
    };

    let name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh")
        .to_string();
    let summary = export_mesh_with_regions(&input, &[], Path::new(&out_dir), &name, &options)?;
    let report = &summary.report;
    println!(
        "{}: {} cells, {} vertices ({} skipped, {} reordered)",
        summary.mesh_path.display(),
        report.elements_written,
        report.vertices,
        report.skipped,
        report.reordered
    );
    println!("{}", summary.assignment_path.display());
    for diagnostic in &report.diagnostics {
        println!("  {diagnostic}");
    }
    if report.has_flagged_elements() {
        println!("{} element(s) need attention", report.diagnostics.len());
    }
    Ok(())
}
