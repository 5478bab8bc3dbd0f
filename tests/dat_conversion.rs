use pflotran_mesh::convert::{
    ConversionJob, ConvertOptions, Dimension, OutputFormat, Submesh, convert, convert_batch,
    convert_file, export_mesh_with_regions,
};
use pflotran_mesh::geometry::metrics::cell_signed_volume;
use pflotran_mesh::io::MeshReader;
use pflotran_mesh::io::binary::read_binary_mesh;
use pflotran_mesh::io::pflotran::PflotranAsciiReader;
use pflotran_mesh::io::salome_dat::SalomeDatReader;
use pflotran_mesh::mesh_error::MeshError;
use pflotran_mesh::topology::cell_type::CellType;
use std::fs;

const SINGLE_TET: &str = "4 1\n\
1 0 0 0\n\
2 1 0 0\n\
3 0 1 0\n\
4 0 0 1\n\
1 304 1 2 3 4\n";

const BLOCK: &str = "12 5\n\
1 0 0 0\n\
2 1 0 0\n\
3 1 1 0\n\
4 0 1 0\n\
5 0 0 1\n\
6 1 0 1\n\
7 1 1 1\n\
8 0 1 1\n\
9 0 0 2\n\
10 1 0 2\n\
11 1 1 2\n\
12 0 1 2\n\
1 308 5 6 7 8 1 2 3 4\n\
2 308 9 10 11 12 5 6 7 8\n\
3 204 1 2 3 4\n\
4 102 1 2\n\
5 305 1 4 3 2 9\n";

fn convert_text(text: &str, options: &ConvertOptions) -> (String, pflotran_mesh::convert::ConversionReport) {
    let mut out = Vec::new();
    let report = convert(text.as_bytes(), &mut out, "test", options).expect("convert");
    (String::from_utf8(out).expect("utf8"), report)
}

#[test]
fn single_tetrahedron_end_to_end() {
    let (text, report) = convert_text(SINGLE_TET, &ConvertOptions::default());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "1 4");
    assert_eq!(lines[1], "T 1 2 3 4");
    assert_eq!(&lines[2..], &["0 0 0", "1 0 0", "0 1 0", "0 0 1"]);
    assert_eq!(report.elements_written, 1);

    let grid = PflotranAsciiReader.read(text.as_bytes()).expect("read grid");
    let points = grid
        .coordinates
        .gather(grid.cells[0].id, &grid.cells[0].nodes)
        .expect("points");
    let volume = cell_signed_volume(CellType::Tetrahedron, &points).expect("volume");
    assert!(volume > 0.0, "volume {volume}");
}

#[test]
fn millimetre_tetrahedron_is_written() {
    let dump = "4 1\n1 0 0 0\n2 0.001 0 0\n3 0 0.001 0\n4 0 0 0.001\n1 304 2 1 3 4\n";
    let (text, report) = convert_text(dump, &ConvertOptions::default());
    assert_eq!(text.lines().next(), Some("1 4"));
    assert_eq!(text.lines().nth(1), Some("T 1 2 3 4"));
    assert_eq!(report.excluded(), 0);
    assert_eq!(report.reordered, 1);
}

#[test]
fn header_counts_only_written_cells() {
    let (text, report) = convert_text(BLOCK, &ConvertOptions::default());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "3 12");
    assert_eq!(report.elements_read, 5);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.elements_written, 3);
    assert_eq!(lines.len(), 1 + 3 + 12);
    assert!(lines[1].starts_with("H "));
    assert!(lines[2].starts_with("H "));
    assert!(lines[3].starts_with("P "));
}

#[test]
fn every_written_cell_has_positive_volume() {
    let (text, report) = convert_text(BLOCK, &ConvertOptions::default());
    assert!(!report.has_flagged_elements(), "{:?}", report.diagnostics);
    assert_eq!(report.reordered, 3);
    let grid = PflotranAsciiReader.read(text.as_bytes()).expect("read grid");
    for cell in &grid.cells {
        let points = grid.coordinates.gather(cell.id, &cell.nodes).expect("points");
        let volume = cell_signed_volume(cell.cell_type, &points).expect("volume");
        assert!(volume > 0.0, "cell {} volume {volume}", cell.id);
    }
}

#[test]
fn round_trip_without_reorientation() {
    let options = ConvertOptions {
        reorient: false,
        ..Default::default()
    };
    let (text, _) = convert_text(BLOCK, &options);
    let source = SalomeDatReader.read(BLOCK.as_bytes()).expect("read dump");
    let grid = PflotranAsciiReader.read(text.as_bytes()).expect("read grid");

    assert_eq!(&grid.coordinates, source.coordinates());
    let volumes: Vec<_> = source.volume_elements().collect();
    assert_eq!(grid.cells.len(), volumes.len());
    for (written, original) in grid.cells.iter().zip(volumes) {
        assert_eq!(written.cell_type, original.cell_type);
        assert_eq!(written.nodes, original.nodes);
    }
}

#[test]
fn two_dimensional_conversion() {
    let options = ConvertOptions {
        dimension: Dimension::Two,
        ..Default::default()
    };
    let (text, report) = convert_text(BLOCK, &options);
    assert!(text.starts_with("1 12\nQ 1 2 3 4\n"));
    assert_eq!(report.skipped, 4);
}

#[test]
fn malformed_dump_leaves_no_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("broken.dat");
    let output = dir.path().join("broken.mesh");
    fs::write(&input, "4 2\n1 0 0 0\n2 1 0 0\n3 0 1 0\n4 0 0 1\n1 304 1 2 3 4\n")
        .expect("write input");

    let err = convert_file(&input, &output, &ConvertOptions::default()).expect_err("must fail");
    assert!(matches!(err, MeshError::MeshIoParse { .. }), "{err:?}");
    assert!(!output.exists());

    fs::write(&output, "previous").expect("seed output");
    fs::write(&input, "1 1\n1 0 0 0\n1 999 1\n").expect("write input");
    let err = convert_file(&input, &output, &ConvertOptions::default()).expect_err("must fail");
    assert!(matches!(err, MeshError::UnknownTopologyCode { code: 999, .. }), "{err:?}");
    assert_eq!(fs::read_to_string(&output).expect("output"), "previous");
}

#[test]
fn batch_converts_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let jobs: Vec<ConversionJob> = [("tet", SINGLE_TET), ("block", BLOCK)]
        .iter()
        .map(|(name, text)| {
            let input = dir.path().join(format!("{name}.dat"));
            fs::write(&input, text).expect("write input");
            ConversionJob {
                input,
                output: dir.path().join(format!("{name}.mesh")),
            }
        })
        .collect();

    let reports = convert_batch(&jobs, &ConvertOptions::default()).expect("batch");
    let names: Vec<&str> = reports.iter().map(|r| r.mesh_name.as_str()).collect();
    assert_eq!(names, vec!["tet", "block"]);
    assert!(
        fs::read_to_string(&jobs[1].output)
            .expect("block output")
            .starts_with("3 12\n")
    );
}

#[test]
fn export_single_material() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dump = dir.path().join("main.dat");
    fs::write(&dump, BLOCK).expect("write dump");

    let summary = export_mesh_with_regions(&dump, &[], dir.path(), "block", &ConvertOptions::default())
        .expect("export");
    assert_eq!(summary.mesh_path, dir.path().join("block.mesh"));
    assert_eq!(summary.assignment_path, dir.path().join("block_zone.assignment"));
    assert_eq!(
        fs::read_to_string(&summary.assignment_path).expect("assignment"),
        "block.dat 1\n"
    );
    assert!(
        fs::read_to_string(&summary.mesh_path)
            .expect("mesh")
            .starts_with("3 12\n")
    );
}

#[test]
fn export_binary_with_regions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dump = dir.path().join("main.dat");
    fs::write(&dump, BLOCK).expect("write dump");
    let vertices: String = BLOCK.lines().skip(1).take(12).map(|l| format!("{l}\n")).collect();
    let lower = dir.path().join("lower.dat");
    fs::write(&lower, format!("12 1\n{vertices}1 308 5 6 7 8 1 2 3 4\n")).expect("write lower");
    let upper = dir.path().join("upper.dat");
    fs::write(
        &upper,
        format!("12 2\n{vertices}2 308 9 10 11 12 5 6 7 8\n5 305 1 4 3 2 9\n"),
    )
    .expect("write upper");
    let submeshes = vec![
        Submesh {
            name: "lower".into(),
            dump: lower,
        },
        Submesh {
            name: "upper".into(),
            dump: upper,
        },
    ];

    let options = ConvertOptions {
        format: OutputFormat::Binary,
        ..Default::default()
    };
    let summary = export_mesh_with_regions(&dump, &submeshes, dir.path(), "site", &options)
        .expect("export");
    assert_eq!(summary.mesh_path, dir.path().join("site.h5bin"));
    assert_eq!(
        fs::read_to_string(&summary.assignment_path).expect("assignment"),
        "lower.dat 1\nupper.dat 2\n"
    );

    let bytes = fs::read(&summary.mesh_path).expect("container");
    let container = read_binary_mesh(bytes.as_slice()).expect("decode");
    assert_eq!(container.cells.len(), 3);
    assert_eq!(container.vertices.len(), 12);
    assert_eq!(container.cells[2][0], 5);
    let regions: Vec<(&str, u32, Vec<u64>)> = container
        .regions
        .iter()
        .map(|r| (r.name.as_str(), r.index, r.cells.clone()))
        .collect();
    assert_eq!(
        regions,
        vec![("lower", 1, vec![1]), ("upper", 2, vec![2, 3])]
    );
}

#[test]
fn ascii_export_with_regions_still_writes_assignment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dump = dir.path().join("main.dat");
    fs::write(&dump, SINGLE_TET).expect("write dump");
    let submeshes = vec![
        Submesh {
            name: "a".into(),
            dump: dump.clone(),
        },
        Submesh {
            name: "b".into(),
            dump: dump.clone(),
        },
    ];
    let summary = export_mesh_with_regions(&dump, &submeshes, dir.path(), "tet", &ConvertOptions::default())
        .expect("export");
    assert_eq!(summary.assignment_path, dir.path().join("tet_region.assignment"));
    assert_eq!(
        fs::read_to_string(&summary.assignment_path).expect("assignment"),
        "a.dat 1\nb.dat 2\n"
    );
    assert_eq!(
        fs::read_to_string(&summary.mesh_path).expect("mesh").lines().next(),
        Some("1 4")
    );
}
