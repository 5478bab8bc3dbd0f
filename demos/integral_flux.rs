// cargo run --example integral_flux
use pflotran_mesh::io::MeshReader;
use pflotran_mesh::io::integral_flux::{
    CellNumbering, FaceSelection, FluxOption, IntegralFluxOptions, SurfaceEncoding,
    write_integral_flux,
};
use pflotran_mesh::io::salome_dat::SalomeDatReader;
use pflotran_mesh::topology::point::PointId;

const COLUMN: &str = "12 3
1 0 0 0
2 1 0 0
3 1 1 0
4 0 1 0
5 0 0 1
6 1 0 1
7 1 1 1
8 0 1 1
9 0 0 2
10 1 0 2
11 1 1 2
12 0 1 2
1 308 1 2 3 4 5 6 7 8
2 308 5 6 7 8 9 10 11 12
3 204 5 6 7 8
";

fn pt(id: u64) -> PointId {
    PointId::new(id).unwrap()
}

fn main() {
    let mesh = SalomeDatReader.read(COLUMN.as_bytes()).unwrap();
    let midplane = FaceSelection::new("midplane", vec![pt(3)]);
    let cells = CellNumbering::volume_cells(&mesh);

    for encoding in [
        SurfaceEncoding::CoordinatesAndDirections,
        SurfaceEncoding::Vertices,
        SurfaceEncoding::CellIds,
    ] {
        let options = IntegralFluxOptions {
            encoding,
            flux_option: FluxOption::PositiveOnly,
            invert_direction: false,
        };
        let mut out = Vec::new();
        write_integral_flux(&mut out, &mesh, &cells, &midplane, &options).unwrap();
        println!("--- {}", encoding.keyword());
        println!("{}", String::from_utf8(out).unwrap());
    }
}
