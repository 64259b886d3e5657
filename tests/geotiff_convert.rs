use std::fs::{self, File};
use std::path::Path;

use sfcc_tools::convert::geotiff_to_sfcc;
use sfcc_tools::SfccHeader;
use tiff::encoder::{colortype, TiffEncoder};

fn write_gray16(path: &Path, width: u32, height: u32) -> Vec<u16> {
    let data: Vec<u16> = (0..width * height).map(|i| (i * 300) as u16).collect();
    let mut file = File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(&mut file).unwrap();
    encoder
        .write_image::<colortype::Gray16>(width, height, &data)
        .unwrap();
    data
}

#[test]
fn converts_square_power_of_two_image() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("dem.tif");
    let data = write_gray16(&input, 4, 4);

    let converted = geotiff_to_sfcc(&input).unwrap();
    assert_eq!(converted.output, dir.path().join("dem.sfcc"));
    assert_eq!(converted.header, SfccHeader::raw(2, 2, 2));
    assert_eq!(converted.raster.max, 4500.0);

    let bytes = fs::read(&converted.output).unwrap();
    assert_eq!(&bytes[..9], &[b'S', b'F', b'C', b'C', 2, 2, 2, 0, 0]);
    let payload: Vec<u16> = bytes[9..]
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    assert_eq!(payload, data);
}

#[test]
fn rejects_non_square_and_odd_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let wide = dir.path().join("wide.tif");
    write_gray16(&wide, 8, 4);
    let err = geotiff_to_sfcc(&wide).unwrap_err();
    assert!(err.to_string().contains("must be square"));

    let odd = dir.path().join("odd.tif");
    write_gray16(&odd, 6, 6);
    let err = geotiff_to_sfcc(&odd).unwrap_err();
    assert!(err.to_string().contains("power-of-two"));
    assert!(!dir.path().join("odd.sfcc").exists());
}

#[test]
fn rejects_multi_band_image() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rgb.tif");
    let mut file = File::create(&input).unwrap();
    let mut encoder = TiffEncoder::new(&mut file).unwrap();
    encoder
        .write_image::<colortype::RGB8>(2, 2, &[0u8; 12])
        .unwrap();
    drop(encoder);
    let err = geotiff_to_sfcc(&input).unwrap_err();
    assert!(err.to_string().contains("single band"));
}
