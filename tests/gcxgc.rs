use image::{GrayImage, Luma};
use labut::utilities::errors::LabError;
use labut::utilities::gcxgc::{
    GcxGcOptions, Mask, convert_to_2d, load_masks, mask_integrate, mask_name, modulate,
    prepare_2d, process_chromatogram, process_trace, volume,
};
use labut::utilities::parse::parse_gcxgc_str;
use labut::utilities::structs::Chromatogram1D;
use ndarray::Array2;
use std::path::Path;

mod helpers;
use helpers::{approx_eq, gaussian_value, jitter};

// 2 s modulation sampled every 100 ms
const OPTS: GcxGcOptions = GcxGcOptions {
    split_time: 2.0,
    sampling_interval: 100.0,
    shift: 0,
    solvent_time: 0.0,
};

fn ramp(n: usize) -> Chromatogram1D {
    Chromatogram1D {
        time: (0..n).map(|i| i as f64 * 0.1).collect(),
        intensity: (0..n).map(|i| i as f64).collect(),
    }
}

// a small spot on a noisy baseline, 10 modulations of 20 points (9 kept)
fn spot_trace() -> Chromatogram1D {
    let n = 200;
    let intensity = (0..n)
        .map(|i| {
            let (m, k) = ((i / 20) as f64, (i % 20) as f64);
            1.0 + 0.01 * jitter(i as u32)
                + gaussian_value(m, 4.0, 1.0, 50.0, 0.0) * gaussian_value(k, 8.0, 2.0, 1.0, 0.0)
        })
        .collect();
    Chromatogram1D {
        time: (0..n).map(|i| i as f64 * 0.1).collect(),
        intensity,
    }
}

fn export_text(chrom: &Chromatogram1D) -> String {
    let mut s = String::from("Sample: test run\nTime(ms),Time(min),unknown,Absolute Intensity\n");
    for (t, y) in chrom.time.iter().zip(&chrom.intensity) {
        s.push_str(&format!("{},{},0,{}\n", t * 1000.0, 3.0 + t / 60.0, y));
    }
    s
}

fn write_mask(dir: &Path, name: &str, w: u32, h: u32, value: u8) {
    let img = GrayImage::from_pixel(w, h, Luma([value]));
    img.save(dir.join(name)).unwrap();
}

// columns are modulations, latest second-dimension time in row 0; the last
// modulation is not kept
#[test]
fn folds_trace_into_columns() {
    let c2d = convert_to_2d(&ramp(200), 2.0, 100.0).unwrap();
    assert_eq!(c2d.shape(), (20, 9));
    assert_eq!(c2d.first_dim.len(), 9);
    assert_eq!(c2d.intensity[[0, 8]], 179.0);
    assert_eq!(c2d.intensity[[0, 0]], 19.0);
    assert_eq!(c2d.intensity[[19, 0]], 0.0);
    assert_eq!(c2d.intensity[[0, 1]], 39.0);
    assert!(approx_eq(c2d.second_dim[0], 1.9, 1e-12));
    assert!(approx_eq(*c2d.second_dim.last().unwrap(), 0.0, 1e-12));
    assert_eq!(c2d.first_dim[3], 6.0);
}

// a partial last modulation is padded with its last sample
#[test]
fn pads_partial_modulation() {
    let groups = modulate(&ramp(205), 2.0, 100.0).unwrap();
    assert_eq!(groups.len(), 11);
    assert_eq!(groups[10].len(), 20);
    assert!(groups[10][5..].iter().all(|v| *v == 204.0));

    let c2d = convert_to_2d(&ramp(205), 2.0, 100.0).unwrap();
    assert_eq!(c2d.shape(), (20, 10));
    assert_eq!(c2d.intensity[[0, 9]], 199.0);
}

#[test]
fn single_modulation_cannot_be_folded() {
    assert!(matches!(
        convert_to_2d(&ramp(20), 2.0, 100.0),
        Err(LabError::EmptyInput(_))
    ));
    assert!(convert_to_2d(&ramp(21), 2.0, 100.0).is_ok());
}

// split time must hold a whole number of samples
#[test]
fn rejects_fractional_modulation() {
    let err = convert_to_2d(&ramp(100), 2.05, 100.0).unwrap_err();
    assert!(matches!(err, LabError::InvalidOptions(_)));
}

// the prepared chromatogram has unit volume and no negative values
#[test]
fn prepared_chromatogram_is_normalized() {
    let c2d = prepare_2d(spot_trace(), OPTS).unwrap();
    assert!(approx_eq(volume(&c2d.intensity), 1.0, 1e-9));
    assert!(c2d.intensity.iter().all(|v| *v >= 0.0));
}

// an all-zero trace cannot be normalized
#[test]
fn flat_trace_has_zero_volume() {
    let flat = Chromatogram1D {
        time: (1..=200).map(|i| i as f64 * 0.1).collect(),
        intensity: vec![3.0; 200],
    };
    assert!(matches!(prepare_2d(flat, OPTS), Err(LabError::ZeroVolume)));
}

// full mask takes everything, nothing is left unassigned
#[test]
fn full_mask_takes_whole_volume() {
    let mask = Mask {
        name: "All".into(),
        weights: Array2::ones((20, 9)),
    };
    let (ints, _) = process_trace(spot_trace(), OPTS, &[mask]).unwrap();
    assert!(approx_eq(ints.get("All").unwrap(), 1.0, 1e-9));
    assert!(approx_eq(ints.unassigned, 0.0, 1e-9));
}

// mask shape must match the folded chromatogram
#[test]
fn mask_shape_mismatch_is_an_error() {
    let c2d = prepare_2d(spot_trace(), OPTS).unwrap();
    let mask = Mask {
        name: "Wrong".into(),
        weights: Array2::ones((10, 20)),
    };
    assert!(matches!(
        mask_integrate(&c2d, &[mask]),
        Err(LabError::ShapeMismatch { .. })
    ));
}

#[test]
fn mask_names_come_from_file_stem() {
    assert_eq!(mask_name(Path::new("/m/Mask_Monoaromatics.tif")), "Monoaromatics");
    assert_eq!(mask_name(Path::new("Paraffins.tiff")), "Paraffins");
    assert_eq!(mask_name(Path::new("Mask_iso.C8.tif")), "iso");
}

// parser converts minutes to seconds from the first sample
#[test]
fn parses_export_text() {
    let chrom = parse_gcxgc_str(&export_text(&ramp(50))).unwrap();
    assert_eq!(chrom.len(), 50);
    assert!(approx_eq(chrom.time[0], 0.0, 1e-9));
    assert!(approx_eq(chrom.time[10], 1.0, 1e-6));
    assert_eq!(chrom.intensity[7], 7.0);
}

#[test]
fn parse_reports_bad_number() {
    let text = "x\nTime(ms),Time(min),unknown,Absolute Intensity\n0,0.0,0,1\n100,abc,0,2\n";
    assert!(matches!(
        parse_gcxgc_str(text),
        Err(LabError::Parse { .. })
    ));
}

// file export and TIFF masks end to end
#[test]
fn processes_files_with_tiff_masks() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("run.csv");
    std::fs::write(&file, export_text(&spot_trace())).unwrap();

    let masks = dir.path().join("masks");
    std::fs::create_dir(&masks).unwrap();
    write_mask(&masks, "Mask_Half.tif", 9, 20, 127);
    write_mask(&masks, "Mask_None.tif", 9, 20, 0);
    std::fs::write(masks.join("notes.txt"), "ignored").unwrap();

    let loaded = load_masks(&masks).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].name, "Half");

    let (ints, c2d) = process_chromatogram(&file, OPTS, &masks).unwrap();
    assert_eq!(c2d.shape(), (20, 9));
    let half = ints.get("Half").unwrap();
    assert!(approx_eq(half, 127.0 / 255.0, 1e-6), "half={half}");
    assert!(approx_eq(ints.get("None").unwrap(), 0.0, 1e-12));
    assert!(approx_eq(ints.unassigned, 1.0 - half, 1e-9));
}
