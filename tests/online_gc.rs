use labut::utilities::errors::LabError;
use labut::utilities::online_gc::{
    BaselineWindows, PeakTable, PeakWindow, baseline_correct, chromatogram_paths, integrate_peaks,
    plateau_mean, process_chromatograms,
};
use labut::utilities::parse::parse_online_gc_str;
use labut::utilities::structs::{Channel, FromTo};

mod helpers;
use helpers::{approx_eq, gaussian_value};

const FREQ: f64 = 10.0;
const POINTS: usize = 3500;

fn trace(base: f64, peak: Option<(f64, f64, f64)>) -> Vec<f64> {
    (0..POINTS)
        .map(|i| {
            let t = i as f64 / FREQ;
            base + peak.map_or(0.0, |(mu, s, a)| gaussian_value(t, mu, s, a, 0.0))
        })
        .collect()
}

fn export(freqs: (f64, f64, f64), channels: [&[f64]; 3]) -> String {
    let mut lines: Vec<String> = vec![
        "Title,online GC".into(),
        "Operator,lab".into(),
        "Method,refinery gas".into(),
        "Sample,run 1".into(),
        "Vial,1".into(),
        "Sequence,seq".into(),
        "Injection Date,2024-03-01 10:15:00".into(),
        format!("Sampling Rate,{},{},{}", freqs.0, freqs.1, freqs.2),
        "Total Data Points,3500,3500,3500".into(),
        "X Axis Title,Time".into(),
        "Y Axis Title,Signal".into(),
        "X Axis Multiplier,1".into(),
        "Y Axis Multiplier,1".into(),
    ];
    for ch in channels {
        lines.extend(ch.iter().map(|v| v.to_string()));
    }
    lines.join("\n")
}

fn standard_export() -> String {
    let fid_l = trace(0.5, Some((200.0, 1.5, 10.0)));
    let fid_m = trace(2.0, Some((100.0, 2.0, 50.0)));
    let tcd = trace(1.0, Some((30.0, 1.0, 20.0)));
    export((FREQ, FREQ, FREQ), [&fid_l, &fid_m, &tcd])
}

fn table() -> PeakTable {
    PeakTable {
        fid_m: vec![PeakWindow::new("C2H4", 90.0, 110.0)],
        tcd: vec![PeakWindow::new("H2", 25.0, 35.0)],
        fid_l: vec![PeakWindow::new("C6", 190.0, 210.0)],
    }
}

// channels are split into thirds and timed by the sampling frequency
#[test]
fn parses_three_channels() {
    let chrom = parse_online_gc_str(&standard_export()).unwrap();
    assert_eq!(chrom.len(), POINTS);
    assert_eq!(chrom.sampling_frequency, FREQ);
    assert!(approx_eq(chrom.time[10], 1.0, 1e-12));
    assert_eq!(chrom.injection_time.as_deref(), Some("2024-03-01 10:15:00"));
    assert!(approx_eq(chrom.channel(Channel::Tcd)[0], 1.0, 1e-9));
    assert!(approx_eq(chrom.channel(Channel::FidL)[0], 0.5, 1e-9));
    assert_eq!(chrom.metadata.len(), 13);
}

#[test]
fn unequal_sampling_is_rejected() {
    let x = trace(0.0, None);
    let text = export((10.0, 10.0, 20.0), [&x, &x, &x]);
    match parse_online_gc_str(&text) {
        Err(LabError::SamplingMismatch(f)) => assert_eq!(f, vec![10.0, 10.0, 20.0]),
        other => panic!("expected SamplingMismatch, got {other:?}"),
    }
}

// baseline windows remove the constant offset of each channel
#[test]
fn baseline_windows_remove_offsets() {
    let chrom = parse_online_gc_str(&standard_export()).unwrap();
    let corr = baseline_correct(chrom, BaselineWindows::default()).unwrap();
    assert!(approx_eq(corr.fid_m[0], 0.0, 1e-9));
    assert!(approx_eq(corr.fid_l[POINTS - 1], 0.0, 1e-9));
    assert!(approx_eq(corr.tcd[50], 0.0, 1e-9));
}

// a window past the end of the trace is an error, not NaN
#[test]
fn baseline_window_outside_trace_fails() {
    let chrom = parse_online_gc_str(&standard_export()).unwrap();
    let windows = BaselineWindows {
        fid: FromTo {
            from: 400.0,
            to: 410.0,
        },
        ..BaselineWindows::default()
    };
    assert!(matches!(
        baseline_correct(chrom, windows),
        Err(LabError::InvalidOptions(_))
    ));
}

// Gaussian area in sample units: amp * sigma * sqrt(2 pi) * f
#[test]
fn integrates_named_windows_in_table_order() {
    let chrom = parse_online_gc_str(&standard_export()).unwrap();
    let chrom = baseline_correct(chrom, BaselineWindows::default()).unwrap();
    let ints = integrate_peaks(&chrom, &table());
    assert_eq!(ints.len(), 3);
    let root = (2.0 * std::f64::consts::PI).sqrt();
    let expect = [50.0 * 2.0 * root * FREQ, 20.0 * 1.0 * root * FREQ, 10.0 * 1.5 * root * FREQ];
    for (got, want) in ints.iter().zip(expect) {
        assert!(approx_eq(*got, want, want * 0.01), "got={got} want={want}");
    }
}

// batch processing keeps file order and peak names
#[test]
fn processes_a_batch_of_files() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("chromatograms");
    std::fs::create_dir(&sub).unwrap();
    std::fs::write(sub.join("inj1.txt"), standard_export()).unwrap();
    std::fs::write(sub.join("inj2.txt"), standard_export()).unwrap();

    let paths = chromatogram_paths(dir.path(), &["inj1.txt", "inj2.txt"]);
    assert_eq!(paths[0], sub.join("inj1.txt"));

    let out = process_chromatograms(&paths, &table(), BaselineWindows::default()).unwrap();
    assert_eq!(out.peak_names, vec!["C2H4", "H2", "C6"]);
    assert_eq!(out.rows.len(), 2);
    let h2 = out.column("H2").unwrap();
    assert!(approx_eq(h2[0], h2[1], 1e-9));
    assert!(out.column("CH4").is_none());
}

// first two and last two rows of a plateau are left out
#[test]
fn plateau_mean_trims_edges() {
    let temps = [300.0, 300.0, 300.0, 300.0, 300.0, 300.0, 350.0];
    let vals = [100.0, 50.0, 1.0, 2.0, 50.0, 100.0, 7.0];
    assert!(approx_eq(plateau_mean(&temps, &vals, 300.0), 1.5, 1e-12));
    assert!(plateau_mean(&temps, &vals, 350.0).is_nan());
}
