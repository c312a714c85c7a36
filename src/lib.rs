use core::ffi::c_int;
use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    ptr, slice,
};

pub mod utilities;
use utilities::{
    ir::{FitOptions, PeakModel, Spectrum, fit_integrate_peak},
    tga::{DtgaOptions, ExperimentKind, calc_dtga, summarize, water_content_str},
    parse::parse_tga::parse_tga_str,
};

const OK: c_int = 0;
const ERR_INVALID_ARGS: c_int = 1;
const ERR_PANIC: c_int = 2;
const ERR_COMPUTE: c_int = 3;
const ERR_PARSE: c_int = 4;

#[repr(C)]
pub struct Buf {
    pub ptr: *mut u8,
    pub len: usize,
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alloc(size: usize) -> *mut u8 {
    if size == 0 {
        return core::ptr::null_mut();
    }
    let mut v = Vec::<u8>::with_capacity(size);
    let p = v.as_mut_ptr();
    core::mem::forget(v);
    p
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_(ptr_raw: *mut u8, size: usize) {
    if !ptr_raw.is_null() {
        let _ = unsafe { Vec::<u8>::from_raw_parts(ptr_raw, size, size) };
    }
}

fn kind_from_c(kind: c_int) -> Option<ExperimentKind> {
    match kind {
        0 => Some(ExperimentKind::General),
        1 => Some(ExperimentKind::Pyro),
        2 => Some(ExperimentKind::PyroIso),
        _ => None,
    }
}

/// Parses a TGA8000 export, computes DTGA with default smoothing and writes the
/// experiment summary as JSON. `kind`: 0 general, 1 pyro, 2 pyro_iso.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tga_summary(
    data_ptr: *const u8,
    data_len: usize,
    kind: c_int,
    out_json: *mut Buf,
) -> c_int {
    if data_ptr.is_null() || out_json.is_null() {
        return ERR_INVALID_ARGS;
    }
    let Some(kind) = kind_from_c(kind) else {
        return ERR_INVALID_ARGS;
    };
    let res = catch_unwind(AssertUnwindSafe(|| -> Result<(), c_int> {
        let data = unsafe { slice::from_raw_parts(data_ptr, data_len) };
        let text = std::str::from_utf8(data).map_err(|_| ERR_PARSE)?;
        let mut exp = parse_tga_str(text, kind).map_err(|_| ERR_PARSE)?;
        calc_dtga(&mut exp, Some(DtgaOptions::default())).map_err(|_| ERR_COMPUTE)?;
        let summary = summarize(&exp).map_err(|_| ERR_COMPUTE)?;
        let s = serde_json::to_string(&summary).map_err(|_| ERR_COMPUTE)?;
        write_buf(out_json, s.into_bytes().into_boxed_slice());
        Ok(())
    }));
    match res {
        Ok(Ok(())) => OK,
        Ok(Err(code)) => code,
        Err(_) => ERR_PANIC,
    }
}

/// Fits one IR band. `model`: 0 Lorentzian, 1 Gaussian.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fit_peak(
    x_ptr: *const f64,
    y_ptr: *const f64,
    len: usize,
    peak_loc: f64,
    peak_window: f64,
    fit_window: f64,
    model: c_int,
    out_json: *mut Buf,
) -> c_int {
    if x_ptr.is_null() || y_ptr.is_null() || out_json.is_null() || len < 3 {
        return ERR_INVALID_ARGS;
    }
    let model = match model {
        0 => PeakModel::Lorentzian,
        1 => PeakModel::Gaussian,
        _ => return ERR_INVALID_ARGS,
    };
    let res = catch_unwind(AssertUnwindSafe(|| -> Result<(), c_int> {
        let xs = unsafe { slice::from_raw_parts(x_ptr, len) };
        let ys = unsafe { slice::from_raw_parts(y_ptr, len) };
        let spectrum = Spectrum::new(xs.to_vec(), ys.to_vec());
        let opts = FitOptions {
            peak_loc,
            peak_window,
            fit_window,
            model,
            ..FitOptions::default()
        };
        let fit = fit_integrate_peak(&spectrum, Some(opts)).map_err(|_| ERR_COMPUTE)?;
        let s = serde_json::json!({
            "area": fit.area,
            "intensity": fit.peak_intensity,
            "position": fit.peak_position,
            "parameters": fit.parameters,
            "from": fit.fit_range.from,
            "to": fit.fit_range.to,
            "sse": fit.sse
        })
        .to_string();
        write_buf(out_json, s.into_bytes().into_boxed_slice());
        Ok(())
    }));
    match res {
        Ok(Ok(())) => OK,
        Ok(Err(code)) => code,
        Err(_) => ERR_PANIC,
    }
}

/// Water content of a TGA drying run, NaN on any failure.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn water_content(data_ptr: *const u8, data_len: usize) -> f64 {
    if data_ptr.is_null() {
        return f64::NAN;
    }
    let res = catch_unwind(AssertUnwindSafe(|| {
        let data = unsafe { slice::from_raw_parts(data_ptr, data_len) };
        std::str::from_utf8(data)
            .ok()
            .and_then(|t| water_content_str(t).ok())
            .unwrap_or(f64::NAN)
    }));
    res.unwrap_or(f64::NAN)
}

fn write_buf(out: *mut Buf, bytes: Box<[u8]>) {
    let len = bytes.len();
    let ptr_bytes = Box::into_raw(bytes) as *mut u8;
    unsafe {
        ptr::write_unaligned(
            out,
            Buf {
                ptr: ptr_bytes,
                len,
            },
        )
    };
}
