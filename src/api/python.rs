//! CPython extension module `rtta._core`.
//!
//! Thin wrappers only: every class owns one core indicator and forwards
//! `update`/`batch` to it. Core errors surface as `ValueError`.

use std::collections::HashMap;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::common::config::CoreCfg;
use crate::common::error::{window_arg, RttaError, RttaResult};
use crate::common::log;
use crate::greeting;
use crate::indicator::{
    Atr, Atrp, AwesomeOscillator, Bar, Delay, Ema, High, Indicator, Low, Macd, MassIndex,
    Oscillator, PercentagePrice, PercentageVolume, Roc, Rsi, Sma, Span, StdDev, StochRsi, Tsi,
};

const MODULE_DOC: &str = "rtta native core";

impl From<RttaError> for PyErr {
    fn from(err: RttaError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// A function that returns a Hello string.
#[pyfunction]
fn hello_from_bin() -> &'static str {
    greeting::hello_from_bin()
}

/// Constructor arguments as received from the interpreter. Window lengths
/// arrive signed so negative values are reported instead of wrapping.
trait CoreArg {
    type Core;

    fn into_core(self, name: &'static str) -> RttaResult<Self::Core>;
}

impl CoreArg for i64 {
    type Core = usize;

    fn into_core(self, name: &'static str) -> RttaResult<usize> {
        window_arg(name, self)
    }
}

impl CoreArg for bool {
    type Core = bool;

    fn into_core(self, _: &'static str) -> RttaResult<bool> {
        Ok(self)
    }
}

/// Classes fed one close (or volume) per update.
macro_rules! series_indicator {
    ($py:ident, $name:literal, $inner:ident, ($($arg:ident: $ty:ident = $default:literal),*)) => {
        #[pyclass(name = $name, module = "rtta._core")]
        struct $py($inner);

        #[pymethods]
        impl $py {
            #[new]
            #[pyo3(signature = ($($arg = $default),*))]
            fn new($($arg: $ty),*) -> PyResult<Self> {
                Ok(Self($inner::new($($arg.into_core(stringify!($arg))?),*)?))
            }

            fn update(&mut self, value: f64) -> f64 {
                self.0.update(value)
            }

            fn batch(&mut self, values: Vec<f64>) -> Vec<f64> {
                self.0.batch(values)
            }
        }
    };
}

series_indicator!(PySma, "SMAIndicator", Sma, (window: i64 = 14, fillna: bool = false));
series_indicator!(PyEma, "EMAIndicator", Ema, (window: i64 = 14, fillna: bool = false));
series_indicator!(PyStdDev, "StdDev", StdDev, (window: i64 = 14, fillna: bool = false));
series_indicator!(PyHigh, "High", High, (window: i64 = 14, fillna: bool = false));
series_indicator!(PyLow, "Low", Low, (window: i64 = 14, fillna: bool = false));
series_indicator!(PyDelay, "Delay", Delay, (window: i64 = 1, fillna: bool = false));
series_indicator!(PyRoc, "ROC", Roc, (window: i64 = 12, fillna: bool = false));
series_indicator!(PyRsi, "RSI", Rsi, (window: i64 = 14, fillna: bool = false));
series_indicator!(PyStochRsi, "StochRSI", StochRsi, (window: i64 = 14, fillna: bool = false));
series_indicator!(PyTsi, "TSI", Tsi, (window_slow: i64 = 25, window_fast: i64 = 13));

#[pyclass(name = "ATR", module = "rtta._core")]
struct PyAtr(Atr);

#[pymethods]
impl PyAtr {
    #[new]
    #[pyo3(signature = (window = 14))]
    fn new(window: i64) -> PyResult<Self> {
        Ok(Self(Atr::new(window_arg("window", window)?)?))
    }

    fn update(&mut self, close: f64, high: f64, low: f64) -> f64 {
        self.0.update(Bar::new(close, high, low))
    }

    fn batch(&mut self, close: Vec<f64>, high: Vec<f64>, low: Vec<f64>) -> PyResult<Vec<f64>> {
        Ok(self.0.batch(Bar::zip(&close, &high, &low)?))
    }
}

#[pyclass(name = "ATRP", module = "rtta._core")]
struct PyAtrp(Atrp);

#[pymethods]
impl PyAtrp {
    #[new]
    #[pyo3(signature = (window = 14))]
    fn new(window: i64) -> PyResult<Self> {
        Ok(Self(Atrp::new(window_arg("window", window)?)?))
    }

    fn update(&mut self, close: f64, high: f64, low: f64) -> f64 {
        self.0.update(Bar::new(close, high, low))
    }

    fn batch(&mut self, close: Vec<f64>, high: Vec<f64>, low: Vec<f64>) -> PyResult<Vec<f64>> {
        Ok(self.0.batch(Bar::zip(&close, &high, &low)?))
    }
}

#[pyclass(name = "MassIndex", module = "rtta._core")]
struct PyMassIndex(MassIndex);

#[pymethods]
impl PyMassIndex {
    #[new]
    #[pyo3(signature = (window_fast = 9, window_slow = 25, fillna = false))]
    fn new(window_fast: i64, window_slow: i64, fillna: bool) -> PyResult<Self> {
        Ok(Self(MassIndex::new(
            window_arg("window_fast", window_fast)?,
            window_arg("window_slow", window_slow)?,
            fillna,
        )?))
    }

    fn update(&mut self, low: f64, high: f64) -> f64 {
        self.0.update(Span::new(high, low))
    }

    fn batch(&mut self, low: Vec<f64>, high: Vec<f64>) -> PyResult<Vec<f64>> {
        Ok(self.0.batch(Span::zip(&high, &low)?))
    }
}

#[pyclass(name = "AwesomeOscillator", module = "rtta._core")]
struct PyAwesomeOscillator(AwesomeOscillator);

#[pymethods]
impl PyAwesomeOscillator {
    #[new]
    #[pyo3(signature = (window1 = 5, window2 = 34, fillna = false))]
    fn new(window1: i64, window2: i64, fillna: bool) -> PyResult<Self> {
        Ok(Self(AwesomeOscillator::new(
            window_arg("window1", window1)?,
            window_arg("window2", window2)?,
            fillna,
        )?))
    }

    fn update(&mut self, high: f64, low: f64) -> f64 {
        self.0.update(Span::new(high, low))
    }

    fn batch(&mut self, high: Vec<f64>, low: Vec<f64>) -> PyResult<Vec<f64>> {
        Ok(self.0.batch(Span::zip(&high, &low)?))
    }
}

/// MACD reports its signal line.
#[pyclass(name = "MACD", module = "rtta._core")]
struct PyMacd(Macd);

#[pymethods]
impl PyMacd {
    #[new]
    #[pyo3(signature = (window_slow = 26, window_fast = 12, window_sign = 9, fillna = false))]
    fn new(
        window_slow: i64,
        window_fast: i64,
        window_sign: i64,
        fillna: bool,
    ) -> PyResult<Self> {
        Ok(Self(Macd::new(
            window_arg("window_slow", window_slow)?,
            window_arg("window_fast", window_fast)?,
            window_arg("window_sign", window_sign)?,
            fillna,
        )?))
    }

    fn update(&mut self, close: f64) -> f64 {
        self.0.update(close).signal
    }

    fn batch(&mut self, close: Vec<f64>) -> Vec<f64> {
        close.into_iter().map(|c| self.0.update(c).signal).collect()
    }
}

fn oscillator_map(line: &'static str, osc: Oscillator) -> HashMap<&'static str, f64> {
    HashMap::from([
        (line, osc.line),
        ("signal", osc.signal),
        ("histogram", osc.histogram),
    ])
}

fn oscillator_columns(line: &'static str, rows: Vec<Oscillator>) -> HashMap<&'static str, Vec<f64>> {
    let mut lines = Vec::with_capacity(rows.len());
    let mut signals = Vec::with_capacity(rows.len());
    let mut histograms = Vec::with_capacity(rows.len());
    for osc in rows {
        lines.push(osc.line);
        signals.push(osc.signal);
        histograms.push(osc.histogram);
    }
    HashMap::from([(line, lines), ("signal", signals), ("histogram", histograms)])
}

#[pyclass(name = "PercentagePrice", module = "rtta._core")]
struct PyPercentagePrice(PercentagePrice);

#[pymethods]
impl PyPercentagePrice {
    #[new]
    #[pyo3(signature = (window_slow = 26, window_fast = 12, window_sign = 9, fillna = false))]
    fn new(
        window_slow: i64,
        window_fast: i64,
        window_sign: i64,
        fillna: bool,
    ) -> PyResult<Self> {
        Ok(Self(PercentagePrice::new(
            window_arg("window_slow", window_slow)?,
            window_arg("window_fast", window_fast)?,
            window_arg("window_sign", window_sign)?,
            fillna,
        )?))
    }

    fn update(&mut self, close: f64) -> HashMap<&'static str, f64> {
        oscillator_map("ppo", self.0.update(close))
    }

    fn batch(&mut self, close: Vec<f64>) -> HashMap<&'static str, Vec<f64>> {
        oscillator_columns("ppo", self.0.batch(close))
    }
}

#[pyclass(name = "PercentageVolume", module = "rtta._core")]
struct PyPercentageVolume(PercentageVolume);

#[pymethods]
impl PyPercentageVolume {
    #[new]
    #[pyo3(signature = (window_slow = 26, window_fast = 12, window_sign = 9, fillna = false))]
    fn new(
        window_slow: i64,
        window_fast: i64,
        window_sign: i64,
        fillna: bool,
    ) -> PyResult<Self> {
        Ok(Self(PercentageVolume::new(
            window_arg("window_slow", window_slow)?,
            window_arg("window_fast", window_fast)?,
            window_arg("window_sign", window_sign)?,
            fillna,
        )?))
    }

    fn update(&mut self, volume: f64) -> HashMap<&'static str, f64> {
        oscillator_map("pvo", self.0.update(volume))
    }

    fn batch(&mut self, volume: Vec<f64>) -> HashMap<&'static str, Vec<f64>> {
        oscillator_columns("pvo", self.0.batch(volume))
    }
}

/// Populate `m` with the greeting and the indicator classes.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.setattr("__doc__", MODULE_DOC)?;
    m.add_function(wrap_pyfunction!(hello_from_bin, m)?)?;

    m.add_class::<PySma>()?;
    m.add_class::<PyEma>()?;
    m.add_class::<PyStdDev>()?;
    m.add_class::<PyHigh>()?;
    m.add_class::<PyLow>()?;
    m.add_class::<PyDelay>()?;
    m.add_class::<PyRoc>()?;
    m.add_class::<PyRsi>()?;
    m.add_class::<PyStochRsi>()?;
    m.add_class::<PyTsi>()?;
    m.add_class::<PyAtr>()?;
    m.add_class::<PyAtrp>()?;
    m.add_class::<PyMassIndex>()?;
    m.add_class::<PyAwesomeOscillator>()?;
    m.add_class::<PyMacd>()?;
    m.add_class::<PyPercentagePrice>()?;
    m.add_class::<PyPercentageVolume>()?;
    Ok(())
}

/// rtta native core
#[pymodule]
#[pyo3(name = "_core")]
fn rtta_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    log::init(&CoreCfg::load());
    register(m)?;
    tracing::debug!(module = "_core", "registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::exceptions::PyTypeError;

    fn with_module<F>(f: F)
    where
        F: for<'py> FnOnce(Python<'py>, &Bound<'py, PyModule>),
    {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let m = PyModule::new_bound(py, "_core").unwrap();
            register(&m).unwrap();
            f(py, &m);
        });
    }

    #[test]
    fn hello_from_bin_returns_greeting() {
        with_module(|_, m| {
            let got: String = m
                .getattr("hello_from_bin")
                .unwrap()
                .call0()
                .unwrap()
                .extract()
                .unwrap();
            assert_eq!(got, "Hello from rtta!");
        });
    }

    #[test]
    fn hello_from_bin_rejects_arguments() {
        with_module(|py, m| {
            let err = m.getattr("hello_from_bin").unwrap().call1((1,)).unwrap_err();
            assert!(err.is_instance_of::<PyTypeError>(py));
        });
    }

    #[test]
    fn loading_twice_gives_the_same_answer() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let answers: Vec<String> = (0..2)
                .map(|_| {
                    let m = PyModule::new_bound(py, "_core").unwrap();
                    register(&m).unwrap();
                    m.getattr("hello_from_bin")
                        .unwrap()
                        .call0()
                        .unwrap()
                        .extract()
                        .unwrap()
                })
                .collect();
            assert_eq!(answers[0], answers[1]);
        });
    }

    #[test]
    fn module_and_function_are_documented() {
        with_module(|_, m| {
            let module_doc: String = m.getattr("__doc__").unwrap().extract().unwrap();
            assert_eq!(module_doc, "rtta native core");
            let fn_doc: String = m
                .getattr("hello_from_bin")
                .unwrap()
                .getattr("__doc__")
                .unwrap()
                .extract()
                .unwrap();
            assert!(fn_doc.contains("A function that returns a Hello string."));
        });
    }

    #[test]
    fn indicator_classes_forward_to_the_core() {
        with_module(|_, m| {
            let sma = m.getattr("SMAIndicator").unwrap().call1((4, true)).unwrap();
            let out: Vec<f64> = sma
                .call_method1("batch", (vec![1.0, 2.0, 3.0, 4.0, 5.0],))
                .unwrap()
                .extract()
                .unwrap();
            assert_eq!(out, vec![1.0, 1.5, 2.0, 2.5, 3.5]);

            let atr = m.getattr("ATR").unwrap().call1((2,)).unwrap();
            let first: f64 = atr.call_method1("update", (1.0, 2.0, 3.0)).unwrap().extract().unwrap();
            assert_eq!(first, 1.5);
        });
    }

    #[test]
    fn oscillators_return_named_lines() {
        with_module(|_, m| {
            let ppo = m.getattr("PercentagePrice").unwrap().call1((3, 1, 1, true)).unwrap();
            let row: HashMap<String, f64> = ppo.call_method1("update", (2.0,)).unwrap().extract().unwrap();
            assert_eq!(row["ppo"], 0.0);
            assert_eq!(row["signal"], 0.0);
            assert_eq!(row["histogram"], 0.0);

            let pvo = m.getattr("PercentageVolume").unwrap().call0().unwrap();
            let cols: HashMap<String, Vec<f64>> =
                pvo.call_method1("batch", (vec![1.0, 2.0],)).unwrap().extract().unwrap();
            assert_eq!(cols["pvo"].len(), 2);
            assert!(cols.contains_key("signal") && cols.contains_key("histogram"));
        });
    }

    #[test]
    fn invalid_parameters_raise_value_error() {
        with_module(|py, m| {
            let err = m.getattr("RSI").unwrap().call1((0,)).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py));

            for class in ["SMAIndicator", "Delay", "ATR", "MACD"] {
                let err = m.getattr(class).unwrap().call1((-1,)).unwrap_err();
                assert!(err.is_instance_of::<PyValueError>(py), "{class}");
                assert!(err.to_string().contains("got -1"), "{class}");
            }

            let ao = m.getattr("AwesomeOscillator").unwrap().call0().unwrap();
            let err = ao
                .call_method1("batch", (vec![1.0, 2.0], vec![1.0]))
                .unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py));
        });
    }
}
