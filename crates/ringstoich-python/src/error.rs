//! Map engine and PDB errors to Python exceptions.

use pyo3::PyErr;
use pyo3::exceptions::{PyFileNotFoundError, PyIOError, PyRuntimeError, PyValueError};
use ringstoich_core::core::io::pdb::PdbError;
use ringstoich_core::engine::error::EngineError;

/// Extension trait for converting library results into `PyResult<T>`.
pub trait IntoPyResult<T> {
    fn into_pyresult(self) -> pyo3::PyResult<T>;
}

impl<T> IntoPyResult<T> for Result<T, EngineError> {
    fn into_pyresult(self) -> pyo3::PyResult<T> {
        self.map_err(engine_to_pyerr)
    }
}

impl<T> IntoPyResult<T> for Result<T, PdbError> {
    fn into_pyresult(self) -> pyo3::PyResult<T> {
        self.map_err(pdb_to_pyerr)
    }
}

fn io_to_pyerr(e: &std::io::Error, message: String) -> PyErr {
    if e.kind() == std::io::ErrorKind::NotFound {
        PyFileNotFoundError::new_err(message)
    } else {
        PyIOError::new_err(message)
    }
}

fn pdb_to_pyerr(e: PdbError) -> PyErr {
    match e {
        PdbError::Io(ref inner) => io_to_pyerr(inner, e.to_string()),
        PdbError::Parse { .. } | PdbError::MissingRecord(_) => PyValueError::new_err(e.to_string()),
    }
}

fn engine_to_pyerr(e: EngineError) -> PyErr {
    match e {
        EngineError::Io { ref source, .. } => io_to_pyerr(source, e.to_string()),
        EngineError::Export { .. } => PyIOError::new_err(e.to_string()),
        EngineError::Format { .. }
        | EngineError::InvalidStructure(_)
        | EngineError::ChainLengthMismatch { .. }
        | EngineError::Config(_) => PyValueError::new_err(e.to_string()),
        EngineError::NoStoichiometryFound { .. }
        | EngineError::Superposition { .. }
        | EngineError::ObjectNotFound(_) => PyRuntimeError::new_err(e.to_string()),
    }
}
