use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{StructArray, TryExtend};
use arrow::datatypes::{ArrowDataType, ArrowSchema, Field as ArrowField};
use arrow::record_batch::RecordBatchT;
use polars::prelude::DataFrame;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::ffi as pyffi;
use pyo3::prelude::*;
use pyo3::types::PyAny;
use rand::SeedableRng;
use rand::rngs::StdRng;
use shipkit_io_xlsx::{
    SpecReportWriteOptions, XlsxIoError, derive_shipment_table_from_dataframe,
    read_shipment_table,
};
use shipkit_report::{
    ShipmentReportError, SpecRoster, SpecShipmentReport, SpecShipmentTable, SpecSynthesisOptions,
    derive_default_roster, synthesize_report,
};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "shipkit.report.v1";
const C_BRIDGE_TRANSPORT: &str = "arrow_c_data";
const C_ARROW_ARRAY_STREAM_CAPSULE_NAME: &[u8] = b"arrow_array_stream\0";

/// Summary row returned to Python: `(po_number, handler, status)`.
type TupSummaryRow = (String, String, &'static str);

#[pyfunction]
fn canonicalize_po_number(identifier: &str) -> String {
    shipkit_report::canonicalize_po_number(identifier).to_string()
}

#[pyfunction]
fn derive_status(if_link_present: bool, if_issue_present: bool) -> &'static str {
    shipkit_report::derive_status(if_link_present, if_issue_present).label()
}

#[pyfunction]
#[pyo3(signature = (
    pos,
    seed = None,
    handlers = None,
    handlers_low_priority = None,
    handler_required = None
))]
fn distribute_workload(
    pos: Vec<String>,
    seed: Option<u64>,
    handlers: Option<Vec<String>>,
    handlers_low_priority: Option<Vec<String>>,
    handler_required: Option<String>,
) -> PyResult<Vec<(String, String)>> {
    let roster = build_roster(handlers, handlers_low_priority, handler_required);
    roster.validate().map_err(map_report_error)?;

    let l_assignments = match seed {
        Some(n_seed) => shipkit_report::distribute_workload(
            &pos,
            &roster,
            &mut StdRng::seed_from_u64(n_seed),
        ),
        None => shipkit_report::distribute_workload(&pos, &roster, &mut rand::rng()),
    }
    .map_err(map_report_error)?;

    Ok(l_assignments
        .into_iter()
        .map(|a| (a.po_canonical, a.handler))
        .collect())
}

#[pyfunction]
#[pyo3(signature = (file_in, file_out, seed = None))]
fn write_shipment_report(
    py: Python<'_>,
    file_in: PathBuf,
    file_out: PathBuf,
    seed: Option<u64>,
) -> PyResult<Vec<TupSummaryRow>> {
    py.allow_threads(|| {
        let table = read_shipment_table(&file_in).map_err(map_io_error)?;
        synthesize_and_write(&table, file_out, seed)
    })
}

#[pyfunction]
#[pyo3(signature = (df, file_out, seed = None))]
fn write_shipment_report_from_dataframe(
    py: Python<'_>,
    df: &Bound<'_, PyAny>,
    file_out: PathBuf,
    seed: Option<u64>,
) -> PyResult<Vec<TupSummaryRow>> {
    let df_data = derive_dataframe_from_any_dataframe(py, df)?;
    let table = derive_shipment_table_from_dataframe(&df_data).map_err(map_io_error)?;
    py.allow_threads(|| synthesize_and_write(&table, file_out, seed))
}

fn synthesize_and_write(
    table: &SpecShipmentTable,
    file_out: PathBuf,
    seed: Option<u64>,
) -> PyResult<Vec<TupSummaryRow>> {
    let options = SpecSynthesisOptions::default();
    let report: SpecShipmentReport = match seed {
        Some(n_seed) => synthesize_report(table, &options, &mut StdRng::seed_from_u64(n_seed)),
        None => synthesize_report(table, &options, &mut rand::rng()),
    }
    .map_err(map_report_error)?;

    shipkit_io_xlsx::write_shipment_report(&report, file_out, SpecReportWriteOptions::default())
        .map_err(map_io_error)?;

    Ok(report
        .po_summary
        .iter()
        .map(|row| (row.po_canonical.clone(), row.handler.clone(), row.status().label()))
        .collect())
}

fn build_roster(
    handlers: Option<Vec<String>>,
    handlers_low_priority: Option<Vec<String>>,
    handler_required: Option<String>,
) -> SpecRoster {
    match handlers {
        Some(l_handlers) => SpecRoster {
            handlers: l_handlers,
            handlers_low_priority: handlers_low_priority.unwrap_or_default(),
            handler_required,
        },
        None => {
            let mut roster = derive_default_roster();
            if let Some(l_low) = handlers_low_priority {
                roster.handlers_low_priority = l_low;
            }
            if handler_required.is_some() {
                roster.handler_required = handler_required;
            }
            roster
        }
    }
}

fn map_report_error(err: ShipmentReportError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn map_io_error(err: XlsxIoError) -> PyErr {
    match err {
        XlsxIoError::Report(err) => map_report_error(err),
        XlsxIoError::UnsupportedFormat(_) | XlsxIoError::InvalidOption(_) => {
            PyValueError::new_err(err.to_string())
        }
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

fn derive_dataframe_from_any_dataframe(
    py: Python<'_>,
    df: &Bound<'_, PyAny>,
) -> PyResult<DataFrame> {
    let df_polars = convert_to_polars_dataframe(py, df)?;
    let obj_capsule = df_polars.call_method0("__arrow_c_stream__")?;
    derive_dataframe_from_arrow_c_stream_capsule(&obj_capsule)
}

fn derive_dataframe_from_arrow_c_stream_capsule(
    obj_capsule: &Bound<'_, PyAny>,
) -> PyResult<DataFrame> {
    let ptr_capsule = obj_capsule.as_ptr();
    let ptr_stream_name = C_ARROW_ARRAY_STREAM_CAPSULE_NAME
        .as_ptr()
        .cast::<std::os::raw::c_char>();

    // Safety: only pointers owned by the Python object are passed for validation.
    let if_valid_capsule = unsafe { pyffi::PyCapsule_IsValid(ptr_capsule, ptr_stream_name) };
    if if_valid_capsule == 0 {
        return Err(PyValueError::new_err(
            "Expected a valid `arrow_array_stream` PyCapsule.",
        ));
    }

    // Safety: capsule name was validated as `arrow_array_stream` above.
    let ptr_stream = unsafe { pyffi::PyCapsule_GetPointer(ptr_capsule, ptr_stream_name) };
    if ptr_stream.is_null() {
        return Err(PyValueError::new_err("Arrow C stream capsule pointer is null."));
    }

    let stream = ptr_stream.cast::<arrow::ffi::ArrowArrayStream>();
    // Safety: `stream` points to a live ArrowArrayStream owned by the capsule.
    let mut reader = unsafe { arrow::ffi::ArrowArrayStreamReader::try_new(&mut *stream) }
        .map_err(|err| PyValueError::new_err(format!("Failed to open Arrow C stream: {err}")))?;

    let schema_arrow = derive_arrow_schema_from_stream_field(reader.field())?;
    let schema_ref = Arc::new(schema_arrow.clone());
    let mut df = DataFrame::empty_with_arrow_schema(&schema_arrow);

    while let Some(res_array) = unsafe { reader.next() } {
        let array_row_batch = res_array.map_err(|err| {
            PyValueError::new_err(format!("Failed to read Arrow stream batch: {err}"))
        })?;

        let array_struct = array_row_batch
            .as_any()
            .downcast_ref::<StructArray>()
            .ok_or_else(|| {
                PyValueError::new_err("Arrow C stream must yield StructArray batches.")
            })?;

        let record_batch = RecordBatchT::try_new(
            array_struct.len(),
            schema_ref.clone(),
            array_struct.values().to_vec(),
        )
        .map_err(|err| PyValueError::new_err(format!("Invalid Arrow record batch: {err}")))?;

        df.try_extend(std::iter::once(record_batch)).map_err(|err| {
            PyValueError::new_err(format!("Failed to append Arrow record batch: {err}"))
        })?;
    }

    Ok(df)
}

fn derive_arrow_schema_from_stream_field(field: &ArrowField) -> PyResult<ArrowSchema> {
    match field.dtype() {
        ArrowDataType::Struct(fields) => Ok(fields
            .iter()
            .cloned()
            .map(|field_inner| (field_inner.name.clone(), field_inner))
            .collect::<ArrowSchema>()),
        dtype => Err(PyValueError::new_err(format!(
            "Arrow stream schema must be Struct, got: {dtype:?}"
        ))),
    }
}

fn convert_to_polars_dataframe<'py>(
    py: Python<'py>,
    df: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyAny>> {
    let module_polars = py.import("polars")?;
    let cls_dataframe = module_polars.getattr("DataFrame")?;

    if df.is_instance(&cls_dataframe)? {
        return Ok(df.clone());
    }

    cls_dataframe.call1((df,))
}

#[pymodule]
fn _shipkit_report_rs(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_function(wrap_pyfunction!(canonicalize_po_number, module)?)?;
    module.add_function(wrap_pyfunction!(derive_status, module)?)?;
    module.add_function(wrap_pyfunction!(distribute_workload, module)?)?;
    module.add_function(wrap_pyfunction!(write_shipment_report, module)?)?;
    module.add_function(wrap_pyfunction!(write_shipment_report_from_dataframe, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
