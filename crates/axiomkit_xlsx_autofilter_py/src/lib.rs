use axiomkit_xlsx_autofilter::{
    AutoFilterError, EnumDateTimeGrouping, EnumFilterKind, FilterColumn, Filters,
    SpecDateGroupItem, SpecFilterColumnOptions, ToXmlString, create_filter,
};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyAny, PyBool, PyDict, PyInt};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "axiomkit.xlsx.autofilter.v1";

/// Attributes read, in order, from cell-like column references.
const TUP_CELL_COLUMN_ATTRS: [&str; 2] = ["col", "column"];

/// `(date_time_grouping, year, month, day, hour, minute, second)`.
type TupDateGroupItem = (
    &'static str,
    u16,
    Option<u8>,
    Option<u8>,
    Option<u8>,
    Option<u8>,
    Option<u8>,
);

#[pyclass(name = "Filters")]
#[derive(Debug, Clone, Default)]
struct PyFilters {
    inner: Filters,
}

#[pymethods]
impl PyFilters {
    #[new]
    #[pyo3(signature = (values = None, blank = None, calendar_type = None))]
    fn new(
        values: Option<Vec<Bound<'_, PyAny>>>,
        blank: Option<Bound<'_, PyAny>>,
        calendar_type: Option<String>,
    ) -> PyResult<Self> {
        let mut slf = Self::default();
        for value in values.unwrap_or_default() {
            slf.add_value(&value)?;
        }
        if let Some(blank) = blank {
            slf.set_blank(blank)?;
        }
        if let Some(calendar_type) = calendar_type {
            slf.set_calendar_type(calendar_type)?;
        }
        Ok(slf)
    }

    fn add_value(&mut self, value: &Bound<'_, PyAny>) -> PyResult<()> {
        let c_value = derive_filter_value_text(value)?;
        self.inner.add_value(c_value);
        Ok(())
    }

    #[pyo3(signature = (
        date_time_grouping,
        year,
        month = None,
        day = None,
        hour = None,
        minute = None,
        second = None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn add_date_group_item(
        &mut self,
        date_time_grouping: &str,
        year: u16,
        month: Option<u8>,
        day: Option<u8>,
        hour: Option<u8>,
        minute: Option<u8>,
        second: Option<u8>,
    ) -> PyResult<()> {
        let grouping = date_time_grouping
            .parse::<EnumDateTimeGrouping>()
            .map_err(derive_py_err)?;
        let mut item = SpecDateGroupItem::new(grouping, year);
        if let Some(v) = month {
            item = item.with_month(v).map_err(derive_py_err)?;
        }
        if let Some(v) = day {
            item = item.with_day(v).map_err(derive_py_err)?;
        }
        if let Some(v) = hour {
            item = item.with_hour(v).map_err(derive_py_err)?;
        }
        if let Some(v) = minute {
            item = item.with_minute(v).map_err(derive_py_err)?;
        }
        if let Some(v) = second {
            item = item.with_second(v).map_err(derive_py_err)?;
        }
        self.inner.add_date_group_item(item);
        Ok(())
    }

    #[getter]
    fn filter_items(&self) -> Vec<String> {
        self.inner
            .filter_items()
            .iter()
            .map(|item| item.val.clone())
            .collect()
    }

    #[getter]
    fn date_group_items(&self) -> Vec<TupDateGroupItem> {
        self.inner
            .date_group_items()
            .iter()
            .map(|item| {
                (
                    item.date_time_grouping().as_str(),
                    item.year(),
                    item.month(),
                    item.day(),
                    item.hour(),
                    item.minute(),
                    item.second(),
                )
            })
            .collect()
    }

    /// True when no value, date group or blank is selected.
    #[getter]
    fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[getter]
    fn blank(&self) -> Option<bool> {
        self.inner.blank()
    }

    #[setter]
    fn set_blank(&mut self, value: Bound<'_, PyAny>) -> PyResult<()> {
        let if_blank = extract_strict_bool("Filters.blank", &value)?;
        self.inner.set_blank(if_blank);
        Ok(())
    }

    #[getter]
    fn calendar_type(&self) -> Option<String> {
        self.inner.calendar_type().map(|c| c.as_str().to_string())
    }

    #[setter]
    fn set_calendar_type(&mut self, value: String) -> PyResult<()> {
        self.inner
            .set_calendar_type_str(&value)
            .map_err(derive_py_err)?;
        Ok(())
    }

    fn to_xml_string(&self) -> String {
        let mut buf = String::new();
        self.inner.to_xml_string(&mut buf);
        buf
    }

    fn __repr__(&self) -> String {
        format!(
            "Filters(values={:?}, date_groups={}, is_empty={})",
            self.filter_items(),
            self.inner.date_group_items().len(),
            derive_py_bool_text(self.inner.is_empty()),
        )
    }
}

/// One `filterColumn`.
///
/// The `Filters` object handed to `configure` and returned by `filters` is
/// shared with the column: changes made to it later show up in
/// `to_xml_string()`.
#[pyclass(name = "FilterColumn")]
#[derive(Debug)]
struct PyFilterColumn {
    inner: FilterColumn,
    filters: Option<Py<PyFilters>>,
}

#[pymethods]
impl PyFilterColumn {
    #[new]
    #[pyo3(signature = (col_id, filter_type = "filters", options = None, configure = None))]
    fn new(
        py: Python<'_>,
        col_id: &Bound<'_, PyAny>,
        filter_type: &str,
        options: Option<&Bound<'_, PyAny>>,
        configure: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<Self> {
        let filter_kind = filter_type
            .parse::<EnumFilterKind>()
            .map_err(derive_py_err)?;
        let filter = create_filter(filter_kind).map_err(derive_py_err)?;

        let n_col_id = parse_column_ref(col_id)?;
        let mut inner =
            FilterColumn::from_filter(n_col_id, filter, SpecFilterColumnOptions::default())
                .map_err(derive_py_err)?;

        let cfg_options = parse_spec_filter_column_options(options)?;
        inner.apply_options(&cfg_options);

        let filters = match inner.filter().as_filters() {
            Some(filters) => Some(Py::new(
                py,
                PyFilters {
                    inner: filters.clone(),
                },
            )?),
            None => None,
        };
        if let (Some(configure), Some(filters)) = (configure, &filters) {
            configure.call1((filters.clone_ref(py),))?;
        }

        Ok(Self { inner, filters })
    }

    #[getter]
    fn col_id(&self) -> usize {
        self.inner.col_id()
    }

    #[setter]
    fn set_col_id(&mut self, value: Bound<'_, PyAny>) -> PyResult<()> {
        let n_col_id = parse_column_ref(&value)?;
        self.inner.set_col_id(n_col_id).map_err(derive_py_err)?;
        Ok(())
    }

    #[getter]
    fn hidden_button(&self) -> bool {
        self.inner.hidden_button()
    }

    #[setter]
    fn set_hidden_button(&mut self, value: Bound<'_, PyAny>) -> PyResult<()> {
        let if_hidden = extract_strict_bool("FilterColumn.hidden_button", &value)?;
        self.inner.set_hidden_button(if_hidden);
        Ok(())
    }

    #[getter]
    fn show_button(&self) -> bool {
        self.inner.show_button()
    }

    #[setter]
    fn set_show_button(&mut self, value: Bound<'_, PyAny>) -> PyResult<()> {
        let if_show = extract_strict_bool("FilterColumn.show_button", &value)?;
        self.inner.set_show_button(if_show);
        Ok(())
    }

    #[getter]
    fn filter_type(&self) -> &'static str {
        self.inner.filter_kind().as_str()
    }

    #[getter]
    fn filters(&self, py: Python<'_>) -> Option<Py<PyFilters>> {
        self.filters.as_ref().map(|filters| filters.clone_ref(py))
    }

    #[setter]
    fn set_filters(&mut self, value: Py<PyFilters>) {
        if self.filters.is_some() {
            self.filters = Some(value);
        }
    }

    fn to_xml_string(&self, py: Python<'_>) -> PyResult<String> {
        Ok(self.derive_column(py)?.to_xml())
    }

    fn __repr__(&self, py: Python<'_>) -> PyResult<String> {
        let column = self.derive_column(py)?;
        let n_values = column
            .filter()
            .as_filters()
            .map_or(0, |filters| filters.filter_items().len());
        Ok(format!(
            "FilterColumn(col_id={}, filter_type={:?}, hidden_button={}, show_button={}, values={})",
            column.col_id(),
            column.filter_kind().as_str(),
            derive_py_bool_text(column.hidden_button()),
            derive_py_bool_text(column.show_button()),
            n_values,
        ))
    }
}

impl PyFilterColumn {
    /// Kernel column with the live `Filters` state written in.
    fn derive_column(&self, py: Python<'_>) -> PyResult<FilterColumn> {
        let mut column = self.inner.clone();
        if let Some(filters) = &self.filters {
            let filters_live = filters.try_borrow(py)?.inner.clone();
            if let Some(target) = column.filter_mut().as_filters_mut() {
                *target = filters_live;
            }
        }
        Ok(column)
    }
}

/// Resolve an `int` or a cell-like object (`.col` / `.column`) to a raw index.
fn parse_column_ref(value: &Bound<'_, PyAny>) -> PyResult<i128> {
    if let Some(n_col) = extract_strict_int(value)? {
        return Ok(n_col);
    }

    for c_attr in TUP_CELL_COLUMN_ATTRS {
        if !value.hasattr(c_attr)? {
            continue;
        }
        let val = value.getattr(c_attr)?;
        if let Some(n_col) = extract_strict_int(&val)? {
            return Ok(n_col);
        }
        return Err(derive_py_err(AutoFilterError::InvalidColumnId(
            derive_py_repr(&val),
        )));
    }

    Err(derive_py_err(AutoFilterError::InvalidColumnId(
        derive_py_repr(value),
    )))
}

fn parse_spec_filter_column_options(
    obj: Option<&Bound<'_, PyAny>>,
) -> PyResult<SpecFilterColumnOptions> {
    let mut cfg_options = SpecFilterColumnOptions::default();
    let Some(obj) = obj else {
        return Ok(cfg_options);
    };
    if obj.is_none() {
        return Ok(cfg_options);
    }

    let dict_options = obj
        .downcast::<PyDict>()
        .map_err(|_| PyValueError::new_err("FilterColumn options must be a dict or None."))?;

    for (key, val) in dict_options.iter() {
        let c_key = key.str()?.to_string();
        match c_key.as_str() {
            "hidden_button" => {
                cfg_options.hidden_button =
                    Some(extract_strict_bool("FilterColumn.hidden_button", &val)?);
            }
            "show_button" => {
                cfg_options.show_button =
                    Some(extract_strict_bool("FilterColumn.show_button", &val)?);
            }
            _ => log::debug!("Ignoring unknown FilterColumn option {c_key:?}."),
        }
    }

    Ok(cfg_options)
}

/// Python `bool` is an `int` subclass; it is not accepted as a column index.
///
/// Integers wider than 64 bits are rejected here, with the kernel's wording.
fn extract_strict_int(value: &Bound<'_, PyAny>) -> PyResult<Option<i128>> {
    if value.is_instance_of::<PyBool>() || !value.is_instance_of::<PyInt>() {
        return Ok(None);
    }
    if let Ok(n_value) = value.extract::<u64>() {
        return Ok(Some(i128::from(n_value)));
    }
    if let Ok(n_value) = value.extract::<i64>() {
        return Ok(Some(i128::from(n_value)));
    }

    let c_value = derive_py_repr(value);
    if value.lt(0_i64)? {
        return Err(derive_py_err(AutoFilterError::InvalidColumnId(c_value)));
    }
    Err(derive_py_err(AutoFilterError::InvalidValue {
        field: "FilterColumn.col_id",
        message: format!(
            "{c_value} exceeds the largest supported index {}.",
            usize::MAX
        ),
    }))
}

fn extract_strict_bool(field: &'static str, value: &Bound<'_, PyAny>) -> PyResult<bool> {
    if value.is_instance_of::<PyBool>() {
        return value.extract::<bool>();
    }
    Err(derive_py_err(AutoFilterError::InvalidBoolean {
        field,
        value: derive_py_repr(value),
    }))
}

fn derive_filter_value_text(value: &Bound<'_, PyAny>) -> PyResult<String> {
    if value.is_instance_of::<PyBool>() {
        return Ok(derive_xml_bool_text(value.extract::<bool>()?).to_string());
    }
    Ok(value.str()?.to_string())
}

fn derive_py_repr(value: &Bound<'_, PyAny>) -> String {
    value
        .repr()
        .map(|r| r.to_string())
        .unwrap_or_else(|_| "<unrepresentable>".to_string())
}

fn derive_xml_bool_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn derive_py_bool_text(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn derive_py_err(err: AutoFilterError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

#[pymodule]
fn _axiomkit_xlsx_autofilter_rs(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyFilterColumn>()?;
    module.add_class::<PyFilters>()?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    Ok(())
}

// Needs libpython at link time: `cargo test --no-default-features`.
#[cfg(all(test, not(feature = "extension-module")))]
mod tests {
    use std::ffi::CStr;

    use super::*;

    fn with_py<F: FnOnce(Python<'_>)>(f: F) {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(f);
    }

    fn eval<'py>(py: Python<'py>, code: &CStr) -> Bound<'py, PyAny> {
        py.eval(code, None, None).expect("eval")
    }

    fn build(
        py: Python<'_>,
        col_id: &CStr,
        options: Option<&Bound<'_, PyAny>>,
        configure: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<PyFilterColumn> {
        PyFilterColumn::new(py, &eval(py, col_id), "filters", options, configure)
    }

    fn assert_value_error(py: Python<'_>, err: PyErr, fragment: &str) {
        assert!(err.is_instance_of::<PyValueError>(py), "{err}");
        let c_msg = err.value(py).to_string();
        assert!(c_msg.contains(fragment), "{c_msg:?} lacks {fragment:?}");
    }

    const C_XML_DEFAULT: &str = "<filterColumn colId='0' hiddenButton='false' showButton='true'>\
                                 <filters></filters></filterColumn>";

    #[test]
    fn test_configure_callback_fills_value_list() {
        with_py(|py| {
            let configure = eval(py, c"lambda f: (f.add_value(1), f.add_value(2))");
            let column = build(py, c"0", None, Some(&configure)).unwrap();
            assert_eq!(
                column.to_xml_string(py).unwrap(),
                "<filterColumn colId='0' hiddenButton='false' showButton='true'>\
                 <filters><filter val='1'/><filter val='2'/></filters></filterColumn>"
            );
        });
    }

    #[test]
    fn test_col_id_accepts_integers_beyond_i64() {
        with_py(|py| {
            let column = build(py, c"2**63", None, None).unwrap();
            assert_eq!(column.col_id() as u64, 1_u64 << 63);

            let column = build(py, c"2**64 - 1", None, None).unwrap();
            assert_eq!(column.col_id() as u64, u64::MAX);
        });
    }

    #[test]
    fn test_col_id_beyond_64_bits_reports_range_or_sign() {
        with_py(|py| {
            let err = build(py, c"2**70", None, None).unwrap_err();
            assert_value_error(py, err, "exceeds the largest supported index");

            let err = build(py, c"-(2**70)", None, None).unwrap_err();
            assert_value_error(py, err, "is not a non-negative integer");
        });
    }

    #[test]
    fn test_col_id_rejects_non_integers() {
        with_py(|py| {
            for code in [c"1.0", c"True", c"'3'", c"None", c"-1"] {
                let err = build(py, code, None, None).unwrap_err();
                assert_value_error(py, err, "Invalid column id");
            }
        });
    }

    #[test]
    fn test_col_id_setter_failure_keeps_previous_value() {
        with_py(|py| {
            let mut column = build(py, c"3", None, None).unwrap();
            for code in [c"-1", c"1.0", c"False"] {
                let err = column.set_col_id(eval(py, code)).unwrap_err();
                assert_value_error(py, err, "Invalid column id");
                assert_eq!(column.col_id(), 3);
            }
            column.set_col_id(eval(py, c"7")).unwrap();
            assert_eq!(column.col_id(), 7);
        });
    }

    #[test]
    fn test_col_id_reads_cell_like_objects() {
        with_py(|py| {
            let column = build(py, c"type('Cell', (), {'col': 5})()", None, None).unwrap();
            assert_eq!(column.col_id(), 5);

            let column = build(py, c"type('Cell', (), {'column': 2})()", None, None).unwrap();
            assert_eq!(column.col_id(), 2);

            let err = build(py, c"type('Cell', (), {'col': 'E'})()", None, None).unwrap_err();
            assert_value_error(py, err, "Invalid column id");
        });
    }

    #[test]
    fn test_unknown_option_keys_are_ignored() {
        with_py(|py| {
            let options = eval(py, c"{'foo': 1}");
            let column = build(py, c"0", Some(&options), None).unwrap();
            assert!(!column.hidden_button());
            assert!(column.show_button());
            assert_eq!(column.to_xml_string(py).unwrap(), C_XML_DEFAULT);
        });
    }

    #[test]
    fn test_recognized_options_are_applied() {
        with_py(|py| {
            let options = eval(py, c"{'hidden_button': True, 'show_button': False}");
            let column = build(py, c"0", Some(&options), None).unwrap();
            assert!(column.hidden_button());
            assert!(!column.show_button());
        });
    }

    #[test]
    fn test_non_boolean_flags_are_rejected() {
        with_py(|py| {
            let options = eval(py, c"{'hidden_button': 1}");
            let err = build(py, c"0", Some(&options), None).unwrap_err();
            assert_value_error(py, err, "FilterColumn.hidden_button");

            let mut column = build(py, c"0", None, None).unwrap();
            let err = column.set_hidden_button(eval(py, c"'yes'")).unwrap_err();
            assert_value_error(py, err, "is not a boolean");
            assert!(!column.hidden_button());

            let err = column.set_show_button(eval(py, c"0")).unwrap_err();
            assert_value_error(py, err, "FilterColumn.show_button");
            assert!(column.show_button());
        });
    }

    #[test]
    fn test_filter_type_is_checked_before_col_id() {
        with_py(|py| {
            let col_id = eval(py, c"1.5");
            let err = PyFilterColumn::new(py, &col_id, "top10", None, None).unwrap_err();
            assert_value_error(py, err, "is not one of [filters]");

            let err = PyFilterColumn::new(py, &col_id, "sparkle", None, None).unwrap_err();
            assert_value_error(py, err, "is not one of [filters]");
        });
    }

    #[test]
    fn test_filters_object_writes_through() {
        with_py(|py| {
            let globals = PyDict::new(py);
            py.run(
                c"kept = []\ndef configure(f):\n    kept.append(f)\n    f.add_value('a')\n",
                Some(&globals),
                None,
            )
            .unwrap();
            let configure = globals.get_item("configure").unwrap().unwrap();
            let column = build(py, c"0", None, Some(&configure)).unwrap();

            py.run(c"kept[0].add_value('b')", Some(&globals), None)
                .unwrap();
            let filters = column.filters(py).unwrap();
            filters
                .borrow_mut(py)
                .add_value(&eval(py, c"'c'"))
                .unwrap();
            assert_eq!(
                filters.as_ptr(),
                column.filters(py).unwrap().as_ptr()
            );

            assert_eq!(
                column.to_xml_string(py).unwrap(),
                "<filterColumn colId='0' hiddenButton='false' showButton='true'>\
                 <filters><filter val='a'/><filter val='b'/><filter val='c'/></filters>\
                 </filterColumn>"
            );
            assert!(!filters.borrow(py).is_empty());
        });
    }

    #[test]
    fn test_filters_reports_date_group_items() {
        with_py(|py| {
            let mut filters = PyFilters::default();
            assert!(filters.is_empty());
            filters
                .add_date_group_item("month", 2024, Some(3), None, None, None, None)
                .unwrap();
            assert_eq!(
                filters.date_group_items(),
                vec![("month", 2024, Some(3), None, None, None, None)]
            );

            let err = filters
                .add_date_group_item("month", 2024, Some(13), None, None, None, None)
                .unwrap_err();
            assert_value_error(py, err, "DateGroupItem.month");
        });
    }
}
