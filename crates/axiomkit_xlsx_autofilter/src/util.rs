//! Stateless helpers shared by the AutoFilter serializers.

use rust_xlsxwriter::utility::column_name_to_number;
use rust_xlsxwriter::{ColNum, RowNum};

use crate::conf::{N_LEN_EXCEL_COLUMN_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
use crate::spec::{AutoFilterError, ColumnReference};

////////////////////////////////////////////////////////////////////////////////
// #region ColumnResolution

/// Resolve a column reference into a validated zero-based column id.
pub fn resolve_col_id<R: ColumnReference + ?Sized>(
    column_ref: &R,
) -> Result<usize, AutoFilterError> {
    let n_col_index = column_ref.col_index();
    if n_col_index < 0 {
        log::debug!("Rejected column reference with index {n_col_index}.");
        return Err(AutoFilterError::InvalidColumnId(n_col_index.to_string()));
    }
    usize::try_from(n_col_index).map_err(|_| {
        log::debug!("Rejected oversized column reference {n_col_index}.");
        AutoFilterError::InvalidValue {
            field: "FilterColumn.col_id",
            message: format!(
                "{n_col_index} exceeds the largest supported index {}.",
                usize::MAX
            ),
        }
    })
}

/// Parse an A1 reference (`B7`, `$XFD$1048576`) into zero-based `(row, col)`.
pub fn parse_cell_ref(cell: &str) -> Result<(RowNum, ColNum), AutoFilterError> {
    let err = || AutoFilterError::InvalidCellRef(cell.to_string());

    let c_cell = cell.trim().replace('$', "").to_ascii_uppercase();
    let n_idx_digits = c_cell
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(err)?;
    let (c_col_name, c_row_digits) = c_cell.split_at(n_idx_digits);

    if c_col_name.is_empty()
        || c_col_name.len() > N_LEN_EXCEL_COLUMN_NAME_MAX
        || !c_col_name.chars().all(|c| c.is_ascii_uppercase())
        || !c_row_digits.chars().all(|c| c.is_ascii_digit())
    {
        return Err(err());
    }

    let n_col = column_name_to_number(c_col_name);
    if usize::from(n_col) >= N_NCOLS_EXCEL_MAX {
        return Err(err());
    }

    let n_row_1based = c_row_digits.parse::<usize>().map_err(|_| err())?;
    if n_row_1based == 0 || n_row_1based > N_NROWS_EXCEL_MAX {
        return Err(err());
    }
    let n_row = RowNum::try_from(n_row_1based - 1).map_err(|_| err())?;

    Ok((n_row, n_col))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region XmlText

/// Escape text for use inside a single- or double-quoted XML attribute.
pub fn escape_xml_attr(value: &str) -> String {
    let mut c_escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => c_escaped.push_str("&amp;"),
            '<' => c_escaped.push_str("&lt;"),
            '>' => c_escaped.push_str("&gt;"),
            '\'' => c_escaped.push_str("&apos;"),
            '"' => c_escaped.push_str("&quot;"),
            _ => c_escaped.push(c),
        }
    }
    c_escaped
}

/// Append ` name='value'` to `buf`, escaping the value.
pub fn push_xml_attr(buf: &mut String, name: &str, value: &str) {
    buf.push(' ');
    buf.push_str(name);
    buf.push_str("='");
    buf.push_str(&escape_xml_attr(value));
    buf.push('\'');
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
