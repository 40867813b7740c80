//! `axiomkit_xlsx_autofilter` v1:
//! AutoFilter `filterColumn` model and SpreadsheetML serializer.
//!
//! Module layout:
//! - `conf`    : constants and allowed-value sets
//! - `spec`    : enums/options/errors
//! - `util`    : pure helper functions
//! - `filter`  : closed filter-kind registry and the `ToXmlString` capability
//! - `filters` : value-list filter (`<filters>`)
//! - `column`  : `FilterColumn`
pub mod column;
pub mod conf;
pub mod filter;
pub mod filters;
pub mod spec;
pub mod util;

pub use column::FilterColumn;
pub use conf::{N_NCOLS_EXCEL_MAX, TUP_CALENDAR_TYPES, TUP_FILTER_KINDS_ALLOWED};
pub use filter::{EnumFilter, ToXmlString, create_filter, is_filter_kind_supported};
pub use filters::{Filters, SpecDateGroupItem, SpecFilterItem};
pub use spec::{
    AutoFilterError, ColumnReference, EnumCalendarType, EnumDateTimeGrouping, EnumFilterKind,
    SpecCellRef, SpecFilterColumnOptions,
};
pub use util::{escape_xml_attr, parse_cell_ref, resolve_col_id};
