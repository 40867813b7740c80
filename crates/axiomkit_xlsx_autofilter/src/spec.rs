//! Shared AutoFilter specification models and error types.

use std::fmt;
use std::str::FromStr;

use rust_xlsxwriter::utility::row_col_to_cell;
use rust_xlsxwriter::{ColNum, RowNum};

use crate::conf::{
    TUP_CALENDAR_TYPES, TUP_DATE_TIME_GROUPINGS, TUP_FILTER_KINDS_ALLOWED, derive_allowed_text,
};
use crate::util::parse_cell_ref;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Filter kind tag of one `filterColumn`.
///
/// Only [`EnumFilterKind::Filters`] has an implementation; the remaining tags
/// are reserved and rejected by [`crate::filter::create_filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumFilterKind {
    /// Value-list filtering (`<filters>`).
    Filters,
    /// Top/bottom N items or percent (`<top10>`).
    Top10,
    /// Operator based criteria (`<customFilters>`).
    CustomFilters,
    /// Relative date/average criteria (`<dynamicFilter>`).
    DynamicFilters,
    /// Cell or font color criteria (`<colorFilter>`).
    ColorFilters,
    /// Conditional-format icon criteria (`<iconFilter>`).
    IconFilters,
}

impl EnumFilterKind {
    /// SpreadsheetML element name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filters => "filters",
            Self::Top10 => "top10",
            Self::CustomFilters => "customFilters",
            Self::DynamicFilters => "dynamicFilter",
            Self::ColorFilters => "colorFilter",
            Self::IconFilters => "iconFilter",
        }
    }
}

impl AsRef<str> for EnumFilterKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EnumFilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnumFilterKind {
    type Err = AutoFilterError;

    /// Accepts element names (`customFilters`) and snake_case tags (`custom_filters`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim() {
            "filters" => Self::Filters,
            "top10" | "top_10" => Self::Top10,
            "customFilters" | "custom_filters" => Self::CustomFilters,
            "dynamicFilter" | "dynamicFilters" | "dynamic_filters" => Self::DynamicFilters,
            "colorFilter" | "colorFilters" | "color_filters" => Self::ColorFilters,
            "iconFilter" | "iconFilters" | "icon_filters" => Self::IconFilters,
            _ => {
                return Err(AutoFilterError::Restriction {
                    field: "FilterColumn.filter",
                    value: s.to_string(),
                    allowed: derive_allowed_text(TUP_FILTER_KINDS_ALLOWED),
                });
            }
        };
        Ok(kind)
    }
}

/// Calendar used to interpret dates in a value-list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumCalendarType {
    Gregorian,
    GregorianUs,
    GregorianMeFrench,
    GregorianArabic,
    Hijri,
    Hebrew,
    Taiwan,
    Japan,
    Thai,
    Korea,
    Saka,
    GregorianXlitEnglish,
    GregorianXlitFrench,
}

impl EnumCalendarType {
    /// Attribute value written to `calendarType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gregorian => "gregorian",
            Self::GregorianUs => "gregorianUs",
            Self::GregorianMeFrench => "gregorianMeFrench",
            Self::GregorianArabic => "gregorianArabic",
            Self::Hijri => "hijri",
            Self::Hebrew => "hebrew",
            Self::Taiwan => "taiwan",
            Self::Japan => "japan",
            Self::Thai => "thai",
            Self::Korea => "korea",
            Self::Saka => "saka",
            Self::GregorianXlitEnglish => "gregorianXlitEnglish",
            Self::GregorianXlitFrench => "gregorianXlitFrench",
        }
    }
}

impl AsRef<str> for EnumCalendarType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EnumCalendarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnumCalendarType {
    type Err = AutoFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TUP_CALENDAR_TYPES
            .into_iter()
            .find(|calendar| calendar.as_str() == s)
            .ok_or_else(|| AutoFilterError::Restriction {
                field: "Filters.calendar_type",
                value: s.to_string(),
                allowed: derive_allowed_text(TUP_CALENDAR_TYPES),
            })
    }
}

/// Precision of a `<dateGroupItem>` match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumDateTimeGrouping {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl EnumDateTimeGrouping {
    /// Attribute value written to `dateTimeGrouping`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }
}

impl AsRef<str> for EnumDateTimeGrouping {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EnumDateTimeGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnumDateTimeGrouping {
    type Err = AutoFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TUP_DATE_TIME_GROUPINGS
            .into_iter()
            .find(|grouping| grouping.as_str() == s)
            .ok_or_else(|| AutoFilterError::Restriction {
                field: "DateGroupItem.date_time_grouping",
                value: s.to_string(),
                allowed: derive_allowed_text(TUP_DATE_TIME_GROUPINGS),
            })
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region OptionsAndReferences

/// Construction options for [`crate::column::FilterColumn`].
///
/// `None` keeps the field default (`hidden_button = false`, `show_button = true`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecFilterColumnOptions {
    /// Hide the AutoFilter button of this column.
    pub hidden_button: Option<bool>,
    /// Draw the AutoFilter button of this column.
    pub show_button: Option<bool>,
}

/// Anything that can identify a column offset inside an AutoFilter range.
///
/// The raw index is validated by the receiver, so implementors may report
/// negative values.
pub trait ColumnReference {
    /// Raw zero-based column index.
    fn col_index(&self) -> i128;
}

macro_rules! impl_column_reference_for_int {
    ($($t:ty),*) => {
        $(
            impl ColumnReference for $t {
                fn col_index(&self) -> i128 {
                    i128::from(*self)
                }
            }
        )*
    };
}

impl_column_reference_for_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl ColumnReference for isize {
    fn col_index(&self) -> i128 {
        *self as i128
    }
}

impl ColumnReference for usize {
    fn col_index(&self) -> i128 {
        *self as i128
    }
}

impl<T: ColumnReference + ?Sized> ColumnReference for &T {
    fn col_index(&self) -> i128 {
        (**self).col_index()
    }
}

/// Zero-based worksheet cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecCellRef {
    /// Zero-based row index.
    pub row: RowNum,
    /// Zero-based column index.
    pub col: ColNum,
}

impl SpecCellRef {
    pub fn new(row: RowNum, col: ColNum) -> Self {
        Self { row, col }
    }
}

impl ColumnReference for SpecCellRef {
    fn col_index(&self) -> i128 {
        i128::from(self.col)
    }
}

impl fmt::Display for SpecCellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&row_col_to_cell(self.row, self.col))
    }
}

impl FromStr for SpecCellRef {
    type Err = AutoFilterError;

    /// Parse an A1 reference such as `F3` or `$AB$12`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = parse_cell_ref(s)?;
        Ok(Self { row, col })
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// AutoFilter validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoFilterError {
    /// Value is not a member of the allowed set for `field`.
    Restriction {
        /// Qualified field name, e.g. `FilterColumn.filter`.
        field: &'static str,
        /// Rejected value as text.
        value: String,
        /// Comma separated allowed values.
        allowed: String,
    },
    /// Column reference did not resolve to a non-negative integer.
    InvalidColumnId(String),
    /// Flag value is not a boolean.
    InvalidBoolean {
        /// Qualified field name.
        field: &'static str,
        /// Rejected value as text.
        value: String,
    },
    /// Numeric attribute out of its permitted range.
    InvalidValue {
        /// Qualified field name.
        field: &'static str,
        /// User-facing reason.
        message: String,
    },
    /// Text is not an A1 cell reference.
    InvalidCellRef(String),
}

impl fmt::Display for AutoFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restriction {
                field,
                value,
                allowed,
            } => write!(
                f,
                "Invalid data for {field}: {value:?} is not one of [{allowed}]."
            ),
            Self::InvalidColumnId(value) => write!(
                f,
                "Invalid column id: {value} is not a non-negative integer."
            ),
            Self::InvalidBoolean { field, value } => {
                write!(f, "Invalid data for {field}: {value} is not a boolean.")
            }
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid data for {field}: {message}")
            }
            Self::InvalidCellRef(value) => write!(f, "Invalid cell reference: {value:?}."),
        }
    }
}

impl std::error::Error for AutoFilterError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
