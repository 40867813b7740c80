//! AutoFilter constants and allowed-value sets.

use crate::spec::{EnumCalendarType, EnumDateTimeGrouping, EnumFilterKind};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Longest column label in A1 notation (`XFD`).
pub const N_LEN_EXCEL_COLUMN_NAME_MAX: usize = 3;

/// Filter kinds that `FilterColumn` can currently be built with.
pub const TUP_FILTER_KINDS_ALLOWED: [EnumFilterKind; 1] = [EnumFilterKind::Filters];

/// Every filter kind tag, including the reserved ones.
pub const TUP_FILTER_KINDS_ALL: [EnumFilterKind; 6] = [
    EnumFilterKind::Filters,
    EnumFilterKind::Top10,
    EnumFilterKind::CustomFilters,
    EnumFilterKind::DynamicFilters,
    EnumFilterKind::ColorFilters,
    EnumFilterKind::IconFilters,
];

/// Calendar types accepted by `<filters calendarType=...>`.
pub const TUP_CALENDAR_TYPES: [EnumCalendarType; 13] = [
    EnumCalendarType::Gregorian,
    EnumCalendarType::GregorianUs,
    EnumCalendarType::GregorianMeFrench,
    EnumCalendarType::GregorianArabic,
    EnumCalendarType::Hijri,
    EnumCalendarType::Hebrew,
    EnumCalendarType::Taiwan,
    EnumCalendarType::Japan,
    EnumCalendarType::Thai,
    EnumCalendarType::Korea,
    EnumCalendarType::Saka,
    EnumCalendarType::GregorianXlitEnglish,
    EnumCalendarType::GregorianXlitFrench,
];

/// Groupings accepted by `<dateGroupItem dateTimeGrouping=...>`.
pub const TUP_DATE_TIME_GROUPINGS: [EnumDateTimeGrouping; 6] = [
    EnumDateTimeGrouping::Year,
    EnumDateTimeGrouping::Month,
    EnumDateTimeGrouping::Day,
    EnumDateTimeGrouping::Hour,
    EnumDateTimeGrouping::Minute,
    EnumDateTimeGrouping::Second,
];

/// Render a list of allowed tags for error messages.
pub fn derive_allowed_text<T: AsRef<str>>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
