//! Value-list filter (`<filters>`): show rows whose cell matches one of the
//! listed values or date groups.

use std::fmt::Display;

use crate::filter::ToXmlString;
use crate::spec::{AutoFilterError, EnumCalendarType, EnumDateTimeGrouping};
use crate::util::push_xml_attr;

////////////////////////////////////////////////////////////////////////////////
// #region FilterItems

/// One accepted cell value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecFilterItem {
    /// Displayed cell text to match.
    pub val: String,
}

impl SpecFilterItem {
    pub fn new(val: impl Display) -> Self {
        Self {
            val: val.to_string(),
        }
    }
}

impl ToXmlString for SpecFilterItem {
    fn to_xml_string<'a>(&self, buf: &'a mut String) -> &'a mut String {
        buf.push_str("<filter");
        push_xml_attr(buf, "val", &self.val);
        buf.push_str("/>");
        buf
    }
}

/// Date grouping criterion: matches every date inside the given year, month, ...
/// down to `date_time_grouping` precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecDateGroupItem {
    date_time_grouping: EnumDateTimeGrouping,
    year: u16,
    month: Option<u8>,
    day: Option<u8>,
    hour: Option<u8>,
    minute: Option<u8>,
    second: Option<u8>,
}

impl SpecDateGroupItem {
    /// Both grouping and year are required by the schema.
    pub fn new(date_time_grouping: EnumDateTimeGrouping, year: u16) -> Self {
        Self {
            date_time_grouping,
            year,
            month: None,
            day: None,
            hour: None,
            minute: None,
            second: None,
        }
    }

    pub fn with_month(mut self, month: u8) -> Result<Self, AutoFilterError> {
        self.month = Some(validate_range("DateGroupItem.month", month, 1, 12)?);
        Ok(self)
    }

    pub fn with_day(mut self, day: u8) -> Result<Self, AutoFilterError> {
        self.day = Some(validate_range("DateGroupItem.day", day, 1, 31)?);
        Ok(self)
    }

    pub fn with_hour(mut self, hour: u8) -> Result<Self, AutoFilterError> {
        self.hour = Some(validate_range("DateGroupItem.hour", hour, 0, 23)?);
        Ok(self)
    }

    pub fn with_minute(mut self, minute: u8) -> Result<Self, AutoFilterError> {
        self.minute = Some(validate_range("DateGroupItem.minute", minute, 0, 59)?);
        Ok(self)
    }

    pub fn with_second(mut self, second: u8) -> Result<Self, AutoFilterError> {
        self.second = Some(validate_range("DateGroupItem.second", second, 0, 59)?);
        Ok(self)
    }

    pub fn date_time_grouping(&self) -> EnumDateTimeGrouping {
        self.date_time_grouping
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> Option<u8> {
        self.month
    }

    pub fn day(&self) -> Option<u8> {
        self.day
    }

    pub fn hour(&self) -> Option<u8> {
        self.hour
    }

    pub fn minute(&self) -> Option<u8> {
        self.minute
    }

    pub fn second(&self) -> Option<u8> {
        self.second
    }
}

impl ToXmlString for SpecDateGroupItem {
    fn to_xml_string<'a>(&self, buf: &'a mut String) -> &'a mut String {
        buf.push_str("<dateGroupItem");
        push_xml_attr(buf, "year", &self.year.to_string());
        let l_parts = [
            ("month", self.month),
            ("day", self.day),
            ("hour", self.hour),
            ("minute", self.minute),
            ("second", self.second),
        ];
        for (c_name, value) in l_parts {
            if let Some(value) = value {
                push_xml_attr(buf, c_name, &value.to_string());
            }
        }
        push_xml_attr(buf, "dateTimeGrouping", self.date_time_grouping.as_str());
        buf.push_str("/>");
        buf
    }
}

fn validate_range(
    field: &'static str,
    value: u8,
    min: u8,
    max: u8,
) -> Result<u8, AutoFilterError> {
    if (min..=max).contains(&value) {
        return Ok(value);
    }
    log::debug!("Rejected {field}={value}.");
    Err(AutoFilterError::InvalidValue {
        field,
        message: format!("{value} is outside {min}..={max}."),
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Filters

/// Value-list filter body of one `filterColumn`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filters {
    blank: Option<bool>,
    calendar_type: Option<EnumCalendarType>,
    filter_items: Vec<SpecFilterItem>,
    date_group_items: Vec<SpecDateGroupItem>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether blank cells are included; `None` leaves the attribute out.
    pub fn blank(&self) -> Option<bool> {
        self.blank
    }

    pub fn set_blank(&mut self, blank: bool) -> bool {
        self.blank = Some(blank);
        blank
    }

    pub fn calendar_type(&self) -> Option<EnumCalendarType> {
        self.calendar_type
    }

    pub fn set_calendar_type(&mut self, calendar_type: EnumCalendarType) -> EnumCalendarType {
        self.calendar_type = Some(calendar_type);
        calendar_type
    }

    /// Set the calendar from its attribute name, e.g. `"japan"`.
    pub fn set_calendar_type_str(
        &mut self,
        calendar_type: &str,
    ) -> Result<EnumCalendarType, AutoFilterError> {
        let calendar_type = calendar_type.parse::<EnumCalendarType>()?;
        Ok(self.set_calendar_type(calendar_type))
    }

    pub fn filter_items(&self) -> &[SpecFilterItem] {
        &self.filter_items
    }

    /// Append one accepted value.
    pub fn add_value(&mut self, value: impl Display) -> &mut Self {
        self.filter_items.push(SpecFilterItem::new(value));
        self
    }

    /// Append accepted values in order.
    pub fn add_values<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.filter_items
            .extend(values.into_iter().map(SpecFilterItem::new));
        self
    }

    /// Replace all accepted values.
    pub fn set_filter_items<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.filter_items.clear();
        self.add_values(values)
    }

    pub fn date_group_items(&self) -> &[SpecDateGroupItem] {
        &self.date_group_items
    }

    pub fn add_date_group_item(&mut self, item: SpecDateGroupItem) -> &mut Self {
        self.date_group_items.push(item);
        self
    }

    /// True when neither values, date groups nor blanks are selected.
    pub fn is_empty(&self) -> bool {
        self.filter_items.is_empty() && self.date_group_items.is_empty() && self.blank != Some(true)
    }
}

impl ToXmlString for Filters {
    fn to_xml_string<'a>(&self, buf: &'a mut String) -> &'a mut String {
        buf.push_str("<filters");
        if let Some(blank) = self.blank {
            push_xml_attr(buf, "blank", if blank { "true" } else { "false" });
        }
        if let Some(calendar_type) = self.calendar_type {
            push_xml_attr(buf, "calendarType", calendar_type.as_str());
        }
        buf.push('>');
        for item in &self.filter_items {
            item.to_xml_string(buf);
        }
        for item in &self.date_group_items {
            item.to_xml_string(buf);
        }
        buf.push_str("</filters>");
        buf
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
