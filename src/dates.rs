//! Calendar-date helpers. Dates travel as `YYYY-MM-DD` strings.

use time::{macros::format_description, Date, Month, OffsetDateTime};

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn parse(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
}

pub fn format(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: Date) -> (Date, Date) {
    let first = date.replace_day(1).unwrap_or(date);
    let last_day = time::util::days_in_year_month(date.year(), date.month());
    let last = date.replace_day(last_day).unwrap_or(date);
    (first, last)
}

/// First day of the month `n` months before the month containing `date`.
pub fn months_back(date: Date, n: u32) -> Date {
    let mut year = date.year();
    let mut month = date.month();
    for _ in 0..n {
        if month == Month::January {
            year -= 1;
        }
        month = month.previous();
    }
    Date::from_calendar_date(year, month, 1).unwrap_or(date)
}

/// Serde adapter for `Date` as `YYYY-MM-DD`.
pub mod iso {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(|e| D::Error::custom(format!("invalid date {raw:?}: {e}")))
    }

    pub mod option {
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
        use time::Date;

        pub fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => serializer.serialize_str(&crate::dates::format(*d)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => crate::dates::parse(&raw)
                    .map(Some)
                    .map_err(|e| D::Error::custom(format!("invalid date {raw:?}: {e}"))),
            }
        }
    }
}
