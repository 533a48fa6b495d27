use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{
        BorrowedFormatItem,
        well_known::{Rfc2822, Rfc3339},
    },
    macros::format_description,
};

/// Date-times without an offset, interpreted in the display offset.
const LOCAL_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
];

/// Parses a user supplied date and converts it to `offset`.
///
/// Accepts RFC 3339, local date-times (assumed to be in `offset`), plain dates
/// (midnight UTC) and RFC 2822. Returns `None` when nothing matches.
pub fn parse_date(value: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let parsed = if let Ok(dt) = OffsetDateTime::parse(value, &Rfc3339) {
        Some(dt)
    } else if let Some(dt) =
        LOCAL_FORMATS.iter().find_map(|format| PrimitiveDateTime::parse(value, format).ok())
    {
        Some(dt.assume_offset(offset))
    } else if let Ok(date) = Date::parse(value, format_description!("[year]-[month]-[day]")) {
        Some(date.midnight().assume_utc())
    } else {
        OffsetDateTime::parse(value, &Rfc2822).ok()
    };
    parsed.and_then(|dt| dt.checked_to_offset(offset))
}

/// Formats a date-time in the ko-KR long form, e.g. `2024년 3월 15일 오후 02:05`.
pub fn format_korean(value: OffsetDateTime) -> String {
    let (period, hour) =
        if value.hour() < 12 { ("오전", value.hour()) } else { ("오후", value.hour() - 12) };
    let hour = if hour == 0 { 12 } else { hour };
    format!(
        "{}년 {}월 {}일 {} {:02}:{:02}",
        value.year(),
        u8::from(value.month()),
        value.day(),
        period,
        hour,
        value.minute()
    )
}

/// Resolves the date shown on the card. Missing or unparseable input falls back to `now`.
///
/// The flag is set when the date came from `param`.
pub fn display_date(param: Option<&str>, now: OffsetDateTime, offset: UtcOffset) -> (String, bool) {
    match param.and_then(|value| parse_date(value, offset)) {
        Some(value) => (format_korean(value), true),
        None => (format_korean(now.to_offset(offset)), false),
    }
}
