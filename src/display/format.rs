//! Clock face and date line formatting

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use super::translations::Language;

const DAYS_TH: [&str; 7] = ["อาทิตย์", "จันทร์", "อังคาร", "พุธ", "พฤหัสบดี", "ศุกร์", "เสาร์"];

const MONTHS_TH: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Buddhist Era year = Gregorian year + 543
const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Zero-padded clock digits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedTime {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl FormattedTime {
    pub fn to_hms(&self) -> String {
        format!("{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

pub fn format_time<Tz: TimeZone>(at: &DateTime<Tz>) -> FormattedTime {
    FormattedTime {
        hours: format!("{:02}", at.hour()),
        minutes: format!("{:02}", at.minute()),
        seconds: format!("{:02}", at.second()),
    }
}

/// `วันจันทร์ที่ 15 มกราคม 2567` or `January 15, 2024`
pub fn format_date<Tz: TimeZone>(at: &DateTime<Tz>, language: Language) -> String {
    let month = at.month0() as usize;
    match language {
        Language::Th => {
            let day_name = DAYS_TH[at.weekday().num_days_from_sunday() as usize];
            format!(
                "วัน{}ที่ {} {} {}",
                day_name,
                at.day(),
                MONTHS_TH[month],
                at.year() + BUDDHIST_ERA_OFFSET
            )
        }
        Language::En => format!("{} {}, {}", MONTHS_EN[month], at.day(), at.year()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn pads_clock_digits() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 5, 3).unwrap();
        let time = format_time(&at);
        assert_eq!(time.hours, "09");
        assert_eq!(time.minutes, "05");
        assert_eq!(time.seconds, "03");
        assert_eq!(time.to_hms(), "09:05:03");

        let midnight = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(format_time(&midnight).to_hms(), "00:00:00");
    }

    #[test]
    fn formats_in_the_given_zone() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 23, 30, 0).unwrap();
        let bangkok = utc.with_timezone(&FixedOffset::east_opt(7 * 3600).unwrap());
        assert_eq!(format_time(&bangkok).hours, "06");
        assert_eq!(format_date(&bangkok, Language::En), "January 16, 2024");
    }

    #[test]
    fn thai_date_uses_buddhist_era() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(format_date(&at, Language::Th), "วันจันทร์ที่ 15 มกราคม 2567");

        let christmas = Utc.with_ymd_and_hms(2024, 12, 25, 12, 0, 0).unwrap();
        let text = format_date(&christmas, Language::Th);
        assert!(text.contains("ธันวาคม"));
        assert!(text.contains("2567"));
    }

    #[test]
    fn english_date() {
        let at = Utc.with_ymd_and_hms(2024, 12, 25, 12, 0, 0).unwrap();
        assert_eq!(format_date(&at, Language::En), "December 25, 2024");
    }

    #[test]
    fn every_thai_weekday() {
        // 2024-01-07 was a Sunday
        for (i, day) in DAYS_TH.iter().enumerate() {
            let at = Utc.with_ymd_and_hms(2024, 1, 7 + i as u32, 12, 0, 0).unwrap();
            assert!(format_date(&at, Language::Th).starts_with(&format!("วัน{}", day)));
        }
    }
}
