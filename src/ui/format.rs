use chrono::NaiveDate;

/// Shown in place of an average or rate with no qualifying samples.
pub const SENTINEL: &str = "-";

/// Format a monetary amount in the fixed BRL convention:
/// `R$ 12.345,67`, thousands separated by `.`, two decimal places.
pub fn format_brl(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac:02}")
}

/// dd/mm/yyyy, the fixed regional convention.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// dd/mm, for compact delivery rows.
pub fn format_day_month(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

/// An average span of days with one decimal, or the sentinel.
pub fn format_avg_days(days: Option<f64>) -> String {
    match days {
        Some(days) => format!("{days:.1} days"),
        None => SENTINEL.to_string(),
    }
}

/// A percentage with one decimal, or the sentinel.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{rate:.1}%"),
        None => SENTINEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brl_groups_thousands_and_uses_comma_decimals() {
        assert_eq!(format_brl(12345.67), "R$ 12.345,67");
        assert_eq!(format_brl(1_234_567.0), "R$ 1.234.567,00");
    }

    #[test]
    fn brl_handles_small_and_negative_amounts() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(999.9), "R$ 999,90");
        assert_eq!(format_brl(-1500.5), "-R$ 1.500,50");
    }

    #[test]
    fn dates_use_the_fixed_locale() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(format_date(date), "06/08/2026");
        assert_eq!(format_day_month(date), "06/08");
    }

    #[test]
    fn missing_averages_and_rates_fall_back_to_the_sentinel() {
        assert_eq!(format_avg_days(None), SENTINEL);
        assert_eq!(format_rate(None), SENTINEL);
        assert_eq!(format_avg_days(Some(4.25)), "4.2 days");
        assert_eq!(format_rate(Some(52.38)), "52.4%");
    }
}
