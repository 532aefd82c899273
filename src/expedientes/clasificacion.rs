use super::domain::{Expediente, ExpiryStatus, DIAS_ALERTA, TEMA_EXENTO};
use super::fechas;
use chrono::NaiveDate;

/// Classify one expediente against `today`. Pure and stateless: callers
/// supply the reference date, so results stay correct across day boundaries
/// without any cache to invalidate.
///
/// The exemption check runs before any date handling so exempt records with
/// missing or malformed dates are never reported as unavailable.
pub fn classify(record: &Expediente, today: NaiveDate) -> ExpiryStatus {
    if record.tema == TEMA_EXENTO {
        return ExpiryStatus::Exempt;
    }

    let expiry = match fechas::normalize(&record.fecha_caducidad) {
        Some(date) => date,
        None => return ExpiryStatus::Unavailable,
    };

    let days_remaining = (expiry - today).num_days();
    if days_remaining < 0 {
        ExpiryStatus::Expired {
            days_overdue: -days_remaining,
            expiry,
        }
    } else if days_remaining == 0 {
        ExpiryStatus::ExpiresToday { expiry }
    } else if days_remaining <= DIAS_ALERTA {
        ExpiryStatus::ExpiringSoon {
            days_remaining,
            expiry,
        }
    } else {
        ExpiryStatus::Current {
            days_remaining,
            expiry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expedientes::domain::NO_DISPONIBLE;
    use chrono::Duration;

    fn record(tema: &str, fecha_caducidad: &str) -> Expediente {
        Expediente {
            expediente: "2024-100".to_string(),
            asesor: "GARCIA".to_string(),
            tema: tema.to_string(),
            fecha_caducidad: fecha_caducidad.to_string(),
            fecha_reparto: NO_DISPONIBLE.to_string(),
            seguimiento: NO_DISPONIBLE.to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date")
    }

    #[test]
    fn exemption_wins_over_any_date_value() {
        assert_eq!(
            classify(&record(TEMA_EXENTO, NO_DISPONIBLE), today()),
            ExpiryStatus::Exempt
        );
        assert_eq!(
            classify(&record(TEMA_EXENTO, "not a date at all"), today()),
            ExpiryStatus::Exempt
        );
        assert_eq!(
            classify(&record(TEMA_EXENTO, "2020-01-01"), today()),
            ExpiryStatus::Exempt
        );
    }

    #[test]
    fn unusable_dates_classify_as_unavailable() {
        assert_eq!(
            classify(&record("TUTELA", NO_DISPONIBLE), today()),
            ExpiryStatus::Unavailable
        );
        assert_eq!(
            classify(&record("TUTELA", "pendiente"), today()),
            ExpiryStatus::Unavailable
        );
    }

    #[test]
    fn day_thresholds_are_inclusive_at_zero_and_thirty() {
        let today = today();
        let at = |days: i64| {
            let expiry = (today + Duration::days(days)).format("%Y-%m-%d").to_string();
            classify(&record("TUTELA", &expiry), today)
        };

        assert_eq!(
            at(-1),
            ExpiryStatus::Expired {
                days_overdue: 1,
                expiry: today - Duration::days(1)
            }
        );
        assert_eq!(at(0), ExpiryStatus::ExpiresToday { expiry: today });
        assert_eq!(
            at(1),
            ExpiryStatus::ExpiringSoon {
                days_remaining: 1,
                expiry: today + Duration::days(1)
            }
        );
        assert_eq!(
            at(30),
            ExpiryStatus::ExpiringSoon {
                days_remaining: 30,
                expiry: today + Duration::days(30)
            }
        );
        assert_eq!(
            at(31),
            ExpiryStatus::Current {
                days_remaining: 31,
                expiry: today + Duration::days(31)
            }
        );
    }

    #[test]
    fn classification_is_calendar_day_granular() {
        // A record expiring today at any hour is "caduca hoy", not expired.
        let expiry = today().format("%Y-%m-%d").to_string() + " 01:30:00";
        assert_eq!(
            classify(&record("TUTELA", &expiry), today()),
            ExpiryStatus::ExpiresToday { expiry: today() }
        );
    }

    #[test]
    fn classify_is_pure() {
        let record = record("TUTELA", "2025-07-15");
        assert_eq!(classify(&record, today()), classify(&record, today()));
    }
}
