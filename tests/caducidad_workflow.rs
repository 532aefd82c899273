use chrono::{Duration, NaiveDate};
use expediente_alertas::expedientes::domain::{NO_DISPONIBLE, TEMA_EXENTO};
use expediente_alertas::expedientes::{
    build_report, classify, fechas, filter, group_by_asesor, summarize, Expediente, ExpiryStatus,
    FilterCriteria, StatusFilter,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid evaluation date")
}

fn expediente(id: &str, asesor: &str, tema: &str, fecha_caducidad: &str) -> Expediente {
    Expediente {
        expediente: id.to_string(),
        asesor: asesor.to_string(),
        tema: tema.to_string(),
        fecha_caducidad: fecha_caducidad.to_string(),
        fecha_reparto: NO_DISPONIBLE.to_string(),
        seguimiento: NO_DISPONIBLE.to_string(),
    }
}

fn offset_date(days: i64) -> String {
    (today() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

#[test]
fn exempt_topic_wins_regardless_of_expiry_value() {
    for fecha in [NO_DISPONIBLE, "", "garbage", "2020-01-01", "31/12/2030"] {
        let record = expediente("R1", "GARCIA", TEMA_EXENTO, fecha);
        assert_eq!(
            classify(&record, today()),
            ExpiryStatus::Exempt,
            "tema exento must ignore expiry value {fecha:?}"
        );
    }
}

#[test]
fn classification_boundaries_follow_the_business_rules() {
    let case = |days: i64| classify(&expediente("B1", "GARCIA", "TUTELA", &offset_date(days)), today());

    assert_eq!(
        case(-1),
        ExpiryStatus::Expired {
            days_overdue: 1,
            expiry: today() - Duration::days(1)
        }
    );
    assert_eq!(case(0), ExpiryStatus::ExpiresToday { expiry: today() });
    assert_eq!(
        case(30),
        ExpiryStatus::ExpiringSoon {
            days_remaining: 30,
            expiry: today() + Duration::days(30)
        }
    );
    assert_eq!(
        case(31),
        ExpiryStatus::Current {
            days_remaining: 31,
            expiry: today() + Duration::days(31)
        }
    );
}

#[test]
fn classify_has_no_hidden_state() {
    let record = expediente("P1", "GARCIA", "TUTELA", "2025-08-15");
    let first = classify(&record, today());
    let second = classify(&record, today());
    assert_eq!(first, second);
}

#[test]
fn normalizer_round_trips_every_accepted_format() {
    let expected = NaiveDate::from_ymd_opt(2025, 12, 31);
    assert_eq!(fechas::normalize("31/12/2025"), expected);
    assert_eq!(fechas::normalize("2025-12-31"), expected);
    assert_eq!(fechas::normalize("2025-12-31 00:00:00"), expected);
}

#[test]
fn unfiltered_criteria_keep_count_and_order() {
    let records = vec![
        expediente("A3", "LOPEZ", "TUTELA", &offset_date(3)),
        expediente("A1", "GARCIA", TEMA_EXENTO, NO_DISPONIBLE),
        expediente("A2", "LOPEZ", "PENAL", "garbage"),
    ];

    let matched = filter(&records, &FilterCriteria::default(), today());
    let ids: Vec<&str> = matched.iter().map(|r| r.expediente.as_str()).collect();
    assert_eq!(ids, ["A3", "A1", "A2"]);
}

#[test]
fn summarize_matches_the_reference_scenario() {
    // Three records: exempt with missing date, expired five days ago,
    // expiring in ten days.
    let records = vec![
        expediente("A1", "GARCIA", TEMA_EXENTO, NO_DISPONIBLE),
        expediente("A2", "LOPEZ", "OTHER", &offset_date(-5)),
        expediente("A3", "LOPEZ", "OTHER", &offset_date(10)),
    ];

    let counts = summarize(&records, today());
    assert_eq!(counts.exempt, 1);
    assert_eq!(counts.expired, 1);
    assert_eq!(counts.expiring_soon, 1);
    assert_eq!(counts.expiring_today, 0);
    assert_eq!(counts.current, 0);
    assert_eq!(counts.total, 3);

    assert_eq!(
        classify(&records[1], today()),
        ExpiryStatus::Expired {
            days_overdue: 5,
            expiry: today() - Duration::days(5)
        }
    );
    assert_eq!(
        classify(&records[2], today()),
        ExpiryStatus::ExpiringSoon {
            days_remaining: 10,
            expiry: today() + Duration::days(10)
        }
    );
}

#[test]
fn grouping_is_alphabetical_with_per_group_counts() {
    let records = vec![
        expediente("A1", "ZAPATA", "TUTELA", &offset_date(5)),
        expediente("A2", "ACOSTA", "TUTELA", &offset_date(5)),
        expediente("A3", "ZAPATA", "PENAL", &offset_date(40)),
    ];

    let matched = filter(&records, &FilterCriteria::default(), today());
    let groups = group_by_asesor(&matched, today());

    let asesores: Vec<&str> = groups.iter().map(|g| g.asesor.as_str()).collect();
    assert_eq!(asesores, ["ACOSTA", "ZAPATA"]);
    assert_eq!(groups[1].total, 2);
    assert_eq!(groups[1].expedientes[0].expediente, "A1");
}

#[test]
fn filtered_report_keeps_unfiltered_totals_visible() {
    let records = vec![
        expediente("A1", "GARCIA", TEMA_EXENTO, NO_DISPONIBLE),
        expediente("A2", "LOPEZ", "TUTELA", &offset_date(-5)),
        expediente("A3", "GARCIA", "TUTELA", &offset_date(10)),
    ];

    let criteria = FilterCriteria {
        status: StatusFilter::ExpiringSoon,
        ..FilterCriteria::default()
    };
    let report = build_report(&records, &criteria, today(), true);

    assert_eq!(report.counts.total, 3);
    assert_eq!(report.filtered_counts.total, 1);
    assert_eq!(report.total_filtered, 1);
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].asesor, "GARCIA");

    let table = report.table.expect("table requested");
    assert_eq!(table.len(), 1);
    assert_eq!(table[0].estado_caducidad, "¡FALTAN 10 DÍAS PARA CADUCAR!");
}

#[test]
fn views_render_the_fixed_language_labels() {
    let records = vec![expediente("A1", "GARCIA", "TUTELA", &offset_date(-3))];
    let matched = filter(&records, &FilterCriteria::default(), today());
    let groups = group_by_asesor(&matched, today());

    let view = &groups[0].expedientes[0];
    assert_eq!(view.status_label, "Caducado");
    assert_eq!(view.mensaje, "¡CADUCADO HACE 3 DÍAS!");
    assert_eq!(
        view.fecha_limite,
        (today() - Duration::days(3)).format("%d/%m/%Y").to_string()
    );
    assert_eq!(view.fecha_reparto, NO_DISPONIBLE);
}
