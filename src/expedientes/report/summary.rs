use super::super::clasificacion::classify;
use super::super::domain::{Expediente, FilterCriteria, StatusKind};
use super::super::fechas;
use super::views::{AsesorGroup, CaducidadReport, ExpedienteRow, ExpedienteView, StatusCounts};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Classify every record against `today` and tally the visible buckets.
pub fn summarize(records: &[Expediente], today: NaiveDate) -> StatusCounts {
    let mut counts = StatusCounts {
        total: records.len(),
        ..StatusCounts::default()
    };

    for record in records {
        match classify(record, today).kind() {
            StatusKind::Expired => counts.expired += 1,
            StatusKind::ExpiresToday => counts.expiring_today += 1,
            StatusKind::ExpiringSoon => counts.expiring_soon += 1,
            StatusKind::Current => counts.current += 1,
            StatusKind::Exempt => counts.exempt += 1,
            StatusKind::Unavailable => {}
        }
    }

    counts
}

/// Retain the records matching every criterion, preserving input order.
/// Classification is re-run here rather than shared with `summarize`; record
/// counts are small and `today` is fixed for the duration of one request.
pub fn filter<'a>(
    records: &'a [Expediente],
    criteria: &FilterCriteria,
    today: NaiveDate,
) -> Vec<&'a Expediente> {
    records
        .iter()
        .filter(|record| criteria.matches(record, classify(record, today).kind()))
        .collect()
}

/// Partition records into one group per distinct asesor, ordered
/// alphabetically. Order within a group follows the input.
pub fn group_by_asesor(records: &[&Expediente], today: NaiveDate) -> Vec<AsesorGroup> {
    let mut groups: BTreeMap<&str, Vec<ExpedienteView>> = BTreeMap::new();

    for record in records {
        groups
            .entry(record.asesor.as_str())
            .or_default()
            .push(view_of(record, today));
    }

    groups
        .into_iter()
        .map(|(asesor, expedientes)| AsesorGroup {
            asesor: asesor.to_string(),
            total: expedientes.len(),
            expedientes,
        })
        .collect()
}

/// Assemble the full report: unfiltered counts, filtered counts, the grouped
/// listing, and optionally the flat table.
pub fn build_report(
    records: &[Expediente],
    criteria: &FilterCriteria,
    today: NaiveDate,
    include_table: bool,
) -> CaducidadReport {
    let counts = summarize(records, today);
    let matched = filter(records, criteria, today);
    let filtered_counts = summarize_refs(&matched, today);

    let groups = group_by_asesor(&matched, today);
    let table = include_table.then(|| matched.iter().map(|record| row_of(record, today)).collect());

    CaducidadReport {
        today,
        counts,
        filtered_counts,
        total_filtered: matched.len(),
        groups,
        temas: distinct_values(records, |record| &record.tema),
        asesores: distinct_values(records, |record| &record.asesor),
        table,
    }
}

/// Sorted distinct values of one field, used to populate the filter
/// selectors alongside "Todos".
fn distinct_values<F>(records: &[Expediente], field: F) -> Vec<String>
where
    F: Fn(&Expediente) -> &String,
{
    records
        .iter()
        .map(|record| field(record).as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn summarize_refs(records: &[&Expediente], today: NaiveDate) -> StatusCounts {
    let mut counts = StatusCounts {
        total: records.len(),
        ..StatusCounts::default()
    };
    for record in records {
        match classify(record, today).kind() {
            StatusKind::Expired => counts.expired += 1,
            StatusKind::ExpiresToday => counts.expiring_today += 1,
            StatusKind::ExpiringSoon => counts.expiring_soon += 1,
            StatusKind::Current => counts.current += 1,
            StatusKind::Exempt => counts.exempt += 1,
            StatusKind::Unavailable => {}
        }
    }
    counts
}

fn view_of(record: &Expediente, today: NaiveDate) -> ExpedienteView {
    let status = classify(record, today);
    ExpedienteView {
        expediente: record.expediente.clone(),
        asesor: record.asesor.clone(),
        tema: record.tema.clone(),
        fecha_reparto: fechas::format_display(&record.fecha_reparto),
        status: status.kind(),
        status_label: status.label(),
        mensaje: status.message(),
        fecha_limite: status.fecha_limite(),
        expiry: status.expiry_date(),
    }
}

fn row_of(record: &Expediente, today: NaiveDate) -> ExpedienteRow {
    let status = classify(record, today);
    ExpedienteRow {
        asesor: record.asesor.clone(),
        expediente: record.expediente.clone(),
        fecha_reparto: fechas::format_display(&record.fecha_reparto),
        tema: record.tema.clone(),
        seguimiento: record.seguimiento.clone(),
        estado_caducidad: status.message(),
    }
}
