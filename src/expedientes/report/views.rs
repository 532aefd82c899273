use super::super::domain::StatusKind;
use chrono::NaiveDate;
use serde::Serialize;

/// Per-status tallies over one record set. `Unavailable` results count only
/// toward `total`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub expired: usize,
    pub expiring_today: usize,
    pub expiring_soon: usize,
    pub current: usize,
    pub exempt: usize,
    pub total: usize,
}

/// One expediente as rendered in the grouped listing.
#[derive(Debug, Clone, Serialize)]
pub struct ExpedienteView {
    pub expediente: String,
    pub asesor: String,
    pub tema: String,
    pub fecha_reparto: String,
    pub status: StatusKind,
    pub status_label: &'static str,
    pub mensaje: String,
    pub fecha_limite: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<NaiveDate>,
}

/// All filtered expedientes assigned to one asesor.
#[derive(Debug, Clone, Serialize)]
pub struct AsesorGroup {
    pub asesor: String,
    pub total: usize,
    pub expedientes: Vec<ExpedienteView>,
}

/// One row of the optional flat table export.
#[derive(Debug, Clone, Serialize)]
pub struct ExpedienteRow {
    pub asesor: String,
    pub expediente: String,
    pub fecha_reparto: String,
    pub tema: String,
    pub seguimiento: String,
    pub estado_caducidad: String,
}

/// Complete payload handed to the presentation layer: counts for the whole
/// set and the filtered subset, the by-asesor listing, and the optional
/// flat table.
#[derive(Debug, Clone, Serialize)]
pub struct CaducidadReport {
    pub today: NaiveDate,
    pub counts: StatusCounts,
    pub filtered_counts: StatusCounts,
    pub total_filtered: usize,
    pub groups: Vec<AsesorGroup>,
    /// Distinct values over the whole set, sorted; the presentation layer
    /// builds its filter selectors from these.
    pub temas: Vec<String>,
    pub asesores: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<ExpedienteRow>>,
}
