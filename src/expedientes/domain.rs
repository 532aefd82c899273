use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel written into every missing or unusable cell at load time, so
/// downstream logic compares against one literal instead of juggling nulls.
pub const NO_DISPONIBLE: &str = "No disponible";

/// Topic whose expedientes are exempt from expiry tracking. Exact,
/// case-sensitive match against the `TEMA` column.
pub const TEMA_EXENTO: &str = "REVOCATORIA DE MANDATO";

/// Records expiring within this many days are flagged as expiring soon.
pub const DIAS_ALERTA: i64 = 30;

/// One case record as shaped by the loader. All cells are strings and the
/// loader guarantees none of them is empty: missing values hold
/// [`NO_DISPONIBLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expediente {
    pub expediente: String,
    pub asesor: String,
    pub tema: String,
    pub fecha_caducidad: String,
    pub fecha_reparto: String,
    pub seguimiento: String,
}

/// Outcome of classifying one expediente against a reference date. Derived
/// on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// The topic makes expiry tracking inapplicable; no date is consulted.
    Exempt,
    Expired { days_overdue: i64, expiry: NaiveDate },
    ExpiresToday { expiry: NaiveDate },
    ExpiringSoon { days_remaining: i64, expiry: NaiveDate },
    Current { days_remaining: i64, expiry: NaiveDate },
    /// No usable expiry date was found on the record.
    Unavailable,
}

impl ExpiryStatus {
    pub const fn kind(self) -> StatusKind {
        match self {
            ExpiryStatus::Exempt => StatusKind::Exempt,
            ExpiryStatus::Expired { .. } => StatusKind::Expired,
            ExpiryStatus::ExpiresToday { .. } => StatusKind::ExpiresToday,
            ExpiryStatus::ExpiringSoon { .. } => StatusKind::ExpiringSoon,
            ExpiryStatus::Current { .. } => StatusKind::Current,
            ExpiryStatus::Unavailable => StatusKind::Unavailable,
        }
    }

    pub const fn label(self) -> &'static str {
        self.kind().label()
    }

    /// The alert line rendered next to each expediente.
    pub fn message(self) -> String {
        match self {
            ExpiryStatus::Exempt => "NO APLICA".to_string(),
            ExpiryStatus::Expired { days_overdue, .. } => {
                format!("¡CADUCADO HACE {days_overdue} DÍAS!")
            }
            ExpiryStatus::ExpiresToday { .. } => "¡CADUCA HOY!".to_string(),
            ExpiryStatus::ExpiringSoon { days_remaining, .. } => {
                format!("¡FALTAN {days_remaining} DÍAS PARA CADUCAR!")
            }
            ExpiryStatus::Current { days_remaining, .. } => {
                format!("VIGENTE - FALTAN {days_remaining} DÍAS")
            }
            ExpiryStatus::Unavailable => NO_DISPONIBLE.to_string(),
        }
    }

    pub const fn expiry_date(self) -> Option<NaiveDate> {
        match self {
            ExpiryStatus::Expired { expiry, .. }
            | ExpiryStatus::ExpiresToday { expiry }
            | ExpiryStatus::ExpiringSoon { expiry, .. }
            | ExpiryStatus::Current { expiry, .. } => Some(expiry),
            ExpiryStatus::Exempt | ExpiryStatus::Unavailable => None,
        }
    }

    /// Deadline column shown to users, `dd/mm/YYYY` when a date exists.
    pub fn fecha_limite(self) -> String {
        match self {
            ExpiryStatus::Exempt => "NO APLICA".to_string(),
            ExpiryStatus::Unavailable => NO_DISPONIBLE.to_string(),
            other => match other.expiry_date() {
                Some(date) => date.format("%d/%m/%Y").to_string(),
                None => NO_DISPONIBLE.to_string(),
            },
        }
    }
}

/// Flat discriminant of [`ExpiryStatus`] used for filtering, tallying, and
/// serialized views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Expired,
    ExpiresToday,
    ExpiringSoon,
    Current,
    Exempt,
    Unavailable,
}

impl StatusKind {
    pub const fn label(self) -> &'static str {
        match self {
            StatusKind::Expired => "Caducado",
            StatusKind::ExpiresToday => "Caduca hoy",
            StatusKind::ExpiringSoon => "Próximo a caducar",
            StatusKind::Current => "Vigente",
            StatusKind::Exempt => "No aplica",
            StatusKind::Unavailable => "No disponible",
        }
    }
}

/// Status choices offered by the filter controls. `Unavailable` is not
/// selectable; those records only surface under `All`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Expired,
    ExpiresToday,
    ExpiringSoon,
    Current,
    Exempt,
}

impl StatusFilter {
    pub const fn matches(self, kind: StatusKind) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Expired => matches!(kind, StatusKind::Expired),
            StatusFilter::ExpiresToday => matches!(kind, StatusKind::ExpiresToday),
            StatusFilter::ExpiringSoon => matches!(kind, StatusKind::ExpiringSoon),
            StatusFilter::Current => matches!(kind, StatusKind::Current),
            StatusFilter::Exempt => matches!(kind, StatusKind::Exempt),
        }
    }
}

/// User-chosen filters, applied conjunctively. `None` means "Todos".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub tema: Option<String>,
    #[serde(default)]
    pub asesor: Option<String>,
}

impl FilterCriteria {
    pub fn matches(&self, record: &Expediente, kind: StatusKind) -> bool {
        if !self.status.matches(kind) {
            return false;
        }
        if let Some(tema) = &self.tema {
            if record.tema != *tema {
                return false;
            }
        }
        if let Some(asesor) = &self.asesor {
            if record.asesor != *asesor {
                return false;
            }
        }
        true
    }
}
