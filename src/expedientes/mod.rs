pub mod clasificacion;
pub mod domain;
pub mod fechas;
pub mod loader;
pub mod report;

pub use clasificacion::classify;
pub use domain::{Expediente, ExpiryStatus, FilterCriteria, StatusFilter, StatusKind};
pub use loader::{ExpedienteImporter, LoadError};
pub use report::views::{CaducidadReport, StatusCounts};
pub use report::{build_report, filter, group_by_asesor, summarize};
