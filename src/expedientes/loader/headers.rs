use super::LoadError;

// Historically used header spellings, in lookup order. Surrounding
// whitespace is stripped before matching, which also covers the
// trailing-space variants seen in older exports.
const EXPEDIENTE_ALIASES: &[&str] = &["EXPEDIENTE"];
const ASESOR_ALIASES: &[&str] = &["ASESOR"];
const TEMA_ALIASES: &[&str] = &["TEMA"];
const CADUCIDAD_ALIASES: &[&str] = &["FECHA DE CADUCIDAD", "CADUCIDAD", "FECHA CADUCIDAD"];
const REPARTO_ALIASES: &[&str] = &["FECHA DE REPARTO", "REPARTO", "FECHA REPARTO"];
const SEGUIMIENTO_ALIASES: &[&str] = &["SEGUIMIENTO"];

/// Column positions resolved once per load from the (trimmed) header row,
/// so rows are read by index instead of re-scanning name variants.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnSchema {
    pub(crate) expediente: Option<usize>,
    pub(crate) asesor: Option<usize>,
    pub(crate) tema: Option<usize>,
    pub(crate) fecha_caducidad: Option<usize>,
    pub(crate) fecha_reparto: Option<usize>,
    pub(crate) seguimiento: Option<usize>,
}

impl ColumnSchema {
    pub(crate) fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let schema = Self {
            expediente: position_of(headers, EXPEDIENTE_ALIASES),
            asesor: position_of(headers, ASESOR_ALIASES),
            tema: position_of(headers, TEMA_ALIASES),
            fecha_caducidad: position_of(headers, CADUCIDAD_ALIASES),
            fecha_reparto: position_of(headers, REPARTO_ALIASES),
            seguimiento: position_of(headers, SEGUIMIENTO_ALIASES),
        };

        if schema.is_empty() {
            return Err(LoadError::MissingHeaders);
        }

        Ok(schema)
    }

    fn is_empty(&self) -> bool {
        self.expediente.is_none()
            && self.asesor.is_none()
            && self.tema.is_none()
            && self.fecha_caducidad.is_none()
            && self.fecha_reparto.is_none()
            && self.seguimiento.is_none()
    }
}

fn position_of(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|header| header == alias))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn resolves_expected_columns_by_position() {
        let schema = ColumnSchema::resolve(&headers(&[
            "EXPEDIENTE",
            "ASESOR",
            "TEMA",
            "FECHA DE CADUCIDAD",
            "FECHA DE REPARTO",
            "SEGUIMIENTO",
        ]))
        .expect("schema resolves");

        assert_eq!(schema.expediente, Some(0));
        assert_eq!(schema.asesor, Some(1));
        assert_eq!(schema.tema, Some(2));
        assert_eq!(schema.fecha_caducidad, Some(3));
        assert_eq!(schema.fecha_reparto, Some(4));
        assert_eq!(schema.seguimiento, Some(5));
    }

    #[test]
    fn first_present_alias_wins() {
        // "FECHA DE CADUCIDAD" outranks "CADUCIDAD" even when both appear.
        let schema = ColumnSchema::resolve(&headers(&[
            "CADUCIDAD",
            "EXPEDIENTE",
            "FECHA DE CADUCIDAD",
        ]))
        .expect("schema resolves");
        assert_eq!(schema.fecha_caducidad, Some(2));

        let schema = ColumnSchema::resolve(&headers(&["EXPEDIENTE", "FECHA CADUCIDAD"]))
            .expect("schema resolves");
        assert_eq!(schema.fecha_caducidad, Some(1));
    }

    #[test]
    fn unknown_columns_leave_fields_unresolved() {
        let schema =
            ColumnSchema::resolve(&headers(&["EXPEDIENTE", "OBSERVACIONES"])).expect("resolves");
        assert_eq!(schema.expediente, Some(0));
        assert_eq!(schema.fecha_caducidad, None);
        assert_eq!(schema.asesor, None);
    }

    #[test]
    fn unrecognizable_header_row_is_an_error() {
        let error = ColumnSchema::resolve(&headers(&["A", "B", "C"])).expect_err("must fail");
        assert!(matches!(error, LoadError::MissingHeaders));
    }
}
