use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Circulation permit as stored in `validacion` and mirrored into `ingresado`
///
/// Serialized with the column names as keys, which is what
/// `/validaciones_empresa` returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Permit {
    #[serde(rename = "codigo")]
    #[sqlx(rename = "codigo")]
    pub code: i64,
    #[serde(rename = "empresa")]
    #[sqlx(rename = "empresa")]
    pub company: String,
    #[serde(rename = "actividad")]
    #[sqlx(rename = "actividad")]
    pub activity: String,
    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub person_name: String,
    #[serde(rename = "edad")]
    #[sqlx(rename = "edad")]
    pub age: i64,
    #[serde(rename = "dni")]
    #[sqlx(rename = "dni")]
    pub national_id: i64,
    /// Server-assigned submission time
    #[serde(rename = "fecha_permiso")]
    #[sqlx(rename = "fecha_permiso")]
    pub issued_at: String,
    #[serde(rename = "riesgo")]
    #[sqlx(rename = "riesgo")]
    pub risk: String,
}

impl Permit {
    /// Column order shared by every permit query
    pub const COLUMNS: [&'static str; 8] = [
        "codigo",
        "empresa",
        "actividad",
        "nombre",
        "edad",
        "dni",
        "fecha_permiso",
        "riesgo",
    ];

    /// Plain tuple form: the field values in column order
    pub fn to_row(&self) -> Value {
        json!([
            self.code,
            self.company,
            self.activity,
            self.person_name,
            self.age,
            self.national_id,
            self.issued_at,
            self.risk,
        ])
    }

    /// (label, value) pairs in column order, used by the HTML tables
    pub fn labeled_fields(&self) -> [(&'static str, String); 8] {
        [
            ("Código", self.code.to_string()),
            ("Empresa", self.company.clone()),
            ("Actividad", self.activity.clone()),
            ("Nombre", self.person_name.clone()),
            ("Edad", self.age.to_string()),
            ("DNI", self.national_id.to_string()),
            ("Fecha de permiso", self.issued_at.clone()),
            ("Riesgo", self.risk.clone()),
        ]
    }
}

/// Row shape for permit listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Objects keyed by column name
    #[default]
    Mapping,
    /// Arrays in column order
    Rows,
}

impl ReportFormat {
    /// Parse the `format` query parameter; anything unknown falls back to mappings
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some(p) if p.eq_ignore_ascii_case("rows") => ReportFormat::Rows,
            _ => ReportFormat::Mapping,
        }
    }

    pub fn render(self, permits: &[Permit]) -> Value {
        match self {
            ReportFormat::Mapping => json!(permits),
            ReportFormat::Rows => Value::Array(permits.iter().map(Permit::to_row).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Permit {
        Permit {
            code: 1001,
            company: "ACME".to_string(),
            activity: "MINERIA".to_string(),
            person_name: "ANA PEREZ".to_string(),
            age: 34,
            national_id: 30123456,
            issued_at: "2021-05-01 10:00:00.000000".to_string(),
            risk: "ALTO".to_string(),
        }
    }

    #[test]
    fn test_mapping_uses_column_names() {
        let value = ReportFormat::Mapping.render(&[sample()]);
        let row = &value[0];

        for column in Permit::COLUMNS {
            assert!(row.get(column).is_some(), "missing column {}", column);
        }
        assert_eq!(row["codigo"], 1001);
        assert_eq!(row["riesgo"], "ALTO");
    }

    #[test]
    fn test_rows_keep_column_order() {
        let value = ReportFormat::Rows.render(&[sample()]);
        let row = value[0].as_array().unwrap();

        assert_eq!(row.len(), Permit::COLUMNS.len());
        assert_eq!(row[0], 1001);
        assert_eq!(row[3], "ANA PEREZ");
        assert_eq!(row[7], "ALTO");
    }

    #[test]
    fn test_format_param() {
        assert_eq!(ReportFormat::from_param(Some("rows")), ReportFormat::Rows);
        assert_eq!(ReportFormat::from_param(Some("ROWS")), ReportFormat::Rows);
        assert_eq!(ReportFormat::from_param(Some("json")), ReportFormat::Mapping);
        assert_eq!(ReportFormat::from_param(None), ReportFormat::Mapping);
    }
}
