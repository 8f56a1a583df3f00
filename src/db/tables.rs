use std::fmt;

/// The tables the store knows about; the only names ever interpolated into SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Permits submitted by companies
    Validations,
    /// Check-in copies of looked-up permits
    Entries,
    /// Registered users
    Users,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Validations => "validacion",
            Table::Entries => "ingresado",
            Table::Users => "usuario",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const VALIDATIONS: Table = Table::Validations;
pub const ENTRIES: Table = Table::Entries;
pub const USERS: Table = Table::Users;

/// Every table dropped by a schema reset
pub const ALL: [Table; 3] = [VALIDATIONS, ENTRIES, USERS];

/// Bundled DDL, used when `db.schema` is not configured
pub const SCHEMA: &str = include_str!("../../schema.sql");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        let names: Vec<String> = ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["validacion", "ingresado", "usuario"]);
    }
}
