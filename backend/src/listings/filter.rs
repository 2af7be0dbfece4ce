//! Filter clause builder
//!
//! Turns the optional query parameters of the search endpoints into one
//! parameterized `WHERE` predicate. Every value travels as a bind parameter;
//! only column names and fixed literals ever reach the SQL text.
//!
//! The clause starts from `TRUE` and each present, non-empty parameter appends
//! `AND <condition>` using the next `$n` position, in the field order of the
//! search schema. Text comparisons go through `LOWER(unaccent(..))` on both
//! sides, which needs the Postgres `unaccent` extension.

use serde::Deserialize;

/// Attendance value meaning "in person and remote"
pub const ATTENDANCE_BOTH: &str = "ambos";

/// Attendance values that also match listings offering both modes
pub const ATTENDANCE_WITH_FALLBACK: [&str; 2] = ["presencial", "remoto"];

/// Number of leading postal code characters used for proximity matching
pub const POSTAL_PREFIX_LEN: usize = 3;

/// Value bound to one `$n` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// Bound as `TEXT`
    Text(String),
    /// Bound as `FLOAT8`
    Number(f64),
}

/// Comparison applied to a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Case and accent insensitive equality
    TextEquals(&'static str),
    /// Case and accent insensitive equality, or the column holds `ambos`
    TextEqualsOrBoth(&'static str),
    /// Numeric equality
    NumberEquals(&'static str),
    /// Numeric lower bound, inclusive
    NumberAtLeast(&'static str),
    /// Numeric upper bound, inclusive
    NumberAtMost(&'static str),
    /// `LIKE` pattern match
    Like(&'static str),
}

impl Condition {
    /// Render the condition against bind position `position` (1-based)
    pub fn render(&self, position: usize) -> String {
        match *self {
            Condition::TextEquals(column) => {
                format!("LOWER(unaccent({column})) = LOWER(unaccent(${position}))")
            }
            Condition::TextEqualsOrBoth(column) => format!(
                "(LOWER(unaccent({column})) = LOWER(unaccent(${position})) \
                 OR LOWER(unaccent({column})) = '{ATTENDANCE_BOTH}')"
            ),
            Condition::NumberEquals(column) => format!("{column} = ${position}"),
            Condition::NumberAtLeast(column) => format!("{column} >= ${position}"),
            Condition::NumberAtMost(column) => format!("{column} <= ${position}"),
            Condition::Like(column) => format!("{column} LIKE ${position}"),
        }
    }
}

/// One condition paired with the value bound to it
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Comparison to render
    pub condition: Condition,
    /// Value for the comparison's placeholder
    pub value: BindValue,
}

/// Ordered list of predicates folded into one parameterized statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterClause {
    predicates: Vec<Predicate>,
}

impl FilterClause {
    /// Create an empty clause that matches every row
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate; it takes the next bind position
    pub fn push(&mut self, condition: Condition, value: BindValue) -> &mut Self {
        self.predicates.push(Predicate { condition, value });
        self
    }

    /// Case and accent insensitive equality on a text column
    pub fn text(&mut self, column: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(value) = present(value) {
            self.push(Condition::TextEquals(column), BindValue::Text(value.to_string()));
        }
        self
    }

    /// Attendance matching.
    ///
    /// `ambos` adds nothing, `presencial`/`remoto` also accept `ambos` rows,
    /// anything else is a plain text comparison.
    pub fn attendance(&mut self, column: &'static str, value: Option<&str>) -> &mut Self {
        let Some(value) = present(value) else {
            return self;
        };

        // Mode keywords are matched case-sensitively; `Ambos` is an ordinary value.
        if value == ATTENDANCE_BOTH {
            return self;
        }

        let condition = if ATTENDANCE_WITH_FALLBACK.contains(&value) {
            Condition::TextEqualsOrBoth(column)
        } else {
            Condition::TextEquals(column)
        };
        self.push(condition, BindValue::Text(value.to_string()))
    }

    /// Exact numeric equality; unparseable values add nothing
    pub fn number_equals(&mut self, column: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(number) = present(value).and_then(parse_number) {
            self.push(Condition::NumberEquals(column), BindValue::Number(number));
        }
        self
    }

    /// Inclusive `"<min>-<max>"` range where `<max>` may be `infinity`.
    ///
    /// Each bound is added only when it parses to a finite number, so
    /// `"abc-100"` keeps the upper bound and `"50-infinity"` keeps the lower.
    /// A value without `-` is read as a bare minimum.
    pub fn number_range(&mut self, column: &'static str, value: Option<&str>) -> &mut Self {
        let Some(value) = present(value) else {
            return self;
        };

        let (min, max) = match value.split_once('-') {
            Some((min, max)) => (min, Some(max)),
            None => (value, None),
        };

        if let Some(min) = parse_number(min) {
            self.push(Condition::NumberAtLeast(column), BindValue::Number(min));
        }
        if let Some(max) = max.and_then(parse_number) {
            self.push(Condition::NumberAtMost(column), BindValue::Number(max));
        }
        self
    }

    /// Match rows whose column starts with the first `len` characters of `value`
    pub fn prefix(&mut self, column: &'static str, value: Option<&str>, len: usize) -> &mut Self {
        if let Some(value) = present(value) {
            let prefix: String = value.chars().take(len).collect();
            self.push(Condition::Like(column), BindValue::Text(format!("{prefix}%")));
        }
        self
    }

    /// Predicates in bind order
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Bind values in placeholder order
    pub fn binds(&self) -> impl Iterator<Item = &BindValue> {
        self.predicates.iter().map(|p| &p.value)
    }

    /// Number of predicates (and bind parameters)
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// True when the clause matches every row
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Render the predicate, starting from `TRUE`
    pub fn to_sql(&self) -> String {
        let mut sql = String::from("TRUE");
        for (index, predicate) in self.predicates.iter().enumerate() {
            sql.push_str(" AND ");
            sql.push_str(&predicate.condition.render(index + 1));
        }
        sql
    }

    /// Full `SELECT` statement over `table` filtered by this clause.
    ///
    /// No `ORDER BY` is added; rows come back in storage order.
    pub fn select(&self, table: &str, columns: &str) -> String {
        format!("SELECT {columns} FROM {table} WHERE {}", self.to_sql())
    }
}

/// Empty strings count as absent
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Query string accepted by `GET /empresas`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanySearch {
    /// State
    pub estado: Option<String>,
    /// Specialty tag
    pub especialidade: Option<String>,
    /// Exact price
    pub valor: Option<String>,
    /// Gender tag
    pub genero: Option<String>,
    /// Attendance mode
    pub atendimento: Option<String>,
}

impl CompanySearch {
    /// Build the clause in the order `estado, especialidade, valor, genero, atendimento`
    pub fn to_clause(&self) -> FilterClause {
        let mut clause = FilterClause::new();
        clause
            .text("estado", self.estado.as_deref())
            .text("especialidade", self.especialidade.as_deref())
            .number_equals("valor", self.valor.as_deref())
            .text("genero", self.genero.as_deref())
            .attendance("atendimento", self.atendimento.as_deref());
        clause
    }
}

/// Query string accepted by `GET /profissional`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfessionalSearch {
    /// Specialty tag
    pub especialidade: Option<String>,
    /// Price range, `"min-max"` or `"min-infinity"`
    pub valor: Option<String>,
    /// Gender tag
    pub genero: Option<String>,
    /// Attendance mode
    pub atendimento: Option<String>,
    /// State
    pub estado: Option<String>,
    /// Postal code; only its first three characters are compared
    pub cep: Option<String>,
}

impl ProfessionalSearch {
    /// Build the clause in the order `especialidade, valor, genero, atendimento, estado, cep`
    pub fn to_clause(&self) -> FilterClause {
        let mut clause = FilterClause::new();
        clause
            .text("especialidade", self.especialidade.as_deref())
            .number_range("valor", self.valor.as_deref())
            .text("genero", self.genero.as_deref())
            .attendance("atendimento", self.atendimento.as_deref())
            .text("estado", self.estado.as_deref())
            .prefix("cep", self.cep.as_deref(), POSTAL_PREFIX_LEN);
        clause
    }
}
